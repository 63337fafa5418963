mod display;
mod import;

use std::path::PathBuf;

use anyhow::{bail, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand};

use rua_core::distributions::{
    low_high_split, modulo_counts, month_counts, parity_totals, rolling_mean, sum_series,
    tuesday_friday_effect, weekday_counts,
};
use rua_core::evaluate::{evaluate_numbers, prize_stats};
use rua_core::frequency::count_frequencies;
use rua_core::overdue::{overdue_points, position_bias, streaks};
use rua_core::pairs::{consecutive_pairs, triplet_counts, PairCounts};
use rua_core::picks::{generate_tickets, PickParams};
use rua_db::db::{count_draws, db_path, fetch_all, fetch_last_draws, fetch_window, migrate, open_db};
use rua_db::models::{validate_draw, Pool};

#[derive(Parser)]
#[command(name = "rua", about = "Analyseur statistique EuroJackpot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer les tirages depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "assets/eurojackpot.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Fréquences, retards et séries chaudes/froides
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Paires, triplets, suites consécutives
    Pairs {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "300")]
        window: u32,

        /// Nombre de paires affichées
        #[arg(short, long, default_value = "20")]
        top: usize,
    },

    /// Tendances : sommes, parité, distributions, saisonnalité
    Trends {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "300")]
        window: u32,
    },

    /// Générer des grilles « Smart Picks » diversifiées
    Picks {
        /// Nombre de grilles à suggérer
        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Taille du pool échantillonné
        #[arg(long, default_value = "2000")]
        samples: usize,

        /// Distance minimale entre deux grilles
        #[arg(long, default_value = "5")]
        min_distance: u32,

        /// Seed pour la reproductibilité (défaut : date du jour AAAAMMJJ)
        #[arg(long)]
        seed: Option<u64>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Évaluer une grille contre l'historique (5 numéros puis 2 euros)
    Evaluate {
        /// 5 numéros + 2 euros (7 nombres)
        numbers: Vec<u8>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => cmd_import(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Pairs { window, top } => cmd_pairs(&conn, window, top),
        Command::Trends { window } => cmd_trends(&conn, window),
        Command::Picks {
            count,
            samples,
            min_distance,
            seed,
            json,
        } => cmd_picks(&conn, count, samples, min_distance, seed, json),
        Command::Evaluate { numbers, json } => cmd_evaluate(&conn, &numbers, json),
    }
}

/// Seed déterministe basé sur la date du jour (AAAAMMJJ) : les grilles
/// d'une même journée sont stables, un seed explicite permet de relancer.
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64
}

fn empty_base() -> Result<()> {
    println!("Base vide. Lancez d'abord : rua import");
    Ok(())
}

fn cmd_import(conn: &rua_db::rusqlite::Connection, file: &PathBuf) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display::display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &rua_db::rusqlite::Connection, last: u32) -> Result<()> {
    if count_draws(conn)? == 0 {
        return empty_base();
    }
    let draws = fetch_last_draws(conn, last)?;
    display::display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &rua_db::rusqlite::Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        return empty_base();
    }
    let effective_window = window.min(n);
    let draws = fetch_window(conn, effective_window)?;

    println!("\n📊 Statistiques sur les {} derniers tirages\n", effective_window);

    let main_counts = count_frequencies(&draws, Pool::Mains);
    let main_overdue = overdue_points(&draws, Pool::Mains);
    display::display_stats(&main_counts, &main_overdue, "Numéros (1-50)");

    let euro_counts = count_frequencies(&draws, Pool::Euros);
    let euro_overdue = overdue_points(&draws, Pool::Euros);
    display::display_stats(&euro_counts, &euro_overdue, "Euros (1-12)");

    display::display_overdue(&main_overdue, &main_counts, 15);
    display::display_streaks(&streaks(&draws, Pool::Mains));
    Ok(())
}

fn cmd_pairs(conn: &rua_db::rusqlite::Connection, window: u32, top: usize) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        return empty_base();
    }
    let draws = fetch_window(conn, window.min(n))?;

    let pairs = PairCounts::new(&draws);
    display::display_pairs(&pairs, top);
    display::display_triplets(&triplet_counts(&draws, top));
    display::display_consecutive(&consecutive_pairs(&draws), top);
    Ok(())
}

fn cmd_trends(conn: &rua_db::rusqlite::Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        return empty_base();
    }
    let draws = fetch_window(conn, window.min(n))?;

    let sums = sum_series(&draws);
    let values: Vec<f64> = sums.iter().map(|p| p.value as f64).collect();
    let mean_window = 50usize.min(values.len());
    let rolling = rolling_mean(&values, mean_window);
    display::display_sum_trend(&sums, &rolling, mean_window);

    let (odd, even) = parity_totals(&draws);
    println!("\nParité cumulée : {} impairs / {} pairs", odd, even);

    let (low, high) = low_high_split(&draws)
        .iter()
        .fold((0, 0), |(l, h), p| (l + p.low, h + p.high));
    println!("Répartition bas/haut (1-25 / 26-50) : {} / {}", low, high);

    let digit_labels: Vec<String> = (0..10).map(|d| d.to_string()).collect();
    display::display_counts_table(
        "Dernier chiffre (mod 10)",
        &digit_labels,
        &modulo_counts(&draws, 10),
    );
    for base in [5usize, 7] {
        let labels: Vec<String> = (0..base).map(|r| format!("r = {}", r)).collect();
        display::display_counts_table(
            &format!("Classes modulo {}", base),
            &labels,
            &modulo_counts(&draws, base),
        );
    }

    let weekdays = weekday_counts(&draws);
    display::display_weekdays(&weekdays, tuesday_friday_effect(&weekdays));
    display::display_months(&month_counts(&draws));

    display::display_position_bias(&position_bias(&draws));
    display::display_prize_stats(&prize_stats(&draws));
    Ok(())
}

fn cmd_picks(
    conn: &rua_db::rusqlite::Connection,
    count: usize,
    samples: usize,
    min_distance: u32,
    seed: Option<u64>,
    json: bool,
) -> Result<()> {
    if count_draws(conn)? == 0 {
        return empty_base();
    }
    let draws = fetch_all(conn)?;

    let params = PickParams {
        count,
        samples,
        min_distance,
        ..PickParams::default()
    };
    let seed = seed.unwrap_or_else(date_seed);
    let tickets = generate_tickets(&draws, &params, Some(seed));

    if json {
        println!("{}", serde_json::to_string_pretty(&tickets)?);
    } else {
        println!("Historique : {} tirages (seed {})", draws.len(), seed);
        display::display_picks(&tickets);
    }
    Ok(())
}

fn cmd_evaluate(conn: &rua_db::rusqlite::Connection, numbers: &[u8], json: bool) -> Result<()> {
    if numbers.len() != 7 {
        bail!("Donnez 7 nombres : 5 numéros (1-50) puis 2 euros (1-12)");
    }
    let mut mains = [numbers[0], numbers[1], numbers[2], numbers[3], numbers[4]];
    let mut euros = [numbers[5], numbers[6]];
    mains.sort();
    euros.sort();
    validate_draw(&mains, &euros)?;

    let draws = fetch_all(conn)?;
    let result = evaluate_numbers(&draws, &mains, &euros);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Grille : {:?} + {:?} sur {} tirages",
            mains,
            euros,
            draws.len()
        );
        display::display_evaluation(&result);
    }
    Ok(())
}
