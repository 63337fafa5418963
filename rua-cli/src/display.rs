use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};
use textplots::Plot;

use crate::import::ImportResult;
use rua_core::distributions::SeriesPoint;
use rua_core::evaluate::{EvaluationResult, PrizeStat};
use rua_core::overdue::{run_length_histogram, OverduePoint, Streaks};
use rua_core::pairs::{ConsecutiveStats, PairCounts, TripletCount};
use rua_core::picks::Ticket;
use rua_db::models::Draw;

const WEEKDAYS: [&str; 7] = ["Lun", "Mar", "Mer", "Jeu", "Ven", "Sam", "Dim"];
const MONTHS: [&str; 12] = [
    "Jan", "Fév", "Mar", "Avr", "Mai", "Juin", "Juil", "Août", "Sep", "Oct", "Nov", "Déc",
];

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn join_numbers(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Numéros", "Euros", "Gain rang 1"]);
    for draw in draws {
        let mut mains = draw.mains;
        mains.sort();
        let mut euros = draw.euros;
        euros.sort();

        let jackpot = match draw.payout(1) {
            Some(amount) => format!("{:.2} €", amount),
            None => "—".to_string(),
        };

        table.add_row(vec![
            &draw.date,
            &join_numbers(&mains),
            &join_numbers(&euros),
            &jackpot,
        ]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_stats(counts: &[u32], overdue: &[OverduePoint], label: &str) {
    println!("\n── {} ──", label);

    let mut gaps = vec![0u32; counts.len()];
    for p in overdue {
        if p.number >= 1 && (p.number as usize) <= counts.len() {
            gaps[(p.number - 1) as usize] = p.draws_since;
        }
    }

    let mut numbers: Vec<u8> = (1..=counts.len() as u8).collect();
    numbers.sort_by(|&a, &b| {
        counts[(b - 1) as usize]
            .cmp(&counts[(a - 1) as usize])
            .then(a.cmp(&b))
    });

    let mut table = new_table(vec!["Numéro", "Fréquence", "Retard"]);
    for &n in &numbers {
        table.add_row(vec![
            format!("{:2}", n),
            counts[(n - 1) as usize].to_string(),
            gaps[(n - 1) as usize].to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_overdue(points: &[OverduePoint], counts: &[u32], top: usize) {
    println!("\n── Numéros les plus en retard ──");

    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);
    let mut table = new_table(vec!["Numéro", "Tirages sans sortie", "Dernière sortie", "Fréquence"]);
    for p in points.iter().take(top) {
        let count = counts
            .get((p.number as usize).wrapping_sub(1))
            .copied()
            .unwrap_or(0);
        let bar = "█".repeat((count * 20 / max_count) as usize);
        table.add_row(vec![
            Cell::new(format!("{:2}", p.number)),
            Cell::new(p.draws_since.to_string()).fg(Color::Yellow),
            Cell::new(p.last_seen_date.as_deref().unwrap_or("jamais")),
            Cell::new(format!("{} {}", count, bar)),
        ]);
    }
    println!("{table}");
}

pub fn display_streaks(streaks: &Streaks) {
    println!("\n── Séries chaudes / froides (longueurs) ──");

    for (label, runs) in [("Chaudes", &streaks.hot_runs), ("Froides", &streaks.cold_runs)] {
        let hist = run_length_histogram(runs);
        let max = hist.iter().map(|&(_, c)| c).max().unwrap_or(1);
        let mut table = new_table(vec!["Longueur", "Occurrences", ""]);
        for (len, count) in &hist {
            table.add_row(vec![
                len.to_string(),
                count.to_string(),
                "█".repeat((count * 25 / max) as usize),
            ]);
        }
        println!("{} :\n{table}", label);
    }
}

pub fn display_pairs(pairs: &PairCounts, top: usize) {
    println!("\n── Paires les plus fréquentes ──");

    let mut table = new_table(vec!["#", "Paire", "Co-occurrences", "Lift"]);
    for (i, edge) in pairs.top_pairs(top).iter().enumerate() {
        let lift = pairs.lift(edge.a, edge.b);
        let lift_color = if lift > 1.0 { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(format!("{}", i + 1)),
            Cell::new(format!("{:2} - {:2}", edge.a, edge.b)),
            Cell::new(edge.count.to_string()),
            Cell::new(format!("{:.2}", lift)).fg(lift_color),
        ]);
    }
    println!("{table}");
}

pub fn display_triplets(triplets: &[TripletCount]) {
    println!("\n── Triplets les plus fréquents ──");

    let mut table = new_table(vec!["Triplet", "Occurrences"]);
    for t in triplets {
        table.add_row(vec![
            format!("{:2} - {:2} - {:2}", t.numbers[0], t.numbers[1], t.numbers[2]),
            t.count.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_consecutive(stats: &ConsecutiveStats, top: usize) {
    println!("\n── Paires consécutives ──");
    println!("Total observé : {}", stats.total);

    if !stats.pairs.is_empty() {
        let mut table = new_table(vec!["Paire", "Occurrences"]);
        for &(a, count) in stats.pairs.iter().take(top) {
            table.add_row(vec![format!("{:2}-{:2}", a, a + 1), count.to_string()]);
        }
        println!("{table}");
    }
}

pub fn display_sum_trend(sums: &[SeriesPoint], rolling: &[Option<f64>], window: usize) {
    if sums.len() < 2 {
        println!("  (Pas assez de tirages pour la tendance)");
        return;
    }

    println!("\n── Somme des numéros principaux par tirage ──");

    let points: Vec<(f32, f32)> = sums
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f32, p.value as f32))
        .collect();
    let y_min = sums.iter().map(|p| p.value).min().unwrap_or(0) as f32 - 5.0;
    let y_max = sums.iter().map(|p| p.value).max().unwrap_or(0) as f32 + 5.0;

    let shape = textplots::Shape::Points(&points);
    let mut chart =
        textplots::Chart::new_with_y_range(120, 40, 0.0, (sums.len() - 1) as f32, y_min, y_max);
    println!("{}", chart.lineplot(&shape));

    let mean_points: Vec<(f32, f32)> = rolling
        .iter()
        .enumerate()
        .filter_map(|(i, m)| m.map(|v| (i as f32, v as f32)))
        .collect();
    if mean_points.len() >= 2 {
        println!("Moyenne glissante ({} tirages) :", window);
        let shape = textplots::Shape::Points(&mean_points);
        let mut chart =
            textplots::Chart::new_with_y_range(120, 40, 0.0, (sums.len() - 1) as f32, y_min, y_max);
        println!("{}", chart.lineplot(&shape));
    }
}

pub fn display_counts_table(title: &str, labels: &[String], counts: &[u32]) {
    println!("\n── {} ──", title);

    let max = counts.iter().copied().max().unwrap_or(1).max(1);
    let mut table = new_table(vec!["", "Occurrences", ""]);
    for (label, &count) in labels.iter().zip(counts.iter()) {
        table.add_row(vec![
            label.clone(),
            count.to_string(),
            "█".repeat((count * 25 / max) as usize),
        ]);
    }
    println!("{table}");
}

pub fn display_weekdays(counts: &[u32; 7], notable: bool) {
    let labels: Vec<String> = WEEKDAYS.iter().map(|s| s.to_string()).collect();
    display_counts_table("Tirages par jour de la semaine", &labels, counts);
    if notable {
        println!("Écart mardi/vendredi notable (> racine du total).");
    } else {
        println!("Écart mardi/vendredi non significatif.");
    }
}

pub fn display_months(counts: &[u32; 12]) {
    let labels: Vec<String> = MONTHS.iter().map(|s| s.to_string()).collect();
    display_counts_table("Tirages par mois", &labels, counts);
}

pub fn display_position_bias(bias: &[Vec<f64>]) {
    println!("\n── Biais de position (numéros triés, 1 = max de la ligne) ──");

    let mut table = new_table(vec!["Position", "Numéros dominants"]);
    for (pos, row) in bias.iter().enumerate() {
        let mut ranked: Vec<(u8, f64)> = row
            .iter()
            .enumerate()
            .map(|(i, &v)| ((i + 1) as u8, v))
            .filter(|&(_, v)| v > 0.0)
            .collect();
        ranked.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(std::cmp::Ordering::Equal));
        let dominants = ranked
            .iter()
            .take(5)
            .map(|(n, v)| format!("{:2} ({:.0} %)", n, v * 100.0))
            .collect::<Vec<_>>()
            .join("  ");
        table.add_row(vec![format!("{}", pos + 1), dominants]);
    }
    println!("{table}");
}

pub fn display_prize_stats(stats: &[PrizeStat]) {
    println!("\n── Gains enregistrés par classe ──");

    let mut table = new_table(vec!["Classe", "Tirages renseignés", "Total", "Moyenne"]);
    for s in stats {
        table.add_row(vec![
            format!("GKL{}", s.class),
            s.count.to_string(),
            format!("{:.2} €", s.total),
            format!("{:.2} €", s.avg),
        ]);
    }
    println!("{table}");
}

pub fn display_picks(tickets: &[Ticket]) {
    println!("\n== Smart Picks ==\n");
    println!("Suggestions pondérées par l'historique, pas des prédictions.\n");

    let mut table = new_table(vec!["#", "Numéros", "Euros", "Score", "Pourquoi"]);
    for (i, t) in tickets.iter().enumerate() {
        let mains = join_numbers(&t.mains);
        let euros = join_numbers(&t.euros);
        let badges = t.badges.join(", ");
        let score = format!("{:.2}", t.score);

        if i == 0 {
            table.add_row(vec![
                Cell::new(format!("{}", i + 1)).fg(Color::Green),
                Cell::new(&mains).fg(Color::Green),
                Cell::new(&euros).fg(Color::Yellow),
                Cell::new(&score).fg(Color::Green),
                Cell::new(&badges),
            ]);
        } else {
            table.add_row(vec![
                Cell::new(format!("{}", i + 1)),
                Cell::new(&mains),
                Cell::new(&euros).fg(Color::Yellow),
                Cell::new(&score),
                Cell::new(&badges),
            ]);
        }
    }
    println!("{table}");
}

pub fn display_evaluation(result: &EvaluationResult) {
    println!("\n== Évaluation de la grille ==\n");

    let mut table = new_table(vec!["Classe", "Gains", "Total", "Moyenne"]);
    for (idx, (&hits, &total)) in result
        .class_hits
        .iter()
        .zip(result.class_totals.iter())
        .enumerate()
    {
        let avg = if hits > 0 { total / hits as f64 } else { 0.0 };
        let row_color = if hits > 0 { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(format!("GKL{}", idx + 1)).fg(row_color),
            Cell::new(hits.to_string()).fg(row_color),
            Cell::new(format!("{:.2} €", total)).fg(row_color),
            Cell::new(format!("{:.2} €", avg)).fg(row_color),
        ]);
    }
    println!("{table}");

    println!("Gain cumulé : {:.2} €", result.grand_total);
    match result.best_class {
        Some(class) => println!("Meilleure classe atteinte : GKL{}", class),
        None => println!("Meilleure classe atteinte : —"),
    }

    if !result.wins.is_empty() {
        println!("\n── Derniers tirages gagnants ──");
        let mut table = new_table(vec!["Date", "Classe", "Montant"]);
        for win in result.wins.iter().rev().take(10) {
            table.add_row(vec![
                win.date.clone(),
                format!("GKL{}", win.class),
                format!("{:.2} €", win.amount),
            ]);
        }
        println!("{table}");
    }
}
