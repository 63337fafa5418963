use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use rua_db::rusqlite::Connection;
use std::path::Path;

use rua_db::db::insert_draw;
use rua_db::models::{validate_draw, Draw, CLASS_COUNT};

pub fn parse_french_decimal(s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let normalized = s.replace(',', ".");
    normalized
        .parse::<f64>()
        .with_context(|| format!("Impossible de parser le nombre: '{}'", s))
}

fn parse_date(raw: &str) -> Result<String> {
    let iso = if raw.contains('/') {
        let parts: Vec<&str> = raw.split('/').collect();
        if parts.len() != 3 {
            bail!("Format de date invalide: '{}'", raw);
        }
        format!("{}-{}-{}", parts[2], parts[1], parts[0])
    } else {
        raw.to_string()
    };
    NaiveDate::parse_from_str(&iso, "%Y-%m-%d")
        .with_context(|| format!("Date invalide: '{}'", raw))?;
    Ok(iso)
}

/// Format attendu (séparateur « ; ») :
/// date;m1;m2;m3;m4;m5;e1;e2;gkl1;...;gkl12
/// Les cellules de gain vides restent non renseignées.
fn parse_record(record: &csv::StringRecord) -> Result<Draw> {
    let get = |idx: usize| -> Result<String> {
        record
            .get(idx)
            .map(|s| s.trim().to_string())
            .with_context(|| format!("Champ manquant à l'index {}", idx))
    };

    let get_u8 = |idx: usize| -> Result<u8> {
        let s = get(idx)?;
        s.parse::<u8>()
            .with_context(|| format!("Impossible de parser '{}' (index {})", s, idx))
    };

    let date = parse_date(&get(0)?)?;

    let mains: [u8; 5] = [get_u8(1)?, get_u8(2)?, get_u8(3)?, get_u8(4)?, get_u8(5)?];
    let euros: [u8; 2] = [get_u8(6)?, get_u8(7)?];
    validate_draw(&mains, &euros)?;

    let mut payouts = [None; CLASS_COUNT];
    for (i, slot) in payouts.iter_mut().enumerate() {
        let cell = get(8 + i).unwrap_or_default();
        if !cell.is_empty() {
            *slot = Some(parse_french_decimal(&cell)?);
        }
    }

    Ok(Draw {
        date,
        mains,
        euros,
        payouts,
    })
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;

    let mut result = ImportResult {
        total_records: 0,
        inserted: 0,
        skipped: 0,
        errors: 0,
    };

    for record_result in reader.records() {
        result.total_records += 1;
        match record_result {
            Ok(record) => match parse_record(&record) {
                Ok(draw) => match insert_draw(&tx, &draw) {
                    Ok(true) => result.inserted += 1,
                    Ok(false) => result.skipped += 1,
                    Err(e) => {
                        eprintln!("Erreur insertion tirage {}: {}", result.total_records, e);
                        result.errors += 1;
                    }
                },
                Err(e) => {
                    eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
