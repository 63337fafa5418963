use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, CLASS_COUNT};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    date      TEXT PRIMARY KEY,
    main_1    INTEGER NOT NULL,
    main_2    INTEGER NOT NULL,
    main_3    INTEGER NOT NULL,
    main_4    INTEGER NOT NULL,
    main_5    INTEGER NOT NULL,
    euro_1    INTEGER NOT NULL,
    euro_2    INTEGER NOT NULL,
    gkl_1     REAL,
    gkl_2     REAL,
    gkl_3     REAL,
    gkl_4     REAL,
    gkl_5     REAL,
    gkl_6     REAL,
    gkl_7     REAL,
    gkl_8     REAL,
    gkl_9     REAL,
    gkl_10    REAL,
    gkl_11    REAL,
    gkl_12    REAL
);
";

const COLUMNS: &str = "date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2, \
     gkl_1, gkl_2, gkl_3, gkl_4, gkl_5, gkl_6, gkl_7, gkl_8, gkl_9, gkl_10, gkl_11, gkl_12";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("rua.db");
    path
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Impossible de créer le répertoire {:?}", parent))?;
    }
    let conn = Connection::open(path)
        .with_context(|| format!("Impossible d'ouvrir la base {:?}", path))?;
    Ok(conn)
}

pub fn migrate(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
        .context("Échec de la migration")?;
    Ok(())
}

pub fn insert_draw(conn: &Connection, draw: &Draw) -> Result<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO draws (date, main_1, main_2, main_3, main_4, main_5, euro_1, euro_2, \
         gkl_1, gkl_2, gkl_3, gkl_4, gkl_5, gkl_6, gkl_7, gkl_8, gkl_9, gkl_10, gkl_11, gkl_12)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20)",
        rusqlite::params![
            draw.date,
            draw.mains[0],
            draw.mains[1],
            draw.mains[2],
            draw.mains[3],
            draw.mains[4],
            draw.euros[0],
            draw.euros[1],
            draw.payouts[0],
            draw.payouts[1],
            draw.payouts[2],
            draw.payouts[3],
            draw.payouts[4],
            draw.payouts[5],
            draw.payouts[6],
            draw.payouts[7],
            draw.payouts[8],
            draw.payouts[9],
            draw.payouts[10],
            draw.payouts[11],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn row_to_draw(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    let mut payouts = [None; CLASS_COUNT];
    for (i, slot) in payouts.iter_mut().enumerate() {
        *slot = row.get::<_, Option<f64>>(8 + i)?;
    }
    Ok(Draw {
        date: row.get(0)?,
        mains: [
            row.get::<_, u8>(1)?,
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
        ],
        euros: [
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
        payouts,
    })
}

pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM draws ORDER BY date DESC LIMIT ?1",
        COLUMNS
    ))?;
    let draws = stmt
        .query_map([limit], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Les `limit` derniers tirages en ordre chronologique (le plus ancien en premier),
/// la convention d'entrée des moteurs de rua-core.
pub fn fetch_window(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut draws = fetch_last_draws(conn, limit)?;
    draws.reverse();
    Ok(draws)
}

pub fn fetch_all(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM draws ORDER BY date ASC",
        COLUMNS
    ))?;
    let draws = stmt
        .query_map([], row_to_draw)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_draw(date: &str) -> Draw {
        let mut payouts = [None; CLASS_COUNT];
        payouts[0] = Some(17_000_000.0);
        payouts[11] = Some(9.6);
        Draw {
            date: date.to_string(),
            mains: [1, 2, 3, 4, 5],
            euros: [1, 2],
            payouts,
        }
    }

    #[test]
    fn test_insert_and_count() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 0);

        insert_draw(&conn, &test_draw("2024-01-02")).unwrap();
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_duplicate_ignored() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        let inserted = insert_draw(&conn, &test_draw("2024-01-02")).unwrap();
        assert!(inserted);
        let inserted = insert_draw(&conn, &test_draw("2024-01-02")).unwrap();
        assert!(!inserted);
        assert_eq!(count_draws(&conn).unwrap(), 1);
    }

    #[test]
    fn test_payouts_round_trip() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();
        insert_draw(&conn, &test_draw("2024-01-02")).unwrap();

        let draws = fetch_last_draws(&conn, 1).unwrap();
        assert_eq!(draws[0].payout(1), Some(17_000_000.0));
        assert_eq!(draws[0].payout(12), Some(9.6));
        assert_eq!(draws[0].payout(5), None);
    }

    #[test]
    fn test_fetch_order() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("2024-01-02")).unwrap();
        insert_draw(&conn, &test_draw("2024-01-09")).unwrap();
        insert_draw(&conn, &test_draw("2024-01-05")).unwrap();

        let draws = fetch_last_draws(&conn, 10).unwrap();
        assert_eq!(draws[0].date, "2024-01-09");
        assert_eq!(draws[1].date, "2024-01-05");
        assert_eq!(draws[2].date, "2024-01-02");
    }

    #[test]
    fn test_fetch_window_chronological() {
        let conn = Connection::open_in_memory().unwrap();
        migrate(&conn).unwrap();

        insert_draw(&conn, &test_draw("2024-01-02")).unwrap();
        insert_draw(&conn, &test_draw("2024-01-09")).unwrap();
        insert_draw(&conn, &test_draw("2024-01-05")).unwrap();

        let draws = fetch_window(&conn, 2).unwrap();
        assert_eq!(draws.len(), 2);
        assert_eq!(draws[0].date, "2024-01-05");
        assert_eq!(draws[1].date, "2024-01-09");
    }
}
