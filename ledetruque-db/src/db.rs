use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

use crate::models::{Draw, GeneratedLine};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS draws (
    date    TEXT PRIMARY KEY,
    n1      INTEGER NOT NULL,
    n2      INTEGER NOT NULL,
    n3      INTEGER NOT NULL,
    n4      INTEGER NOT NULL,
    n5      INTEGER NOT NULL,
    s1      INTEGER NOT NULL,
    s2      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS generated (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    created_at  TEXT NOT NULL,
    mode        TEXT NOT NULL,
    serie       TEXT NOT NULL,
    line_index  INTEGER NOT NULL,
    numbers     TEXT NOT NULL,
    stars       TEXT NOT NULL,
    sum_numbers INTEGER NOT NULL,
    block_size  INTEGER NOT NULL
);
";

pub fn db_path() -> std::path::PathBuf {
    let mut path = std::env::current_dir().unwrap_or_default();
    path.push("data");
    path.push("ledetruque.db");
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
        "INSERT OR IGNORE INTO draws (date, n1, n2, n3, n4, n5, s1, s2)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        rusqlite::params![
            draw.date,
            draw.numbers[0],
            draw.numbers[1],
            draw.numbers[2],
            draw.numbers[3],
            draw.numbers[4],
            draw.stars[0],
            draw.stars[1],
        ],
    ).context("Échec de l'insertion")?;
    Ok(changed > 0)
}

fn draw_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Draw> {
    Ok(Draw {
        date: row.get(0)?,
        numbers: [
            row.get::<_, u8>(1)?,
            row.get::<_, u8>(2)?,
            row.get::<_, u8>(3)?,
            row.get::<_, u8>(4)?,
            row.get::<_, u8>(5)?,
        ],
        stars: [
            row.get::<_, u8>(6)?,
            row.get::<_, u8>(7)?,
        ],
    })
}

/// Tout l'historique en ordre chronologique (le plus ancien d'abord).
pub fn fetch_all_draws(conn: &Connection) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT date, n1, n2, n3, n4, n5, s1, s2 FROM draws ORDER BY date ASC",
    )?;
    let draws = stmt
        .query_map([], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

/// Les `limit` derniers tirages, le plus récent d'abord.
pub fn fetch_last_draws(conn: &Connection, limit: u32) -> Result<Vec<Draw>> {
    let mut stmt = conn.prepare(
        "SELECT date, n1, n2, n3, n4, n5, s1, s2 FROM draws ORDER BY date DESC LIMIT ?1",
    )?;
    let draws = stmt
        .query_map([limit], draw_from_row)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(draws)
}

pub fn count_draws(conn: &Connection) -> Result<u32> {
    let count: u32 = conn.query_row("SELECT COUNT(*) FROM draws", [], |row| row.get(0))?;
    Ok(count)
}

/// Une ligne du journal des combinaisons générées.
#[derive(Debug, Clone)]
pub struct StoredLine {
    pub id: i64,
    pub created_at: String,
    pub mode: String,
    pub serie: String,
    pub line_index: u32,
    pub numbers: String,
    pub stars: String,
    pub sum_numbers: u32,
    pub block_size: u32,
}

fn join_dashed(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// Journalise un bloc entier. Retourne le nombre de lignes ajoutées.
pub fn save_block(
    conn: &Connection,
    block: &[GeneratedLine],
    mode: &str,
    created_at: &str,
) -> Result<u32> {
    let tx = conn
        .unchecked_transaction()
        .context("Impossible de démarrer la transaction")?;
    for (idx, line) in block.iter().enumerate() {
        tx.execute(
            "INSERT INTO generated (created_at, mode, serie, line_index, numbers, stars, sum_numbers, block_size)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            rusqlite::params![
                created_at,
                mode,
                line.series.label(),
                idx as u32,
                join_dashed(&line.numbers),
                join_dashed(&line.stars),
                line.sum_numbers(),
                block.len() as u32,
            ],
        ).context("Échec de l'insertion dans le journal")?;
    }
    tx.commit().context("Échec du commit")?;
    Ok(block.len() as u32)
}

/// Les `limit` dernières combinaisons journalisées, la plus récente d'abord.
pub fn fetch_last_generated(conn: &Connection, limit: u32) -> Result<Vec<StoredLine>> {
    let mut stmt = conn.prepare(
        "SELECT id, created_at, mode, serie, line_index, numbers, stars, sum_numbers, block_size
         FROM generated ORDER BY id DESC LIMIT ?1",
    )?;
    let lines = stmt
        .query_map([limit], |row| {
            Ok(StoredLine {
                id: row.get(0)?,
                created_at: row.get(1)?,
                mode: row.get(2)?,
                serie: row.get(3)?,
                line_index: row.get(4)?,
                numbers: row.get(5)?,
                stars: row.get(6)?,
                sum_numbers: row.get(7)?,
                block_size: row.get(8)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(lines)
}
