use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use ledetruque_db::rusqlite::Connection;
use std::path::Path;

use ledetruque_db::db::insert_draw;
use ledetruque_db::models::{validate_draw, Draw};

/// Les deux formats de CSV acceptés :
/// - export « espagnol » : Fecha,N1..N5,E1,E2 avec dates JJ/MM/AAAA
/// - schéma normalisé  : date,n1..n5,s1,s2 avec dates ISO
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CsvLayout {
    Spanish,
    Normalized,
}

fn detect_layout(headers: &csv::StringRecord) -> Result<CsvLayout> {
    let has = |name: &str| headers.iter().any(|h| h.trim().eq_ignore_ascii_case(name));
    if has("date") && has("n1") {
        Ok(CsvLayout::Normalized)
    } else if has("Fecha") && has("N1") {
        Ok(CsvLayout::Spanish)
    } else {
        bail!("En-tête CSV non reconnu : {:?}", headers);
    }
}

fn column_index(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .with_context(|| format!("Colonne absente : {}", name))
}

pub fn parse_date(raw: &str, layout_dayfirst: bool) -> Result<String> {
    let raw = raw.trim();
    let format = if layout_dayfirst { "%d/%m/%Y" } else { "%Y-%m-%d" };
    let date = NaiveDate::parse_from_str(raw, format)
        .with_context(|| format!("Date invalide : '{}'", raw))?;
    Ok(date.format("%Y-%m-%d").to_string())
}

struct ColumnMap {
    date: usize,
    numbers: [usize; 5],
    stars: [usize; 2],
    dayfirst: bool,
}

impl ColumnMap {
    fn resolve(headers: &csv::StringRecord) -> Result<ColumnMap> {
        let layout = detect_layout(headers)?;
        let (date_col, num_prefix, star_cols) = match layout {
            CsvLayout::Spanish => ("Fecha", "N", ["E1", "E2"]),
            CsvLayout::Normalized => ("date", "n", ["s1", "s2"]),
        };

        let mut numbers = [0usize; 5];
        for (i, slot) in numbers.iter_mut().enumerate() {
            *slot = column_index(headers, &format!("{}{}", num_prefix, i + 1))?;
        }
        Ok(ColumnMap {
            date: column_index(headers, date_col)?,
            numbers,
            stars: [
                column_index(headers, star_cols[0])?,
                column_index(headers, star_cols[1])?,
            ],
            dayfirst: layout == CsvLayout::Spanish,
        })
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<Draw> {
        let get = |idx: usize| -> Result<&str> {
            record
                .get(idx)
                .map(|s| s.trim())
                .with_context(|| format!("Champ manquant à l'index {}", idx))
        };
        let get_u8 = |idx: usize| -> Result<u8> {
            let s = get(idx)?;
            s.parse::<u8>()
                .with_context(|| format!("Impossible de parser '{}'", s))
        };

        let date = parse_date(get(self.date)?, self.dayfirst)?;
        let mut numbers = [0u8; 5];
        for (slot, &idx) in numbers.iter_mut().zip(self.numbers.iter()) {
            *slot = get_u8(idx)?;
        }
        let stars = [get_u8(self.stars[0])?, get_u8(self.stars[1])?];

        validate_draw(&numbers, &stars)?;
        Ok(Draw {
            date,
            numbers,
            stars,
        })
    }
}

pub struct ImportResult {
    pub total_records: u32,
    pub inserted: u32,
    pub skipped: u32,
    pub errors: u32,
}

/// Importe un CSV d'historique. Les lignes malformées sont comptées puis
/// ignorées, jamais fatales.
pub fn import_csv(conn: &Connection, path: &Path) -> Result<ImportResult> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;

    let headers = reader.headers().context("En-tête CSV illisible")?.clone();
    let columns = ColumnMap::resolve(&headers)?;

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
        let record = match record_result {
            Ok(record) => record,
            Err(e) => {
                eprintln!("Erreur lecture ligne {}: {}", result.total_records, e);
                result.errors += 1;
                continue;
            }
        };
        match columns.parse_record(&record) {
            Ok(draw) => match insert_draw(&tx, &draw) {
                Ok(true) => result.inserted += 1,
                Ok(false) => result.skipped += 1,
                Err(e) => {
                    eprintln!("Erreur insertion ligne {}: {}", result.total_records, e);
                    result.errors += 1;
                }
            },
            Err(e) => {
                eprintln!("Erreur parsing ligne {}: {}", result.total_records, e);
                result.errors += 1;
            }
        }
    }

    tx.commit().context("Échec du commit")?;
    Ok(result)
}
