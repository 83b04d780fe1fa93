use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use ledetruque_db::db::StoredLine;
use ledetruque_db::models::{Draw, GeneratedLine, Series};
use ledetruque_gen::metrics::{ActivityTag, SymbolStats};
use ledetruque_gen::{SimulationReport, Strategy};

use crate::import::ImportResult;

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn join_dashed(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

pub fn display_import_summary(result: &ImportResult) {
    println!("\n== Import terminé ==");
    println!("  Lignes lues     : {}", result.total_records);
    println!("  Insérées        : {}", result.inserted);
    println!("  Doublons ignorés: {}", result.skipped);
    println!("  Erreurs         : {}", result.errors);
}

pub fn display_draws(draws: &[Draw]) {
    let mut table = new_table();
    table.set_header(vec!["Date", "Numéros", "Étoiles"]);
    for draw in draws {
        table.add_row(vec![
            draw.date.clone(),
            join_dashed(&draw.numbers),
            join_dashed(&draw.stars),
        ]);
    }
    println!("{table}");
}

fn tag_cell(tag: &ActivityTag) -> Cell {
    match tag {
        ActivityTag::Hot => Cell::new("HOT").fg(Color::Red),
        ActivityTag::Cold => Cell::new("COLD").fg(Color::Blue),
        ActivityTag::Normal => Cell::new("-"),
    }
}

fn stats_table(stats: &[SymbolStats]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Symbole", "Fréquence", "Retard", "Tag"]);
    for stat in stats {
        table.add_row(vec![
            Cell::new(stat.symbol),
            Cell::new(stat.frequency),
            Cell::new(stat.gap),
            tag_cell(&stat.tag),
        ]);
    }
    table
}

pub fn display_stats(
    number_stats: &[SymbolStats],
    star_stats: &[SymbolStats],
    window: u32,
) {
    println!("\n== Numéros (fenêtre : {} tirages) ==", window);
    println!("{}", stats_table(number_stats));
    println!("\n== Étoiles (ère 12 étoiles, fenêtre : {} tirages) ==", window);
    println!("{}", stats_table(star_stats));
}

pub fn display_repeated(repeated: &[([u8; 7], u32)]) {
    if repeated.is_empty() {
        println!("\nAucune combinaison complète répétée dans l'historique.");
        return;
    }
    let mut table = new_table();
    table.set_header(vec!["Numéros", "Étoiles", "Occurrences"]);
    for (key, count) in repeated {
        table.add_row(vec![
            join_dashed(&key[..5]),
            join_dashed(&key[5..]),
            count.to_string(),
        ]);
    }
    println!("\n== Combinaisons répétées ==");
    println!("{table}");
}

pub fn display_block(block: &[GeneratedLine], strategy: Strategy) {
    println!("\n== Bloc généré (mode {}) ==", strategy);
    for series in Series::ALL {
        let lines: Vec<&GeneratedLine> =
            block.iter().filter(|l| l.series == series).collect();
        if lines.is_empty() {
            continue;
        }
        let (min, max) = series.sum_range();
        println!("\nSérie {} (somme {}-{})", series, min, max);
        let mut table = new_table();
        table.set_header(vec!["Numéros", "Étoiles", "Somme"]);
        for line in lines {
            table.add_row(vec![
                join_dashed(&line.numbers),
                join_dashed(&line.stars),
                line.sum_numbers().to_string(),
            ]);
        }
        println!("{table}");
    }
}

pub fn display_stored_lines(lines: &[StoredLine]) {
    let mut table = new_table();
    table.set_header(vec![
        "Id", "Créée le", "Mode", "Série", "Numéros", "Étoiles", "Somme",
    ]);
    for line in lines {
        table.add_row(vec![
            line.id.to_string(),
            line.created_at.clone(),
            line.mode.clone(),
            line.serie.clone(),
            line.numbers.clone(),
            line.stars.clone(),
            line.sum_numbers.to_string(),
        ]);
    }
    println!("{table}");
}

pub fn display_simulation(report: &SimulationReport, strategy: Strategy) {
    println!(
        "\n== Simulation Monte Carlo (mode {}, {} essais, {} lignes) ==",
        strategy, report.trials, report.total_lines
    );

    let mut table = new_table();
    table.set_header(vec!["Numéros", "Étoiles", "Occurrences", "Probabilité"]);
    // Les meilleurs rangs d'abord
    for hits_n in (0..6).rev() {
        for hits_s in (0..3).rev() {
            let count = report.counts[hits_n][hits_s];
            if count == 0 {
                continue;
            }
            table.add_row(vec![
                hits_n.to_string(),
                hits_s.to_string(),
                count.to_string(),
                format!("{:.6}", report.probability(hits_n, hits_s)),
            ]);
        }
    }
    println!("{table}");

    println!("P(>= 3 numéros)   : {:.6}", report.p_three_plus_numbers());
    println!("P(rang payé)      : {:.6}", report.p_any_prize());
}
