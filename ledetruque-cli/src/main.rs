mod display;
mod import;

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;
use rand::SeedableRng;

use ledetruque_db::db::{
    count_draws, db_path, fetch_all_draws, fetch_last_draws, fetch_last_generated, migrate,
    open_db, save_block,
};
use ledetruque_db::models::{Draw, Pool};
use ledetruque_gen::block::{generate_block, GenerationContext, Strategy};
use ledetruque_gen::metrics::{pool_stats, repeated_combinations};
use ledetruque_gen::simulate::{simulate, ReferenceSource};

use crate::display::{
    display_block, display_draws, display_import_summary, display_repeated,
    display_simulation, display_stats, display_stored_lines,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum Mode {
    #[default]
    Uniform,
    Hot,
    Cold,
    Blended,
    Adversarial,
}

impl From<Mode> for Strategy {
    fn from(mode: Mode) -> Strategy {
        match mode {
            Mode::Uniform => Strategy::Uniform,
            Mode::Hot => Strategy::Hot,
            Mode::Cold => Strategy::Cold,
            Mode::Blended => Strategy::Blended,
            Mode::Adversarial => Strategy::Adversarial,
        }
    }
}

#[derive(Parser)]
#[command(name = "ledetruque", about = "Générateur et simulateur de combinaisons EuroMillions")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Importer l'historique depuis un fichier CSV
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "data/historico_euromillones.csv")]
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

    /// Fréquences, retards et combinaisons répétées
    Stats {
        /// Fenêtre d'analyse (nombre de tirages)
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Générer un bloc de combinaisons A/B/C
    Generate {
        /// Stratégie de pondération
        #[arg(short, long, default_value = "uniform")]
        mode: Mode,

        /// Lignes de la série A (somme haute)
        #[arg(long, default_value = "5")]
        lines_a: u32,

        /// Lignes de la série B (somme moyenne)
        #[arg(long, default_value = "5")]
        lines_b: u32,

        /// Lignes de la série C (somme basse)
        #[arg(long, default_value = "5")]
        lines_c: u32,

        /// Seed pour la reproductibilité (défaut : date du jour AAAAMMJJ)
        #[arg(long)]
        seed: Option<u64>,

        /// Journaliser le bloc dans la base
        #[arg(long)]
        save: bool,
    },

    /// Afficher les dernières combinaisons journalisées
    Generated {
        /// Nombre de combinaisons à afficher
        #[arg(short, long, default_value = "20")]
        last: u32,
    },

    /// Estimer le comportement d'une stratégie par Monte Carlo
    Simulate {
        /// Stratégie de pondération
        #[arg(short, long, default_value = "uniform")]
        mode: Mode,

        /// Nombre d'essais
        #[arg(short, long, default_value = "1000")]
        trials: u32,

        /// Lignes de la série A
        #[arg(long, default_value = "5")]
        lines_a: u32,

        /// Lignes de la série B
        #[arg(long, default_value = "5")]
        lines_b: u32,

        /// Lignes de la série C
        #[arg(long, default_value = "5")]
        lines_c: u32,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,

        /// Tirer les références dans l'historique plutôt qu'au hasard
        #[arg(long)]
        historical: bool,

        /// Exporter le rapport au format JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
}

/// Seed déterministe basé sur la date du jour (AAAAMMJJ).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { file } => {
            let result = import::import_csv(&conn, &file)?;
            display_import_summary(&result);
            Ok(())
        }
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Generate {
            mode,
            lines_a,
            lines_b,
            lines_c,
            seed,
            save,
        } => cmd_generate(&conn, mode, lines_a, lines_b, lines_c, seed, save),
        Command::Generated { last } => {
            let lines = fetch_last_generated(&conn, last)?;
            if lines.is_empty() {
                println!("Aucune combinaison journalisée. Lancez : ledetruque generate --save");
                return Ok(());
            }
            display_stored_lines(&lines);
            Ok(())
        }
        Command::Simulate {
            mode,
            trials,
            lines_a,
            lines_b,
            lines_c,
            seed,
            historical,
            json,
        } => cmd_simulate(
            &conn, mode, trials, lines_a, lines_b, lines_c, seed, historical, json,
        ),
    }
}

fn require_draws(conn: &ledetruque_db::rusqlite::Connection) -> Result<Vec<Draw>> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : ledetruque import");
    }
    fetch_all_draws(conn)
}

fn cmd_list(conn: &ledetruque_db::rusqlite::Connection, last: u32) -> Result<()> {
    let draws = fetch_last_draws(conn, last)?;
    if draws.is_empty() {
        println!("Base vide. Lancez d'abord : ledetruque import");
        return Ok(());
    }
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &ledetruque_db::rusqlite::Connection, window: u32) -> Result<()> {
    let n = count_draws(conn)?;
    if n == 0 {
        println!("Base vide. Lancez d'abord : ledetruque import");
        return Ok(());
    }
    let effective_window = window.min(n);
    let recent = fetch_last_draws(conn, effective_window)?;

    let number_stats = pool_stats(&recent, Pool::Numbers);

    // Les statistiques d'étoiles ne regardent que l'ère des 12 étoiles
    let era: Vec<Draw> = recent.iter().filter(|d| d.in_star_era()).cloned().collect();
    let star_stats = if era.is_empty() {
        pool_stats(&recent, Pool::Stars)
    } else {
        pool_stats(&era, Pool::Stars)
    };

    display_stats(&number_stats, &star_stats, effective_window);

    let all = fetch_all_draws(conn)?;
    display_repeated(&repeated_combinations(&all));
    Ok(())
}

fn cmd_generate(
    conn: &ledetruque_db::rusqlite::Connection,
    mode: Mode,
    lines_a: u32,
    lines_b: u32,
    lines_c: u32,
    seed: Option<u64>,
    save: bool,
) -> Result<()> {
    let draws = require_draws(conn)?;
    let strategy = Strategy::from(mode);

    let ctx = GenerationContext::new(strategy, &draws);
    let mut rng = StdRng::seed_from_u64(seed.unwrap_or_else(date_seed));
    let block = generate_block(&mut rng, &ctx, lines_a, lines_b, lines_c)?;

    display_block(&block, strategy);

    if save {
        let created_at = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
        let added = save_block(conn, &block, &strategy.to_string(), &created_at)?;
        println!("\n{} combinaisons journalisées.", added);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn cmd_simulate(
    conn: &ledetruque_db::rusqlite::Connection,
    mode: Mode,
    trials: u32,
    lines_a: u32,
    lines_b: u32,
    lines_c: u32,
    seed: Option<u64>,
    historical: bool,
    json: Option<PathBuf>,
) -> Result<()> {
    let draws = require_draws(conn)?;
    let strategy = Strategy::from(mode);
    let source = if historical {
        ReferenceSource::Historical
    } else {
        ReferenceSource::Synthetic
    };

    println!(
        "Simulation : {} essais, bloc {}/{}/{}, mode {}...",
        trials, lines_a, lines_b, lines_c, strategy
    );

    let report = simulate(
        strategy, &draws, source, trials, lines_a, lines_b, lines_c, seed,
    )?;

    display_simulation(&report, strategy);

    if let Some(path) = json {
        let payload = serde_json::to_string_pretty(&report)
            .context("Impossible de sérialiser le rapport")?;
        std::fs::write(&path, payload)
            .with_context(|| format!("Impossible d'écrire {:?}", path))?;
        println!("Rapport écrit dans {}", path.display());
    }

    Ok(())
}
