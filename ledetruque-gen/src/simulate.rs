use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::Serialize;

use ledetruque_db::models::{validate_draw, Draw};

use crate::block::{generate_block, GenerationContext, Strategy};

/// D'où vient le tirage de référence de chaque essai.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceSource {
    /// Tirage synthétique uniforme : 5 parmi 50 et 2 parmi 12.
    Synthetic,
    /// Tirage historique choisi uniformément. Sans historique valide,
    /// dégrade en synthétique.
    Historical,
}

/// Paires (aciertos numéros, aciertos étoiles) payées par le jeu modélisé.
pub const PRIZE_TABLE: [(usize, usize); 12] = [
    (5, 2), (5, 1), (5, 0),
    (4, 2), (4, 1), (4, 0),
    (3, 2), (3, 1), (3, 0),
    (2, 2), (2, 1),
    (1, 2),
];

/// Distribution conjointe des aciertos, agrégée sur tous les essais et toutes
/// les lignes. `counts[n][s]` = nombre de lignes avec n numéros et s étoiles.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub counts: [[u64; 3]; 6],
    pub total_lines: u64,
    pub trials: u32,
}

impl SimulationReport {
    fn empty(trials: u32) -> Self {
        SimulationReport {
            counts: [[0; 3]; 6],
            total_lines: 0,
            trials,
        }
    }

    /// Fréquence relative d'une paire (numéros, étoiles).
    pub fn probability(&self, hits_n: usize, hits_s: usize) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        self.counts[hits_n][hits_s] as f64 / self.total_lines as f64
    }

    /// P(au moins 3 numéros), étoiles indifférentes.
    pub fn p_three_plus_numbers(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        let hits: u64 = self.counts[3..].iter().flatten().sum();
        hits as f64 / self.total_lines as f64
    }

    /// P(la paire figure dans la table des rangs payés).
    pub fn p_any_prize(&self) -> f64 {
        if self.total_lines == 0 {
            return 0.0;
        }
        let hits: u64 = PRIZE_TABLE
            .iter()
            .map(|&(n, s)| self.counts[n][s])
            .sum();
        hits as f64 / self.total_lines as f64
    }
}

fn add_counts(mut acc: [[u64; 3]; 6], other: [[u64; 3]; 6]) -> [[u64; 3]; 6] {
    for n in 0..6 {
        for s in 0..3 {
            acc[n][s] += other[n][s];
        }
    }
    acc
}

/// Tirage de référence synthétique : uniforme, sans remise.
fn synthetic_reference(rng: &mut StdRng) -> ([u8; 5], [u8; 2]) {
    let idx = rand::seq::index::sample(rng, 50, 5);
    let mut numbers = [0u8; 5];
    for (slot, i) in numbers.iter_mut().zip(idx.iter()) {
        *slot = (i + 1) as u8;
    }
    numbers.sort();

    let idx = rand::seq::index::sample(rng, 12, 2);
    let mut stars = [0u8; 2];
    for (slot, i) in stars.iter_mut().zip(idx.iter()) {
        *slot = (i + 1) as u8;
    }
    stars.sort();

    (numbers, stars)
}

fn pick_reference(
    rng: &mut StdRng,
    source: ReferenceSource,
    draws: &[Draw],
) -> ([u8; 5], [u8; 2]) {
    match source {
        ReferenceSource::Synthetic => synthetic_reference(rng),
        ReferenceSource::Historical => {
            if draws.is_empty() {
                return synthetic_reference(rng);
            }
            let draw = &draws[rng.random_range(0..draws.len())];
            if validate_draw(&draw.numbers, &draw.stars).is_err() {
                return synthetic_reference(rng);
            }
            (draw.numbers, draw.stars)
        }
    }
}

/// Estime le comportement long terme d'une stratégie : `trials` essais
/// indépendants, chacun générant un bloc complet contre un tirage de
/// référence, puis agrégation des paires d'aciertos.
///
/// Les essais tournent en parallèle ; chaque essai dérive sa propre graine de
/// la graine de base, donc la réduction (somme de compteurs) rend le résultat
/// indépendant de l'ordonnancement. Avec `seed` fourni, deux exécutions
/// produisent la même distribution.
#[allow(clippy::too_many_arguments)]
pub fn simulate(
    strategy: Strategy,
    draws: &[Draw],
    source: ReferenceSource,
    trials: u32,
    lines_a: u32,
    lines_b: u32,
    lines_c: u32,
    seed: Option<u64>,
) -> Result<SimulationReport> {
    let lines_per_trial = (lines_a + lines_b + lines_c) as u64;
    if trials == 0 || lines_per_trial == 0 {
        return Ok(SimulationReport::empty(trials));
    }

    let ctx = GenerationContext::new(strategy, draws);
    let base_seed = seed.unwrap_or_else(|| rand::rng().random());

    let pb = ProgressBar::new(trials as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )?
        .progress_chars("=> "),
    );

    let counts = (0..trials)
        .into_par_iter()
        .map(|trial| -> Result<[[u64; 3]; 6]> {
            let trial_seed =
                base_seed.wrapping_add((trial as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            let mut rng = StdRng::seed_from_u64(trial_seed);

            let (ref_numbers, ref_stars) = pick_reference(&mut rng, source, draws);
            let block = generate_block(&mut rng, &ctx, lines_a, lines_b, lines_c)?;

            let mut local = [[0u64; 3]; 6];
            for line in &block {
                let hits_n = line
                    .numbers
                    .iter()
                    .filter(|n| ref_numbers.contains(n))
                    .count();
                let hits_s = line.stars.iter().filter(|s| ref_stars.contains(s)).count();
                local[hits_n][hits_s] += 1;
            }
            pb.inc(1);
            Ok(local)
        })
        .try_reduce(|| [[0u64; 3]; 6], |a, b| Ok(add_counts(a, b)))?;

    pb.finish_and_clear();

    Ok(SimulationReport {
        counts,
        total_lines: trials as u64 * lines_per_trial,
        trials,
    })
}
