use anyhow::Result;
use rand::rngs::StdRng;
use std::collections::HashSet;

use ledetruque_db::models::{Draw, GeneratedLine, Pool, Series};

use crate::history::{build_history_sets, HistorySets};
use crate::metrics::{frequency, star_frequency_era};
use crate::sampler::{sample_line, MAX_TRIES};
use crate::weights::{build_weights, WeightMode};

/// Stratégie de génération. Variante fermée : tout mode inconnu est une
/// erreur de compilation, pas un repli silencieux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Poids uniformes.
    Uniform,
    /// Favorise les symboles historiquement fréquents.
    Hot,
    /// Favorise les symboles historiquement rares.
    Cold,
    /// Mélange 50/50 de Hot et Cold.
    Blended,
    /// Poids uniformes + rejet des combinaisons « populaires » (motifs
    /// calendrier, suites, paquets) pour maximiser la part de cagnotte
    /// en cas de gain.
    Adversarial,
}

impl Strategy {
    fn weight_mode(&self) -> WeightMode {
        match self {
            Strategy::Uniform | Strategy::Adversarial => WeightMode::Uniform,
            Strategy::Hot => WeightMode::Hot,
            Strategy::Cold => WeightMode::Cold,
            Strategy::Blended => WeightMode::Blended,
        }
    }

    pub fn avoid_popular(&self) -> bool {
        matches!(self, Strategy::Adversarial)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Strategy::Uniform => "uniform",
            Strategy::Hot => "hot",
            Strategy::Cold => "cold",
            Strategy::Blended => "blended",
            Strategy::Adversarial => "adversarial",
        };
        write!(f, "{}", name)
    }
}

/// Tout ce qui se construit une fois par session de génération : poids par
/// pool et index anti-clone. Partageable en lecture entre tirages (et entre
/// threads pour la simulation).
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub weights_numbers: Vec<f64>,
    pub weights_stars: Vec<f64>,
    pub history: HistorySets,
    pub avoid_popular: bool,
}

impl GenerationContext {
    /// Numéros : fréquences sur l'historique complet. Étoiles : fréquences
    /// restreintes à l'ère des 12 étoiles.
    pub fn new(strategy: Strategy, draws: &[Draw]) -> Self {
        let mode = strategy.weight_mode();
        let freq_numbers = frequency(draws, Pool::Numbers);
        let freq_stars = star_frequency_era(draws);

        GenerationContext {
            weights_numbers: build_weights(&freq_numbers, mode),
            weights_stars: build_weights(&freq_stars, mode),
            history: build_history_sets(draws),
            avoid_popular: strategy.avoid_popular(),
        }
    }
}

/// Génère un bloc : séries A, B puis C dans l'ordre, chacune avec sa bande de
/// somme, un seul set de doublons partagé pour tout le bloc.
pub fn generate_block(
    rng: &mut StdRng,
    ctx: &GenerationContext,
    lines_a: u32,
    lines_b: u32,
    lines_c: u32,
) -> Result<Vec<GeneratedLine>> {
    let mut block = Vec::with_capacity((lines_a + lines_b + lines_c) as usize);
    let mut block_seen: HashSet<[u8; 7]> = HashSet::new();

    for (series, count) in Series::ALL.into_iter().zip([lines_a, lines_b, lines_c]) {
        for _ in 0..count {
            let (numbers, stars) = sample_line(
                rng,
                &ctx.weights_numbers,
                &ctx.weights_stars,
                series.sum_range(),
                &ctx.history,
                &mut block_seen,
                ctx.avoid_popular,
                MAX_TRIES,
            )?;
            block.push(GeneratedLine {
                series,
                numbers,
                stars,
            });
        }
    }

    Ok(block)
}
