use anyhow::Result;
use rand::distr::weighted::WeightedIndex;
use rand::prelude::Distribution;
use rand::rngs::StdRng;
use std::collections::HashSet;

use crate::history::{combo_key, HistorySets};
use crate::popularity::is_popular;

/// Budget d'essais par ligne : garantit la terminaison même quand les
/// contraintes sont insatisfiables.
pub const MAX_TRIES: u32 = 500;

/// Tire `count` valeurs distinctes de 1..=weights.len() selon `weights`.
fn weighted_sample(rng: &mut StdRng, weights: &[f64], count: usize) -> Result<Vec<u8>> {
    let mut available: Vec<(u8, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| ((i + 1) as u8, w))
        .collect();
    let mut selected = Vec::with_capacity(count);

    for _ in 0..count {
        let dist = WeightedIndex::new(available.iter().map(|(_, w)| *w))?;
        let idx = dist.sample(rng);
        let (value, _) = available.remove(idx);
        selected.push(value);
    }

    Ok(selected)
}

fn sample_candidate(
    rng: &mut StdRng,
    weights_numbers: &[f64],
    weights_stars: &[f64],
) -> Result<([u8; 5], [u8; 2])> {
    let picked = weighted_sample(rng, weights_numbers, 5)?;
    let mut numbers = [0u8; 5];
    numbers.copy_from_slice(&picked);
    numbers.sort();

    let picked = weighted_sample(rng, weights_stars, 2)?;
    let mut stars = [0u8; 2];
    stars.copy_from_slice(&picked);
    stars.sort();

    Ok((numbers, stars))
}

/// Tire une ligne par échantillonnage avec rejet :
///   - somme des 5 numéros dans `sum_range` (bornes incluses)
///   - si `avoid_popular`, score de popularité sous le seuil
///   - quintette absente de tout l'historique
///   - combinaison complète absente de l'ère 12 étoiles
///   - combinaison complète absente du bloc en cours
///
/// Si aucun candidat ne passe en `max_tries` essais, la dernière combinaison
/// tirée est retournée telle quelle : la génération doit toujours aboutir,
/// quitte à relâcher une contrainte molle dans un espace de recherche épuisé.
/// Le candidat de repli n'est pas inscrit dans `block_seen`.
#[allow(clippy::too_many_arguments)]
pub fn sample_line(
    rng: &mut StdRng,
    weights_numbers: &[f64],
    weights_stars: &[f64],
    sum_range: (u32, u32),
    history: &HistorySets,
    block_seen: &mut HashSet<[u8; 7]>,
    avoid_popular: bool,
    max_tries: u32,
) -> Result<([u8; 5], [u8; 2])> {
    let (min_sum, max_sum) = sum_range;
    let mut last: Option<([u8; 5], [u8; 2])> = None;

    for _ in 0..max_tries {
        let (numbers, stars) = sample_candidate(rng, weights_numbers, weights_stars)?;
        last = Some((numbers, stars));

        let sum: u32 = numbers.iter().map(|&n| n as u32).sum();
        if sum < min_sum || sum > max_sum {
            continue;
        }

        if avoid_popular && is_popular(&numbers) {
            continue;
        }

        if history.seen_quintuples.contains(&numbers) {
            continue;
        }

        let key = combo_key(&numbers, &stars);
        if history.seen_full_era.contains(&key) {
            continue;
        }
        if block_seen.contains(&key) {
            continue;
        }

        block_seen.insert(key);
        return Ok((numbers, stars));
    }

    // Repli défensif (budget épuisé ou max_tries = 0)
    match last {
        Some(candidate) => Ok(candidate),
        None => sample_candidate(rng, weights_numbers, weights_stars),
    }
}
