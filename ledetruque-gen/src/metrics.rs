use std::collections::HashMap;

use ledetruque_db::models::{validate_draw, Draw, Pool};

use crate::history::combo_key;

/// Nombre d'apparitions de chaque symbole du pool (indexé par symbole - 1).
/// Les tirages invalides sont ignorés.
pub fn frequency(draws: &[Draw], pool: Pool) -> Vec<u32> {
    let mut freq = vec![0u32; pool.size()];
    for draw in draws {
        if validate_draw(&draw.numbers, &draw.stars).is_err() {
            continue;
        }
        for &v in pool.values_from(draw) {
            freq[(v - 1) as usize] += 1;
        }
    }
    freq
}

/// Fréquences d'étoiles restreintes à l'ère des 12 étoiles. Si aucun tirage
/// n'appartient à l'ère, on retombe sur l'historique complet.
pub fn star_frequency_era(draws: &[Draw]) -> Vec<u32> {
    let era: Vec<Draw> = draws.iter().filter(|d| d.in_star_era()).cloned().collect();
    if era.is_empty() {
        frequency(draws, Pool::Stars)
    } else {
        frequency(&era, Pool::Stars)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ActivityTag {
    Hot,
    Cold,
    Normal,
}

impl std::fmt::Display for ActivityTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityTag::Hot => write!(f, "HOT"),
            ActivityTag::Cold => write!(f, "COLD"),
            ActivityTag::Normal => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SymbolStats {
    pub symbol: u8,
    pub frequency: u32,
    /// Nombre de tirages écoulés depuis la dernière apparition.
    pub gap: u32,
    pub tag: ActivityTag,
}

/// Fréquence et retard de chaque symbole. `draws[0]` = tirage le plus récent.
/// Un symbole jamais vu a un retard égal au nombre de tirages.
pub fn pool_stats(draws: &[Draw], pool: Pool) -> Vec<SymbolStats> {
    let mut stats: Vec<SymbolStats> = (1..=pool.size() as u8)
        .map(|symbol| SymbolStats {
            symbol,
            frequency: 0,
            gap: u32::MAX,
            tag: ActivityTag::Normal,
        })
        .collect();

    for (i, draw) in draws.iter().enumerate() {
        if validate_draw(&draw.numbers, &draw.stars).is_err() {
            continue;
        }
        for &v in pool.values_from(draw) {
            let stat = &mut stats[(v - 1) as usize];
            stat.frequency += 1;
            if stat.gap == u32::MAX {
                stat.gap = i as u32;
            }
        }
    }

    for stat in &mut stats {
        if stat.gap == u32::MAX {
            stat.gap = draws.len() as u32;
        }
    }

    tag_stats(&mut stats, draws.len(), pool);
    stats
}

/// Marque HOT/COLD selon l'écart relatif à la fréquence attendue sous
/// l'hypothèse uniforme.
fn tag_stats(stats: &mut [SymbolStats], draw_count: usize, pool: Pool) {
    if draw_count == 0 {
        return;
    }
    let expected = draw_count as f64 * pool.pick_count() as f64 / pool.size() as f64;
    let threshold = 0.3;

    for stat in stats.iter_mut() {
        let deviation = (stat.frequency as f64 - expected) / expected;
        stat.tag = if deviation > threshold {
            ActivityTag::Hot
        } else if deviation < -threshold {
            ActivityTag::Cold
        } else {
            ActivityTag::Normal
        };
    }
}

/// Combinaisons complètes (5 numéros + 2 étoiles) apparues plus d'une fois,
/// triées par nombre d'occurrences décroissant.
pub fn repeated_combinations(draws: &[Draw]) -> Vec<([u8; 7], u32)> {
    let mut counts: HashMap<[u8; 7], u32> = HashMap::new();
    for draw in draws {
        if validate_draw(&draw.numbers, &draw.stars).is_err() {
            continue;
        }
        let mut numbers = draw.numbers;
        numbers.sort();
        let mut stars = draw.stars;
        stars.sort();
        *counts.entry(combo_key(&numbers, &stars)).or_insert(0) += 1;
    }

    let mut repeated: Vec<([u8; 7], u32)> = counts
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    repeated
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(date: &str, numbers: [u8; 5], stars: [u8; 2]) -> Draw {
        Draw {
            date: date.to_string(),
            numbers,
            stars,
        }
    }

    #[test]
    fn test_frequency_counts() {
        let draws = vec![
            draw("2020-01-01", [1, 2, 3, 4, 5], [1, 2]),
            draw("2020-01-02", [1, 10, 20, 30, 40], [1, 12]),
        ];
        let freq = frequency(&draws, Pool::Numbers);
        assert_eq!(freq.len(), 50);
        assert_eq!(freq[0], 2); // le 1 est sorti deux fois
        assert_eq!(freq[4], 1);
        assert_eq!(freq[49], 0);

        let star_freq = frequency(&draws, Pool::Stars);
        assert_eq!(star_freq[0], 2);
        assert_eq!(star_freq[11], 1);
    }

    #[test]
    fn test_frequency_skips_invalid() {
        let draws = vec![
            draw("2020-01-01", [1, 1, 3, 4, 5], [1, 2]),
            draw("2020-01-02", [6, 7, 8, 9, 10], [3, 4]),
        ];
        let freq = frequency(&draws, Pool::Numbers);
        assert_eq!(freq.iter().sum::<u32>(), 5);
    }

    #[test]
    fn test_star_frequency_era_scoped() {
        let draws = vec![
            draw("2010-01-01", [1, 2, 3, 4, 5], [11, 12]), // avant l'ère
            draw("2020-01-01", [6, 7, 8, 9, 10], [1, 2]),
        ];
        let freq = star_frequency_era(&draws);
        assert_eq!(freq[10], 0, "les étoiles d'avant l'ère ne comptent pas");
        assert_eq!(freq[0], 1);
    }

    #[test]
    fn test_star_frequency_falls_back_without_era() {
        let draws = vec![draw("2010-01-01", [1, 2, 3, 4, 5], [3, 7])];
        let freq = star_frequency_era(&draws);
        assert_eq!(freq[2], 1);
        assert_eq!(freq[6], 1);
    }

    #[test]
    fn test_pool_stats_gap() {
        // draws[0] = le plus récent
        let draws = vec![
            draw("2020-01-03", [1, 2, 3, 4, 5], [1, 2]),
            draw("2020-01-02", [6, 7, 8, 9, 10], [3, 4]),
            draw("2020-01-01", [6, 2, 13, 14, 15], [5, 6]),
        ];
        let stats = pool_stats(&draws, Pool::Numbers);
        assert_eq!(stats[0].gap, 0); // le 1 est sorti au dernier tirage
        assert_eq!(stats[5].gap, 1); // le 6 est sorti à l'avant-dernier
        assert_eq!(stats[5].frequency, 2);
        assert_eq!(stats[49].gap, 3); // jamais vu : retard = nb de tirages
        assert_eq!(stats[49].frequency, 0);
    }

    #[test]
    fn test_tags() {
        // 10 tirages où le 1 sort toujours et le 50 jamais
        let draws: Vec<Draw> = (0..10)
            .map(|i| draw(&format!("2020-01-{:02}", i + 1), [1, 10, 20, 30, 40], [1, 2]))
            .collect();
        let stats = pool_stats(&draws, Pool::Numbers);
        assert_eq!(stats[0].tag, ActivityTag::Hot);
        assert_eq!(stats[49].tag, ActivityTag::Cold);
    }

    #[test]
    fn test_repeated_combinations() {
        let draws = vec![
            draw("2020-01-01", [1, 2, 3, 4, 5], [1, 2]),
            draw("2020-01-02", [5, 4, 3, 2, 1], [2, 1]), // même combinaison, autre ordre
            draw("2020-01-03", [6, 7, 8, 9, 10], [3, 4]),
        ];
        let repeated = repeated_combinations(&draws);
        assert_eq!(repeated.len(), 1);
        assert_eq!(repeated[0].0, [1, 2, 3, 4, 5, 1, 2]);
        assert_eq!(repeated[0].1, 2);
    }
}
