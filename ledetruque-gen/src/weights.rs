/// Exposant appliqué aux fréquences lissées (plus grand = contraste plus marqué).
const POWER: f64 = 1.5;

/// Stratégie de pondération dérivée d'une table de fréquences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightMode {
    Uniform,
    Hot,
    Cold,
    Blended,
}

/// Poids uniformes 1/n.
pub fn uniform_weights(n: usize) -> Vec<f64> {
    vec![1.0 / n as f64; n]
}

/// Convertit une table de fréquences (indexée par symbole - 1) en distribution
/// de probabilités. Chaque symbole reçoit un poids strictement positif : le
/// lissage +1 garantit qu'un symbole jamais sorti reste atteignable. Une table
/// vide ou entièrement nulle dégrade en uniforme.
pub fn build_weights(freq: &[u32], mode: WeightMode) -> Vec<f64> {
    match mode {
        WeightMode::Uniform => uniform_weights(freq.len()),
        WeightMode::Hot => normalize(hot_raw(freq)),
        WeightMode::Cold => normalize(cold_raw(freq)),
        WeightMode::Blended => {
            let hot = normalize(hot_raw(freq));
            let cold = normalize(cold_raw(freq));
            let mixed: Vec<f64> = hot
                .iter()
                .zip(cold.iter())
                .map(|(h, c)| 0.5 * h + 0.5 * c)
                .collect();
            normalize(mixed)
        }
    }
}

/// Plus fréquent => plus de poids.
fn hot_raw(freq: &[u32]) -> Vec<f64> {
    freq.iter()
        .map(|&c| ((c as f64) + 1.0).powf(POWER))
        .collect()
}

/// Moins fréquent => plus de poids (classement inverse de `hot_raw`).
fn cold_raw(freq: &[u32]) -> Vec<f64> {
    let max = freq.iter().copied().max().unwrap_or(0) as f64;
    freq.iter()
        .map(|&c| ((max + 1.0) - ((c as f64) + 1.0) + 1.0).powf(POWER))
        .collect()
}

fn normalize(raw: Vec<f64>) -> Vec<f64> {
    let total: f64 = raw.iter().sum();
    if total <= 0.0 {
        return uniform_weights(raw.len());
    }
    raw.into_iter().map(|w| w / total).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODES: [WeightMode; 4] = [
        WeightMode::Uniform,
        WeightMode::Hot,
        WeightMode::Cold,
        WeightMode::Blended,
    ];

    fn assert_distribution(w: &[f64], n: usize) {
        assert_eq!(w.len(), n);
        for &p in w {
            assert!(p > 0.0, "poids non strictement positif : {}", p);
        }
        let sum: f64 = w.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9, "somme = {}", sum);
    }

    #[test]
    fn test_all_modes_valid_distribution() {
        let freq: Vec<u32> = (0..50).map(|i| (i * 3) % 17).collect();
        for mode in MODES {
            assert_distribution(&build_weights(&freq, mode), 50);
        }
        let freq_stars: Vec<u32> = (0..12).map(|i| i * 2).collect();
        for mode in MODES {
            assert_distribution(&build_weights(&freq_stars, mode), 12);
        }
    }

    #[test]
    fn test_empty_table_degrades_to_uniform() {
        let freq = vec![0u32; 50];
        for mode in MODES {
            let w = build_weights(&freq, mode);
            assert_distribution(&w, 50);
            for &p in &w {
                assert!((p - 1.0 / 50.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_hot_favors_frequent() {
        let mut freq = vec![5u32; 50];
        freq[9] = 40; // le numéro 10 est très fréquent
        freq[0] = 0; // le numéro 1 n'est jamais sorti
        let w = build_weights(&freq, WeightMode::Hot);
        assert!(w[9] > w[0], "hot devrait favoriser le plus fréquent");
    }

    #[test]
    fn test_cold_inverts_hot_ranking() {
        let mut freq = vec![5u32; 50];
        freq[9] = 40;
        freq[0] = 0;
        let hot = build_weights(&freq, WeightMode::Hot);
        let cold = build_weights(&freq, WeightMode::Cold);
        assert!(hot[9] > hot[0]);
        assert!(cold[0] > cold[9], "cold devrait inverser le classement de hot");
    }

    #[test]
    fn test_blended_is_mean_of_hot_and_cold() {
        let freq: Vec<u32> = (0..12).map(|i| i as u32).collect();
        let hot = build_weights(&freq, WeightMode::Hot);
        let cold = build_weights(&freq, WeightMode::Cold);
        let blended = build_weights(&freq, WeightMode::Blended);
        for i in 0..12 {
            let expected = 0.5 * hot[i] + 0.5 * cold[i];
            assert!((blended[i] - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_uniform_ignores_frequencies() {
        let freq: Vec<u32> = (0..50).map(|i| i as u32 * 100).collect();
        let w = build_weights(&freq, WeightMode::Uniform);
        for &p in &w {
            assert!((p - 1.0 / 50.0).abs() < 1e-12);
        }
    }
}
