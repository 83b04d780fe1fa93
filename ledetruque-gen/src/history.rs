use std::collections::HashSet;

use ledetruque_db::models::{validate_draw, Draw};

/// Index anti-clone construit une fois par session de génération.
///
/// - `seen_quintuples` : toutes les quintettes de numéros sorties sur
///   l'historique complet (2004 → aujourd'hui).
/// - `seen_full_era` : les combinaisons complètes (5 numéros + 2 étoiles)
///   sorties dans l'ère des 12 étoiles uniquement.
#[derive(Debug, Clone, Default)]
pub struct HistorySets {
    pub seen_quintuples: HashSet<[u8; 5]>,
    pub seen_full_era: HashSet<[u8; 7]>,
}

/// Clé d'une combinaison complète : numéros triés puis étoiles triées.
pub fn combo_key(numbers: &[u8; 5], stars: &[u8; 2]) -> [u8; 7] {
    [
        numbers[0], numbers[1], numbers[2], numbers[3], numbers[4],
        stars[0], stars[1],
    ]
}

/// Construit les deux index à partir de l'historique. Les tirages invalides
/// sont ignorés silencieusement : c'est un index de garde, pas un validateur.
pub fn build_history_sets(draws: &[Draw]) -> HistorySets {
    let mut sets = HistorySets::default();

    for draw in draws {
        if validate_draw(&draw.numbers, &draw.stars).is_err() {
            continue;
        }
        let mut numbers = draw.numbers;
        numbers.sort();
        sets.seen_quintuples.insert(numbers);

        if draw.in_star_era() {
            let mut stars = draw.stars;
            stars.sort();
            sets.seen_full_era.insert(combo_key(&numbers, &stars));
        }
    }

    sets
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
    fn test_quintuple_indexed_regardless_of_era() {
        let draws = vec![
            draw("2010-01-01", [5, 4, 3, 2, 1], [1, 2]),
            draw("2020-01-01", [10, 20, 30, 40, 50], [3, 4]),
        ];
        let sets = build_history_sets(&draws);
        assert_eq!(sets.seen_quintuples.len(), 2);
        assert!(sets.seen_quintuples.contains(&[1, 2, 3, 4, 5]));
        assert!(sets.seen_quintuples.contains(&[10, 20, 30, 40, 50]));
    }

    #[test]
    fn test_full_combo_only_in_star_era() {
        let draws = vec![
            draw("2010-01-01", [1, 2, 3, 4, 5], [1, 2]),
            draw("2020-01-01", [10, 20, 30, 40, 50], [4, 3]),
        ];
        let sets = build_history_sets(&draws);
        assert_eq!(sets.seen_full_era.len(), 1);
        // Les étoiles sont triées dans la clé
        assert!(sets
            .seen_full_era
            .contains(&[10, 20, 30, 40, 50, 3, 4]));
    }

    #[test]
    fn test_invalid_draws_skipped() {
        let draws = vec![
            draw("2020-01-01", [1, 1, 3, 4, 5], [1, 2]), // doublon
            draw("2020-01-02", [1, 2, 3, 4, 99], [1, 2]), // hors limites
            draw("2020-01-03", [6, 7, 8, 9, 10], [5, 6]),
        ];
        let sets = build_history_sets(&draws);
        assert_eq!(sets.seen_quintuples.len(), 1);
        assert_eq!(sets.seen_full_era.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        let draws = vec![
            draw("2018-05-05", [7, 14, 21, 28, 35], [2, 9]),
            draw("2019-06-06", [3, 17, 28, 34, 49], [1, 12]),
        ];
        let a = build_history_sets(&draws);
        let b = build_history_sets(&draws);
        assert_eq!(a.seen_quintuples, b.seen_quintuples);
        assert_eq!(a.seen_full_era, b.seen_full_era);
    }

    #[test]
    fn test_empty_history() {
        let sets = build_history_sets(&[]);
        assert!(sets.seen_quintuples.is_empty());
        assert!(sets.seen_full_era.is_empty());
    }
}
