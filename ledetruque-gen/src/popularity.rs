/// Seuil à partir duquel une quintette est jugée « trop populaire » et rejetée
/// par la stratégie adverse.
pub const POPULARITY_THRESHOLD: u32 = 3;

/// Score de popularité d'une quintette triée : mesure à quel point la
/// combinaison ressemble à un choix humain typique (dates, suites, paquets).
/// Plus le score est haut, plus la cagnotte serait partagée en cas de gain.
pub fn popularity_score(numbers: &[u8; 5]) -> u32 {
    let mut score = 0;

    // Numéros jouables comme une date (jour/mois <= 31)
    let calendar = numbers.iter().filter(|&&n| n <= 31).count();
    score += match calendar {
        5 => 4,
        4 => 2,
        _ => 0,
    };

    // Plus longue suite de numéros consécutifs
    let run = longest_run(numbers);
    score += match run {
        r if r >= 4 => 4,
        3 => 2,
        2 => 1,
        _ => 0,
    };

    // Concentration dans une même dizaine
    let mut buckets = [0u8; 5];
    for &n in numbers {
        buckets[((n - 1) / 10) as usize] += 1;
    }
    let max_bucket = buckets.iter().copied().max().unwrap_or(0);
    score += match max_bucket {
        b if b >= 4 => 3,
        3 => 1,
        _ => 0,
    };

    // Multiples de 5
    let fives = numbers.iter().filter(|&&n| n % 5 == 0).count();
    score += match fives {
        f if f >= 4 => 3,
        3 => 1,
        _ => 0,
    };

    score
}

/// `numbers` doit être trié croissant.
fn longest_run(numbers: &[u8; 5]) -> u32 {
    let mut best = 1;
    let mut current = 1;
    for pair in numbers.windows(2) {
        if pair[1] == pair[0] + 1 {
            current += 1;
            best = best.max(current);
        } else {
            current = 1;
        }
    }
    best
}

/// La quintette franchit-elle le seuil de rejet adverse ?
pub fn is_popular(numbers: &[u8; 5]) -> bool {
    popularity_score(numbers) >= POPULARITY_THRESHOLD
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_textbook_pick_scores_high() {
        // 5 consécutifs, tous <= 31, tous dans la première dizaine
        let score = popularity_score(&[1, 2, 3, 4, 5]);
        assert!(score >= POPULARITY_THRESHOLD, "score = {}", score);
        assert!(is_popular(&[1, 2, 3, 4, 5]));
    }

    #[test]
    fn test_spread_pick_scores_zero() {
        // Aucune suite, pas de saturation <= 31, dizaines toutes différentes,
        // aucun multiple de 5
        assert_eq!(popularity_score(&[3, 17, 28, 34, 49]), 0);
        assert!(!is_popular(&[3, 17, 28, 34, 49]));
    }

    #[test]
    fn test_calendar_contribution() {
        // Exactement 4 numéros <= 31, rien d'autre
        assert_eq!(popularity_score(&[2, 13, 24, 31, 47]), 2);
        // Les 5 <= 31 sans autre motif
        assert_eq!(popularity_score(&[2, 13, 19, 24, 31]), 4);
    }

    #[test]
    fn test_run_contribution() {
        assert_eq!(longest_run(&[1, 2, 3, 4, 5]), 5);
        assert_eq!(longest_run(&[1, 2, 3, 40, 50]), 3);
        assert_eq!(longest_run(&[1, 2, 30, 40, 50]), 2);
        assert_eq!(longest_run(&[3, 17, 28, 34, 49]), 1);
        // Suite de 2 seulement, rien d'autre : +1
        assert_eq!(popularity_score(&[17, 28, 33, 34, 42]), 1);
    }

    #[test]
    fn test_decade_clustering() {
        // 4 numéros dans la dizaine 40-49, un seul <= 31 : +3
        assert_eq!(popularity_score(&[7, 42, 44, 46, 48]), 3);
        // Exactement 3 dans la même dizaine : +1
        assert_eq!(popularity_score(&[7, 18, 42, 44, 46]), 1);
    }

    #[test]
    fn test_multiples_of_five() {
        // Exactement 3 multiples de 5, aucun autre motif : +1
        assert_eq!(popularity_score(&[10, 25, 33, 40, 47]), 1);
    }

    #[test]
    fn test_score_is_deterministic() {
        let combo = [5, 10, 15, 20, 25];
        assert_eq!(popularity_score(&combo), popularity_score(&combo));
    }
}
