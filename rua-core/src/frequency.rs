use rua_db::models::{Draw, Pool};

pub const DEFAULT_DECAY: f64 = 0.995;
pub const DEFAULT_ALPHA: f64 = 1.0;
pub const DEFAULT_BETA: f64 = 0.35;

// Plancher pour garantir des poids strictement positifs
const WEIGHT_FLOOR: f64 = 1e-9;

pub fn count_frequencies(draws: &[Draw], pool: Pool) -> Vec<u32> {
    let size = pool.size();
    let mut counts = vec![0u32; size];

    for draw in draws {
        for &n in pool.numbers_from(draw) {
            if n >= 1 && (n as usize) <= size {
                counts[(n - 1) as usize] += 1;
            }
        }
    }

    counts
}

/// Comptes pondérés par la récence : un tirage à l'index chronologique t
/// (t = 0 le plus ancien, N tirages) contribue `decay^(N-1-t)`.
pub fn recency_weights(draws: &[Draw], pool: Pool, decay: f64) -> Vec<f64> {
    let size = pool.size();
    let n_draws = draws.len();
    let mut weights = vec![0.0f64; size];

    for (t, draw) in draws.iter().enumerate() {
        let w = decay.powi((n_draws - 1 - t) as i32);
        for &n in pool.numbers_from(draw) {
            if n >= 1 && (n as usize) <= size {
                weights[(n - 1) as usize] += w;
            }
        }
    }

    weights
}

pub fn zscore(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }

    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n as f64;
    let mut sd = variance.sqrt();
    if sd == 0.0 {
        sd = 1.0;
    }

    values.iter().map(|v| (v - mean) / sd).collect()
}

/// Combine fréquences brutes et récence :
/// `poids[n] = (compte[n] + alpha) * (1 + beta * zscore(récence)[n])`.
/// Le lissage alpha couvre les numéros jamais sortis ; beta borne
/// l'influence de la récence. Le résultat est planché au-dessus de zéro.
pub fn combine_weights(counts: &[u32], recency: &[f64], alpha: f64, beta: f64) -> Vec<f64> {
    let z = zscore(recency);
    counts
        .iter()
        .zip(z.iter())
        .map(|(&c, &zi)| ((c as f64 + alpha) * (1.0 + beta * zi)).max(WEIGHT_FLOOR))
        .collect()
}

pub fn weight_vector(draws: &[Draw], pool: Pool, decay: f64, alpha: f64, beta: f64) -> Vec<f64> {
    let counts = count_frequencies(draws, pool);
    let recency = recency_weights(draws, pool, decay);
    combine_weights(&counts, &recency, alpha, beta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rua_db::models::CLASS_COUNT;

    fn draw(date: &str, mains: [u8; 5], euros: [u8; 2]) -> Draw {
        Draw {
            date: date.to_string(),
            mains,
            euros,
            payouts: [None; CLASS_COUNT],
        }
    }

    #[test]
    fn test_count_conservation() {
        let draws = vec![
            draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]),
            draw("2024-01-05", [1, 10, 20, 30, 40], [3, 4]),
        ];
        let counts = count_frequencies(&draws, Pool::Mains);
        let total: u32 = counts.iter().sum();
        assert_eq!(total, 10, "chaque numéro en plage doit être compté une fois");
        assert_eq!(counts[0], 2);
        assert_eq!(counts[9], 1);
    }

    #[test]
    fn test_count_out_of_range_ignored() {
        // Construit volontairement un tirage invalide : la validation est en amont
        let draws = vec![draw("2024-01-02", [0, 2, 3, 4, 55], [1, 2])];
        let counts = count_frequencies(&draws, Pool::Mains);
        let total: u32 = counts.iter().sum();
        assert_eq!(total, 3, "0 et 55 doivent être ignorés silencieusement");
    }

    #[test]
    fn test_count_empty_history() {
        let counts = count_frequencies(&[], Pool::Euros);
        assert_eq!(counts.len(), 12);
        assert!(counts.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_recency_most_recent_weighs_one() {
        let draws = vec![
            draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]),
            draw("2024-01-05", [6, 7, 8, 9, 10], [3, 4]),
        ];
        let rec = recency_weights(&draws, Pool::Mains, 0.9);
        // Dernier tirage : poids 0.9^0 = 1, plus ancien : 0.9^1
        assert!((rec[5] - 1.0).abs() < 1e-12);
        assert!((rec[0] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_recency_monotone_in_position() {
        // Mêmes comptes, occurrence du numéro 1 décalée vers la fin
        let early = vec![
            draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]),
            draw("2024-01-05", [6, 7, 8, 9, 10], [3, 4]),
            draw("2024-01-09", [11, 12, 13, 14, 15], [5, 6]),
        ];
        let late = vec![
            draw("2024-01-02", [11, 12, 13, 14, 15], [5, 6]),
            draw("2024-01-05", [6, 7, 8, 9, 10], [3, 4]),
            draw("2024-01-09", [1, 2, 3, 4, 5], [1, 2]),
        ];
        let rec_early = recency_weights(&early, Pool::Mains, 0.995);
        let rec_late = recency_weights(&late, Pool::Mains, 0.995);
        assert!(
            rec_late[0] > rec_early[0],
            "une occurrence plus récente doit peser plus : {} vs {}",
            rec_late[0],
            rec_early[0]
        );
    }

    #[test]
    fn test_zscore_zero_variance_fallback() {
        let z = zscore(&[2.0, 2.0, 2.0]);
        assert!(z.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_weights_strictly_positive() {
        let draws = vec![draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2])];
        let w = weight_vector(&draws, Pool::Mains, DEFAULT_DECAY, DEFAULT_ALPHA, DEFAULT_BETA);
        assert_eq!(w.len(), 50);
        assert!(
            w.iter().all(|&x| x > 0.0),
            "le lissage doit garantir des poids positifs même pour les numéros jamais sortis"
        );
    }

    #[test]
    fn test_weights_empty_history_uniform() {
        let w = weight_vector(&[], Pool::Euros, DEFAULT_DECAY, DEFAULT_ALPHA, DEFAULT_BETA);
        assert_eq!(w.len(), 12);
        for &x in &w {
            assert!((x - DEFAULT_ALPHA).abs() < 1e-12, "historique vide : poids = alpha");
        }
    }

    #[test]
    fn test_frequent_number_weighs_more() {
        let draws = vec![
            draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]),
            draw("2024-01-05", [1, 6, 7, 8, 9], [3, 4]),
            draw("2024-01-09", [1, 10, 11, 12, 13], [5, 6]),
        ];
        let w = weight_vector(&draws, Pool::Mains, DEFAULT_DECAY, DEFAULT_ALPHA, DEFAULT_BETA);
        assert!(w[0] > w[1], "3 sorties contre 1 : {} vs {}", w[0], w[1]);
        assert!(w[1] > w[49], "1 sortie contre 0 : {} vs {}", w[1], w[49]);
    }
}
