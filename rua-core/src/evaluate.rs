use serde::Serialize;

use rua_db::models::{Draw, CLASS_COUNT};

/// Table statique des rangs de gain :
/// (bons numéros, bons euros) -> classe 1..12. Toute combinaison absente
/// de la table est perdante.
const PRIZE_TABLE: [(u8, u8, u8); CLASS_COUNT] = [
    (5, 2, 1),
    (5, 1, 2),
    (5, 0, 3),
    (4, 2, 4),
    (4, 1, 5),
    (4, 0, 6),
    (3, 2, 7),
    (2, 2, 8),
    (3, 1, 9),
    (3, 0, 10),
    (1, 2, 11),
    (2, 1, 12),
];

pub fn prize_class(main_matches: u8, euro_matches: u8) -> Option<u8> {
    PRIZE_TABLE
        .iter()
        .find(|&&(m, e, _)| m == main_matches && e == euro_matches)
        .map(|&(_, _, class)| class)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Win {
    pub date: String,
    pub class: u8,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EvaluationResult {
    pub class_hits: [u32; CLASS_COUNT],
    pub class_totals: [f64; CLASS_COUNT],
    pub grand_total: f64,
    /// Classe la plus basse (donc la plus forte) jamais atteinte.
    pub best_class: Option<u8>,
    pub wins: Vec<Win>,
}

/// Confronte une grille utilisateur à tout l'historique : comptes et
/// cumuls par classe, gain total, meilleure classe, liste des tirages
/// gagnants. Le montant vient du gain enregistré sur le tirage pour la
/// classe atteinte, 0 si absent.
pub fn evaluate_numbers(draws: &[Draw], mains: &[u8; 5], euros: &[u8; 2]) -> EvaluationResult {
    let mut result = EvaluationResult {
        class_hits: [0; CLASS_COUNT],
        class_totals: [0.0; CLASS_COUNT],
        grand_total: 0.0,
        best_class: None,
        wins: Vec::new(),
    };

    for draw in draws {
        let main_matches = draw.mains.iter().filter(|n| mains.contains(n)).count() as u8;
        let euro_matches = draw.euros.iter().filter(|n| euros.contains(n)).count() as u8;

        if let Some(class) = prize_class(main_matches, euro_matches) {
            let amount = draw.payout(class).unwrap_or(0.0);
            let idx = (class - 1) as usize;
            result.class_hits[idx] += 1;
            result.class_totals[idx] += amount;
            result.grand_total += amount;
            result.wins.push(Win {
                date: draw.date.clone(),
                class,
                amount,
            });
            result.best_class = Some(match result.best_class {
                Some(best) => best.min(class),
                None => class,
            });
        }
    }

    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrizeStat {
    pub class: u8,
    pub count: u32,
    pub total: f64,
    pub avg: f64,
}

/// Statistiques par classe sur les gains enregistrés dans l'historique
/// (compte des tirages renseignés, cumul et moyenne).
pub fn prize_stats(draws: &[Draw]) -> Vec<PrizeStat> {
    (1..=CLASS_COUNT as u8)
        .map(|class| {
            let amounts: Vec<f64> = draws.iter().filter_map(|d| d.payout(class)).collect();
            let count = amounts.len() as u32;
            let total: f64 = amounts.iter().sum();
            PrizeStat {
                class,
                count,
                total,
                avg: if count > 0 { total / count as f64 } else { 0.0 },
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JackpotPoint {
    pub date: String,
    pub amount: f64,
}

/// Série du gain de classe 1 par tirage (0 si non renseigné).
pub fn jackpot_series(draws: &[Draw]) -> Vec<JackpotPoint> {
    draws
        .iter()
        .map(|d| JackpotPoint {
            date: d.date.clone(),
            amount: d.payout(1).unwrap_or(0.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draw(date: &str, mains: [u8; 5], euros: [u8; 2]) -> Draw {
        Draw {
            date: date.to_string(),
            mains,
            euros,
            payouts: [None; CLASS_COUNT],
        }
    }

    #[test]
    fn test_prize_table_exhaustive() {
        // Les 18 combinaisons possibles (0..=5 mains x 0..=2 euros)
        let expected = [
            ((5, 2), Some(1)),
            ((5, 1), Some(2)),
            ((5, 0), Some(3)),
            ((4, 2), Some(4)),
            ((4, 1), Some(5)),
            ((4, 0), Some(6)),
            ((3, 2), Some(7)),
            ((3, 1), Some(9)),
            ((3, 0), Some(10)),
            ((2, 2), Some(8)),
            ((2, 1), Some(12)),
            ((2, 0), None),
            ((1, 2), Some(11)),
            ((1, 1), None),
            ((1, 0), None),
            ((0, 2), None),
            ((0, 1), None),
            ((0, 0), None),
        ];
        for ((m, e), class) in expected {
            assert_eq!(prize_class(m, e), class, "combinaison {}+{}", m, e);
        }
    }

    #[test]
    fn test_evaluate_identical_set_class_one() {
        let mut d = draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]);
        d.payouts[0] = Some(17_000_000.0);
        let result = evaluate_numbers(&[d], &[1, 2, 3, 4, 5], &[1, 2]);

        assert_eq!(result.class_hits[0], 1);
        assert_eq!(result.class_hits[1..].iter().sum::<u32>(), 0);
        assert_eq!(result.grand_total, 17_000_000.0);
        assert_eq!(result.best_class, Some(1));
        assert_eq!(
            result.wins,
            vec![Win { date: "2024-01-02".into(), class: 1, amount: 17_000_000.0 }]
        );
    }

    #[test]
    fn test_evaluate_empty_history() {
        let result = evaluate_numbers(&[], &[1, 2, 3, 4, 5], &[1, 2]);
        assert!(result.class_hits.iter().all(|&h| h == 0));
        assert_eq!(result.grand_total, 0.0);
        assert_eq!(result.best_class, None);
        assert!(result.wins.is_empty());
    }

    #[test]
    fn test_evaluate_missing_payout_counts_zero() {
        let d = draw("2024-01-02", [1, 2, 3, 10, 20], [1, 5]);
        // 3 mains + 1 euro = classe 9, aucun montant enregistré
        let result = evaluate_numbers(&[d], &[1, 2, 3, 4, 5], &[1, 2]);
        assert_eq!(result.class_hits[8], 1);
        assert_eq!(result.grand_total, 0.0);
        assert_eq!(result.best_class, Some(9));
    }

    #[test]
    fn test_evaluate_best_class_is_lowest() {
        let mut d1 = draw("2024-01-02", [1, 2, 3, 10, 20], [1, 5]);
        d1.payouts[8] = Some(20.0); // classe 9
        let mut d2 = draw("2024-01-05", [1, 2, 3, 4, 20], [1, 2]);
        d2.payouts[3] = Some(5_000.0); // classe 4
        let result = evaluate_numbers(&[d1, d2], &[1, 2, 3, 4, 5], &[1, 2]);

        assert_eq!(result.best_class, Some(4));
        assert_eq!(result.grand_total, 5_020.0);
        assert_eq!(result.wins.len(), 2);
    }

    #[test]
    fn test_evaluate_losing_grid() {
        let d = draw("2024-01-02", [1, 2, 30, 40, 50], [1, 5]);
        // 2 mains + 0 euro : perdant
        let result = evaluate_numbers(&[d], &[1, 2, 3, 4, 5], &[2, 3]);
        assert!(result.class_hits.iter().all(|&h| h == 0));
        assert_eq!(result.best_class, None);
    }

    #[test]
    fn test_prize_stats() {
        let mut d1 = draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]);
        d1.payouts[0] = Some(10_000_000.0);
        d1.payouts[11] = Some(10.0);
        let mut d2 = draw("2024-01-05", [6, 7, 8, 9, 10], [3, 4]);
        d2.payouts[11] = Some(14.0);

        let stats = prize_stats(&[d1, d2]);
        assert_eq!(stats.len(), 12);
        assert_eq!(stats[0].count, 1);
        assert_eq!(stats[0].total, 10_000_000.0);
        assert_eq!(stats[11].count, 2);
        assert_eq!(stats[11].total, 24.0);
        assert_eq!(stats[11].avg, 12.0);
        assert_eq!(stats[5].count, 0);
        assert_eq!(stats[5].avg, 0.0);
    }

    #[test]
    fn test_jackpot_series() {
        let mut d1 = draw("2024-01-02", [1, 2, 3, 4, 5], [1, 2]);
        d1.payouts[0] = Some(90_000_000.0);
        let d2 = draw("2024-01-05", [6, 7, 8, 9, 10], [3, 4]);

        let series = jackpot_series(&[d1, d2]);
        assert_eq!(series[0].amount, 90_000_000.0);
        assert_eq!(series[1].amount, 0.0);
    }
}
