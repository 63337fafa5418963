use rua_db::models::{Draw, Pool};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverduePoint {
    pub number: u8,
    /// Tirages écoulés depuis la dernière sortie ; égal au nombre total de
    /// tirages si le numéro n'est jamais sorti.
    pub draws_since: u32,
    pub last_seen_date: Option<String>,
}

/// Retards par numéro, triés du plus en retard au plus récent.
pub fn overdue_points(draws: &[Draw], pool: Pool) -> Vec<OverduePoint> {
    let size = pool.size();
    let mut last_seen: Vec<Option<usize>> = vec![None; size];

    for (t, draw) in draws.iter().enumerate() {
        for &n in pool.numbers_from(draw) {
            if n >= 1 && (n as usize) <= size {
                last_seen[(n - 1) as usize] = Some(t);
            }
        }
    }

    let mut points: Vec<OverduePoint> = (1..=size as u8)
        .map(|number| match last_seen[(number - 1) as usize] {
            Some(t) => OverduePoint {
                number,
                draws_since: (draws.len() - 1 - t) as u32,
                last_seen_date: Some(draws[t].date.clone()),
            },
            None => OverduePoint {
                number,
                draws_since: draws.len() as u32,
                last_seen_date: None,
            },
        })
        .collect();

    points.sort_by(|x, y| y.draws_since.cmp(&x.draws_since).then(x.number.cmp(&y.number)));
    points
}

/// Pour chaque numéro, la liste des écarts entre deux sorties successives.
pub fn inter_arrival_gaps(draws: &[Draw], pool: Pool) -> Vec<Vec<u32>> {
    let size = pool.size();
    let mut indices: Vec<Vec<usize>> = vec![Vec::new(); size];

    for (t, draw) in draws.iter().enumerate() {
        for &n in pool.numbers_from(draw) {
            if n >= 1 && (n as usize) <= size {
                indices[(n - 1) as usize].push(t);
            }
        }
    }

    indices
        .iter()
        .map(|idx| idx.windows(2).map(|w| (w[1] - w[0]) as u32).collect())
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Streaks {
    pub hot_runs: Vec<u32>,
    pub cold_runs: Vec<u32>,
}

/// Longueurs des séries maximales de présence (hot) et d'absence (cold)
/// sur la séquence chronologique ; la série en cours est toujours comptée.
/// Les deux listes sont triées en ordre croissant.
pub fn streaks(draws: &[Draw], pool: Pool) -> Streaks {
    let size = pool.size();
    let mut hot_runs = Vec::new();
    let mut cold_runs = Vec::new();

    for number in 1..=size as u8 {
        let mut current = 0u32;
        let mut mode: Option<bool> = None;

        for draw in draws {
            let hit = pool.numbers_from(draw).contains(&number);
            match mode {
                None => {
                    mode = Some(hit);
                    current = 1;
                }
                Some(m) if m == hit => current += 1,
                Some(m) => {
                    if m {
                        hot_runs.push(current);
                    } else {
                        cold_runs.push(current);
                    }
                    mode = Some(hit);
                    current = 1;
                }
            }
        }

        if let Some(m) = mode {
            if m {
                hot_runs.push(current);
            } else {
                cold_runs.push(current);
            }
        }
    }

    hot_runs.sort();
    cold_runs.sort();
    Streaks { hot_runs, cold_runs }
}

pub fn run_length_histogram(runs: &[u32]) -> Vec<(u32, u32)> {
    let mut hist: Vec<(u32, u32)> = Vec::new();
    for &len in runs {
        match hist.iter_mut().find(|(l, _)| *l == len) {
            Some((_, count)) => *count += 1,
            None => hist.push((len, 1)),
        }
    }
    hist.sort_by_key(|&(len, _)| len);
    hist
}

/// Matrice [position x numéro] sur les numéros principaux triés : chaque
/// ligne est normalisée par son propre maximum, pour comparer les biais de
/// position sur une échelle 0..1 indépendante des fréquences absolues.
pub fn position_bias(draws: &[Draw]) -> Vec<Vec<f64>> {
    let size = Pool::Mains.size();
    let positions = Pool::Mains.pick_count();
    let mut mat = vec![vec![0u32; size]; positions];

    for draw in draws {
        let mut ms: Vec<u8> = draw
            .mains
            .iter()
            .copied()
            .filter(|&n| n >= 1 && (n as usize) <= size)
            .collect();
        ms.sort();
        ms.dedup();
        for (pos, &n) in ms.iter().take(positions).enumerate() {
            mat[pos][(n - 1) as usize] += 1;
        }
    }

    mat.iter()
        .map(|row| {
            let max = row.iter().copied().max().unwrap_or(0).max(1) as f64;
            row.iter().map(|&v| v as f64 / max).collect()
        })
        .collect()
}
