use std::collections::HashMap;

use rua_db::models::{Draw, Pool};

const LIFT_EPS: f64 = 1e-9;

/// Matrice symétrique des co-occurrences de paires sur les numéros
/// principaux, avec les comptes simples et le nombre de tirages, pour le
/// calcul du lift.
#[derive(Debug, Clone)]
pub struct PairCounts {
    mat: Vec<Vec<u32>>,
    seen: Vec<u32>,
    n_draws: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairEdge {
    pub a: u8,
    pub b: u8,
    pub count: u32,
}

impl PairCounts {
    pub fn new(draws: &[Draw]) -> Self {
        let size = Pool::Mains.size();
        let mut mat = vec![vec![0u32; size]; size];
        let mut seen = vec![0u32; size];

        for draw in draws {
            let ms = sorted_unique_mains(draw);
            for &m in &ms {
                seen[(m - 1) as usize] += 1;
            }
            for i in 0..ms.len() {
                for j in (i + 1)..ms.len() {
                    let a = (ms[i] - 1) as usize;
                    let b = (ms[j] - 1) as usize;
                    mat[a][b] += 1;
                    mat[b][a] += 1;
                }
            }
        }

        Self {
            mat,
            seen,
            n_draws: draws.len(),
        }
    }

    fn in_range(&self, n: u8) -> bool {
        n >= 1 && (n as usize) <= self.mat.len()
    }

    pub fn count(&self, a: u8, b: u8) -> u32 {
        if !self.in_range(a) || !self.in_range(b) || a == b {
            return 0;
        }
        self.mat[(a - 1) as usize][(b - 1) as usize]
    }

    pub fn single(&self, n: u8) -> u32 {
        if !self.in_range(n) {
            return 0;
        }
        self.seen[(n - 1) as usize]
    }

    /// `lift(a,b) = P(a,b) / (P(a) * P(b))`, 0 sur la diagonale ; le
    /// dénominateur est planché pour les numéros jamais sortis.
    pub fn lift(&self, a: u8, b: u8) -> f64 {
        if a == b || !self.in_range(a) || !self.in_range(b) {
            return 0.0;
        }
        let n = self.n_draws.max(1) as f64;
        let pab = self.count(a, b) as f64 / n;
        let pa = self.single(a) as f64 / n;
        let pb = self.single(b) as f64 / n;
        pab / (pa * pb).max(LIFT_EPS)
    }

    /// Arêtes du réseau de co-occurrence : paires de poids >= `min_count`,
    /// triées par compte décroissant, tronquées à `limit`.
    pub fn edges(&self, min_count: u32, limit: usize) -> Vec<PairEdge> {
        let size = self.mat.len();
        let mut edges = Vec::new();
        for a in 0..size {
            for b in (a + 1)..size {
                let count = self.mat[a][b];
                if count >= min_count.max(1) {
                    edges.push(PairEdge {
                        a: (a + 1) as u8,
                        b: (b + 1) as u8,
                        count,
                    });
                }
            }
        }
        edges.sort_by(|x, y| y.count.cmp(&x.count).then((x.a, x.b).cmp(&(y.a, y.b))));
        edges.truncate(limit);
        edges
    }

    pub fn top_pairs(&self, limit: usize) -> Vec<PairEdge> {
        self.edges(1, limit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripletCount {
    pub numbers: [u8; 3],
    pub count: u32,
}

/// Même motif de comptage que les paires, généralisé aux 3-sous-ensembles :
/// chaque combinaison triée d'un tirage incrémente son compteur une fois.
pub fn triplet_counts(draws: &[Draw], top_n: usize) -> Vec<TripletCount> {
    let mut map: HashMap<[u8; 3], u32> = HashMap::new();

    for draw in draws {
        let ms = sorted_unique_mains(draw);
        for i in 0..ms.len() {
            for j in (i + 1)..ms.len() {
                for k in (j + 1)..ms.len() {
                    *map.entry([ms[i], ms[j], ms[k]]).or_insert(0) += 1;
                }
            }
        }
    }

    let mut out: Vec<TripletCount> = map
        .into_iter()
        .map(|(numbers, count)| TripletCount { numbers, count })
        .collect();
    out.sort_by(|x, y| y.count.cmp(&x.count).then(x.numbers.cmp(&y.numbers)));
    out.truncate(top_n);
    out
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsecutiveStats {
    pub total: u32,
    /// (a, compte) pour chaque paire consécutive (a, a+1) observée,
    /// triée par compte décroissant.
    pub pairs: Vec<(u8, u32)>,
}

pub fn consecutive_pairs(draws: &[Draw]) -> ConsecutiveStats {
    let mut counts: HashMap<u8, u32> = HashMap::new();
    let mut total = 0u32;

    for draw in draws {
        let ms = sorted_unique_mains(draw);
        for w in ms.windows(2) {
            if w[1] == w[0] + 1 {
                total += 1;
                *counts.entry(w[0]).or_insert(0) += 1;
            }
        }
    }

    let mut pairs: Vec<(u8, u32)> = counts.into_iter().collect();
    pairs.sort_by(|x, y| y.1.cmp(&x.1).then(x.0.cmp(&y.0)));
    ConsecutiveStats { total, pairs }
}

fn sorted_unique_mains(draw: &Draw) -> Vec<u8> {
    let size = Pool::Mains.size();
    let mut ms: Vec<u8> = draw
        .mains
        .iter()
        .copied()
        .filter(|&n| n >= 1 && (n as usize) <= size)
        .collect();
    ms.sort();
    ms.dedup();
    ms
}
