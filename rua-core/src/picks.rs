use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

use rua_db::models::{Draw, Pool};

use crate::frequency::{weight_vector, DEFAULT_ALPHA, DEFAULT_BETA, DEFAULT_DECAY};
use crate::pairs::PairCounts;

const WEIGHT_EPS: f64 = 1e-9;
const KEY_EPS: f64 = 1e-12;

// Bande de somme de repli quand l'historique est vide
const FALLBACK_BAND: SumBand = SumBand { lo: 95, hi: 185 };

#[derive(Debug, Clone, Copy)]
pub struct PickParams {
    /// Nombre de grilles retournées.
    pub count: usize,
    /// Taille du pool échantillonné (bornée pour rester réactif).
    pub samples: usize,
    /// Candidats conservés après tri par score, avant diversification.
    pub top_pool: usize,
    /// Distance minimale entre deux grilles acceptées.
    pub min_distance: u32,
    pub decay: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for PickParams {
    fn default() -> Self {
        Self {
            count: 5,
            samples: 2000,
            top_pool: 200,
            min_distance: 5,
            decay: DEFAULT_DECAY,
            alpha: DEFAULT_ALPHA,
            beta: DEFAULT_BETA,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Ticket {
    pub mains: [u8; 5],
    pub euros: [u8; 2],
    pub score: f64,
    pub badges: Vec<&'static str>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SumBand {
    pub lo: u32,
    pub hi: u32,
}

/// Bande [20e, 80e percentile] (rang le plus proche) des sommes
/// historiques des numéros principaux.
pub fn compute_sum_band(draws: &[Draw]) -> SumBand {
    let mut sums: Vec<u32> = draws
        .iter()
        .map(|d| d.mains.iter().map(|&n| n as u32).sum())
        .collect();
    if sums.is_empty() {
        return FALLBACK_BAND;
    }
    sums.sort();
    let rank = |p: f64| ((p * (sums.len() - 1) as f64).floor() as usize).min(sums.len() - 1);
    SumBand {
        lo: sums[rank(0.20)],
        hi: sums[rank(0.80)],
    }
}

/// Échantillonnage pondéré sans remise par clés exponentielles
/// (Efraimidis–Spirakis) : `clé = u^(1/w)`, on garde les k plus grandes.
/// u et w sont planchés pour éviter `0^(1/w)` et `1/0`.
pub fn sample_weighted(weights: &[f64], k: usize, rng: &mut StdRng) -> Vec<u8> {
    let mut keys: Vec<(u8, f64)> = weights
        .iter()
        .enumerate()
        .map(|(i, &w)| {
            let wi = w.max(WEIGHT_EPS);
            let u: f64 = rng.random::<f64>().max(KEY_EPS);
            ((i + 1) as u8, u.powf(1.0 / wi))
        })
        .collect();
    keys.sort_by(|x, y| y.1.partial_cmp(&x.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut picked: Vec<u8> = keys.into_iter().take(k).map(|(n, _)| n).collect();
    picked.sort();
    picked
}

/// Score heuristique d'une grille (mains triés croissants) : somme des
/// log-poids, bonus de lift de paires plafonné, bonus de forme, pénalités
/// des motifs « humains » populaires. Chaque terme appliqué ajoute un badge.
pub fn score_ticket(
    mains: &[u8; 5],
    euros: &[u8; 2],
    w_main: &[f64],
    w_euro: &[f64],
    pairs: &PairCounts,
    band: SumBand,
) -> (f64, Vec<&'static str>) {
    let mut badges = Vec::new();

    let log_weight = |weights: &[f64], n: u8| -> f64 {
        weights
            .get((n as usize).wrapping_sub(1))
            .copied()
            .unwrap_or(WEIGHT_EPS)
            .max(WEIGHT_EPS)
            .ln()
    };

    let mut score: f64 = mains.iter().map(|&m| log_weight(w_main, m)).sum::<f64>()
        + euros.iter().map(|&e| log_weight(w_euro, e)).sum::<f64>();

    // Bonus de paires (mains) : récompense linéaire du lift dans (1, 3]
    for i in 0..mains.len() {
        for j in (i + 1)..mains.len() {
            let lift = pairs.lift(mains[i], mains[j]);
            if lift > 1.0 {
                score += 0.5 * (lift - 1.0).min(2.0);
            }
        }
    }

    let min = mains[0];
    let max = mains[4];
    let avg_gap = (max - min) as f64 / 4.0;
    let odd = mains.iter().filter(|&&n| n % 2 == 1).count();
    let mut digits: Vec<u8> = mains.iter().map(|&n| n % 10).collect();
    digits.sort();
    digits.dedup();
    let sum: u32 = mains.iter().map(|&n| n as u32).sum();

    if min <= 10 && max >= 40 {
        score += 1.0;
        badges.push("étendue large");
    }
    if avg_gap >= 7.0 {
        score += 1.0;
        badges.push("bon espacement");
    }
    if odd == 2 || odd == 3 {
        score += 0.5;
        badges.push("parité équilibrée");
    }
    if digits.len() >= 4 {
        score += 0.5;
        badges.push("terminaisons variées");
    }
    if sum >= band.lo && sum <= band.hi {
        score += 0.5;
        badges.push("somme dans la bande");
    }

    // Pénalités des motifs joués en masse (jackpots partagés)
    if mains.iter().all(|&n| n <= 31) {
        score -= 1.5;
        badges.push("plage anniversaires");
    }
    let mut run = 1u32;
    let mut max_run = 1u32;
    for w in mains.windows(2) {
        if w[1] == w[0] + 1 {
            run += 1;
            max_run = max_run.max(run);
        } else {
            run = 1;
        }
    }
    if max_run >= 3 {
        score -= 1.0;
        badges.push("suite consécutive");
    }
    let max_same_ending = (0u8..10)
        .map(|d| mains.iter().filter(|&&n| n % 10 == d).count())
        .max()
        .unwrap_or(0);
    if max_same_ending >= 3 {
        score -= 0.75;
        badges.push("terminaisons répétées");
    }

    (score, badges)
}

pub fn ticket_distance(a: &Ticket, b: &Ticket) -> u32 {
    let shared_mains = a.mains.iter().filter(|m| b.mains.contains(m)).count() as u32;
    let shared_euros = a.euros.iter().filter(|e| b.euros.contains(e)).count() as u32;
    (5 - shared_mains) + (2 - shared_euros)
}

/// Sélection gloutonne : accepte une grille si elle est à distance
/// >= `min_distance` de toutes les grilles déjà retenues.
/// Repli : si le pool est trop homogène, complète avec les meilleurs
/// candidats restants sans contrainte de distance, pour toujours
/// retourner `count` grilles.
fn select_diverse(pool: &[Ticket], count: usize, min_distance: u32) -> Vec<Ticket> {
    let mut picks: Vec<Ticket> = Vec::with_capacity(count);

    for cand in pool {
        if picks.len() >= count {
            break;
        }
        if picks.iter().all(|p| ticket_distance(p, cand) >= min_distance) {
            picks.push(cand.clone());
        }
    }

    if picks.len() < count {
        for cand in pool {
            if picks.len() >= count {
                break;
            }
            if !picks.iter().any(|p| p.mains == cand.mains && p.euros == cand.euros) {
                picks.push(cand.clone());
            }
        }
    }

    picks
}

/// Génère les Smart Picks : échantillonne un pool pondéré par
/// fréquence/récence, score chaque candidat, garde les meilleurs puis
/// diversifie. Un historique vide retourne une liste vide. À seed égal,
/// sortie identique.
pub fn generate_tickets(draws: &[Draw], params: &PickParams, seed: Option<u64>) -> Vec<Ticket> {
    if draws.is_empty() {
        return Vec::new();
    }

    let mut rng: StdRng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let samples = params.samples.clamp(500, 6000);
    let w_main = weight_vector(draws, Pool::Mains, params.decay, params.alpha, params.beta);
    let w_euro = weight_vector(draws, Pool::Euros, params.decay, params.alpha, params.beta);
    let pairs = PairCounts::new(draws);
    let band = compute_sum_band(draws);

    let mut pool = Vec::with_capacity(samples);
    for _ in 0..samples {
        let sampled_mains = sample_weighted(&w_main, Pool::Mains.pick_count(), &mut rng);
        let sampled_euros = sample_weighted(&w_euro, Pool::Euros.pick_count(), &mut rng);

        let mut mains = [0u8; 5];
        mains.copy_from_slice(&sampled_mains);
        let mut euros = [0u8; 2];
        euros.copy_from_slice(&sampled_euros);

        let (score, badges) = score_ticket(&mains, &euros, &w_main, &w_euro, &pairs, band);
        pool.push(Ticket {
            mains,
            euros,
            score,
            badges,
        });
    }

    pool.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    pool.truncate(params.top_pool);

    let mut picks = select_diverse(&pool, params.count, params.min_distance);
    picks.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    picks
}
