use chrono::{Datelike, NaiveDate};

use rua_db::models::Draw;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesPoint {
    pub date: String,
    pub value: u32,
}

pub fn sum_series(draws: &[Draw]) -> Vec<SeriesPoint> {
    draws
        .iter()
        .map(|d| SeriesPoint {
            date: d.date.clone(),
            value: d.mains.iter().map(|&n| n as u32).sum(),
        })
        .collect()
}

pub fn range_series(draws: &[Draw]) -> Vec<SeriesPoint> {
    draws
        .iter()
        .map(|d| {
            let min = d.mains.iter().min().copied().unwrap_or(0);
            let max = d.mains.iter().max().copied().unwrap_or(0);
            SeriesPoint {
                date: d.date.clone(),
                value: (max - min) as u32,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParityPoint {
    pub date: String,
    pub odd: u32,
    pub even: u32,
}

pub fn parity_split(draws: &[Draw]) -> Vec<ParityPoint> {
    draws
        .iter()
        .map(|d| {
            let odd = d.mains.iter().filter(|&&n| n % 2 == 1).count() as u32;
            ParityPoint {
                date: d.date.clone(),
                odd,
                even: d.mains.len() as u32 - odd,
            }
        })
        .collect()
}

pub fn parity_totals(draws: &[Draw]) -> (u32, u32) {
    parity_split(draws)
        .iter()
        .fold((0, 0), |(o, e), p| (o + p.odd, e + p.even))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LowHighPoint {
    pub date: String,
    pub low: u32,
    pub high: u32,
}

/// Répartition bas/haut des numéros principaux (1-25 contre 26-50).
pub fn low_high_split(draws: &[Draw]) -> Vec<LowHighPoint> {
    draws
        .iter()
        .map(|d| {
            let low = d.mains.iter().filter(|&&n| n <= 25).count() as u32;
            LowHighPoint {
                date: d.date.clone(),
                low,
                high: d.mains.len() as u32 - low,
            }
        })
        .collect()
}

pub fn modulo_counts(draws: &[Draw], base: usize) -> Vec<u32> {
    let base = base.max(1);
    let mut counts = vec![0u32; base];
    for d in draws {
        for &n in &d.mains {
            counts[n as usize % base] += 1;
        }
    }
    counts
}

pub fn last_digit_counts(draws: &[Draw]) -> Vec<u32> {
    modulo_counts(draws, 10)
}

/// Comptes par jour de la semaine, indexés lundi = 0 .. dimanche = 6.
/// Les dates non analysables sont ignorées.
pub fn weekday_counts(draws: &[Draw]) -> [u32; 7] {
    let mut counts = [0u32; 7];
    for d in draws {
        if let Ok(date) = NaiveDate::parse_from_str(&d.date, "%Y-%m-%d") {
            counts[date.weekday().num_days_from_monday() as usize] += 1;
        }
    }
    counts
}

/// Écart mardi/vendredi jugé notable si la différence dépasse sqrt(total).
pub fn tuesday_friday_effect(counts: &[u32; 7]) -> bool {
    let total: u32 = counts.iter().sum();
    let diff = counts[1].abs_diff(counts[4]);
    (diff as f64) > (total as f64).sqrt()
}

pub fn month_counts(draws: &[Draw]) -> [u32; 12] {
    let mut counts = [0u32; 12];
    for d in draws {
        if let Ok(date) = NaiveDate::parse_from_str(&d.date, "%Y-%m-%d") {
            counts[date.month0() as usize] += 1;
        }
    }
    counts
}

/// Moyenne glissante à fenêtre fixe ; `None` avant la première fenêtre
/// complète.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 {
        return out;
    }

    let mut acc = 0.0f64;
    for i in 0..values.len() {
        acc += values[i];
        if i >= window {
            acc -= values[i - window];
        }
        if i + 1 >= window {
            out[i] = Some(acc / window as f64);
        }
    }
    out
}
