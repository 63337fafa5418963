use anyhow::{bail, Result};

pub const CLASS_COUNT: usize = 12;

#[derive(Debug, Clone)]
pub struct Draw {
    pub date: String,
    pub mains: [u8; 5],
    pub euros: [u8; 2],
    pub payouts: [Option<f64>; CLASS_COUNT],
}

impl Draw {
    pub fn payout(&self, class: u8) -> Option<f64> {
        if (1..=CLASS_COUNT as u8).contains(&class) {
            self.payouts[(class - 1) as usize]
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Mains,
    Euros,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Mains => 50,
            Pool::Euros => 12,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Mains => 5,
            Pool::Euros => 2,
        }
    }

    pub fn numbers_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Mains => &draw.mains,
            Pool::Euros => &draw.euros,
        }
    }
}

pub fn validate_draw(mains: &[u8; 5], euros: &[u8; 2]) -> Result<()> {
    for &m in mains {
        if m < 1 || m > 50 {
            bail!("Numéro {} hors limites (1-50)", m);
        }
    }
    for &e in euros {
        if e < 1 || e > 12 {
            bail!("Euro {} hors limites (1-12)", e);
        }
    }
    for i in 0..mains.len() {
        for j in (i + 1)..mains.len() {
            if mains[i] == mains[j] {
                bail!("Numéro en double : {}", mains[i]);
            }
        }
    }
    if euros[0] == euros[1] {
        bail!("Euro en double : {}", euros[0]);
    }
    Ok(())
}
