use anyhow::{bail, Result};

/// Début de l'ère à 12 étoiles (avant cette date, le pool d'étoiles était plus petit).
pub const ERA_12_STARS_START: &str = "2016-09-27";

#[derive(Debug, Clone)]
pub struct Draw {
    /// Date ISO (AAAA-MM-JJ), comparable lexicographiquement.
    pub date: String,
    pub numbers: [u8; 5],
    pub stars: [u8; 2],
}

impl Draw {
    /// Le tirage appartient-il à l'ère des 12 étoiles ?
    pub fn in_star_era(&self) -> bool {
        self.date.as_str() >= ERA_12_STARS_START
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pool {
    Numbers,
    Stars,
}

impl Pool {
    pub fn size(&self) -> usize {
        match self {
            Pool::Numbers => 50,
            Pool::Stars => 12,
        }
    }

    pub fn pick_count(&self) -> usize {
        match self {
            Pool::Numbers => 5,
            Pool::Stars => 2,
        }
    }

    pub fn values_from<'a>(&self, draw: &'a Draw) -> &'a [u8] {
        match self {
            Pool::Numbers => &draw.numbers,
            Pool::Stars => &draw.stars,
        }
    }
}

/// Les trois séries du bloc, chacune avec sa bande de somme des 5 numéros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Series {
    A,
    B,
    C,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::A, Series::B, Series::C];

    /// Bande de somme inclusive : A haut, B moyen, C bas (plage globale ~100-158).
    pub fn sum_range(&self) -> (u32, u32) {
        match self {
            Series::A => (141, 158),
            Series::B => (121, 140),
            Series::C => (100, 120),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Series::A => "A",
            Series::B => "B",
            Series::C => "C",
        }
    }
}

impl std::fmt::Display for Series {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Une ligne générée : 5 numéros et 2 étoiles triés, immuable une fois produite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedLine {
    pub series: Series,
    pub numbers: [u8; 5],
    pub stars: [u8; 2],
}

impl GeneratedLine {
    pub fn sum_numbers(&self) -> u32 {
        self.numbers.iter().map(|&n| n as u32).sum()
    }
}

pub fn validate_draw(numbers: &[u8; 5], stars: &[u8; 2]) -> Result<()> {
    for &n in numbers {
        if n < 1 || n > 50 {
            bail!("Numéro {} hors limites (1-50)", n);
        }
    }
    for &s in stars {
        if s < 1 || s > 12 {
            bail!("Étoile {} hors limites (1-12)", s);
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                bail!("Numéro en double : {}", numbers[i]);
            }
        }
    }
    if stars[0] == stars[1] {
        bail!("Étoile en double : {}", stars[0]);
    }
    Ok(())
}
