//! Roulette wheel selection over an eligible population.

use crate::eligibility::Eligible;
use rand::{rngs::StdRng, Rng, SeedableRng};
use sha2::{Digest, Sha256};

/// Outcome of a single weighted pick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pick {
    pub donor: i32,
    /// sum of all weights
    pub total_weight: f64,
    /// point on the wheel, in [0, total_weight)
    pub drawn: f64,
}

/// Random source of a draw.
///
/// The same seed always gives the same sequence; without a seed the
/// generator is seeded from the operating system.
pub fn draw_rng(seed: Option<&str>) -> StdRng {
    match seed {
        Some(seed) => StdRng::from_seed(Sha256::digest(seed.as_bytes()).into()),
        None => StdRng::from_entropy(),
    }
}

/// Pick a donor with probability proportional to its weight.
///
/// `unit` is a uniform value in [0, 1). The population is walked in its given
/// order. A single entry population always yields that entry.
pub fn sample(population: &[Eligible], unit: f64) -> Option<Pick> {
    let last = population.last()?;
    let total_weight: f64 = population.iter().map(|e| e.weight).sum();
    let drawn = unit.clamp(0.0, 1.0) * total_weight;

    if population.len() == 1 {
        return Some(Pick {
            donor: last.donor,
            total_weight,
            drawn,
        });
    }

    let mut rest = drawn;
    for e in population {
        rest -= e.weight;
        if rest < 0.0 {
            return Some(Pick {
                donor: e.donor,
                total_weight,
                drawn,
            });
        }
    }
    // float rounding at the very end of the wheel
    Some(Pick {
        donor: last.donor,
        total_weight,
        drawn,
    })
}

/// Draw a unit value from `rng` and sample the population with it.
pub fn sample_with<R: Rng>(population: &[Eligible], rng: &mut R) -> Option<Pick> {
    sample(population, rng.gen::<f64>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn e(donor: i32, weight: f64) -> Eligible {
        Eligible {
            donor,
            amount: (weight * 1000.0) as i64,
            weight,
        }
    }

    #[test]
    fn single() {
        let pop = vec![e(3, 1.5)];
        let pick = sample(&pop, 0.2).unwrap();
        assert_eq!(pick.donor, 3);
        assert_eq!(pick.total_weight, 1.5);
        assert!((pick.drawn - 0.3).abs() < 1e-12);
        assert_eq!(sample(&pop, 0.999).unwrap().donor, 3);
        assert!(sample(&[], 0.5).is_none());
    }

    #[test]
    fn wheel() {
        let pop = vec![e(1, 1.0), e(2, 2.0), e(3, 1.0)];
        assert_eq!(sample(&pop, 0.0).unwrap().donor, 1);
        assert_eq!(sample(&pop, 0.24).unwrap().donor, 1);
        // boundary belongs to the next entry
        assert_eq!(sample(&pop, 0.25).unwrap().donor, 2);
        assert_eq!(sample(&pop, 0.74).unwrap().donor, 2);
        assert_eq!(sample(&pop, 0.75).unwrap().donor, 3);
        assert_eq!(sample(&pop, 0.999_999).unwrap().donor, 3);
        assert_eq!(sample(&pop, 1.0).unwrap().donor, 3);
    }

    #[test]
    fn seeded() {
        let pop = vec![e(1, 1.0), e(2, 2.0), e(3, 1.5), e(4, 1.0)];
        let a = sample_with(&pop, &mut draw_rng(Some("gdq"))).unwrap();
        let b = sample_with(&pop, &mut draw_rng(Some("gdq"))).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.total_weight, 5.5);

        let mut r1 = draw_rng(Some("a"));
        let mut r2 = draw_rng(Some("b"));
        let s1: Vec<f64> = (0..4).map(|_| r1.gen()).collect();
        let s2: Vec<f64> = (0..4).map(|_| r2.gen()).collect();
        assert_ne!(s1, s2);
    }

    #[test]
    fn proportional() {
        let pop = vec![e(1, 2.0), e(2, 2.0)];
        let mut rng = draw_rng(Some("proportional"));
        let mut first = 0;
        for _ in 0..10_000 {
            if sample_with(&pop, &mut rng).unwrap().donor == 1 {
                first += 1;
            }
        }
        assert!((4_500..5_500).contains(&first), "{}", first);
    }
}
