// Syntactic Transformer
// Implements: contraction expansion (unconditional), passive conversion, transition insertion.
// Randomised rewrites take the RNG as a parameter so tests can seed it.

pub mod contractions;
pub mod passive;
pub mod transitions;

use rand::Rng;

pub use contractions::expand_contractions;
pub use passive::{maybe_passivize, passive_pattern, PassiveClause};
pub use transitions::{maybe_insert_transition, ACADEMIC_TRANSITIONS};

/// Probability roll that never touches the RNG at the extremes.
pub(crate) fn roll<R: Rng>(rng: &mut R, probability: f64) -> bool {
    if probability.is_nan() || probability <= 0.0 {
        false
    } else if probability >= 1.0 {
        true
    } else {
        rng.random_bool(probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        assert!((0..1000).all(|_| !roll(&mut rng, 0.0)));
        assert!((0..1000).all(|_| roll(&mut rng, 1.0)));
        assert!(!roll(&mut rng, f64::NAN));
        assert!(!roll(&mut rng, -0.5));
        assert!(roll(&mut rng, 3.0));
    }

    #[test]
    fn test_roll_is_seeded() {
        let a: Vec<bool> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..64).map(|_| roll(&mut rng, 0.5)).collect()
        };
        let b: Vec<bool> = {
            let mut rng = StdRng::seed_from_u64(42);
            (0..64).map(|_| roll(&mut rng, 0.5)).collect()
        };
        assert_eq!(a, b);
        assert!(a.iter().any(|&x| x) && a.iter().any(|&x| !x));
    }
}
