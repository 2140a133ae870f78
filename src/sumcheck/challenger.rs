use p3_field::PrimeField64;
use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use super::ChallengeRange;
use crate::hash::transcript::Challenge;

/// Draws challenges uniformly from a [`ChallengeRange`] using `R`.
#[derive(Debug, Clone)]
pub struct RngChallenger<R> {
    rng: R,
    range: ChallengeRange,
}

impl<R: Rng> RngChallenger<R> {
    pub fn new(rng: R, range: ChallengeRange) -> Self {
        Self { rng, range }
    }
}

impl<R: Rng, F: PrimeField64> Challenge<F> for RngChallenger<R>
where
    StandardUniform: Distribution<F>,
{
    fn draw(&mut self) -> F {
        match self.range {
            ChallengeRange::Full => self.rng.random(),
            ChallengeRange::Bounded { lo, hi } => F::from_u64(self.rng.random_range(lo..=hi)),
        }
    }
}

/// Replays a fixed list of challenges, starting over once exhausted.
#[derive(Debug, Clone)]
pub struct FixedChallenges<F> {
    values: Vec<F>,
    next: usize,
}

impl<F: Copy> FixedChallenges<F> {
    pub fn new(values: Vec<F>) -> Self {
        assert!(!values.is_empty());
        Self { values, next: 0 }
    }
}

impl<F: Copy> Challenge<F> for FixedChallenges<F> {
    fn draw(&mut self) -> F {
        let value = self.values[self.next % self.values.len()];
        self.next += 1;
        value
    }
}

#[cfg(test)]
mod test {
    use super::{FixedChallenges, RngChallenger};
    use crate::hash::transcript::Challenge;
    use crate::sumcheck::ChallengeRange;
    use p3_field::PrimeCharacteristicRing;
    use p3_goldilocks::Goldilocks;

    type F = Goldilocks;

    #[test]
    fn test_bounded_challenges_stay_in_range() {
        let range = ChallengeRange::Bounded { lo: 2, hi: 100 };
        let mut challenger = RngChallenger::new(crate::test::seed_rng(), range);
        let drawn = Challenge::<F>::draw_n(&mut challenger, 500);
        assert!(drawn.iter().all(|r| range.contains(r)));
    }

    #[test]
    fn test_seeded_challenger_is_reproducible() {
        let draw = || {
            let mut challenger = RngChallenger::new(crate::test::seed_rng(), ChallengeRange::Full);
            Challenge::<F>::draw_n(&mut challenger, 8)
        };
        assert_eq!(draw(), draw());
    }

    #[test]
    fn test_fixed_challenges_cycle() {
        let values = vec![F::from_u64(3), F::from_u64(5)];
        let mut challenger = FixedChallenges::new(values);
        let drawn = Challenge::<F>::draw_n(&mut challenger, 5);
        assert_eq!(drawn, [3u64, 5, 3, 5, 3].map(F::from_u64).to_vec());
    }
}
