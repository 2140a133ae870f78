use std::marker::PhantomData;

use itertools::Itertools;
use p3_field::PrimeField64;

use super::{SumcheckConfig, SumcheckProver, UnivariatePoly};
use crate::oracle::{check_arity, sum_over_hypercube, Oracle};
use crate::Error;

/// Honest prover. Holds nothing but the oracle and the sampling width, so any
/// round can be recomputed from its challenge prefix alone.
pub struct Prover<'a, F, O: ?Sized> {
    oracle: &'a O,
    num_points: usize,
    _marker: PhantomData<F>,
}

impl<'a, F: PrimeField64, O: Oracle<F> + ?Sized> Prover<'a, F, O> {
    pub fn new(oracle: &'a O, cfg: &SumcheckConfig) -> Result<Self, Error> {
        check_arity(oracle.arity())?;
        let num_points = cfg.sampling.points(oracle.degree())?;
        Ok(Self {
            oracle,
            num_points,
            _marker: PhantomData,
        })
    }

    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Sums of `g(challenges, x, b)` over the free variables `b`, one per
    /// sample point `x = 0..num_points`.
    pub fn round_samples(&self, challenges: &[F]) -> Vec<F> {
        (0..self.num_points as u64)
            .map(|x| {
                let prefix = challenges
                    .iter()
                    .copied()
                    .chain(std::iter::once(F::from_u64(x)))
                    .collect_vec();
                sum_over_hypercube(self.oracle, &prefix)
            })
            .collect()
    }
}

impl<F: PrimeField64, O: Oracle<F> + ?Sized> SumcheckProver<F> for Prover<'_, F, O> {
    #[tracing::instrument(skip_all, fields(n = self.oracle.arity()))]
    fn total_sum(&self) -> F {
        sum_over_hypercube(self.oracle, &[])
    }

    #[tracing::instrument(skip_all, fields(round = round))]
    fn round_polynomial(
        &self,
        round: usize,
        challenges: &[F],
    ) -> Result<UnivariatePoly<F>, Error> {
        let num_vars = self.oracle.arity();
        if round >= num_vars || challenges.len() != round {
            return Err(Error::RoundIndex { round, num_vars });
        }

        let samples = self.round_samples(challenges);
        let poly = UnivariatePoly::from_evals(&samples);

        #[cfg(feature = "prover-sanity")]
        samples.iter().enumerate().for_each(|(x, &s)| {
            assert_eq!(poly.evaluate(F::from_u64(x as u64)), s);
        });

        tracing::trace!(samples = ?samples, "round samples");
        Ok(poly)
    }
}

#[cfg(test)]
mod test {
    use super::Prover;
    use crate::field::from_i64;
    use crate::oracle::{FnOracle, MultilinearOracle, Oracle, SparsePolynomial};
    use crate::sumcheck::{SamplingWidth, SumcheckConfig, SumcheckProver, UnivariatePoly};
    use crate::utils::n_rand;
    use crate::Error;
    use p3_field::PrimeCharacteristicRing;
    use p3_goldilocks::Goldilocks;

    type F = Goldilocks;

    #[test]
    fn test_round_polynomial_matches_partial_sums() {
        let mut rng = crate::test::seed_rng();
        let k = 6;
        let oracle = MultilinearOracle::<F>::rand(&mut rng, k);
        let prover = Prover::<F, _>::new(&oracle, &SumcheckConfig::default()).unwrap();
        assert_eq!(prover.num_points(), 2);

        let challenges: Vec<F> = n_rand(&mut rng, k);
        let mut claim = prover.total_sum();
        for round in 0..k {
            let poly = prover
                .round_polynomial(round, &challenges[..round])
                .unwrap();
            assert_eq!(poly.sum_over_boolean(), claim);
            claim = poly.evaluate(challenges[round]);
        }
        assert_eq!(claim, oracle.evaluate(&challenges).unwrap());
    }

    #[test]
    fn test_round_index_is_checked() {
        let oracle: SparsePolynomial<F> = "x1*x2 + x3".parse().unwrap();
        let prover = Prover::<F, _>::new(&oracle, &SumcheckConfig::default()).unwrap();
        let r = [F::from_u64(4), F::from_u64(9)];

        assert_eq!(
            prover.round_polynomial(1, &r[..0]).err(),
            Some(Error::RoundIndex {
                round: 1,
                num_vars: 3
            })
        );
        assert_eq!(
            prover.round_polynomial(3, &[r[0], r[1], r[0]]).err(),
            Some(Error::RoundIndex {
                round: 3,
                num_vars: 3
            })
        );
        assert!(prover.round_polynomial(2, &r).is_ok());
    }

    #[test]
    fn test_sampling_width() {
        let cubic: SparsePolynomial<F> = "x1^3*x2 + x2".parse().unwrap();
        let cfg = |sampling| SumcheckConfig {
            sampling,
            ..Default::default()
        };

        let prover = Prover::<F, _>::new(&cubic, &cfg(SamplingWidth::FromDegree)).unwrap();
        assert_eq!(prover.num_points(), 4);
        assert!(matches!(
            Prover::<F, _>::new(&cubic, &cfg(SamplingWidth::Fixed(3))),
            Err(Error::SampleWidth {
                required: 4,
                got: 3
            })
        ));

        // oversampling still recovers the exact polynomial: g1(X) = X^3 + 1
        let prover = Prover::<F, _>::new(&cubic, &cfg(SamplingWidth::Fixed(6))).unwrap();
        let poly = prover.round_polynomial(0, &[]).unwrap();
        let expected = [1i64, 0, 0, 1, 0, 0].map(from_i64::<F>).to_vec();
        assert_eq!(poly, UnivariatePoly::new(expected));
        assert_eq!(poly.degree(), 3);
    }

    #[test]
    fn test_single_variable() {
        // g(x) = 5x + 7 sampled at 0, 1, 2
        let oracle = FnOracle::new(1, 1, |x: &[F]| F::from_u64(5) * x[0] + F::from_u64(7));
        let cfg = SumcheckConfig {
            sampling: SamplingWidth::Fixed(3),
            ..Default::default()
        };
        let prover = Prover::<F, _>::new(&oracle, &cfg).unwrap();
        assert_eq!(
            prover.round_samples(&[]),
            [7u64, 12, 17].map(F::from_u64).to_vec()
        );
        let poly = prover.round_polynomial(0, &[]).unwrap();
        assert_eq!(poly.coeffs(), [7u64, 5, 0].map(F::from_u64).as_slice());
        assert_eq!(prover.total_sum(), F::from_u64(19));
    }

    #[test]
    fn test_oversized_oracles_are_refused() {
        let wide = FnOracle::new(64, 1, |x: &[F]| x[0]);
        assert!(matches!(
            Prover::<F, _>::new(&wide, &SumcheckConfig::default()),
            Err(Error::ArityLimit { got: 64, .. })
        ));

        let steep = FnOracle::new(1, usize::MAX, |x: &[F]| x[0]);
        assert!(matches!(
            Prover::<F, _>::new(&steep, &SumcheckConfig::default()),
            Err(Error::DegreeLimit { got: usize::MAX, .. })
        ));
        assert!(matches!(
            SamplingWidth::Fixed(3).points(usize::MAX),
            Err(Error::DegreeLimit { .. })
        ));
    }
}
