pub mod challenger;
pub mod fiat_shamir;
pub mod prover;
pub mod session;
pub mod univariate;
pub mod verifier;

pub use challenger::*;
pub use prover::*;
pub use session::*;
pub use univariate::*;
pub use verifier::*;

use std::str::FromStr;

use p3_field::PrimeField64;
use serde::{Deserialize, Serialize};

use crate::Error;

/// Set the verifier draws challenges from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeRange {
    /// Uniform over the whole field.
    #[default]
    Full,
    /// Uniform over the integers `lo..=hi` embedded in the field.
    Bounded { lo: u64, hi: u64 },
}

impl ChallengeRange {
    pub fn size<F: PrimeField64>(&self) -> u64 {
        match *self {
            ChallengeRange::Full => F::ORDER_U64,
            ChallengeRange::Bounded { lo, hi } => hi.saturating_sub(lo).saturating_add(1),
        }
    }

    pub fn contains<F: PrimeField64>(&self, value: &F) -> bool {
        match *self {
            ChallengeRange::Full => true,
            ChallengeRange::Bounded { lo, hi } => (lo..=hi).contains(&value.as_canonical_u64()),
        }
    }

    /// A range must be non-empty, fit in the field and hold more points than
    /// a round polynomial has roots, otherwise a false claim can survive
    /// every challenge.
    pub fn validate<F: PrimeField64>(&self, degree: usize) -> Result<(), Error> {
        if let ChallengeRange::Bounded { lo, hi } = *self {
            if lo > hi || hi >= F::ORDER_U64 {
                return Err(Error::ChallengeRange);
            }
        }
        (self.size::<F>() > degree as u64)
            .then_some(())
            .ok_or(Error::ChallengeRange)
    }
}

impl FromStr for ChallengeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim() == "full" {
            return Ok(ChallengeRange::Full);
        }
        let parse = |v: &str| {
            v.trim()
                .parse::<u64>()
                .map_err(|_| Error::Parse(format!("invalid challenge bound {v:?}")))
        };
        let (lo, hi) = s
            .split_once("..=")
            .ok_or_else(|| Error::Parse(format!("expected 'full' or 'LO..=HI', got {s:?}")))?;
        Ok(ChallengeRange::Bounded {
            lo: parse(lo)?,
            hi: parse(hi)?,
        })
    }
}

/// Number of points each round polynomial is sampled at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplingWidth {
    /// `oracle.degree() + 1`, the fewest points that determine the round
    /// polynomial.
    #[default]
    FromDegree,
    Fixed(usize),
}

impl SamplingWidth {
    pub fn points(&self, degree: usize) -> Result<usize, Error> {
        let required = degree.checked_add(1).ok_or(Error::DegreeLimit {
            max: usize::MAX - 1,
            got: degree,
        })?;
        match *self {
            SamplingWidth::FromDegree => Ok(required),
            SamplingWidth::Fixed(got) if got < required => {
                Err(Error::SampleWidth { required, got })
            }
            SamplingWidth::Fixed(got) => Ok(got),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SumcheckConfig {
    pub challenge_range: ChallengeRange,
    pub sampling: SamplingWidth,
}

impl SumcheckConfig {
    /// Integer challenges in `2..=100` and three samples per round.
    pub fn reference() -> Self {
        Self {
            challenge_range: ChallengeRange::Bounded { lo: 2, hi: 100 },
            sampling: SamplingWidth::Fixed(3),
        }
    }

    /// Checks the configuration against an oracle of the given per-variable
    /// degree and returns the sampling width.
    pub fn validate<F: PrimeField64>(&self, degree: usize) -> Result<usize, Error> {
        self.challenge_range.validate::<F>(degree)?;
        self.sampling.points(degree)
    }

    /// Schwartz-Zippel bound on accepting a false claim: each of the
    /// `num_vars` rounds lets a cheating prover win with probability at most
    /// `degree / |range|`.
    pub fn soundness_error<F: PrimeField64>(&self, num_vars: usize, degree: usize) -> f64 {
        (num_vars * degree) as f64 / self.challenge_range.size::<F>() as f64
    }
}

/// Prover role as seen by the verifier.
pub trait SumcheckProver<F> {
    /// Claimed value of the sum over the hypercube.
    fn total_sum(&self) -> F;

    /// Round polynomial for `round`, with the first `round` variables bound
    /// to `challenges`.
    fn round_polynomial(&self, round: usize, challenges: &[F])
        -> Result<UnivariatePoly<F>, Error>;
}
