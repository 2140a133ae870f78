use p3_field::Field;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::Error;

pub mod closure;
pub mod multilinear;
pub mod sparse;

pub use closure::FnOracle;
pub use multilinear::MultilinearOracle;
pub use sparse::SparsePolynomial;

/// Largest supported number of variables, so that `2^n` fits in a `usize`.
pub const MAX_ARITY: usize = usize::BITS as usize - 1;

/// Largest supported exponent of a single variable.
pub const MAX_DEGREE: usize = u32::MAX as usize;

pub fn check_arity(arity: usize) -> Result<(), Error> {
    if arity > MAX_ARITY {
        return Err(Error::ArityLimit {
            max: MAX_ARITY,
            got: arity,
        });
    }
    Ok(())
}

/// Read-only evaluator for the target polynomial `g: F^n -> F`, shared by the
/// prover and the verifier.
pub trait Oracle<F: Field>: Sync {
    /// Number of variables `n`.
    fn arity(&self) -> usize;

    /// Maximum degree of `g` in any single variable.
    fn degree(&self) -> usize;

    /// Evaluates `g` at `point`. Callers guarantee `point.len() == self.arity()`.
    fn eval(&self, point: &[F]) -> F;

    fn evaluate(&self, point: &[F]) -> Result<F, Error> {
        if point.len() != self.arity() {
            return Err(Error::Arity {
                expected: self.arity(),
                got: point.len(),
            });
        }
        Ok(self.eval(point))
    }
}

impl<F: Field, O: Oracle<F> + ?Sized> Oracle<F> for &O {
    fn arity(&self) -> usize {
        (**self).arity()
    }

    fn degree(&self) -> usize {
        (**self).degree()
    }

    fn eval(&self, point: &[F]) -> F {
        (**self).eval(point)
    }
}

/// Fixes the leading variables to `prefix` and sums `g` over every boolean
/// assignment of the remaining `n - prefix.len()` variables.
pub fn sum_over_hypercube<F: Field, O: Oracle<F> + ?Sized>(oracle: &O, prefix: &[F]) -> F {
    let n = oracle.arity();
    assert!(n <= MAX_ARITY);
    assert!(prefix.len() <= n);
    let free = n - prefix.len();
    (0..1usize << free)
        .into_par_iter()
        .map(|b| {
            let point = prefix
                .iter()
                .copied()
                .chain((0..free).map(|j| if (b >> j) & 1 == 1 { F::ONE } else { F::ZERO }))
                .collect::<Vec<_>>();
            oracle.eval(&point)
        })
        .sum()
}
