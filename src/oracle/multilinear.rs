use p3_field::Field;
use rand::distr::{Distribution, StandardUniform};
use rand::RngCore;

use super::Oracle;
use crate::utils::{n_rand, TwoAdicSlice};
use crate::Error;

/// Multilinear extension of a table of hypercube values. Bit `i` of the table
/// index is the value of variable `x_{i+1}`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultilinearOracle<F> {
    evals: Vec<F>,
}

impl<F: Field> MultilinearOracle<F> {
    pub fn new(evals: Vec<F>) -> Result<Self, Error> {
        if !evals.len().is_power_of_two() {
            return Err(Error::TableSize(evals.len()));
        }
        Ok(Self { evals })
    }

    pub fn rand(rng: impl RngCore, k: usize) -> Self
    where
        StandardUniform: Distribution<F>,
    {
        Self {
            evals: n_rand(rng, 1 << k),
        }
    }

    pub fn evals(&self) -> &[F] {
        &self.evals
    }
}

impl<F: Field> Oracle<F> for MultilinearOracle<F> {
    fn arity(&self) -> usize {
        self.evals.k()
    }

    fn degree(&self) -> usize {
        1
    }

    fn eval(&self, point: &[F]) -> F {
        crate::mle::eval_poly(point, &self.evals)
    }
}
