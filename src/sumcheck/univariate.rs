use p3_field::{Field, PrimeField64};
use serde::{Deserialize, Serialize};

use crate::utils::{interpolate_from_zero, VecOps};

/// Univariate polynomial, coefficients lowest degree first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnivariatePoly<F> {
    coeffs: Vec<F>,
}

impl<F: Field> UnivariatePoly<F> {
    pub fn new(coeffs: Vec<F>) -> Self {
        Self { coeffs }
    }

    /// Exact interpolation through `(i, evals[i])` for `i = 0..evals.len()`.
    pub fn from_evals(evals: &[F]) -> Self {
        assert!(!evals.is_empty());
        Self::new(interpolate_from_zero(evals))
    }

    pub fn coeffs(&self) -> &[F] {
        &self.coeffs
    }

    /// Degree ignoring trailing zero coefficients. The zero polynomial has
    /// degree 0.
    pub fn degree(&self) -> usize {
        self.coeffs
            .iter()
            .rposition(|c| !c.is_zero())
            .unwrap_or(0)
    }

    pub fn evaluate(&self, x: F) -> F {
        self.coeffs.horner(x)
    }

    /// `p(0) + p(1)`
    pub fn sum_over_boolean(&self) -> F {
        let constant = self.coeffs.first().copied().unwrap_or(F::ZERO);
        constant + self.coeffs.iter().copied().sum::<F>()
    }
}

impl<F: PrimeField64> std::fmt::Display for UnivariatePoly<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let terms = self
            .coeffs
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(|(i, &c)| {
                let c = crate::field::to_i128(c);
                match i {
                    0 => format!("{c}"),
                    1 => format!("{c}·X"),
                    _ => format!("{c}·X^{i}"),
                }
            })
            .collect::<Vec<_>>();
        if terms.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", terms.join(" + "))
        }
    }
}
