use p3_field::Field;

use super::Oracle;

/// Oracle backed by an arbitrary closure. The per-variable degree is declared
/// by the caller and is trusted: a closure of higher degree makes honest
/// round polynomials wrong.
#[derive(Clone)]
pub struct FnOracle<Func> {
    arity: usize,
    degree: usize,
    f: Func,
}

impl<Func> FnOracle<Func> {
    pub fn new(arity: usize, degree: usize, f: Func) -> Self {
        Self { arity, degree, f }
    }
}

impl<Func> std::fmt::Debug for FnOracle<Func> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnOracle")
            .field("arity", &self.arity)
            .field("degree", &self.degree)
            .finish_non_exhaustive()
    }
}

impl<F: Field, Func> Oracle<F> for FnOracle<Func>
where
    Func: Fn(&[F]) -> F + Sync,
{
    fn arity(&self) -> usize {
        self.arity
    }

    fn degree(&self) -> usize {
        self.degree
    }

    fn eval(&self, point: &[F]) -> F {
        (self.f)(point)
    }
}
