use itertools::Itertools;
use rand::{
    distr::{Distribution, StandardUniform},
    RngCore,
};

pub mod arithmetic;
pub use arithmetic::*;

pub fn n_rand<F>(mut rng: impl RngCore, n: usize) -> Vec<F>
where
    StandardUniform: Distribution<F>,
{
    use rand::Rng;
    std::iter::repeat_with(|| rng.random()).take(n).collect_vec()
}

#[inline(always)]
pub fn log2_strict(n: usize) -> usize {
    let res = n.trailing_zeros();
    debug_assert_eq!(n.wrapping_shr(res), 1);
    res as usize
}

pub(crate) trait TwoAdicSlice<T>: core::ops::Deref<Target = [T]> {
    #[inline(always)]
    fn k(&self) -> usize {
        log2_strict(self.len())
    }
}

impl<V> TwoAdicSlice<V> for Vec<V> {}
impl<V> TwoAdicSlice<V> for &[V] {}
impl<V> TwoAdicSlice<V> for &mut [V] {}
