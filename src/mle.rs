use crate::utils::TwoAdicSlice;
use p3_field::Field;
use rayon::iter::{
    IndexedParallelIterator, IntoParallelRefIterator, IntoParallelRefMutIterator, ParallelIterator,
};

/// Evaluates the multilinear extension of `poly` at `zs`.
pub fn eval_poly<F: Field>(zs: &[F], poly: &[F]) -> F {
    assert_eq!(poly.k(), zs.len());
    let k = poly.k();
    let mut ml = poly.to_vec();

    for (i, &zi) in zs.iter().rev().enumerate() {
        let mid = 1 << (k - i - 1);
        let (lo, hi) = ml.split_at_mut(mid);
        lo.par_iter_mut()
            .zip(hi.par_iter())
            .for_each(|(a0, a1)| *a0 += zi * (*a1 - *a0));
        ml.truncate(mid);
    }
    ml[0]
}
