use p3_field::{Field, PrimeCharacteristicRing, PrimeField64};

pub use p3_goldilocks::Goldilocks;

pub trait FromUniformBytes: Field {
    const BYTE_LEN: usize;
    fn from_bytes(bytes: &[u8]) -> Self;
    /// Inverse of `to_bytes`; `None` for anything `to_bytes` cannot produce.
    fn from_canonical_bytes(bytes: &[u8]) -> Option<Self>;
    fn to_bytes(&self) -> Vec<u8>;
}

// Reducing a 64-bit word into the field introduces a modulus bias of about
// 2^-32 for Goldilocks. Acceptable for challenges; not for key material.
macro_rules! impl_from_uniform_bytes {
    ($field:ty) => {
        impl FromUniformBytes for $field {
            const BYTE_LEN: usize = 8;

            fn from_bytes(bytes: &[u8]) -> Self {
                let mut word = [0u8; 8];
                word.iter_mut()
                    .zip(bytes.iter())
                    .for_each(|(w, &b)| *w = b);
                <$field>::from_u64(u64::from_le_bytes(word))
            }

            fn from_canonical_bytes(bytes: &[u8]) -> Option<Self> {
                let word: [u8; 8] = bytes.try_into().ok()?;
                let value = u64::from_le_bytes(word);
                (value < <$field>::ORDER_U64).then(|| <$field>::from_u64(value))
            }

            fn to_bytes(&self) -> Vec<u8> {
                self.as_canonical_u64().to_le_bytes().to_vec()
            }
        }
    };
}

impl_from_uniform_bytes!(Goldilocks);

/// Embeds a signed integer into the field.
pub fn from_i64<F: PrimeCharacteristicRing>(value: i64) -> F {
    let magnitude = F::from_u64(value.unsigned_abs());
    if value < 0 {
        -magnitude
    } else {
        magnitude
    }
}

/// Centered integer representative, i.e. values above `p / 2` map to negatives.
pub fn to_i128<F: PrimeField64>(value: F) -> i128 {
    let v = value.as_canonical_u64();
    if v > F::ORDER_U64 / 2 {
        v as i128 - F::ORDER_U64 as i128
    } else {
        v as i128
    }
}

#[cfg(test)]
mod test {
    use super::{from_i64, to_i128, FromUniformBytes, Goldilocks};
    use p3_field::{PrimeCharacteristicRing, PrimeField64};
    use rand::Rng;

    #[test]
    fn test_signed_embedding() {
        type F = Goldilocks;
        for v in [-100i64, -1, 0, 1, 36, i32::MAX as i64] {
            let e: F = from_i64(v);
            assert_eq!(to_i128(e), v as i128);
        }
        assert_eq!(from_i64::<F>(-3) + F::from_u64(3), F::ZERO);
    }

    #[test]
    fn test_bytes() {
        type F = Goldilocks;
        let mut rng = crate::test::seed_rng();
        for _ in 0..16 {
            let e: F = rng.random();
            let bytes = e.to_bytes();
            assert_eq!(bytes.len(), F::BYTE_LEN);
            assert_eq!(F::from_bytes(&bytes), e);
            assert_eq!(F::from_canonical_bytes(&bytes), Some(e));
        }

        let order = F::ORDER_U64.to_le_bytes();
        assert_eq!(F::from_bytes(&order), F::ZERO);
        assert_eq!(F::from_canonical_bytes(&order), None);
        assert_eq!(F::from_canonical_bytes(&[1, 2, 3]), None);
    }
}
