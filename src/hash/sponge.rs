use std::io::{Read, Write};

use digest::{Digest, FixedOutputReset};

use super::transcript::{Challenge, Reader, Writer};
use crate::field::FromUniformBytes;
use crate::Error;

/// Running digest over everything bound so far.
#[derive(Debug, Clone)]
struct Sponge<D> {
    h: D,
}

impl<D: Digest + FixedOutputReset> Sponge<D> {
    fn new(domain: &[u8]) -> Self {
        Self {
            h: D::new_with_prefix(domain),
        }
    }

    fn absorb<F: FromUniformBytes>(&mut self, el: &F) {
        Digest::update(&mut self.h, el.to_bytes());
    }

    // The output is fed back in so that back-to-back squeezes differ.
    fn squeeze<F: FromUniformBytes>(&mut self) -> F {
        let out = self.h.finalize_reset();
        Digest::update(&mut self.h, &out);
        F::from_bytes(&out[..F::BYTE_LEN.min(out.len())])
    }
}

/// Records prover messages into `W` while hashing them with `D`.
#[derive(Debug, Clone)]
pub struct HashWriter<W, D> {
    sponge: Sponge<D>,
    sink: W,
}

impl<W: Write + Default, D: Digest + FixedOutputReset> HashWriter<W, D> {
    pub fn init(domain: impl AsRef<[u8]>) -> Self {
        Self {
            sponge: Sponge::new(domain.as_ref()),
            sink: W::default(),
        }
    }
}

impl<W, D> HashWriter<W, D> {
    /// Hands back the recorded proof.
    pub fn finalize(self) -> W {
        self.sink
    }
}

impl<W, D, F> Writer<F> for HashWriter<W, D>
where
    W: Write,
    D: Digest + FixedOutputReset,
    F: FromUniformBytes,
{
    fn absorb(&mut self, el: F) {
        self.sponge.absorb(&el);
    }

    fn write(&mut self, el: F) -> Result<(), Error> {
        self.sink
            .write_all(&el.to_bytes())
            .map_err(|_| Error::Transcript)?;
        self.sponge.absorb(&el);
        Ok(())
    }
}

impl<W, D: Digest + FixedOutputReset, F: FromUniformBytes> Challenge<F> for HashWriter<W, D> {
    fn draw(&mut self) -> F {
        self.sponge.squeeze()
    }
}

/// Replays a proof recorded by [`HashWriter`]. Only canonical encodings are
/// accepted, so every proof has exactly one byte representation.
#[derive(Debug, Clone)]
pub struct HashReader<R, D> {
    sponge: Sponge<D>,
    source: R,
}

impl<R: Read, D: Digest + FixedOutputReset> HashReader<R, D> {
    pub fn init(source: R, domain: impl AsRef<[u8]>) -> Self {
        Self {
            sponge: Sponge::new(domain.as_ref()),
            source,
        }
    }
}

impl<R, D, F> Reader<F> for HashReader<R, D>
where
    R: Read,
    D: Digest + FixedOutputReset,
    F: FromUniformBytes,
{
    fn absorb(&mut self, el: F) {
        self.sponge.absorb(&el);
    }

    fn read(&mut self) -> Result<F, Error> {
        let mut bytes = vec![0u8; F::BYTE_LEN];
        self.source
            .read_exact(&mut bytes)
            .map_err(|_| Error::Transcript)?;
        let el = F::from_canonical_bytes(&bytes).ok_or(Error::Transcript)?;
        self.sponge.absorb(&el);
        Ok(el)
    }
}

impl<R, D: Digest + FixedOutputReset, F: FromUniformBytes> Challenge<F> for HashReader<R, D> {
    fn draw(&mut self) -> F {
        self.sponge.squeeze()
    }
}

#[cfg(test)]
mod test {
    use super::{HashReader, HashWriter};
    use crate::field::FromUniformBytes;
    use crate::hash::transcript::{Challenge, Reader, Writer};
    use crate::Error;
    use digest::{Digest, FixedOutputReset};
    use p3_field::{PrimeCharacteristicRing, PrimeField64};
    use p3_goldilocks::Goldilocks;
    use rand::Rng;

    type F = Goldilocks;

    fn replay<D: Digest + FixedOutputReset>() {
        let mut rng = crate::test::seed_rng();
        let [a, b, c, public]: [F; 4] = std::array::from_fn(|_| rng.random());

        let mut w = HashWriter::<Vec<u8>, D>::init("replay");
        w.absorb(public);
        w.write_many(&[a, b]).unwrap();
        let r0: F = w.draw();
        let r1: F = w.draw();
        w.write(c).unwrap();
        let r2: F = w.draw();
        let proof = w.finalize();
        assert_eq!(proof.len(), 3 * F::BYTE_LEN);
        assert_ne!(r0, r1);

        let mut r = HashReader::<&[u8], D>::init(&proof, "replay");
        r.absorb(public);
        assert_eq!(Reader::<F>::read_many(&mut r, 2), Ok(vec![a, b]));
        assert_eq!(Challenge::<F>::draw_n(&mut r, 2), vec![r0, r1]);
        assert_eq!(Reader::<F>::read(&mut r), Ok(c));
        assert_eq!(Challenge::<F>::draw(&mut r), r2);

        // a different public value moves every challenge
        let mut r = HashReader::<&[u8], D>::init(&proof, "replay");
        r.absorb(public + c);
        Reader::<F>::read_many(&mut r, 2).unwrap();
        assert_ne!(Challenge::<F>::draw(&mut r), r0);

        let mut r = HashReader::<&[u8], D>::init(&proof[..5], "replay");
        assert_eq!(Reader::<F>::read(&mut r), Err(Error::Transcript));
    }

    #[test]
    fn test_replay() {
        replay::<sha2::Sha256>();
        replay::<sha3::Keccak256>();
        replay::<blake2::Blake2b512>();
    }

    #[test]
    fn test_non_canonical_encoding_is_refused() {
        let mut proof = F::ORDER_U64.to_le_bytes().to_vec();
        proof.extend(F::from_u64(5).to_bytes());

        let mut r = HashReader::<&[u8], sha3::Keccak256>::init(&proof, "");
        assert_eq!(Reader::<F>::read(&mut r), Err(Error::Transcript));

        let mut r = HashReader::<&[u8], sha3::Keccak256>::init(&proof[8..], "");
        assert_eq!(Reader::<F>::read(&mut r), Ok(F::from_u64(5)));
    }
}
