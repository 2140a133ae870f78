use crate::Error;

/// Source of verifier randomness. Implemented by RNG-backed challengers,
/// scripted challenge lists and hash transcripts alike.
pub trait Challenge<F> {
    fn draw(&mut self) -> F;
    fn draw_n(&mut self, n: usize) -> Vec<F> {
        (0..n).map(|_| self.draw()).collect()
    }
}

/// Prover side of a transcript.
pub trait Writer<T> {
    /// Binds a value both sides already know. Nothing is recorded.
    fn absorb(&mut self, el: T);
    /// Records a prover message and binds it.
    fn write(&mut self, el: T) -> Result<(), Error>;
    fn write_many(&mut self, el: &[T]) -> Result<(), Error>
    where
        T: Copy,
    {
        el.iter().try_for_each(|&e| self.write(e))
    }
}

/// Verifier side of a transcript, mirroring [`Writer`] call for call.
pub trait Reader<T> {
    fn absorb(&mut self, el: T);
    fn read(&mut self) -> Result<T, Error>;
    fn read_many(&mut self, n: usize) -> Result<Vec<T>, Error> {
        (0..n).map(|_| self.read()).collect()
    }
}
