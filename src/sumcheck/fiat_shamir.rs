//! Non-interactive sumcheck: challenges are squeezed from a hash transcript
//! that has absorbed every prover message so far.

use p3_field::PrimeField64;

use super::{
    ChallengeRange, ProtocolRun, Prover, RoundOutcome, SumcheckConfig, SumcheckProver,
    UnivariatePoly, Verifier, VerifierState,
};
use crate::field::FromUniformBytes;
use crate::hash::transcript::{Challenge, Reader, Writer};
use crate::oracle::Oracle;
use crate::Error;

/// Public parameters both sides bind before the first prover message.
fn statement<F: PrimeField64>(num_vars: usize, degree: usize, num_coeffs: usize) -> [F; 3] {
    [num_vars, degree, num_coeffs].map(|v| F::from_u64(v as u64))
}

fn check_range(cfg: &SumcheckConfig) -> Result<(), Error> {
    // transcript challenges cover the whole field
    (cfg.challenge_range == ChallengeRange::Full)
        .then_some(())
        .ok_or(Error::ChallengeRange)
}

/// Binds `n`, the degree and `k`, then writes `H` followed by the `k`
/// coefficients of every round polynomial. Returns the claim and the
/// challenges drawn along the way.
#[tracing::instrument(skip_all, fields(n = oracle.arity()))]
pub fn prove<F, O, Transcript>(
    transcript: &mut Transcript,
    oracle: &O,
    cfg: &SumcheckConfig,
) -> Result<(F, Vec<F>), Error>
where
    F: PrimeField64 + FromUniformBytes,
    O: Oracle<F> + ?Sized,
    Transcript: Writer<F> + Challenge<F>,
{
    check_range(cfg)?;
    let prover = Prover::<F, O>::new(oracle, cfg)?;
    statement(oracle.arity(), oracle.degree(), prover.num_points())
        .into_iter()
        .for_each(|el| transcript.absorb(el));
    let sum = prover.total_sum();
    transcript.write(sum)?;

    let mut rs = Vec::with_capacity(oracle.arity());
    for round in 0..oracle.arity() {
        let poly = prover.round_polynomial(round, &rs)?;
        transcript.write_many(poly.coeffs())?;
        rs.push(transcript.draw());
    }
    Ok((sum, rs))
}

/// Replays a proof written by [`prove`]. A false claim yields a rejected run;
/// a truncated or non-canonically encoded proof yields `Error::Transcript`.
#[tracing::instrument(skip_all, fields(n = oracle.arity()))]
pub fn verify<F, O, Transcript>(
    transcript: &mut Transcript,
    oracle: &O,
    cfg: &SumcheckConfig,
) -> Result<ProtocolRun<F>, Error>
where
    F: PrimeField64 + FromUniformBytes,
    O: Oracle<F> + ?Sized,
    Transcript: Reader<F> + Challenge<F>,
{
    check_range(cfg)?;
    let num_coeffs = cfg.validate::<F>(oracle.degree())?;
    let mut verifier = Verifier::new(oracle, cfg)?;
    statement(oracle.arity(), oracle.degree(), num_coeffs)
        .into_iter()
        .for_each(|el| transcript.absorb(el));
    verifier.start(transcript.read()?)?;

    while matches!(verifier.state(), VerifierState::Round { .. }) {
        let poly = UnivariatePoly::new(transcript.read_many(num_coeffs)?);
        if let RoundOutcome::Rejected(_) = verifier.receive_round_polynomial(poly, transcript)? {
            break;
        }
    }
    verifier.finalize()?;
    verifier.into_run()
}
