use p3_field::PrimeField64;
use serde::{Deserialize, Serialize};

use super::{SumcheckConfig, SumcheckProver, UnivariatePoly};
use crate::hash::transcript::Challenge;
use crate::oracle::{check_arity, Oracle};
use crate::Error;

/// Why a run was rejected. Rounds are 0-based; round `i` binds `x_{i+1}`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// `p(0) + p(1)` disagreed with the running claim.
    RoundSum { round: usize },
    /// The round polynomial has a higher degree than the oracle allows.
    DegreeBound { round: usize, degree: usize },
    /// The last claim disagreed with the oracle at the challenge point.
    FinalEvaluation,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

impl Verdict {
    pub fn is_accept(&self) -> bool {
        matches!(self, Verdict::Accept)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VerifierState<F> {
    Init,
    Round { round: usize, expected: F },
    FinalCheck { expected: F },
    Done(Verdict),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundOutcome<F> {
    Challenge(F),
    Rejected(Rejection),
}

/// Everything the verifier sees or decides, in protocol order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolEvent<F> {
    ClaimReceived {
        claimed_sum: F,
    },
    RoundChecked {
        round: usize,
        poly: UnivariatePoly<F>,
        check: F,
        expected: F,
    },
    ChallengeIssued {
        round: usize,
        challenge: F,
        next_expected: F,
    },
    FinalCheck {
        expected: F,
        oracle_eval: F,
    },
    Finished(Verdict),
}

pub trait Observer<F> {
    fn observe(&mut self, event: &ProtocolEvent<F>);
}

impl<F, T: FnMut(&ProtocolEvent<F>)> Observer<F> for T {
    fn observe(&mut self, event: &ProtocolEvent<F>) {
        self(event)
    }
}

/// Outcome of one session plus the messages that led to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolRun<F> {
    pub verdict: Verdict,
    pub claimed_sum: F,
    pub round_polys: Vec<UnivariatePoly<F>>,
    pub challenges: Vec<F>,
}

impl<F> ProtocolRun<F> {
    pub fn is_accepted(&self) -> bool {
        self.verdict.is_accept()
    }
}

pub struct Verifier<'a, F, O: ?Sized> {
    oracle: &'a O,
    cfg: SumcheckConfig,
    state: VerifierState<F>,
    claimed_sum: Option<F>,
    challenges: Vec<F>,
    round_polys: Vec<UnivariatePoly<F>>,
    observer: Option<Box<dyn Observer<F> + 'a>>,
}

impl<'a, F: PrimeField64, O: Oracle<F> + ?Sized> Verifier<'a, F, O> {
    pub fn new(oracle: &'a O, cfg: &SumcheckConfig) -> Result<Self, Error> {
        check_arity(oracle.arity())?;
        cfg.validate::<F>(oracle.degree())?;
        Ok(Self {
            oracle,
            cfg: *cfg,
            state: VerifierState::Init,
            claimed_sum: None,
            challenges: Vec::with_capacity(oracle.arity()),
            round_polys: Vec::with_capacity(oracle.arity()),
            observer: None,
        })
    }

    pub fn with_observer(mut self, observer: impl Observer<F> + 'a) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> &VerifierState<F> {
        &self.state
    }

    pub fn challenges(&self) -> &[F] {
        &self.challenges
    }

    fn emit(&mut self, event: ProtocolEvent<F>) {
        if let Some(observer) = self.observer.as_mut() {
            observer.observe(&event);
        }
    }

    fn enter_round(&mut self, round: usize, expected: F) {
        self.state = if round == self.oracle.arity() {
            VerifierState::FinalCheck { expected }
        } else {
            VerifierState::Round { round, expected }
        };
    }

    fn conclude(&mut self, verdict: Verdict) -> Verdict {
        tracing::info!(?verdict, rounds = self.round_polys.len(), "sumcheck finished");
        self.state = VerifierState::Done(verdict);
        self.emit(ProtocolEvent::Finished(verdict));
        verdict
    }

    /// Takes the prover's claim `H` and opens round 0.
    pub fn start(&mut self, claimed_sum: F) -> Result<(), Error> {
        if !matches!(self.state, VerifierState::Init) {
            return Err(Error::State);
        }
        let (n, degree) = (self.oracle.arity(), self.oracle.degree());
        tracing::debug!(
            n,
            degree,
            claimed_sum = ?claimed_sum,
            soundness_error = self.cfg.soundness_error::<F>(n, degree),
            "claim received"
        );
        self.claimed_sum = Some(claimed_sum);
        self.emit(ProtocolEvent::ClaimReceived { claimed_sum });
        self.enter_round(0, claimed_sum);
        Ok(())
    }

    /// Checks the current round polynomial and, if it is consistent, draws the
    /// challenge binding this round's variable.
    pub fn receive_round_polynomial<C: Challenge<F>>(
        &mut self,
        poly: UnivariatePoly<F>,
        challenger: &mut C,
    ) -> Result<RoundOutcome<F>, Error> {
        let VerifierState::Round { round, expected } = self.state else {
            return Err(Error::State);
        };

        let check = poly.sum_over_boolean();
        tracing::debug!(round, poly = %poly, check = ?check, expected = ?expected, "round check");
        self.emit(ProtocolEvent::RoundChecked {
            round,
            poly: poly.clone(),
            check,
            expected,
        });

        let degree = poly.degree();
        let rejection = if degree > self.oracle.degree() {
            Some(Rejection::DegreeBound { round, degree })
        } else if check != expected {
            Some(Rejection::RoundSum { round })
        } else {
            None
        };
        if let Some(rejection) = rejection {
            self.round_polys.push(poly);
            self.conclude(Verdict::Reject(rejection));
            return Ok(RoundOutcome::Rejected(rejection));
        }

        // a failed draw leaves the round open and unrecorded
        let challenge: F = challenger.draw();
        if !self.cfg.challenge_range.contains(&challenge) {
            return Err(Error::ChallengeOutOfRange { round });
        }

        let next_expected = poly.evaluate(challenge);
        self.challenges.push(challenge);
        self.round_polys.push(poly);
        tracing::debug!(round, challenge = ?challenge, next_expected = ?next_expected, "challenge");
        self.emit(ProtocolEvent::ChallengeIssued {
            round,
            challenge,
            next_expected,
        });
        self.enter_round(round + 1, next_expected);
        Ok(RoundOutcome::Challenge(challenge))
    }

    /// Compares the last claim against one direct oracle evaluation at the
    /// challenge vector.
    pub fn finalize(&mut self) -> Result<Verdict, Error> {
        match self.state {
            VerifierState::Done(verdict) => Ok(verdict),
            VerifierState::FinalCheck { expected } => {
                let oracle_eval = self.oracle.evaluate(&self.challenges)?;
                tracing::debug!(expected = ?expected, oracle_eval = ?oracle_eval, "final check");
                self.emit(ProtocolEvent::FinalCheck {
                    expected,
                    oracle_eval,
                });
                let verdict = if expected == oracle_eval {
                    Verdict::Accept
                } else {
                    Verdict::Reject(Rejection::FinalEvaluation)
                };
                Ok(self.conclude(verdict))
            }
            _ => Err(Error::State),
        }
    }

    pub fn into_run(self) -> Result<ProtocolRun<F>, Error> {
        let VerifierState::Done(verdict) = self.state else {
            return Err(Error::State);
        };
        Ok(ProtocolRun {
            verdict,
            claimed_sum: self.claimed_sum.ok_or(Error::State)?,
            round_polys: self.round_polys,
            challenges: self.challenges,
        })
    }

    /// Drives `prover` through every round. A rejection ends the loop early
    /// and is reported in the returned run, not as an error.
    #[tracing::instrument(skip_all, fields(n = self.oracle.arity()))]
    pub fn run_protocol<P, C>(
        mut self,
        prover: &P,
        challenger: &mut C,
    ) -> Result<ProtocolRun<F>, Error>
    where
        P: SumcheckProver<F> + ?Sized,
        C: Challenge<F>,
    {
        self.start(prover.total_sum())?;
        while let VerifierState::Round { round, .. } = self.state {
            let poly = prover.round_polynomial(round, &self.challenges)?;
            self.receive_round_polynomial(poly, challenger)?;
        }
        self.finalize()?;
        self.into_run()
    }
}
