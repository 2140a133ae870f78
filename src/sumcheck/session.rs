use std::marker::PhantomData;

use p3_field::PrimeField64;

use super::{Observer, ProtocolRun, Prover, SumcheckConfig, Verifier};
use crate::hash::transcript::Challenge;
use crate::oracle::Oracle;
use crate::Error;

/// One target polynomial and one configuration, validated up front. Each run
/// pairs a fresh honest prover with a fresh verifier; nothing carries over
/// between runs.
pub struct Session<F, O> {
    oracle: O,
    cfg: SumcheckConfig,
    _marker: PhantomData<F>,
}

impl<F: PrimeField64, O: Oracle<F>> Session<F, O> {
    pub fn new(oracle: O, cfg: SumcheckConfig) -> Result<Self, Error> {
        cfg.validate::<F>(oracle.degree())?;
        Ok(Self {
            oracle,
            cfg,
            _marker: PhantomData,
        })
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn cfg(&self) -> &SumcheckConfig {
        &self.cfg
    }

    pub fn prover(&self) -> Result<Prover<'_, F, O>, Error> {
        Prover::new(&self.oracle, &self.cfg)
    }

    pub fn verifier(&self) -> Result<Verifier<'_, F, O>, Error> {
        Verifier::new(&self.oracle, &self.cfg)
    }

    pub fn run<C: Challenge<F>>(&self, challenger: &mut C) -> Result<ProtocolRun<F>, Error> {
        let prover = self.prover()?;
        self.verifier()?.run_protocol(&prover, challenger)
    }

    pub fn run_observed<'s, C, Obs>(
        &'s self,
        challenger: &mut C,
        observer: Obs,
    ) -> Result<ProtocolRun<F>, Error>
    where
        C: Challenge<F>,
        Obs: Observer<F> + 's,
    {
        let prover = self.prover()?;
        self.verifier()?
            .with_observer(observer)
            .run_protocol(&prover, challenger)
    }
}
