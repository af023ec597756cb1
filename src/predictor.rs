//! Common request/response seam over the exact and surrogate paths.

use crate::error::EngineError;
use crate::params::MissileParameters;
use crate::physics::{PhysicsEngine, TrajectorySummary};
use crate::prediction::PredictionEngine;

/// Anything that can turn a parameter set into outcome metrics.
///
/// The optimizer, sensitivity analyzer, and scenario comparator are written
/// against this seam, so they run unchanged on the surrogate (their primary
/// backend) or on the exact integrator.
pub trait OutcomePredictor {
    fn predict_summary(&self, params: &MissileParameters)
        -> Result<TrajectorySummary, EngineError>;
}

impl OutcomePredictor for PredictionEngine {
    fn predict_summary(
        &self,
        params: &MissileParameters,
    ) -> Result<TrajectorySummary, EngineError> {
        self.predict(params)
    }
}

/// The exact path applies the boundary validation the surrogate gets from
/// its trained-domain check, so both backends reject bad input.
impl OutcomePredictor for PhysicsEngine {
    fn predict_summary(
        &self,
        params: &MissileParameters,
    ) -> Result<TrajectorySummary, EngineError> {
        params.validate()?;
        self.summarize(params)
    }
}
