//! Surrogate prediction engine.
//!
//! Constant-time inference of the four outcome metrics (plus apogee time)
//! from a parameter set, via the feature encoder and one regressor call per
//! metric. Inputs outside the artifact's trained domain are hard-rejected;
//! there is no extrapolation path.

use std::path::Path;

use crate::artifact::ModelArtifact;
use crate::error::EngineError;
use crate::features::FeatureEncoder;
use crate::model::Regressor;
use crate::params::MissileParameters;
use crate::physics::{OutputMetric, TrajectorySummary};

/// Inference engine owning a validated, read-only model artifact.
#[derive(Debug, Clone)]
pub struct PredictionEngine {
    artifact: ModelArtifact,
}

impl PredictionEngine {
    /// Takes ownership of an artifact, validating it first so every later
    /// call can assume a well-formed bundle.
    pub fn new(artifact: ModelArtifact) -> Result<Self, EngineError> {
        artifact.validate()?;
        Ok(Self { artifact })
    }

    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        Ok(Self {
            artifact: ModelArtifact::load(path)?,
        })
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Every encoded feature (raw fields and the derived ballistic
    /// coefficient alike) must lie inside the range the artifact was
    /// trained on.
    fn check_domain(&self, params: &MissileParameters) -> Result<(), EngineError> {
        let features = FeatureEncoder::encode(params);
        let contract = &self.artifact.feature_contract;
        for (i, name) in contract.names.iter().enumerate() {
            let value = features.get(i);
            let (min, max) = contract.ranges[i];
            if !value.is_finite() || value < min || value > max {
                return Err(EngineError::OutOfDomain {
                    field: name.clone(),
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Infer the outcome metrics for one parameter set.
    pub fn predict(&self, params: &MissileParameters) -> Result<TrajectorySummary, EngineError> {
        self.check_domain(params)?;
        let features = FeatureEncoder::encode(params);

        let infer = |metric: OutputMetric| -> f64 {
            // Presence of every metric's model is guaranteed by validation.
            self.artifact.models[&metric].predict(&features)
        };

        Ok(TrajectorySummary {
            max_height_km: infer(OutputMetric::MaxHeightKm),
            max_range_km: infer(OutputMetric::MaxRangeKm),
            time_of_flight_s: infer(OutputMetric::TimeOfFlightS),
            impact_velocity_m_s: infer(OutputMetric::ImpactVelocityMS),
            apogee_time_s: infer(OutputMetric::ApogeeTimeS),
        })
    }
}
