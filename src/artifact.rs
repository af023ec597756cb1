//! Versioned model artifact bundle.
//!
//! Produced by the external training pipeline as JSON; loaded once at
//! startup, validated against the encoder's feature contract, and read-only
//! for the rest of the process lifetime.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::features::FeatureEncoder;
use crate::model::RegressorModel;
use crate::physics::OutputMetric;

/// Artifact schema this build understands. Bumped on any incompatible
/// change to the bundle layout.
pub const ARTIFACT_SCHEMA_VERSION: &str = "1.0";

/// Ordered feature names and the value range each feature was trained on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureContract {
    pub names: Vec<String>,
    /// (min, max) per feature, aligned with `names`.
    pub ranges: Vec<(f64, f64)>,
}

/// One fitted regressor per output metric plus the feature contract they
/// were all trained against.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub schema_version: String,
    /// Version string of the training run that produced the bundle.
    pub model_version: String,
    pub feature_contract: FeatureContract,
    pub models: BTreeMap<OutputMetric, RegressorModel>,
}

impl ModelArtifact {
    /// Fail-fast validation: schema version, feature contract, trained
    /// ranges, metric coverage, and per-model structure.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.schema_version != ARTIFACT_SCHEMA_VERSION {
            return Err(EngineError::ArtifactIncompatible(format!(
                "schema version `{}`, this build understands `{ARTIFACT_SCHEMA_VERSION}`",
                self.schema_version
            )));
        }

        FeatureEncoder::check_contract(&self.feature_contract.names)?;

        if self.feature_contract.ranges.len() != self.feature_contract.names.len() {
            return Err(EngineError::ArtifactIncompatible(format!(
                "{} feature ranges for {} features",
                self.feature_contract.ranges.len(),
                self.feature_contract.names.len()
            )));
        }
        for (name, (min, max)) in self
            .feature_contract
            .names
            .iter()
            .zip(&self.feature_contract.ranges)
        {
            if !min.is_finite() || !max.is_finite() || min >= max {
                return Err(EngineError::ArtifactIncompatible(format!(
                    "feature `{name}` has invalid trained range {min}..{max}"
                )));
            }
        }

        for metric in OutputMetric::ALL {
            match self.models.get(&metric) {
                Some(model) => model.validate(metric.name())?,
                None => {
                    return Err(EngineError::ArtifactIncompatible(format!(
                        "no model for output metric `{metric}`"
                    )))
                }
            }
        }
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = fs::read_to_string(path)?;
        let artifact: ModelArtifact = serde_json::from_str(&text)?;
        artifact.validate()?;
        Ok(artifact)
    }

    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
