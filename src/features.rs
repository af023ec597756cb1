//! Feature encoding for the surrogate model.
//!
//! The encoder output must match, byte for byte in name and position, the
//! feature contract the model artifact was trained against. Any skew between
//! training and inference is rejected rather than absorbed.

use crate::error::EngineError;
use crate::params::MissileParameters;

/// Number of features the encoder produces.
pub const FEATURE_COUNT: usize = 7;

/// Canonical feature order: the six raw fields plus the derived ballistic
/// coefficient mass / (Cd · A).
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "initial_velocity",
    "launch_angle",
    "mass",
    "drag_coefficient",
    "cross_sectional_area",
    "wind_speed",
    "ballistic_coefficient",
];

/// Fixed-order numeric feature tuple.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn get(&self, index: usize) -> f64 {
        self.values[index]
    }
}

/// Maps a parameter set into the feature vector the model ensemble expects.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    /// Derived ballistic coefficient: mass-to-drag ratio controlling
    /// deceleration due to drag.
    pub fn ballistic_coefficient(params: &MissileParameters) -> f64 {
        params.mass / (params.drag_coefficient * params.cross_sectional_area)
    }

    pub fn encode(params: &MissileParameters) -> FeatureVector {
        FeatureVector {
            values: [
                params.initial_velocity,
                params.launch_angle,
                params.mass,
                params.drag_coefficient,
                params.cross_sectional_area,
                params.wind_speed,
                Self::ballistic_coefficient(params),
            ],
        }
    }

    /// Defensive check against training/inference skew: the artifact's
    /// declared feature names must match the encoder's set exactly, in
    /// length, order, and spelling.
    pub fn check_contract(declared: &[String]) -> Result<(), EngineError> {
        if declared.len() != FEATURE_COUNT {
            return Err(EngineError::FeatureMismatch(format!(
                "artifact declares {} features, encoder produces {}",
                declared.len(),
                FEATURE_COUNT
            )));
        }
        for (i, (declared, known)) in declared.iter().zip(FEATURE_NAMES).enumerate() {
            if declared != known {
                return Err(EngineError::FeatureMismatch(format!(
                    "feature {i} is `{declared}`, encoder produces `{known}`"
                )));
            }
        }
        Ok(())
    }
}
