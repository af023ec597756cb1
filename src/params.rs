//! Input parameter set and boundary validation.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Documented valid range for one input field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRange {
    pub name: &'static str,
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    /// Half the span of the range. Used as the perturbation scale for
    /// fields whose base value is zero (e.g. wind speed).
    pub fn half_span(&self) -> f64 {
        0.5 * (self.max - self.min)
    }
}

/// Documented ranges, in the same order as [`MissileParameters::values`].
pub const PARAM_RANGES: [FieldRange; 6] = [
    FieldRange { name: "initial_velocity", min: 100.0, max: 2000.0 },
    FieldRange { name: "launch_angle", min: 5.0, max: 85.0 },
    FieldRange { name: "mass", min: 50.0, max: 5000.0 },
    FieldRange { name: "drag_coefficient", min: 0.1, max: 0.8 },
    FieldRange { name: "cross_sectional_area", min: 0.01, max: 2.0 },
    FieldRange { name: "wind_speed", min: -20.0, max: 20.0 },
];

/// Immutable launch parameter set.
///
/// All units are SI at the interface except `launch_angle`, which is in
/// degrees (converted to radians inside the physics engine).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissileParameters {
    /// Initial speed (m/s)
    pub initial_velocity: f64,
    /// Launch angle above horizontal (degrees)
    pub launch_angle: f64,
    /// Body mass (kg)
    pub mass: f64,
    /// Dimensionless drag coefficient
    pub drag_coefficient: f64,
    /// Reference cross-sectional area (m²)
    pub cross_sectional_area: f64,
    /// Horizontal wind speed, positive down-range (m/s)
    pub wind_speed: f64,
}

impl Default for MissileParameters {
    fn default() -> Self {
        Self {
            initial_velocity: 800.0,
            launch_angle: 45.0,
            mass: 500.0,
            drag_coefficient: 0.4,
            cross_sectional_area: 0.2,
            wind_speed: 0.0,
        }
    }
}

impl MissileParameters {
    /// Field values in the order of [`PARAM_RANGES`].
    pub fn values(&self) -> [f64; 6] {
        [
            self.initial_velocity,
            self.launch_angle,
            self.mass,
            self.drag_coefficient,
            self.cross_sectional_area,
            self.wind_speed,
        ]
    }

    /// Copy of this parameter set with the field at `index` (order of
    /// [`PARAM_RANGES`]) replaced by `value`.
    pub fn with_value(&self, index: usize, value: f64) -> Self {
        let mut out = *self;
        match index {
            0 => out.initial_velocity = value,
            1 => out.launch_angle = value,
            2 => out.mass = value,
            3 => out.drag_coefficient = value,
            4 => out.cross_sectional_area = value,
            5 => out.wind_speed = value,
            _ => {}
        }
        out
    }

    pub fn with_launch_angle(&self, angle_deg: f64) -> Self {
        let mut out = *self;
        out.launch_angle = angle_deg;
        out
    }

    /// Boundary check: every field must lie within its documented range.
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), EngineError> {
        for (range, value) in PARAM_RANGES.iter().zip(self.values()) {
            if !value.is_finite() || !range.contains(value) {
                return Err(EngineError::Validation {
                    field: range.name,
                    value,
                    min: range.min,
                    max: range.max,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_parameters_are_valid() {
        assert!(MissileParameters::default().validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_mass() {
        let params = MissileParameters {
            mass: 9000.0,
            ..Default::default()
        };
        match params.validate() {
            Err(EngineError::Validation { field, value, .. }) => {
                assert_eq!(field, "mass");
                assert_eq!(value, 9000.0);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_non_finite_values() {
        let params = MissileParameters {
            initial_velocity: f64::NAN,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn range_boundaries_are_inclusive() {
        let params = MissileParameters {
            initial_velocity: 100.0,
            launch_angle: 85.0,
            wind_speed: -20.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn with_value_round_trips_field_order() {
        let base = MissileParameters::default();
        for (i, range) in PARAM_RANGES.iter().enumerate() {
            let updated = base.with_value(i, range.min);
            assert_eq!(updated.values()[i], range.min, "field {}", range.name);
        }
    }
}
