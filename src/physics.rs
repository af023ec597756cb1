//! Physics trajectory engine.
//!
//! Fixed-step RK4 integration of the 2D equations of motion under gravity,
//! quadratic aerodynamic drag relative to a horizontal wind, and event
//! detection for apogee and ground impact. Deterministic and side-effect
//! free, which makes it usable both interactively and as the oracle that
//! labels training data for the surrogate predictor.

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::constants::{
    G_ACCEL_MPS2, INTEGRATION_TIME_STEP_S, MAX_FLIGHT_TIME_S, MAX_TIME_STEP_S,
    MIN_TIME_STEP_S, MIN_VELOCITY_THRESHOLD, STANDARD_AIR_DENSITY,
};
use crate::error::EngineError;
use crate::params::MissileParameters;

/// One integration sample along a trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    pub time: f64,
    pub position: Vector2<f64>,
    pub velocity: Vector2<f64>,
}

/// Ordered trajectory samples: launch at t = 0 first, interpolated ground
/// impact (y = 0) last, non-decreasing time throughout.
#[derive(Debug, Clone)]
pub struct TrajectoryState {
    pub samples: Vec<TrajectorySample>,
}

impl TrajectoryState {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn impact(&self) -> Option<&TrajectorySample> {
        self.samples.last()
    }
}

/// Outcome metrics derived from a trajectory, or inferred directly by the
/// prediction engine. Heights and ranges in km, times in s, speeds in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectorySummary {
    pub max_height_km: f64,
    pub max_range_km: f64,
    pub time_of_flight_s: f64,
    pub impact_velocity_m_s: f64,
    pub apogee_time_s: f64,
}

/// The five outcome metrics, addressable by name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum OutputMetric {
    MaxHeightKm,
    MaxRangeKm,
    TimeOfFlightS,
    ImpactVelocityMS,
    ApogeeTimeS,
}

impl OutputMetric {
    pub const ALL: [OutputMetric; 5] = [
        OutputMetric::MaxHeightKm,
        OutputMetric::MaxRangeKm,
        OutputMetric::TimeOfFlightS,
        OutputMetric::ImpactVelocityMS,
        OutputMetric::ApogeeTimeS,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OutputMetric::MaxHeightKm => "max_height_km",
            OutputMetric::MaxRangeKm => "max_range_km",
            OutputMetric::TimeOfFlightS => "time_of_flight_s",
            OutputMetric::ImpactVelocityMS => "impact_velocity_m_s",
            OutputMetric::ApogeeTimeS => "apogee_time_s",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "max_height_km" | "height" => Some(OutputMetric::MaxHeightKm),
            "max_range_km" | "range" => Some(OutputMetric::MaxRangeKm),
            "time_of_flight_s" | "time" => Some(OutputMetric::TimeOfFlightS),
            "impact_velocity_m_s" | "impact-velocity" => Some(OutputMetric::ImpactVelocityMS),
            "apogee_time_s" | "apogee" => Some(OutputMetric::ApogeeTimeS),
            _ => None,
        }
    }
}

impl std::fmt::Display for OutputMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TrajectorySummary {
    pub fn metric(&self, metric: OutputMetric) -> f64 {
        match metric {
            OutputMetric::MaxHeightKm => self.max_height_km,
            OutputMetric::MaxRangeKm => self.max_range_km,
            OutputMetric::TimeOfFlightS => self.time_of_flight_s,
            OutputMetric::ImpactVelocityMS => self.impact_velocity_m_s,
            OutputMetric::ApogeeTimeS => self.apogee_time_s,
        }
    }
}

/// Numerical integrator for a single parameter set.
///
/// Pure function of its input plus fixed physical constants; the step size
/// and flight-time cap are tunable for tests but never derived from inputs.
#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    time_step: f64,
    max_flight_time: f64,
}

impl Default for PhysicsEngine {
    fn default() -> Self {
        Self {
            time_step: INTEGRATION_TIME_STEP_S,
            max_flight_time: MAX_FLIGHT_TIME_S,
        }
    }
}

impl PhysicsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The divergence guard is a flight-time cap, so the step must be
    /// positive for the integration loop to terminate.
    pub fn set_time_step(&mut self, step: f64) -> Result<(), EngineError> {
        if !step.is_finite() || step < MIN_TIME_STEP_S || step > MAX_TIME_STEP_S {
            return Err(EngineError::Validation {
                field: "time_step",
                value: step,
                min: MIN_TIME_STEP_S,
                max: MAX_TIME_STEP_S,
            });
        }
        self.time_step = step;
        Ok(())
    }

    pub fn set_max_flight_time(&mut self, max_time_s: f64) {
        self.max_flight_time = max_time_s;
    }

    /// Integrate the full trajectory and derive its summary metrics.
    pub fn simulate(
        &self,
        params: &MissileParameters,
    ) -> Result<(TrajectoryState, TrajectorySummary), EngineError> {
        let dt = self.time_step;
        let k_over_m = 0.5 * STANDARD_AIR_DENSITY * params.drag_coefficient
            * params.cross_sectional_area
            / params.mass;
        let wind = Vector2::new(params.wind_speed, 0.0);

        let theta = params.launch_angle.to_radians();
        let mut position = Vector2::zeros();
        let mut velocity = Vector2::new(
            params.initial_velocity * theta.cos(),
            params.initial_velocity * theta.sin(),
        );
        let mut time = 0.0;

        let mut samples = vec![TrajectorySample { time, position, velocity }];
        let mut max_height = position.y;
        let mut apogee: Option<(f64, f64)> = None;

        loop {
            if time >= self.max_flight_time {
                return Err(EngineError::Divergence {
                    max_time_s: self.max_flight_time,
                });
            }

            let prev_position = position;
            let prev_velocity = velocity;
            let prev_time = time;

            // RK4 step. Drag depends on velocity only, so the position
            // slopes are the velocity stages themselves.
            let a1 = drag_gravity_accel(prev_velocity, k_over_m, wind);
            let v2 = prev_velocity + a1 * (dt * 0.5);
            let a2 = drag_gravity_accel(v2, k_over_m, wind);
            let v3 = prev_velocity + a2 * (dt * 0.5);
            let a3 = drag_gravity_accel(v3, k_over_m, wind);
            let v4 = prev_velocity + a3 * dt;
            let a4 = drag_gravity_accel(v4, k_over_m, wind);

            position += (prev_velocity + v2 * 2.0 + v3 * 2.0 + v4) * (dt / 6.0);
            velocity += (a1 + a2 * 2.0 + a3 * 2.0 + a4) * (dt / 6.0);
            time += dt;

            // Apogee: first vy sign change, refined by linear interpolation
            // between the straddling samples.
            if apogee.is_none() && prev_velocity.y > 0.0 && velocity.y <= 0.0 {
                let frac = prev_velocity.y / (prev_velocity.y - velocity.y);
                let apogee_time = prev_time + frac * dt;
                let apogee_height = prev_position.y + frac * (position.y - prev_position.y);
                if apogee_height > max_height {
                    max_height = apogee_height;
                }
                apogee = Some((apogee_time, apogee_height));
            }

            if position.y > max_height {
                max_height = position.y;
            }

            // Impact: first y zero crossing after launch. Interpolate the
            // crossing so time of flight and impact velocity do not carry
            // a full time step of quantization error.
            if prev_position.y > 0.0 && position.y <= 0.0 {
                let frac = prev_position.y / (prev_position.y - position.y);
                let impact_time = prev_time + frac * dt;
                let impact_position = Vector2::new(
                    prev_position.x + frac * (position.x - prev_position.x),
                    0.0,
                );
                let impact_velocity = prev_velocity + (velocity - prev_velocity) * frac;
                samples.push(TrajectorySample {
                    time: impact_time,
                    position: impact_position,
                    velocity: impact_velocity,
                });

                // Launch angles are >= 5° so vy starts positive and the sign
                // change always precedes impact; the fallback guards the
                // out-of-range inputs tests are allowed to drive.
                let apogee_time_s = match apogee {
                    Some((t, _)) => t,
                    None => highest_sample_time(&samples),
                };

                let summary = TrajectorySummary {
                    max_height_km: max_height / 1000.0,
                    max_range_km: impact_position.x / 1000.0,
                    time_of_flight_s: impact_time,
                    impact_velocity_m_s: impact_velocity.magnitude().max(MIN_VELOCITY_THRESHOLD),
                    apogee_time_s,
                };
                return Ok((TrajectoryState { samples }, summary));
            }

            samples.push(TrajectorySample { time, position, velocity });
        }
    }

    /// Summary metrics only, discarding the sample sequence.
    pub fn summarize(&self, params: &MissileParameters) -> Result<TrajectorySummary, EngineError> {
        self.simulate(params).map(|(_, summary)| summary)
    }
}

/// Acceleration from quadratic drag relative to the ambient wind, plus
/// gravity. Wind is horizontal only.
fn drag_gravity_accel(velocity: Vector2<f64>, k_over_m: f64, wind: Vector2<f64>) -> Vector2<f64> {
    let relative = velocity - wind;
    let speed = relative.magnitude();
    Vector2::new(0.0, -G_ACCEL_MPS2) - relative * (k_over_m * speed)
}

fn highest_sample_time(samples: &[TrajectorySample]) -> f64 {
    samples
        .iter()
        .max_by(|a, b| a.position.y.total_cmp(&b.position.y))
        .map(|s| s.time)
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reference_scenario_produces_finite_summary() {
        let engine = PhysicsEngine::new();
        let (state, summary) = engine.simulate(&MissileParameters::default()).unwrap();

        assert!(!state.is_empty());
        assert!(summary.max_range_km > 0.0);
        assert!(summary.max_height_km > 0.0);
        assert!(summary.time_of_flight_s > 0.0);
        assert!(summary.impact_velocity_m_s > 0.0);
        assert!(summary.apogee_time_s > 0.0);
        assert!(summary.apogee_time_s < summary.time_of_flight_s);
    }

    #[test]
    fn trajectory_starts_at_origin_and_ends_on_ground() {
        let engine = PhysicsEngine::new();
        let (state, _) = engine.simulate(&MissileParameters::default()).unwrap();

        let first = state.samples.first().unwrap();
        assert_eq!(first.time, 0.0);
        assert_eq!(first.position, Vector2::zeros());

        let last = state.impact().unwrap();
        assert!(last.position.y <= 0.0);
    }

    #[test]
    fn no_drag_matches_closed_form_range() {
        let engine = PhysicsEngine::new();
        let params = MissileParameters {
            initial_velocity: 300.0,
            launch_angle: 30.0,
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let summary = engine.summarize(&params).unwrap();

        let v = params.initial_velocity;
        let theta = params.launch_angle.to_radians();
        let analytic_km = v * v * (2.0 * theta).sin() / G_ACCEL_MPS2 / 1000.0;
        assert_relative_eq!(summary.max_range_km, analytic_km, max_relative = 1e-3);
    }

    #[test]
    fn headwind_shortens_range() {
        let engine = PhysicsEngine::new();
        let calm = engine.summarize(&MissileParameters::default()).unwrap();
        let headwind = engine
            .summarize(&MissileParameters {
                wind_speed: -20.0,
                ..Default::default()
            })
            .unwrap();
        assert!(headwind.max_range_km < calm.max_range_km);
    }

    #[test]
    fn rejects_non_positive_or_oversized_time_step() {
        let mut engine = PhysicsEngine::new();
        match engine.set_time_step(0.0) {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "time_step"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(engine.set_time_step(-0.01).is_err());
        assert!(engine.set_time_step(f64::NAN).is_err());
        assert!(engine.set_time_step(10.0).is_err());
        assert!(engine.set_time_step(0.005).is_ok());
    }

    #[test]
    fn flight_time_cap_reports_divergence() {
        let mut engine = PhysicsEngine::new();
        engine.set_max_flight_time(1.0);
        match engine.simulate(&MissileParameters::default()) {
            Err(EngineError::Divergence { max_time_s }) => assert_eq!(max_time_s, 1.0),
            other => panic!("expected divergence, got {other:?}"),
        }
    }
}
