//! End-to-end checks on the surrogate pipeline: artifact handling, domain
//! rejection, and the analysis layers over the predictor seam.

use std::collections::BTreeMap;
use std::path::PathBuf;

use approx::assert_abs_diff_eq;
use trajectory_engine::{
    Direction, EngineError, FeatureContract, LinearModel, MissileParameters, ModelArtifact,
    OptimizationEngine, OutputMetric, PhysicsEngine, PredictionEngine, RegressorModel,
    ScenarioComparator, SensitivityAnalyzer, ARTIFACT_SCHEMA_VERSION, FEATURE_COUNT,
    FEATURE_NAMES, PARAM_RANGES,
};

/// Linear-model artifact trained over the documented parameter ranges.
/// Range tracks velocity so rankings are predictable; other metrics are
/// simple positive constants.
fn synthetic_artifact() -> ModelArtifact {
    let mut ranges: Vec<(f64, f64)> = PARAM_RANGES.iter().map(|r| (r.min, r.max)).collect();
    ranges.push((50.0 / (0.8 * 2.0), 5000.0 / (0.1 * 0.01)));

    let constant = |value: f64| {
        RegressorModel::Linear(LinearModel {
            intercept: value,
            coefficients: vec![0.0; FEATURE_COUNT],
        })
    };
    let mut velocity_coeffs = vec![0.0; FEATURE_COUNT];
    velocity_coeffs[0] = 0.02;

    let mut models = BTreeMap::new();
    models.insert(
        OutputMetric::MaxRangeKm,
        RegressorModel::Linear(LinearModel {
            intercept: 0.0,
            coefficients: velocity_coeffs,
        }),
    );
    models.insert(OutputMetric::MaxHeightKm, constant(6.0));
    models.insert(OutputMetric::TimeOfFlightS, constant(70.0));
    models.insert(OutputMetric::ImpactVelocityMS, constant(280.0));
    models.insert(OutputMetric::ApogeeTimeS, constant(35.0));

    ModelArtifact {
        schema_version: ARTIFACT_SCHEMA_VERSION.to_string(),
        model_version: "synthetic-0.1".to_string(),
        feature_contract: FeatureContract {
            names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            ranges,
        },
        models,
    }
}

fn temp_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!("trajectory-engine-test-{}-{name}", std::process::id()));
    path
}

#[test]
fn artifact_file_round_trip() {
    let path = temp_path("roundtrip.json");
    synthetic_artifact().save(&path).unwrap();

    let engine = PredictionEngine::from_file(&path).unwrap();
    let summary = engine.predict(&MissileParameters::default()).unwrap();
    assert_abs_diff_eq!(summary.max_range_km, 16.0, epsilon = 1e-12);
    assert_abs_diff_eq!(summary.apogee_time_s, 35.0, epsilon = 1e-12);

    std::fs::remove_file(&path).ok();
}

#[test]
fn skewed_contract_fails_at_load() {
    let mut artifact = synthetic_artifact();
    artifact.feature_contract.names.reverse();
    let path = temp_path("skewed.json");
    artifact.save(&path).unwrap();

    match PredictionEngine::from_file(&path) {
        Err(EngineError::FeatureMismatch(_)) => {}
        other => panic!("expected feature mismatch, got {other:?}"),
    }
    std::fs::remove_file(&path).ok();
}

#[test]
fn out_of_domain_input_is_hard_rejected() {
    let engine = PredictionEngine::new(synthetic_artifact()).unwrap();
    let params = MissileParameters {
        initial_velocity: 5000.0,
        ..Default::default()
    };
    match engine.predict(&params) {
        Err(EngineError::OutOfDomain { field, value, .. }) => {
            assert_eq!(field, "initial_velocity");
            assert_eq!(value, 5000.0);
        }
        other => panic!("expected out-of-domain reject, got {other:?}"),
    }
}

#[test]
fn optimizer_recovers_45_degrees_on_low_drag_no_wind() {
    // On a no-wind, low-drag scenario the range optimum sits near the
    // vacuum solution of 45°. Searched on the exact engine so the check
    // does not depend on a fitted artifact.
    let physics = PhysicsEngine::new();
    let base = MissileParameters {
        initial_velocity: 200.0,
        mass: 5000.0,
        drag_coefficient: 0.1,
        cross_sectional_area: 0.01,
        wind_speed: 0.0,
        ..Default::default()
    };
    let result = OptimizationEngine::new()
        .optimize(&physics, &base, OutputMetric::MaxRangeKm, Direction::Maximize)
        .unwrap();
    assert_abs_diff_eq!(result.optimal_angle_deg, 45.0, epsilon = 0.5);
}

#[test]
fn optimizer_under_heavy_drag_prefers_flatter_angle() {
    let physics = PhysicsEngine::new();
    let base = MissileParameters {
        initial_velocity: 800.0,
        mass: 100.0,
        drag_coefficient: 0.8,
        cross_sectional_area: 1.0,
        ..Default::default()
    };
    let result = OptimizationEngine::new()
        .optimize(&physics, &base, OutputMetric::MaxRangeKm, Direction::Maximize)
        .unwrap();
    assert!(
        result.optimal_angle_deg < 45.0,
        "heavy drag should pull the optimum below 45°, got {:.2}",
        result.optimal_angle_deg
    );
}

#[test]
fn sensitivity_deltas_vanish_with_the_step() {
    let physics = PhysicsEngine::new();
    let base = MissileParameters::default();

    let mut last = f64::INFINITY;
    for step in [0.02, 0.005, 0.001] {
        let result = SensitivityAnalyzer::with_step(step)
            .analyze(&physics, &base)
            .unwrap();
        let delta = result
            .fields
            .iter()
            .find(|f| f.field == "initial_velocity")
            .unwrap()
            .responses
            .iter()
            .find(|r| r.metric == OutputMetric::MaxRangeKm)
            .unwrap()
            .absolute_delta
            .abs();
        assert!(delta < last, "step {step}: delta {delta} did not shrink");
        last = delta;
    }
}

#[test]
fn comparator_flags_one_bad_scenario_and_ranks_the_rest() {
    let engine = PredictionEngine::new(synthetic_artifact()).unwrap();
    let scenario = |velocity: f64, mass: f64| MissileParameters {
        initial_velocity: velocity,
        mass,
        ..Default::default()
    };
    let scenarios = vec![
        scenario(300.0, 500.0),
        scenario(1200.0, 500.0),
        scenario(700.0, 9000.0), // mass outside the trained domain
        scenario(1800.0, 500.0),
        scenario(500.0, 500.0),
    ];

    let comparison = ScenarioComparator::new(OutputMetric::MaxRangeKm)
        .compare(&engine, &scenarios);

    assert_eq!(comparison.outcomes.len(), 5);
    // input order preserved
    for (outcome, expected) in comparison.outcomes.iter().zip(&scenarios) {
        assert_eq!(outcome.params, *expected);
    }
    // the bad scenario is annotated, not fatal
    let failed = &comparison.outcomes[2];
    assert!(!failed.is_success());
    assert!(failed.error.as_deref().unwrap().contains("mass"));
    // the four successes rank by velocity-driven range
    assert_eq!(comparison.ranking, vec![3, 1, 4, 0]);
}
