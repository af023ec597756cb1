//! Property-level checks on the physics trajectory engine.

use approx::assert_relative_eq;
use trajectory_engine::{MissileParameters, PhysicsEngine};

const G: f64 = 9.80665;

fn params(velocity: f64, angle: f64) -> MissileParameters {
    MissileParameters {
        initial_velocity: velocity,
        launch_angle: angle,
        ..Default::default()
    }
}

#[test]
fn trajectory_is_time_monotonic_and_ends_on_ground() {
    let engine = PhysicsEngine::new();
    for angle in [5.0, 30.0, 45.0, 60.0, 85.0] {
        let (state, summary) = engine.simulate(&params(800.0, angle)).unwrap();

        assert!(!state.is_empty(), "angle {angle}");
        for pair in state.samples.windows(2) {
            assert!(pair[1].time >= pair[0].time, "angle {angle}");
        }

        let impact = state.impact().unwrap();
        assert!(impact.position.y <= 0.0, "angle {angle}");
        assert!(
            impact.time >= summary.apogee_time_s,
            "angle {angle}: impact at {} before apogee at {}",
            impact.time,
            summary.apogee_time_s
        );
    }
}

#[test]
fn no_drag_range_matches_closed_form() {
    let engine = PhysicsEngine::new();
    for (velocity, angle) in [(200.0, 20.0), (500.0, 45.0), (1000.0, 70.0)] {
        let p = MissileParameters {
            initial_velocity: velocity,
            launch_angle: angle,
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let summary = engine.summarize(&p).unwrap();
        let analytic_km =
            velocity * velocity * (2.0 * angle.to_radians()).sin() / G / 1000.0;
        assert_relative_eq!(summary.max_range_km, analytic_km, max_relative = 1e-3);
    }
}

#[test]
fn no_drag_range_symmetric_about_45_degrees() {
    let engine = PhysicsEngine::new();
    for angle in [15.0, 25.0, 35.0] {
        let low = MissileParameters {
            initial_velocity: 400.0,
            launch_angle: angle,
            drag_coefficient: 0.0,
            ..Default::default()
        };
        let high = MissileParameters {
            launch_angle: 90.0 - angle,
            ..low
        };
        let range_low = engine.summarize(&low).unwrap().max_range_km;
        let range_high = engine.summarize(&high).unwrap().max_range_km;
        assert_relative_eq!(range_low, range_high, max_relative = 1e-3);
    }
}

#[test]
fn range_and_height_increase_with_velocity() {
    let engine = PhysicsEngine::new();
    let mut previous: Option<(f64, f64)> = None;
    for velocity in [200.0, 400.0, 800.0, 1600.0] {
        let summary = engine.summarize(&params(velocity, 40.0)).unwrap();
        if let Some((prev_range, prev_height)) = previous {
            assert!(summary.max_range_km > prev_range, "velocity {velocity}");
            assert!(summary.max_height_km > prev_height, "velocity {velocity}");
        }
        previous = Some((summary.max_range_km, summary.max_height_km));
    }
}

#[test]
fn reference_scenario_is_finite_and_ordered() {
    // 800 m/s, 45°, 500 kg, Cd 0.4, 0.2 m², no wind
    let engine = PhysicsEngine::new();
    let summary = engine.summarize(&MissileParameters::default()).unwrap();

    assert!(summary.max_range_km > 0.0);
    assert!(summary.max_height_km > 0.0);
    assert!(summary.time_of_flight_s > 0.0);
    assert!(summary.impact_velocity_m_s > 0.0);
    assert!(summary.apogee_time_s > 0.0);
    assert!(summary.apogee_time_s < summary.time_of_flight_s);
    // drag keeps it under the 65.3 km vacuum range
    assert!(summary.max_range_km < 65.3);
}

#[test]
fn simulation_is_deterministic() {
    let engine = PhysicsEngine::new();
    let p = MissileParameters {
        wind_speed: 10.0,
        ..Default::default()
    };
    let a = engine.summarize(&p).unwrap();
    let b = engine.summarize(&p).unwrap();
    assert_eq!(a, b);
}

#[test]
fn tailwind_extends_range_headwind_shortens_it() {
    let engine = PhysicsEngine::new();
    let calm = engine.summarize(&MissileParameters::default()).unwrap();
    let tail = engine
        .summarize(&MissileParameters {
            wind_speed: 15.0,
            ..Default::default()
        })
        .unwrap();
    let head = engine
        .summarize(&MissileParameters {
            wind_speed: -15.0,
            ..Default::default()
        })
        .unwrap();
    assert!(tail.max_range_km > calm.max_range_km);
    assert!(head.max_range_km < calm.max_range_km);
}
