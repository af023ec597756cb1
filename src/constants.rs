/// Physical constants used in trajectory calculations

/// Gravitational acceleration in m/s²
pub const G_ACCEL_MPS2: f64 = 9.80665;

/// Standard air density at sea level (kg/m³)
pub const STANDARD_AIR_DENSITY: f64 = 1.225;

/// Fixed integration time step (seconds)
///
/// Chosen to keep position error well below interpolation error for the
/// documented parameter ranges. A tunable constant, never derived from inputs.
pub const INTEGRATION_TIME_STEP_S: f64 = 0.01;

/// Hard cap on simulated flight time (seconds)
///
/// The longest admissible flight (2000 m/s at 85° in vacuum) lands in about
/// 406 s; the cap leaves generous margin. Exceeding it means the integration
/// failed to find a ground impact and the run is reported as divergent.
pub const MAX_FLIGHT_TIME_S: f64 = 1200.0;

// Numerical stability constants

/// Smallest admissible integrator step (seconds). A non-positive step would
/// never advance simulated time past the flight-time cap.
pub const MIN_TIME_STEP_S: f64 = 1e-6;

/// Largest admissible integrator step (seconds)
pub const MAX_TIME_STEP_S: f64 = 1.0;

/// Minimum threshold for velocity magnitude to avoid division by zero
pub const MIN_VELOCITY_THRESHOLD: f64 = 1e-6;

// Optimization constants

/// Coarse grid resolution for the angle search (degrees)
pub const OPT_GRID_STEP_DEG: f64 = 1.0;

/// Bracket width below which golden-section refinement stops (degrees)
pub const OPT_REFINE_TOLERANCE_DEG: f64 = 0.01;

/// Cap on predictor evaluations per optimization run
pub const OPT_MAX_EVALUATIONS: usize = 200;

/// Margin by which the found optimum must beat both interval endpoints
/// for the unimodality assumption to be considered satisfied
pub const OPT_UNIMODALITY_TOLERANCE: f64 = 1e-6;

/// Default relative perturbation for finite-difference sensitivities (2%)
pub const SENSITIVITY_RELATIVE_STEP: f64 = 0.02;
