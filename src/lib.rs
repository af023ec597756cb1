//! # Trajectory Engine
//!
//! Ballistic flight-outcome prediction for a parameterized projectile body.
//!
//! Two engines do the real work: the physics engine integrates the
//! equations of motion under gravity, quadratic drag, and horizontal wind
//! (and doubles as the labeled-data oracle for training), while the
//! prediction engine infers the same outcome metrics in constant time from
//! a pre-trained regression-model artifact. Optimization, sensitivity
//! analysis, and scenario comparison are layered over a common predictor
//! seam so they run on either path.

// Re-export the main types and functions
pub use artifact::{FeatureContract, ModelArtifact, ARTIFACT_SCHEMA_VERSION};
pub use comparison::{ScenarioComparator, ScenarioComparison, ScenarioOutcome};
pub use dataset::{write_csv, DatasetGenerator, LabeledSample};
pub use error::EngineError;
pub use features::{FeatureEncoder, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model::{
    DecisionTree, GradientBoostedModel, LinearModel, Regressor, RegressorModel, TreeNode,
};
pub use optimizer::{Direction, OptimizationEngine, OptimizationResult};
pub use params::{FieldRange, MissileParameters, PARAM_RANGES};
pub use physics::{
    OutputMetric, PhysicsEngine, TrajectorySample, TrajectoryState, TrajectorySummary,
};
pub use prediction::PredictionEngine;
pub use predictor::OutcomePredictor;
pub use sensitivity::{FieldSensitivity, MetricResponse, SensitivityAnalyzer, SensitivityResult};

// Module declarations
pub mod artifact;
pub mod comparison;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod features;
pub mod model;
pub mod optimizer;
pub mod params;
pub mod physics;
pub mod prediction;
pub mod predictor;
pub mod sensitivity;
