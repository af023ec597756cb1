use thiserror::Error;

/// Error taxonomy shared by all engines.
///
/// Engines surface errors to their caller; there is no silent fallback to
/// default values. The scenario comparator is the one component that
/// downgrades a per-item error into an annotated partial result.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An input field lies outside its documented range. Raised at the
    /// boundary before any engine runs.
    #[error("parameter `{field}` out of range: {value} (valid {min}..={max})")]
    Validation {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The integrator exceeded its flight-time cap without a ground impact.
    #[error("integration exceeded {max_time_s} s without ground impact")]
    Divergence { max_time_s: f64 },

    /// The encoder's feature set does not match the artifact's contract.
    #[error("feature contract mismatch: {0}")]
    FeatureMismatch(String),

    /// The model artifact failed load-time validation.
    #[error("model artifact incompatible: {0}")]
    ArtifactIncompatible(String),

    /// A prediction input falls outside the artifact's trained range.
    /// Hard-rejected rather than silently extrapolated.
    #[error("input `{field}` outside trained domain: {value} (trained {min}..={max})")]
    OutOfDomain {
        field: String,
        value: f64,
        min: f64,
        max: f64,
    },

    /// The unimodality assumption behind the bracket-and-refine search
    /// was violated, or the search budget was exhausted.
    #[error("optimization failed: {0}")]
    Optimization(String),

    #[error("artifact i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
