//! Finite-difference sensitivity analysis.
//!
//! Symmetric central differences around a base parameter set, one input
//! field at a time, reported both as absolute output deltas and as
//! normalized elasticities (percent output change per percent input change).

use serde::Serialize;

use crate::constants::SENSITIVITY_RELATIVE_STEP;
use crate::error::EngineError;
use crate::params::{MissileParameters, PARAM_RANGES};
use crate::physics::{OutputMetric, TrajectorySummary};
use crate::predictor::OutcomePredictor;

/// Per-metric response to one perturbed input field.
#[derive(Debug, Clone, Serialize)]
pub struct MetricResponse {
    pub metric: OutputMetric,
    /// Mean output change per one-sided input step.
    pub absolute_delta: f64,
    /// Percent output change per percent input change.
    pub elasticity: f64,
}

/// Sensitivities of all output metrics to one input field.
#[derive(Debug, Clone, Serialize)]
pub struct FieldSensitivity {
    pub field: &'static str,
    /// One-sided input perturbation actually applied, after range clipping.
    pub absolute_delta_used: f64,
    /// Set when range clipping collapsed one side of the central difference
    /// and the analysis fell back to a one-sided difference.
    pub asymmetric: bool,
    pub responses: Vec<MetricResponse>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SensitivityResult {
    pub base: TrajectorySummary,
    pub fields: Vec<FieldSensitivity>,
}

/// Finite-difference analyzer; the relative step defaults to ±2%.
#[derive(Debug, Clone)]
pub struct SensitivityAnalyzer {
    pub relative_step: f64,
}

impl Default for SensitivityAnalyzer {
    fn default() -> Self {
        Self {
            relative_step: SENSITIVITY_RELATIVE_STEP,
        }
    }
}

impl SensitivityAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step(relative_step: f64) -> Self {
        Self { relative_step }
    }

    /// Perturb each input field of `base` in turn and record the response
    /// of every output metric.
    pub fn analyze<P: OutcomePredictor>(
        &self,
        predictor: &P,
        base: &MissileParameters,
    ) -> Result<SensitivityResult, EngineError> {
        let base_summary = predictor.predict_summary(base)?;
        let mut fields = Vec::with_capacity(PARAM_RANGES.len());

        for (index, range) in PARAM_RANGES.iter().enumerate() {
            let value = base.values()[index];
            // Perturbation scale: the field's own magnitude, or half the
            // valid span when the base value is zero (wind at calm).
            let scale = if value != 0.0 {
                value.abs()
            } else {
                range.half_span()
            };
            let step = self.relative_step * scale;

            let upper = range.clamp(value + step);
            let lower = range.clamp(value - step);

            let up_collapsed = (upper - value).abs() < f64::EPSILON * scale;
            let down_collapsed = (value - lower).abs() < f64::EPSILON * scale;

            let (plus, minus, span, asymmetric) = if up_collapsed && down_collapsed {
                // Range is degenerate at this point; report zero response.
                fields.push(FieldSensitivity {
                    field: range.name,
                    absolute_delta_used: 0.0,
                    asymmetric: true,
                    responses: zero_responses(),
                });
                continue;
            } else if up_collapsed {
                (value, lower, value - lower, true)
            } else if down_collapsed {
                (upper, value, upper - value, true)
            } else {
                let skew = ((upper - value) - (value - lower)).abs();
                (upper, lower, upper - lower, skew > f64::EPSILON * scale)
            };

            let summary_plus = if plus == value {
                base_summary
            } else {
                predictor.predict_summary(&base.with_value(index, plus))?
            };
            let summary_minus = if minus == value {
                base_summary
            } else {
                predictor.predict_summary(&base.with_value(index, minus))?
            };

            let one_sided_step = span / 2.0;
            let responses = OutputMetric::ALL
                .iter()
                .map(|&metric| {
                    let out_plus = summary_plus.metric(metric);
                    let out_minus = summary_minus.metric(metric);
                    let absolute_delta = (out_plus - out_minus) / 2.0;
                    let out_base = base_summary.metric(metric);
                    let elasticity = if out_base.abs() > f64::EPSILON {
                        ((out_plus - out_minus) / out_base) / (span / scale)
                    } else {
                        0.0
                    };
                    MetricResponse {
                        metric,
                        absolute_delta,
                        elasticity,
                    }
                })
                .collect();

            fields.push(FieldSensitivity {
                field: range.name,
                absolute_delta_used: one_sided_step,
                asymmetric,
                responses,
            });
        }

        Ok(SensitivityResult {
            base: base_summary,
            fields,
        })
    }
}

fn zero_responses() -> Vec<MetricResponse> {
    OutputMetric::ALL
        .iter()
        .map(|&metric| MetricResponse {
            metric,
            absolute_delta: 0.0,
            elasticity: 0.0,
        })
        .collect()
}
