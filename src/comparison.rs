//! Batch scenario evaluation and ranking.
//!
//! Each scenario is independent, so the batch fans out across worker
//! threads; results are collated back in input order. One failing scenario
//! never aborts the batch; it is reported inline with its error.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::params::MissileParameters;
use crate::physics::{OutputMetric, TrajectorySummary};
use crate::predictor::OutcomePredictor;

/// Outcome for one scenario: a summary, or the error that rejected it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioOutcome {
    pub params: MissileParameters,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<TrajectorySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScenarioOutcome {
    pub fn is_success(&self) -> bool {
        self.summary.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub metric: OutputMetric,
    /// One outcome per input scenario, in input order.
    pub outcomes: Vec<ScenarioOutcome>,
    /// Indices into `outcomes` of the successful scenarios, best metric
    /// value first; ties keep input order.
    pub ranking: Vec<usize>,
}

/// Batch evaluator ranking scenarios by a caller-chosen metric.
#[derive(Debug, Clone)]
pub struct ScenarioComparator {
    pub metric: OutputMetric,
}

impl ScenarioComparator {
    pub fn new(metric: OutputMetric) -> Self {
        Self { metric }
    }

    pub fn compare<P>(
        &self,
        predictor: &P,
        scenarios: &[MissileParameters],
    ) -> ScenarioComparison
    where
        P: OutcomePredictor + Sync,
    {
        let outcomes: Vec<ScenarioOutcome> = scenarios
            .par_iter()
            .map(|params| match predictor.predict_summary(params) {
                Ok(summary) => ScenarioOutcome {
                    params: *params,
                    summary: Some(summary),
                    error: None,
                },
                Err(err) => ScenarioOutcome {
                    params: *params,
                    summary: None,
                    error: Some(err.to_string()),
                },
            })
            .collect();

        let mut ranking: Vec<usize> = outcomes
            .iter()
            .enumerate()
            .filter(|(_, o)| o.is_success())
            .map(|(i, _)| i)
            .collect();
        // Stable sort keeps input order among equal metric values.
        ranking.sort_by(|&a, &b| {
            let va = outcomes[a].summary.as_ref().map(|s| s.metric(self.metric));
            let vb = outcomes[b].summary.as_ref().map(|s| s.metric(self.metric));
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });

        ScenarioComparison {
            metric: self.metric,
            outcomes,
            ranking,
        }
    }
}
