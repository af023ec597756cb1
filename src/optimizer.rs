//! Bounded 1-D launch-angle optimization.
//!
//! Coarse grid scan to bracket the optimum, then golden-section refinement
//! inside the bracket. Valid because the range-vs-angle response is unimodal
//! under quadratic drag in the documented regimes; a post-hoc check reports
//! the cases where that assumption does not hold instead of silently
//! returning an edge value.

use serde::{Deserialize, Serialize};

use crate::constants::{
    OPT_GRID_STEP_DEG, OPT_MAX_EVALUATIONS, OPT_REFINE_TOLERANCE_DEG, OPT_UNIMODALITY_TOLERANCE,
};
use crate::error::EngineError;
use crate::params::{MissileParameters, PARAM_RANGES};
use crate::physics::{OutputMetric, TrajectorySummary};
use crate::predictor::OutcomePredictor;

const GOLDEN_RATIO: f64 = 0.618_033_988_749_894_9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Maximize,
    Minimize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    pub metric: OutputMetric,
    pub direction: Direction,
    pub optimal_angle_deg: f64,
    pub summary: TrajectorySummary,
    /// Predictor calls spent on the search.
    pub evaluations: usize,
}

/// Search configuration; defaults follow the crate constants.
#[derive(Debug, Clone)]
pub struct OptimizationEngine {
    pub angle_min_deg: f64,
    pub angle_max_deg: f64,
    pub grid_step_deg: f64,
    pub refine_tolerance_deg: f64,
    pub max_evaluations: usize,
}

impl Default for OptimizationEngine {
    fn default() -> Self {
        let angle_range = PARAM_RANGES[1];
        Self {
            angle_min_deg: angle_range.min,
            angle_max_deg: angle_range.max,
            grid_step_deg: OPT_GRID_STEP_DEG,
            refine_tolerance_deg: OPT_REFINE_TOLERANCE_DEG,
            max_evaluations: OPT_MAX_EVALUATIONS,
        }
    }
}

impl OptimizationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the launch angle optimizing `metric`, holding every other field
    /// of `base` fixed.
    pub fn optimize<P: OutcomePredictor>(
        &self,
        predictor: &P,
        base: &MissileParameters,
        metric: OutputMetric,
        direction: Direction,
    ) -> Result<OptimizationResult, EngineError> {
        let sign = match direction {
            Direction::Maximize => 1.0,
            Direction::Minimize => -1.0,
        };
        let mut eval = Evaluator {
            predictor,
            base: *base,
            metric,
            sign,
            calls: 0,
            cap: self.max_evaluations,
        };

        // Coarse scan brackets the optimum to one grid cell either side.
        // Both interval endpoints are always part of the grid; their scores
        // feed the unimodality post-check.
        let low_score = eval.score(self.angle_min_deg)?;
        let mut best_angle = self.angle_min_deg;
        let mut best_score = low_score;
        let mut angle = self.angle_min_deg + self.grid_step_deg;
        while angle < self.angle_max_deg {
            let score = eval.score(angle)?;
            if score > best_score {
                best_score = score;
                best_angle = angle;
            }
            angle += self.grid_step_deg;
        }
        let high_score = eval.score(self.angle_max_deg)?;
        if high_score > best_score {
            best_score = high_score;
            best_angle = self.angle_max_deg;
        }

        // Golden-section refinement inside the bracketing cell.
        let mut a = (best_angle - self.grid_step_deg).max(self.angle_min_deg);
        let mut b = (best_angle + self.grid_step_deg).min(self.angle_max_deg);
        let mut c = b - GOLDEN_RATIO * (b - a);
        let mut d = a + GOLDEN_RATIO * (b - a);
        let mut fc = eval.score(c)?;
        let mut fd = eval.score(d)?;
        while b - a > self.refine_tolerance_deg {
            if fc > fd {
                b = d;
                d = c;
                fd = fc;
                c = b - GOLDEN_RATIO * (b - a);
                fc = eval.score(c)?;
            } else {
                a = c;
                c = d;
                fc = fd;
                d = a + GOLDEN_RATIO * (b - a);
                fd = eval.score(d)?;
            }
        }

        let midpoint_angle = 0.5 * (a + b);
        let midpoint_summary =
            predictor.predict_summary(&base.with_launch_angle(midpoint_angle))?;
        let midpoint_score = sign * midpoint_summary.metric(metric);

        // Report the candidate that actually scored best: the refined
        // midpoint, or the grid point when refinement could not improve
        // on it.
        let (optimal_angle_deg, summary, final_score, extra_calls) =
            if midpoint_score >= best_score {
                (midpoint_angle, midpoint_summary, midpoint_score, 1)
            } else {
                let best_summary =
                    predictor.predict_summary(&base.with_launch_angle(best_angle))?;
                (best_angle, best_summary, best_score, 2)
            };

        // Unimodality post-check: the optimum has to beat both interval
        // endpoints, otherwise the bracket-and-refine premise was violated
        // (or the true optimum sits on the boundary).
        if final_score <= low_score + OPT_UNIMODALITY_TOLERANCE
            || final_score <= high_score + OPT_UNIMODALITY_TOLERANCE
        {
            return Err(EngineError::Optimization(format!(
                "optimum of {metric} at {optimal_angle_deg:.2}° does not exceed both interval \
                 endpoints; response is not unimodal over \
                 [{:.0}°, {:.0}°]",
                self.angle_min_deg, self.angle_max_deg
            )));
        }

        Ok(OptimizationResult {
            metric,
            direction,
            optimal_angle_deg,
            summary,
            evaluations: eval.calls + extra_calls,
        })
    }
}

struct Evaluator<'a, P: OutcomePredictor> {
    predictor: &'a P,
    base: MissileParameters,
    metric: OutputMetric,
    sign: f64,
    calls: usize,
    cap: usize,
}

impl<P: OutcomePredictor> Evaluator<'_, P> {
    fn score(&mut self, angle_deg: f64) -> Result<f64, EngineError> {
        if self.calls >= self.cap {
            return Err(EngineError::Optimization(format!(
                "evaluation cap of {} predictor calls exhausted",
                self.cap
            )));
        }
        self.calls += 1;
        let params = self.base.with_launch_angle(angle_deg);
        let summary = self.predictor.predict_summary(&params)?;
        Ok(self.sign * summary.metric(self.metric))
    }
}
