//! Regression model families and the capability seam between them and the
//! prediction engine.
//!
//! Each output metric may be served by a different model family; the engine
//! only ever sees the [`Regressor`] capability. Training happens in an
//! external pipeline; this module is inference only.

use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::features::{FeatureVector, FEATURE_COUNT};

/// Single polymorphic capability all model families implement.
pub trait Regressor {
    fn predict(&self, features: &FeatureVector) -> f64;
}

/// Serialized model family, tagged so artifacts are self-describing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "family", rename_all = "snake_case")]
pub enum RegressorModel {
    Linear(LinearModel),
    GradientBoosted(GradientBoostedModel),
}

impl Regressor for RegressorModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        match self {
            RegressorModel::Linear(model) => model.predict(features),
            RegressorModel::GradientBoosted(model) => model.predict(features),
        }
    }
}

impl RegressorModel {
    /// Structural validation performed at artifact load time, so that
    /// inference itself never has to handle malformed models.
    pub fn validate(&self, context: &str) -> Result<(), EngineError> {
        match self {
            RegressorModel::Linear(model) => {
                if model.coefficients.len() != FEATURE_COUNT {
                    return Err(EngineError::ArtifactIncompatible(format!(
                        "{context}: linear model has {} coefficients, expected {FEATURE_COUNT}",
                        model.coefficients.len()
                    )));
                }
            }
            RegressorModel::GradientBoosted(model) => {
                for (t, tree) in model.trees.iter().enumerate() {
                    tree.validate()
                        .map_err(|reason| {
                            EngineError::ArtifactIncompatible(format!(
                                "{context}: tree {t}: {reason}"
                            ))
                        })?;
                }
            }
        }
        Ok(())
    }
}

/// Ordinary linear model: intercept + coefficients · features.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl Regressor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(features.as_slice())
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

/// Boosted ensemble of regression trees: base score plus the scaled sum of
/// per-tree contributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedModel {
    pub base_score: f64,
    pub learning_rate: f64,
    pub trees: Vec<DecisionTree>,
}

impl Regressor for GradientBoostedModel {
    fn predict(&self, features: &FeatureVector) -> f64 {
        let boost: f64 = self.trees.iter().map(|t| t.evaluate(features)).sum();
        self.base_score + self.learning_rate * boost
    }
}

/// Flat node-array regression tree; children referenced by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

impl DecisionTree {
    /// Walk from the root to a leaf. Node indices are validated at artifact
    /// load, so the walk cannot leave the array.
    pub fn evaluate(&self, features: &FeatureVector) -> f64 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    index = if features.get(*feature) <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("empty node array".to_string());
        }
        for (i, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= FEATURE_COUNT {
                    return Err(format!("node {i} splits on feature {feature}"));
                }
                // Forward references only, so the walk terminates.
                if *left >= self.nodes.len() || *right >= self.nodes.len() {
                    return Err(format!("node {i} child index out of bounds"));
                }
                if *left <= i || *right <= i {
                    return Err(format!("node {i} has non-forward child reference"));
                }
            }
        }
        Ok(())
    }
}
