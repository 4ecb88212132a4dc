//! Prediction strategies selectable by configuration.
//!
//! Two strategies answer prediction requests:
//!
//! - [`HeuristicStrategy`]: a placeholder rule used while no trained model is
//!   wired in. It is **not** a model and its numbers carry no statistical
//!   meaning.
//! - [`ModelBackedStrategy`]: delegates to [`ModelLoader::predict`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::error::ServingResult;
use crate::features::FeatureRecord;
use crate::model_loader::ModelLoader;
use crate::prediction::{ChurnLabel, Prediction};

/// Something that turns a feature record into a prediction.
pub trait PredictionStrategy: Send + Sync {
    /// Which strategy this is.
    fn kind(&self) -> StrategyKind;

    /// Predict churn for one record.
    fn predict(&self, record: &FeatureRecord) -> ServingResult<Prediction>;
}

/// Configured strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Placeholder rule, no model required
    #[default]
    #[serde(alias = "mock")]
    Heuristic,
    /// Loaded classifier
    Model,
}

impl StrategyKind {
    /// Configuration name of the strategy.
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Heuristic => "heuristic",
            StrategyKind::Model => "model",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heuristic" | "mock" => Ok(StrategyKind::Heuristic),
            "model" => Ok(StrategyKind::Model),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// Monthly charge above which the placeholder rule flags churn.
pub const HEURISTIC_CHARGE_THRESHOLD: f64 = 70.0;
/// Contract value the placeholder rule flags.
pub const HEURISTIC_CONTRACT: &str = "Month-to-month";
/// Probability reported for flagged customers.
pub const HEURISTIC_CHURN_PROBABILITY: f64 = 0.75;
/// Probability reported for everyone else.
pub const HEURISTIC_RETAIN_PROBABILITY: f64 = 0.25;

/// Placeholder rule: churn iff monthly charges exceed 70 on a
/// month-to-month contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicStrategy;

impl PredictionStrategy for HeuristicStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Heuristic
    }

    fn predict(&self, record: &FeatureRecord) -> ServingResult<Prediction> {
        let churns = record.monthly_charges > HEURISTIC_CHARGE_THRESHOLD
            && record.contract == HEURISTIC_CONTRACT;
        Ok(if churns {
            Prediction::new(ChurnLabel::Churned, HEURISTIC_CHURN_PROBABILITY)
        } else {
            Prediction::new(ChurnLabel::Retained, HEURISTIC_RETAIN_PROBABILITY)
        })
    }
}

/// Strategy backed by the loaded classifier.
#[derive(Debug, Clone)]
pub struct ModelBackedStrategy {
    loader: Arc<ModelLoader>,
}

impl ModelBackedStrategy {
    /// Wrap a model loader.
    pub fn new(loader: Arc<ModelLoader>) -> Self {
        Self { loader }
    }
}

impl PredictionStrategy for ModelBackedStrategy {
    fn kind(&self) -> StrategyKind {
        StrategyKind::Model
    }

    fn predict(&self, record: &FeatureRecord) -> ServingResult<Prediction> {
        self.loader.predict(record)
    }
}

/// Build the configured strategy.
pub fn build_strategy(kind: StrategyKind, loader: Arc<ModelLoader>) -> Arc<dyn PredictionStrategy> {
    match kind {
        StrategyKind::Heuristic => Arc::new(HeuristicStrategy),
        StrategyKind::Model => Arc::new(ModelBackedStrategy::new(loader)),
    }
}
