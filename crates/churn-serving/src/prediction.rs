//! Prediction results and their user-facing presentation.

use serde::{Deserialize, Serialize};

use crate::error::{ServingError, ServingResult};

/// Binary churn label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLabel {
    /// The customer is expected to stay (class 0).
    Retained,
    /// The customer is expected to leave (class 1).
    Churned,
}

impl ChurnLabel {
    /// Map a classifier class label to a churn label.
    pub fn from_class(class: i64) -> ServingResult<Self> {
        match class {
            0 => Ok(Self::Retained),
            1 => Ok(Self::Churned),
            other => Err(ServingError::prediction(format!(
                "classifier returned unexpected class {other}"
            ))),
        }
    }

    /// Numeric class (0 or 1).
    pub fn as_class(self) -> u8 {
        match self {
            Self::Retained => 0,
            Self::Churned => 1,
        }
    }

    /// Yes/no display string.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::Retained => "Non",
            Self::Churned => "Oui",
        }
    }
}

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted label
    pub label: ChurnLabel,
    /// Probability of the churn class, in `[0, 1]`
    pub churn_probability: f64,
}

impl Prediction {
    /// Create a prediction, clamping the probability into `[0, 1]`.
    pub fn new(label: ChurnLabel, churn_probability: f64) -> Self {
        Self {
            label,
            churn_probability: churn_probability.clamp(0.0, 1.0),
        }
    }

    /// Risk bucket for this prediction.
    pub fn risk(&self) -> RiskLevel {
        RiskLevel::from_probability(self.churn_probability)
    }
}

/// Probability of the positive class from a class-probability vector.
///
/// The second entry when at least two classes exist, otherwise the first.
pub fn positive_class_probability(proba: &[f64]) -> ServingResult<f64> {
    match proba {
        [] => Err(ServingError::prediction(
            "classifier returned an empty probability vector",
        )),
        [only] => Ok(*only),
        [_, positive, ..] => Ok(*positive),
    }
}

/// Three-level churn risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// Probability at most 0.3
    Low,
    /// Probability above 0.3, at most 0.6
    Medium,
    /// Probability above 0.6
    High,
}

impl RiskLevel {
    /// Bucket a churn probability.
    pub fn from_probability(probability: f64) -> Self {
        if probability > 0.6 {
            Self::High
        } else if probability > 0.3 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Display label shown on the result page.
    pub fn display_label(self) -> &'static str {
        match self {
            Self::High => "Élevé",
            Self::Medium => "Moyen",
            Self::Low => "Faible",
        }
    }
}

/// Rendered form of a prediction, shared by the HTML page and the JSON API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    /// "Oui" or "Non"
    pub churn: &'static str,
    /// Percentage with one decimal, e.g. "75.0%"
    pub probabilite: String,
    /// "Élevé", "Moyen" or "Faible"
    pub risque: &'static str,
    /// Numeric label
    pub label: u8,
    /// Raw churn probability
    pub churn_probability: f64,
    /// Risk bucket
    pub risk_level: RiskLevel,
}

impl PredictionView {
    /// Format a prediction for display.
    pub fn from_prediction(prediction: &Prediction) -> Self {
        let risk = prediction.risk();
        Self {
            churn: prediction.label.display_label(),
            probabilite: format!("{:.1}%", prediction.churn_probability * 100.0),
            risque: risk.display_label(),
            label: prediction.label.as_class(),
            churn_probability: prediction.churn_probability,
            risk_level: risk,
        }
    }
}
