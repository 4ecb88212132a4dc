//! Classifier artifacts used by the model-backed prediction path.
//!
//! The request layer only sees the [`Classifier`] trait. Concrete artifacts
//! are stored as JSON with a `type` tag so new model families can be added
//! without touching the loader:
//!
//! ```json
//! {
//!   "type": "logistic_regression",
//!   "feature_names": ["tenure", "MonthlyCharges", "Contract"],
//!   "coefficients": [-0.05, 0.03, -0.9],
//!   "intercept": -0.4,
//!   "classes": [0, 1],
//!   "threshold": 0.5
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{ServingError, ServingResult};
use crate::features::EncodedRecord;

/// A fitted binary classifier.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Predicted class label for a single row.
    fn predict(&self, row: &EncodedRecord) -> ServingResult<i64>;

    /// Class probabilities for a single row, ordered like the fitted classes.
    fn predict_proba(&self, row: &EncodedRecord) -> ServingResult<Vec<f64>>;
}

/// Serialized classifier, tagged by model family.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    /// Binary logistic regression over numeric columns.
    LogisticRegression(LogisticRegression),
}

impl ClassifierArtifact {
    /// Parse and validate an artifact from JSON.
    pub fn from_json_str(json: &str) -> ServingResult<Self> {
        let artifact: Self = serde_json::from_str(json)
            .map_err(|e| ServingError::model_load(format!("Invalid classifier artifact: {e}")))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read an artifact from disk.
    pub fn from_path(path: &Path) -> ServingResult<Self> {
        if !path.exists() {
            return Err(ServingError::ArtifactNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServingError::model_load(format!(
                "Failed to read classifier at {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }

    fn validate(&self) -> ServingResult<()> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.validate(),
        }
    }
}

impl Classifier for ClassifierArtifact {
    fn predict(&self, row: &EncodedRecord) -> ServingResult<i64> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.predict(row),
        }
    }

    fn predict_proba(&self, row: &EncodedRecord) -> ServingResult<Vec<f64>> {
        match self {
            ClassifierArtifact::LogisticRegression(model) => model.predict_proba(row),
        }
    }
}

/// Logistic regression weights.
///
/// With two classes the probability of `classes[1]` is
/// `sigmoid(intercept + Σ coefficients[i] * row[feature_names[i]])`.
/// A single-class model always predicts that class with probability 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Columns consumed, in coefficient order
    pub feature_names: Vec<String>,

    /// One weight per feature
    pub coefficients: Vec<f64>,

    /// Bias term
    #[serde(default)]
    pub intercept: f64,

    /// Class labels; the last one is the positive class
    #[serde(default = "default_classes")]
    pub classes: Vec<i64>,

    /// Positive-class probability at or above which the positive label wins
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_classes() -> Vec<i64> {
    vec![0, 1]
}

fn default_threshold() -> f64 {
    0.5
}

impl LogisticRegression {
    fn validate(&self) -> ServingResult<()> {
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ServingError::model_load(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        if self.classes.is_empty() || self.classes.len() > 2 {
            return Err(ServingError::model_load(format!(
                "expected one or two classes, got {}",
                self.classes.len()
            )));
        }
        if !(self.threshold > 0.0 && self.threshold < 1.0) {
            return Err(ServingError::model_load(format!(
                "threshold must lie in (0, 1), got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    fn decision_function(&self, row: &EncodedRecord) -> ServingResult<f64> {
        let mut z = self.intercept;
        for (name, coef) in self.feature_names.iter().zip(&self.coefficients) {
            let value = row
                .get(name)
                .ok_or_else(|| ServingError::prediction(format!("missing feature {name}")))?;
            let x = value.as_f64().ok_or_else(|| {
                ServingError::prediction(format!(
                    "feature {name} is not numeric: {value:?} (no encoder loaded?)"
                ))
            })?;
            if !x.is_finite() {
                return Err(ServingError::prediction(format!(
                    "feature {name} is not finite: {x}"
                )));
            }
            z += coef * x;
        }
        Ok(z)
    }

    fn positive_probability(&self, row: &EncodedRecord) -> ServingResult<f64> {
        let z = self.decision_function(row)?;
        Ok(1.0 / (1.0 + (-z).exp()))
    }

    /// Predicted class label.
    pub fn predict(&self, row: &EncodedRecord) -> ServingResult<i64> {
        if self.classes.len() == 1 {
            return Ok(self.classes[0]);
        }
        let p = self.positive_probability(row)?;
        Ok(if p >= self.threshold {
            self.classes[1]
        } else {
            self.classes[0]
        })
    }

    /// Class probabilities ordered like `classes`.
    pub fn predict_proba(&self, row: &EncodedRecord) -> ServingResult<Vec<f64>> {
        if self.classes.len() == 1 {
            return Ok(vec![1.0]);
        }
        let p = self.positive_probability(row)?;
        Ok(vec![1.0 - p, p])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureValue;

    fn row(pairs: &[(&str, FeatureValue)]) -> EncodedRecord {
        let mut row = EncodedRecord::default();
        for (name, value) in pairs {
            row.set(name, value.clone());
        }
        row
    }

    fn model(coefficients: Vec<f64>, intercept: f64) -> LogisticRegression {
        LogisticRegression {
            feature_names: vec!["MonthlyCharges".to_string(), "Contract".to_string()],
            coefficients,
            intercept,
            classes: vec![0, 1],
            threshold: 0.5,
        }
    }

    #[test]
    fn test_zero_weights_give_even_odds() {
        let m = model(vec![0.0, 0.0], 0.0);
        let r = row(&[
            ("MonthlyCharges", FeatureValue::Float(80.0)),
            ("Contract", FeatureValue::Int(0)),
        ]);
        let proba = m.predict_proba(&r).unwrap();
        assert!((proba[0] - 0.5).abs() < 1e-12);
        assert!((proba[1] - 0.5).abs() < 1e-12);
        assert_eq!(m.predict(&r).unwrap(), 1);
    }

    #[test]
    fn test_probabilities_follow_weights() {
        let m = model(vec![0.1, -2.0], -5.0);
        let risky = row(&[
            ("MonthlyCharges", FeatureValue::Float(100.0)),
            ("Contract", FeatureValue::Int(0)),
        ]);
        let safe = row(&[
            ("MonthlyCharges", FeatureValue::Float(20.0)),
            ("Contract", FeatureValue::Int(2)),
        ]);

        let p_risky = m.predict_proba(&risky).unwrap()[1];
        let p_safe = m.predict_proba(&safe).unwrap()[1];
        assert!(p_risky > 0.99);
        assert!(p_safe < 0.01);
        assert_eq!(m.predict(&risky).unwrap(), 1);
        assert_eq!(m.predict(&safe).unwrap(), 0);
    }

    #[test]
    fn test_text_feature_is_rejected() {
        let m = model(vec![0.1, 1.0], 0.0);
        let r = row(&[
            ("MonthlyCharges", FeatureValue::Float(10.0)),
            ("Contract", FeatureValue::Text("Month-to-month".to_string())),
        ]);
        assert!(matches!(
            m.predict_proba(&r),
            Err(ServingError::PredictionError(_))
        ));
    }

    #[test]
    fn test_non_finite_feature_is_rejected() {
        let m = model(vec![0.1, 1.0], 0.0);
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let r = row(&[
                ("MonthlyCharges", FeatureValue::Float(bad)),
                ("Contract", FeatureValue::Int(0)),
            ]);
            assert!(matches!(
                m.predict_proba(&r),
                Err(ServingError::PredictionError(_))
            ));
            assert!(m.predict(&r).is_err());
        }
    }

    #[test]
    fn test_missing_feature_is_rejected() {
        let m = model(vec![0.1, 1.0], 0.0);
        let r = row(&[("MonthlyCharges", FeatureValue::Float(10.0))]);
        assert!(matches!(m.predict(&r), Err(ServingError::PredictionError(_))));
    }

    #[test]
    fn test_single_class_model() {
        let mut m = model(vec![0.0, 0.0], 0.0);
        m.classes = vec![0];
        let r = EncodedRecord::default();
        assert_eq!(m.predict_proba(&r).unwrap(), vec![1.0]);
        assert_eq!(m.predict(&r).unwrap(), 0);
    }

    #[test]
    fn test_artifact_from_json() {
        let artifact = ClassifierArtifact::from_json_str(
            r#"{"type": "logistic_regression",
                "feature_names": ["tenure"],
                "coefficients": [-0.1]}"#,
        )
        .unwrap();
        let ClassifierArtifact::LogisticRegression(m) = &artifact;
        assert_eq!(m.classes, vec![0, 1]);
        assert_eq!(m.threshold, 0.5);
        assert_eq!(m.intercept, 0.0);
    }

    #[test]
    fn test_artifact_validation() {
        let err = ClassifierArtifact::from_json_str(
            r#"{"type": "logistic_regression",
                "feature_names": ["tenure", "Contract"],
                "coefficients": [-0.1]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ServingError::ModelLoadError(_)));

        let err = ClassifierArtifact::from_json_str(
            r#"{"type": "random_forest", "trees": []}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ServingError::ModelLoadError(_)));

        let err = ClassifierArtifact::from_json_str(
            r#"{"type": "logistic_regression",
                "feature_names": [], "coefficients": [], "threshold": 1.5}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ServingError::ModelLoadError(_)));
    }
}
