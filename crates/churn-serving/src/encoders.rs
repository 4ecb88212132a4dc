//! Fitted label encoders for categorical columns.
//!
//! An encoder maps each known category to its index in the sorted list of
//! classes seen at fit time. The encoder set is stored next to the classifier
//! as JSON:
//!
//! ```json
//! {
//!   "Contract": { "classes": ["Month-to-month", "One year", "Two year"] },
//!   "PaperlessBilling": { "classes": ["No", "Yes"] }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{ServingError, ServingResult};

#[derive(Deserialize)]
struct EncoderSpec {
    classes: Vec<String>,
}

/// Label encoder for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "EncoderSpec")]
pub struct CategoricalEncoder {
    classes: Vec<String>,
}

impl From<EncoderSpec> for CategoricalEncoder {
    fn from(spec: EncoderSpec) -> Self {
        Self::new(spec.classes)
    }
}

impl CategoricalEncoder {
    /// Create an encoder; classes are sorted and de-duplicated.
    pub fn new<I, S>(classes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut classes: Vec<String> = classes.into_iter().map(Into::into).collect();
        classes.sort();
        classes.dedup();
        Self { classes }
    }

    /// Known classes in code order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Numeric code for a category, `None` if it was not seen at fit time.
    pub fn transform(&self, category: &str) -> Option<i64> {
        self.classes
            .binary_search_by(|class| class.as_str().cmp(category))
            .ok()
            .map(|idx| idx as i64)
    }

    /// Category for a numeric code.
    pub fn inverse_transform(&self, code: i64) -> Option<&str> {
        usize::try_from(code)
            .ok()
            .and_then(|idx| self.classes.get(idx))
            .map(String::as_str)
    }
}

/// Encoders keyed by column name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncoderSet {
    encoders: HashMap<String, CategoricalEncoder>,
}

impl EncoderSet {
    /// Create an empty encoder set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the encoder for a column.
    pub fn insert(&mut self, column: impl Into<String>, encoder: CategoricalEncoder) {
        self.encoders.insert(column.into(), encoder);
    }

    /// Builder-style variant of [`EncoderSet::insert`].
    pub fn with(mut self, column: impl Into<String>, encoder: CategoricalEncoder) -> Self {
        self.insert(column, encoder);
        self
    }

    /// Encoder for a column.
    pub fn get(&self, column: &str) -> Option<&CategoricalEncoder> {
        self.encoders.get(column)
    }

    /// Number of encoded columns.
    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    /// Whether no column has an encoder.
    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }

    /// Parse an encoder set from its JSON form.
    pub fn from_json_str(json: &str) -> ServingResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| ServingError::model_load(format!("Invalid encoder set: {e}")))
    }

    /// Read an encoder set from disk.
    pub fn from_path(path: &Path) -> ServingResult<Self> {
        if !path.exists() {
            return Err(ServingError::ArtifactNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServingError::model_load(format!(
                "Failed to read encoders at {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_uses_sorted_index() {
        let encoder = CategoricalEncoder::new(["Two year", "Month-to-month", "One year"]);
        assert_eq!(
            encoder.classes(),
            &["Month-to-month", "One year", "Two year"]
        );
        assert_eq!(encoder.transform("Month-to-month"), Some(0));
        assert_eq!(encoder.transform("Two year"), Some(2));
        assert_eq!(encoder.transform("Weekly"), None);
        assert_eq!(encoder.inverse_transform(1), Some("One year"));
        assert_eq!(encoder.inverse_transform(-1), None);
        assert_eq!(encoder.inverse_transform(3), None);
    }

    #[test]
    fn test_duplicate_classes_collapse() {
        let encoder = CategoricalEncoder::new(["Yes", "No", "Yes"]);
        assert_eq!(encoder.classes().len(), 2);
        assert_eq!(encoder.transform("Yes"), Some(1));
    }

    #[test]
    fn test_encoder_set_from_json_normalizes_classes() {
        let set = EncoderSet::from_json_str(
            r#"{
                "PaperlessBilling": {"classes": ["Yes", "No"]},
                "InternetService": {"classes": ["No", "Fiber optic", "DSL"]}
            }"#,
        )
        .unwrap();

        assert_eq!(set.len(), 2);
        assert_eq!(set.get("PaperlessBilling").unwrap().transform("No"), Some(0));
        assert_eq!(
            set.get("InternetService").unwrap().transform("Fiber optic"),
            Some(1)
        );
        assert!(set.get("Contract").is_none());
    }

    #[test]
    fn test_encoder_set_invalid_json() {
        let err = EncoderSet::from_json_str(r#"{"Contract": ["a"]}"#).unwrap_err();
        assert!(matches!(err, ServingError::ModelLoadError(_)));
    }

    #[test]
    fn test_encoder_set_missing_file() {
        let err = EncoderSet::from_path(Path::new("/nonexistent/encoders.json")).unwrap_err();
        assert!(matches!(err, ServingError::ArtifactNotFound(_)));
    }
}
