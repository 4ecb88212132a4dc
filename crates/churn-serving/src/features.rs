//! Customer feature records and their single-row tabular encoding.
//!
//! A [`FeatureRecord`] is built once per request from the coerced form
//! fields. The model boundary turns it into an [`EncodedRecord`]: an ordered
//! list of `(column, value)` pairs in which categorical columns may have been
//! replaced by their numeric codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column name of the tenure attribute (months).
pub const TENURE: &str = "tenure";
/// Column name of the monthly charges attribute.
pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
/// Column name of the total charges attribute.
pub const TOTAL_CHARGES: &str = "TotalCharges";
/// Column name of the contract type.
pub const CONTRACT: &str = "Contract";
/// Column name of the payment method.
pub const PAYMENT_METHOD: &str = "PaymentMethod";
/// Column name of the internet service type.
pub const INTERNET_SERVICE: &str = "InternetService";
/// Column name of the paperless billing flag.
pub const PAPERLESS_BILLING: &str = "PaperlessBilling";

/// Columns that carry category strings and may be label-encoded.
pub const CATEGORICAL_COLUMNS: [&str; 4] =
    [CONTRACT, PAYMENT_METHOD, INTERNET_SERVICE, PAPERLESS_BILLING];

/// A single cell of a feature row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    /// Integer value (tenure, encoded categories).
    Int(i64),
    /// Floating point value (charges).
    Float(f64),
    /// Raw category string.
    Text(String),
}

impl FeatureValue {
    /// Numeric view of the value, `None` for raw text.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            FeatureValue::Text(_) => None,
        }
    }

    /// Text view of the value, `None` for numbers.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FeatureValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Int(v) => write!(f, "{v}"),
            FeatureValue::Float(v) => write!(f, "{v}"),
            FeatureValue::Text(s) => f.write_str(s),
        }
    }
}

/// Customer attributes submitted for one prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Months the customer has been subscribed
    #[serde(rename = "tenure")]
    pub tenure: i64,

    /// Current monthly bill
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,

    /// Cumulative amount billed
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,

    /// Contract type, e.g. "Month-to-month"
    #[serde(rename = "Contract")]
    pub contract: String,

    /// Payment method, e.g. "Electronic check"
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,

    /// Internet service, e.g. "Fiber optic"
    #[serde(rename = "InternetService")]
    pub internet_service: String,

    /// Paperless billing flag, "Yes" or "No"
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
}

impl FeatureRecord {
    /// The record as ordered `(column, value)` pairs.
    pub fn columns(&self) -> Vec<(&'static str, FeatureValue)> {
        vec![
            (TENURE, FeatureValue::Int(self.tenure)),
            (MONTHLY_CHARGES, FeatureValue::Float(self.monthly_charges)),
            (TOTAL_CHARGES, FeatureValue::Float(self.total_charges)),
            (CONTRACT, FeatureValue::Text(self.contract.clone())),
            (PAYMENT_METHOD, FeatureValue::Text(self.payment_method.clone())),
            (
                INTERNET_SERVICE,
                FeatureValue::Text(self.internet_service.clone()),
            ),
            (
                PAPERLESS_BILLING,
                FeatureValue::Text(self.paperless_billing.clone()),
            ),
        ]
    }
}

/// Single-row table handed to a classifier.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EncodedRecord {
    columns: Vec<(String, FeatureValue)>,
}

impl EncodedRecord {
    /// Build an unencoded row from a feature record.
    pub fn from_record(record: &FeatureRecord) -> Self {
        Self {
            columns: record
                .columns()
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
        }
    }

    /// Look up a column by name.
    pub fn get(&self, name: &str) -> Option<&FeatureValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, value)| value)
    }

    /// Replace the value of an existing column, or append a new one.
    pub fn set(&mut self, name: &str, value: FeatureValue) {
        match self.columns.iter_mut().find(|(column, _)| column == name) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((name.to_string(), value)),
        }
    }

    /// Iterate over columns in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
