//! Prediction request payloads and their coercion into feature records.
//!
//! The HTML form and the JSON API share [`PredictForm`]. Every field is
//! optional at the deserialization level so that a missing field becomes a
//! [`RequestError::MissingField`] rather than an extractor rejection.

use serde::Deserialize;
use thiserror::Error;

use crate::error::ServingError;
use crate::features::FeatureRecord;

/// Payload field names, in form order.
pub const FORM_FIELDS: [&str; 7] = [
    "tenure",
    "monthly_charges",
    "total_charges",
    "contract",
    "payment_method",
    "internet_service",
    "paperless_billing",
];

/// A raw field value: form fields are always text, JSON may carry numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Textual value
    Text(String),
    /// Numeric JSON value
    Number(f64),
}

/// Raw prediction request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictForm {
    /// Tenure in months
    pub tenure: Option<FieldValue>,
    /// Monthly charges
    pub monthly_charges: Option<FieldValue>,
    /// Total charges
    pub total_charges: Option<FieldValue>,
    /// Contract type
    pub contract: Option<FieldValue>,
    /// Payment method
    pub payment_method: Option<FieldValue>,
    /// Internet service
    pub internet_service: Option<FieldValue>,
    /// Paperless billing flag; stored under `PaperlessBilling`
    pub paperless_billing: Option<FieldValue>,
}

/// Reasons a prediction request could not be answered.
#[derive(Debug, Error)]
pub enum RequestError {
    /// A required field was absent.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// A numeric field could not be parsed.
    #[error("Invalid value {value:?} for {field}: {reason}")]
    Coercion {
        /// Payload field name
        field: &'static str,
        /// Raw value as received
        value: String,
        /// Parser message
        reason: String,
    },

    /// The body could not be decoded at all.
    #[error("Invalid request payload: {0}")]
    InvalidPayload(String),

    /// The model-backed strategy is active but no classifier is loaded.
    #[error("Prediction model is not available")]
    ModelUnavailable,

    /// A categorical value is unknown to the fitted encoders.
    #[error("{0}")]
    UnknownCategory(String),

    /// The prediction itself failed.
    #[error("Prediction failed: {0}")]
    Prediction(String),
}

impl RequestError {
    /// Stable identifier for logs and JSON responses.
    pub fn kind(&self) -> &'static str {
        match self {
            RequestError::MissingField(_) => "missing_field",
            RequestError::Coercion { .. } => "coercion",
            RequestError::InvalidPayload(_) => "invalid_payload",
            RequestError::ModelUnavailable => "model_unavailable",
            RequestError::UnknownCategory(_) => "unknown_category",
            RequestError::Prediction(_) => "prediction",
        }
    }

    /// Whether the caller sent something wrong.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RequestError::MissingField(_)
                | RequestError::Coercion { .. }
                | RequestError::InvalidPayload(_)
                | RequestError::UnknownCategory(_)
        )
    }
}

impl From<ServingError> for RequestError {
    fn from(err: ServingError) -> Self {
        match err {
            ServingError::ModelNotLoaded => RequestError::ModelUnavailable,
            err @ ServingError::UnknownCategory { .. } => {
                RequestError::UnknownCategory(err.to_string())
            }
            other => RequestError::Prediction(other.to_string()),
        }
    }
}

impl PredictForm {
    /// Coerce the raw fields into a feature record.
    ///
    /// Fields are checked in form order; the first problem is reported.
    pub fn into_record(self) -> Result<FeatureRecord, RequestError> {
        let tenure = parse_int("tenure", required("tenure", self.tenure)?)?;
        let monthly_charges = parse_float(
            "monthly_charges",
            required("monthly_charges", self.monthly_charges)?,
        )?;
        let total_charges =
            parse_float("total_charges", required("total_charges", self.total_charges)?)?;
        let contract = text(required("contract", self.contract)?);
        let payment_method = text(required("payment_method", self.payment_method)?);
        let internet_service = text(required("internet_service", self.internet_service)?);
        let paperless_billing = text(required("paperless_billing", self.paperless_billing)?);

        Ok(FeatureRecord {
            tenure,
            monthly_charges,
            total_charges,
            contract,
            payment_method,
            internet_service,
            paperless_billing,
        })
    }
}

fn required(field: &'static str, value: Option<FieldValue>) -> Result<FieldValue, RequestError> {
    value.ok_or(RequestError::MissingField(field))
}

fn text(value: FieldValue) -> String {
    match value {
        FieldValue::Text(s) => s,
        FieldValue::Number(n) => n.to_string(),
    }
}

fn parse_int(field: &'static str, value: FieldValue) -> Result<i64, RequestError> {
    match value {
        FieldValue::Text(raw) => raw.trim().parse::<i64>().map_err(|e| RequestError::Coercion {
            field,
            reason: e.to_string(),
            value: raw,
        }),
        FieldValue::Number(n) if n.fract() == 0.0 && n.abs() < i64::MAX as f64 => Ok(n as i64),
        FieldValue::Number(n) => Err(RequestError::Coercion {
            field,
            value: n.to_string(),
            reason: "expected a whole number".to_string(),
        }),
    }
}

fn parse_float(field: &'static str, value: FieldValue) -> Result<f64, RequestError> {
    let (parsed, raw) = match value {
        FieldValue::Text(raw) => match raw.trim().parse::<f64>() {
            Ok(n) => (n, raw),
            Err(e) => {
                return Err(RequestError::Coercion {
                    field,
                    reason: e.to_string(),
                    value: raw,
                })
            }
        },
        FieldValue::Number(n) => (n, n.to_string()),
    };
    if !parsed.is_finite() {
        return Err(RequestError::Coercion {
            field,
            value: raw,
            reason: "expected a finite number".to_string(),
        });
    }
    Ok(parsed)
}
