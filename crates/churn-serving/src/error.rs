//! Error types for the churn-serving crate.
//!
//! This module defines the errors raised by the model boundary, the
//! configuration layer and the HTTP server.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Result type alias for serving operations.
pub type ServingResult<T> = Result<T, ServingError>;

/// Errors that can occur in the serving infrastructure.
#[derive(Debug, Error)]
pub enum ServingError {
    /// An artifact file does not exist at the configured path.
    #[error("Artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    /// Artifact loading failed.
    #[error("Failed to load model: {0}")]
    ModelLoadError(String),

    /// No classifier is currently loaded.
    #[error("No model is currently loaded")]
    ModelNotLoaded,

    /// A categorical value was not seen when the encoder was fitted.
    #[error("Unknown category {value:?} for column {column}")]
    UnknownCategory {
        /// Column being encoded
        column: String,
        /// Offending value
        value: String,
    },

    /// Prediction failed.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Server error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Invalid request.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServingError {
    /// Create a model load error.
    pub fn model_load(msg: impl Into<String>) -> Self {
        Self::ModelLoadError(msg.into())
    }

    /// Create a prediction error.
    pub fn prediction(msg: impl Into<String>) -> Self {
        Self::PredictionError(msg.into())
    }

    /// Create a server error.
    pub fn server(msg: impl Into<String>) -> Self {
        Self::ServerError(msg.into())
    }

    /// Create a config error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create an internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a client error (bad input).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest(_) | Self::UnknownCategory { .. }
        )
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(
            self,
            Self::ServerError(_)
                | Self::ModelLoadError(_)
                | Self::ArtifactNotFound(_)
                | Self::ModelNotLoaded
                | Self::Internal(_)
        )
    }
}

impl From<ConfigError> for ServingError {
    fn from(err: ConfigError) -> Self {
        Self::ConfigError(err.to_string())
    }
}
