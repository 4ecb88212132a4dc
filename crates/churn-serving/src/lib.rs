//! HTTP serving infrastructure for customer churn prediction.
//!
//! This crate provides a small web service: a form submits seven customer
//! attributes and the service answers with a churn label, a churn probability
//! and a risk category.
//!
//! # Overview
//!
//! - **ModelLoader**: loads the classifier and categorical encoder artifacts,
//!   encodes feature records and runs inference
//! - **PredictionStrategy**: placeholder heuristic or model-backed prediction,
//!   selected by configuration
//! - **Server**: actix-web server hosting the form, the JSON API and health
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    HTTP clients                      │
//! └──────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                       Server                         │
//! │  ┌────────────┐  ┌────────────────┐  ┌────────────┐  │
//! │  │   GET /    │  │ POST /predict  │  │  /health   │  │
//! │  └────────────┘  └────────────────┘  └────────────┘  │
//! └──────────────────────────────────────────────────────┘
//!                           │
//!                           ▼
//!                ┌─────────────────────┐
//!                │ PredictionStrategy  │
//!                └─────────────────────┘
//!                  │                 │
//!                  ▼                 ▼
//!        ┌──────────────────┐ ┌──────────────┐
//!        │ HeuristicStrategy│ │ ModelLoader  │
//!        └──────────────────┘ └──────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use churn_serving::{Server, ServerConfig, StrategyKind};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::builder()
//!     .host("0.0.0.0")
//!     .port(5000)
//!     .strategy(StrategyKind::Model)
//!     .model_path("model/churn_model.json")
//!     .encoders_path("model/encoders.json")
//!     .build();
//!
//! let server = Server::new(config);
//! server.start().await?;
//! // ...
//! server.stop().await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Making Predictions Directly
//!
//! ```
//! use churn_serving::{FeatureRecord, HeuristicStrategy, PredictionStrategy, PredictionView};
//!
//! let record = FeatureRecord {
//!     tenure: 1,
//!     monthly_charges: 100.0,
//!     total_charges: 100.0,
//!     contract: "Month-to-month".to_string(),
//!     payment_method: "Electronic check".to_string(),
//!     internet_service: "Fiber optic".to_string(),
//!     paperless_billing: "Yes".to_string(),
//! };
//!
//! let prediction = HeuristicStrategy.predict(&record).unwrap();
//! let view = PredictionView::from_prediction(&prediction);
//! assert_eq!(view.probabilite, "75.0%");
//! assert_eq!(view.risque, "Élevé");
//! ```
//!
//! # Error Handling
//!
//! Library operations return [`ServingResult<T>`]:
//!
//! ```
//! use churn_serving::error::{ServingError, ServingResult};
//!
//! fn handle_error(result: ServingResult<()>) {
//!     match result {
//!         Ok(_) => println!("Success"),
//!         Err(ServingError::ModelNotLoaded) => println!("Model not loaded"),
//!         Err(e) if e.is_client_error() => println!("Bad input: {}", e),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod classifier;
pub mod config;
pub mod encoders;
pub mod error;
pub mod features;
pub mod form;
pub mod handler;
pub mod model_loader;
pub mod prediction;
pub mod render;
pub mod server;
pub mod strategy;

// Re-export main types at crate root for convenience
pub use classifier::{Classifier, ClassifierArtifact, LogisticRegression};
pub use config::{ConfigError, ModelLoaderConfig, ServerConfig};
pub use encoders::{CategoricalEncoder, EncoderSet};
pub use error::{ServingError, ServingResult};
pub use features::{EncodedRecord, FeatureRecord, FeatureValue};
pub use form::{PredictForm, RequestError};
pub use handler::AppState;
pub use model_loader::ModelLoader;
pub use prediction::{ChurnLabel, Prediction, PredictionView, RiskLevel};
pub use server::{HealthStatus, Server, ServerState};
pub use strategy::{
    build_strategy, HeuristicStrategy, ModelBackedStrategy, PredictionStrategy, StrategyKind,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(NAME, "churn-serving");
    }

    #[test]
    fn test_re_exports() {
        let _ = ServerConfig::default();
        let _ = ModelLoaderConfig::default();
        let _ = EncoderSet::default();
    }
}
