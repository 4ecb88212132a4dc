//! Predict Command Implementation
//!
//! Scores one customer from the command line and prints the result as JSON.

use anyhow::{Context, Result};
use churn_serving::{
    build_strategy, FeatureRecord, ModelLoader, ModelLoaderConfig, PredictionView, StrategyKind,
};
use clap::Args;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

/// Predict churn for a single customer
///
/// # Example
///
/// ```bash
/// churn predict \
///     --tenure 12 --monthly-charges 65.5 --total-charges 786 \
///     --contract Month-to-month --payment-method "Electronic check" \
///     --internet-service "Fiber optic" --paperless-billing Yes
/// ```
#[derive(Args, Debug, Clone)]
pub struct PredictCommand {
    /// Tenure in months
    #[arg(long)]
    pub tenure: i64,

    /// Monthly charges
    #[arg(long)]
    pub monthly_charges: f64,

    /// Total charges
    #[arg(long)]
    pub total_charges: f64,

    /// Contract type
    #[arg(long)]
    pub contract: String,

    /// Payment method
    #[arg(long)]
    pub payment_method: String,

    /// Internet service
    #[arg(long)]
    pub internet_service: String,

    /// Paperless billing flag ("Yes" or "No")
    #[arg(long)]
    pub paperless_billing: String,

    /// Prediction strategy (`heuristic` or `model`)
    #[arg(long, default_value = "heuristic", env = "CHURN_STRATEGY")]
    pub strategy: StrategyKind,

    /// Classifier artifact, used by the model strategy
    #[arg(long, env = "CHURN_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Categorical encoder artifact, used by the model strategy
    #[arg(long, env = "CHURN_ENCODERS_PATH")]
    pub encoders_path: Option<PathBuf>,
}

impl PredictCommand {
    /// Execute the predict command
    pub fn run(&self) -> Result<()> {
        let output = self.evaluate()?;
        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }

    /// Build the record, run the configured strategy and assemble the JSON output.
    pub fn evaluate(&self) -> Result<serde_json::Value> {
        let record = self.record();
        let loader = Arc::new(self.model_loader()?);
        let strategy = build_strategy(self.strategy, loader);

        let prediction = strategy
            .predict(&record)
            .with_context(|| format!("Prediction failed using the {} strategy", self.strategy))?;
        let view = PredictionView::from_prediction(&prediction);
        info!("Predicted churn={} risk={}", view.churn, view.risque);

        Ok(json!({
            "strategy": self.strategy,
            "input": record,
            "prediction": view,
        }))
    }

    /// The customer record described by the flags.
    pub fn record(&self) -> FeatureRecord {
        FeatureRecord {
            tenure: self.tenure,
            monthly_charges: self.monthly_charges,
            total_charges: self.total_charges,
            contract: self.contract.clone(),
            payment_method: self.payment_method.clone(),
            internet_service: self.internet_service.clone(),
            paperless_billing: self.paperless_billing.clone(),
        }
    }

    fn model_loader(&self) -> Result<ModelLoader> {
        let defaults = ModelLoaderConfig::default();
        let config = ModelLoaderConfig {
            model_path: self.model_path.clone().unwrap_or(defaults.model_path),
            encoders_path: self.encoders_path.clone().unwrap_or(defaults.encoders_path),
            load_encoders: true,
        };
        let loader = ModelLoader::new(config);

        if self.strategy == StrategyKind::Model {
            if let Err(e) = loader.try_load_encoders() {
                warn!("Continuing without categorical encoders: {}", e);
            }
            loader.try_load_model().with_context(|| {
                format!(
                    "Failed to load classifier from {}",
                    loader.model_path().display()
                )
            })?;
        }

        Ok(loader)
    }
}
