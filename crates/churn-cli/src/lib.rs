//! Churn CLI Library
//!
//! Command-line entry points for the churn prediction service:
//!
//! - **Serve**: run the HTTP form and JSON API
//! - **Predict**: score one customer and print the result as JSON
//!
//! # Example
//!
//! ```bash
//! # Serve with the placeholder heuristic on port 5000
//! churn serve --port 5000
//!
//! # Serve a trained classifier
//! churn serve --strategy model --model-path model/churn_model.json
//!
//! # Score a single customer
//! churn predict --tenure 1 --monthly-charges 100 --total-charges 100 \
//!     --contract Month-to-month --payment-method "Electronic check" \
//!     --internet-service "Fiber optic" --paperless-billing Yes
//! ```

pub mod commands;

use clap::{Parser, Subcommand};

pub use commands::{PredictCommand, ServeCommand};

/// Churn - customer churn prediction demo
#[derive(Parser, Debug)]
#[command(name = "churn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the prediction web server
    Serve(ServeCommand),

    /// Predict churn for a single customer
    Predict(PredictCommand),
}

/// Result type alias for CLI operations
pub type CliResult<T> = anyhow::Result<T>;
