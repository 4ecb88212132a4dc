//! Churn CLI - serve the prediction web demo or score a single customer.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use churn_cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("churn=info".parse()?))
        .init();

    let cli = Cli::parse();

    info!("Churn CLI starting...");

    match cli.command {
        Commands::Serve(cmd) => cmd.run().await?,
        Commands::Predict(cmd) => cmd.run()?,
    }

    Ok(())
}
