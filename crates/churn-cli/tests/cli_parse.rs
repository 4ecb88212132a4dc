use churn_cli::{Cli, Commands};
use churn_serving::StrategyKind;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn serve_parses_overrides() {
    let cli = Cli::parse_from([
        "churn",
        "serve",
        "--host",
        "0.0.0.0",
        "--port",
        "8080",
        "--workers",
        "2",
        "--strategy",
        "model",
        "--model-path",
        "artifacts/model.json",
    ]);

    let Commands::Serve(cmd) = cli.command else {
        panic!("expected serve command");
    };
    assert_eq!(cmd.host.as_deref(), Some("0.0.0.0"));
    assert_eq!(cmd.port, Some(8080));
    assert_eq!(cmd.workers, Some(2));
    assert_eq!(cmd.strategy, Some(StrategyKind::Model));

    let config = cmd.server_config().unwrap();
    assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    assert_eq!(
        config.model_loader.model_path,
        PathBuf::from("artifacts/model.json")
    );
}

#[test]
fn serve_accepts_mock_alias() {
    let cli = Cli::parse_from(["churn", "serve", "--strategy", "mock"]);
    let Commands::Serve(cmd) = cli.command else {
        panic!("expected serve command");
    };
    assert_eq!(cmd.strategy, Some(StrategyKind::Heuristic));
}

#[test]
fn serve_rejects_unknown_strategy() {
    let result = Cli::try_parse_from(["churn", "serve", "--strategy", "neural"]);
    assert!(result.is_err());
}

#[test]
fn predict_parses_customer() {
    let cli = Cli::parse_from([
        "churn",
        "predict",
        "--tenure",
        "12",
        "--monthly-charges",
        "65.5",
        "--total-charges",
        "786",
        "--contract",
        "Month-to-month",
        "--payment-method",
        "Electronic check",
        "--internet-service",
        "Fiber optic",
        "--paperless-billing",
        "Yes",
    ]);

    let Commands::Predict(cmd) = cli.command else {
        panic!("expected predict command");
    };
    assert_eq!(cmd.strategy, StrategyKind::Heuristic);

    let record = cmd.record();
    assert_eq!(record.tenure, 12);
    assert_eq!(record.monthly_charges, 65.5);
    assert_eq!(record.paperless_billing, "Yes");

    let output = cmd.evaluate().unwrap();
    assert_eq!(output["prediction"]["probabilite"], "25.0%");
    assert_eq!(output["prediction"]["risque"], "Faible");
}

#[test]
fn predict_requires_every_field() {
    let result = Cli::try_parse_from(["churn", "predict", "--tenure", "12"]);
    assert!(result.is_err());
}

#[test]
fn predict_rejects_non_numeric_tenure() {
    let result = Cli::try_parse_from([
        "churn",
        "predict",
        "--tenure",
        "twelve",
        "--monthly-charges",
        "65.5",
        "--total-charges",
        "786",
        "--contract",
        "One year",
        "--payment-method",
        "Mailed check",
        "--internet-service",
        "DSL",
        "--paperless-billing",
        "No",
    ]);
    assert!(result.is_err());
}
