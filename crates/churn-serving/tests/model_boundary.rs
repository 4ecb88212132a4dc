use churn_serving::config::ModelLoaderConfig;
use churn_serving::features::FeatureValue;
use churn_serving::{
    build_strategy, ChurnLabel, FeatureRecord, ModelLoader, PredictionView, ServingError,
    StrategyKind,
};
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

const MODEL_JSON: &str = r#"{
    "type": "logistic_regression",
    "feature_names": ["tenure", "MonthlyCharges", "Contract", "PaperlessBilling"],
    "coefficients": [-0.05, 0.04, -1.2, 0.3],
    "intercept": -1.5,
    "classes": [0, 1],
    "threshold": 0.5
}"#;

const ENCODERS_JSON: &str = r#"{
    "Contract": {"classes": ["Two year", "One year", "Month-to-month"]},
    "PaymentMethod": {"classes": ["Electronic check", "Mailed check",
        "Bank transfer (automatic)", "Credit card (automatic)"]},
    "InternetService": {"classes": ["DSL", "Fiber optic", "No"]},
    "PaperlessBilling": {"classes": ["No", "Yes"]}
}"#;

fn write_artifacts(dir: &Path) -> ModelLoaderConfig {
    let model_path = dir.join("churn_model.json");
    let encoders_path = dir.join("encoders.json");
    std::fs::write(&model_path, MODEL_JSON).unwrap();
    std::fs::write(&encoders_path, ENCODERS_JSON).unwrap();
    ModelLoaderConfig {
        model_path,
        encoders_path,
        load_encoders: true,
    }
}

fn record(tenure: i64, monthly_charges: f64, contract: &str) -> FeatureRecord {
    FeatureRecord {
        tenure,
        monthly_charges,
        total_charges: monthly_charges * tenure as f64,
        contract: contract.to_string(),
        payment_method: "Electronic check".to_string(),
        internet_service: "Fiber optic".to_string(),
        paperless_billing: "Yes".to_string(),
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[test]
fn test_is_loaded_false_for_missing_path() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(ModelLoaderConfig {
        model_path: dir.path().join("absent.json"),
        encoders_path: dir.path().join("absent_encoders.json"),
        load_encoders: true,
    });

    assert!(!loader.is_loaded());
    assert!(!loader.load_model());
    assert!(!loader.is_loaded());
    assert!(matches!(
        loader.predict(&record(1, 100.0, "Month-to-month")),
        Err(ServingError::ModelNotLoaded)
    ));
}

#[test]
fn test_load_and_predict_end_to_end() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(write_artifacts(dir.path()));

    assert!(loader.load_encoders());
    assert!(loader.load_model());
    assert!(loader.is_loaded());

    let new_customer = record(1, 100.0, "Month-to-month");
    let row = loader.preprocess(&new_customer).unwrap();
    assert_eq!(row.get("Contract"), Some(&FeatureValue::Int(0)));
    assert_eq!(row.get("PaperlessBilling"), Some(&FeatureValue::Int(1)));
    assert_eq!(row.get("InternetService"), Some(&FeatureValue::Int(1)));

    // z = -1.5 - 0.05 + 4.0 - 0.0 + 0.3 = 2.75
    let prediction = loader.predict(&new_customer).unwrap();
    assert_eq!(prediction.label, ChurnLabel::Churned);
    assert!((prediction.churn_probability - sigmoid(2.75)).abs() < 1e-9);

    // Contract "Two year" encodes to 2: z = -1.5 - 3.0 + 1.0 - 2.4 + 0.3 = -5.6
    let loyal = record(60, 25.0, "Two year");
    let prediction = loader.predict(&loyal).unwrap();
    assert_eq!(prediction.label, ChurnLabel::Retained);
    assert!((prediction.churn_probability - sigmoid(-5.6)).abs() < 1e-9);

    let view = PredictionView::from_prediction(&prediction);
    assert_eq!(view.churn, "Non");
    assert_eq!(view.risque, "Faible");
}

#[test]
fn test_model_without_encoders_rejects_text_columns() {
    let dir = tempdir().unwrap();
    let mut config = write_artifacts(dir.path());
    config.encoders_path = dir.path().join("absent.json");
    let loader = ModelLoader::new(config);

    assert!(!loader.load_encoders());
    assert!(loader.load_model());

    let err = loader.predict(&record(1, 100.0, "Month-to-month")).unwrap_err();
    assert!(matches!(err, ServingError::PredictionError(_)));
}

#[test]
fn test_unknown_category_surfaces() {
    let dir = tempdir().unwrap();
    let loader = ModelLoader::new(write_artifacts(dir.path()));
    assert!(loader.load_encoders());
    assert!(loader.load_model());

    let err = loader.predict(&record(3, 50.0, "Weekly")).unwrap_err();
    assert!(matches!(err, ServingError::UnknownCategory { .. }));
}

#[test]
fn test_model_strategy_uses_loader() {
    let dir = tempdir().unwrap();
    let loader = Arc::new(ModelLoader::new(write_artifacts(dir.path())));
    let strategy = build_strategy(StrategyKind::Model, Arc::clone(&loader));

    assert!(strategy.predict(&record(1, 100.0, "Month-to-month")).is_err());

    loader.load_encoders();
    loader.load_model();
    let prediction = strategy.predict(&record(1, 100.0, "Month-to-month")).unwrap();
    assert_eq!(prediction.label, ChurnLabel::Churned);
}

#[test]
fn test_heuristic_examples() {
    let loader = Arc::new(ModelLoader::new(ModelLoaderConfig::default()));
    let strategy = build_strategy(StrategyKind::Heuristic, loader);

    let view = PredictionView::from_prediction(
        &strategy.predict(&record(12, 65.5, "Month-to-month")).unwrap(),
    );
    assert_eq!(view.label, 0);
    assert_eq!(view.probabilite, "25.0%");
    assert_eq!(view.risque, "Faible");

    let view = PredictionView::from_prediction(
        &strategy.predict(&record(1, 100.0, "Month-to-month")).unwrap(),
    );
    assert_eq!(view.label, 1);
    assert_eq!(view.probabilite, "75.0%");
    assert_eq!(view.risque, "Élevé");
}
