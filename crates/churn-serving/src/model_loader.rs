//! Model boundary: artifact loading, preprocessing and inference.
//!
//! The [`ModelLoader`] owns the classifier and the categorical encoder set.
//! Both are loaded explicitly (never on first request) and are read-only once
//! loaded. A missing or unreadable artifact leaves the loader in an unloaded,
//! degraded state instead of aborting the process.

use crate::classifier::{Classifier, ClassifierArtifact};
use crate::config::ModelLoaderConfig;
use crate::encoders::EncoderSet;
use crate::error::{ServingError, ServingResult};
use crate::features::{EncodedRecord, FeatureRecord, FeatureValue, CATEGORICAL_COLUMNS};
use crate::prediction::{positive_class_probability, ChurnLabel, Prediction};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Loader and inference entry point for the churn classifier.
///
/// # Example
///
/// ```no_run
/// use churn_serving::config::ModelLoaderConfig;
/// use churn_serving::model_loader::ModelLoader;
///
/// let loader = ModelLoader::new(ModelLoaderConfig::default());
/// loader.load_encoders();
/// if !loader.load_model() {
///     eprintln!("serving without a classifier");
/// }
/// assert_eq!(loader.is_loaded(), loader.current_model().is_some());
/// ```
pub struct ModelLoader {
    /// Artifact locations
    config: ModelLoaderConfig,

    /// Currently loaded classifier
    classifier: RwLock<Option<Arc<dyn Classifier>>>,

    /// Currently loaded encoder set
    encoders: RwLock<Option<Arc<EncoderSet>>>,
}

impl ModelLoader {
    /// Create an unloaded model loader.
    pub fn new(config: ModelLoaderConfig) -> Self {
        Self {
            config,
            classifier: RwLock::new(None),
            encoders: RwLock::new(None),
        }
    }

    /// Load the classifier, reporting failure as `false`.
    ///
    /// A failed attempt keeps any previously loaded classifier.
    pub fn load_model(&self) -> bool {
        let path = &self.config.model_path;
        match self.try_load_model() {
            Ok(()) => {
                info!("Model loaded from {}", path.display());
                true
            }
            Err(ServingError::ArtifactNotFound(_)) => {
                warn!("Model file not found: {}", path.display());
                false
            }
            Err(e) => {
                error!("Error while loading model from {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Load the encoder set, reporting failure as `false`.
    pub fn load_encoders(&self) -> bool {
        let path = &self.config.encoders_path;
        match self.try_load_encoders() {
            Ok(()) => {
                info!("Encoders loaded from {}", path.display());
                true
            }
            Err(ServingError::ArtifactNotFound(_)) => {
                warn!("Encoders file not found: {}", path.display());
                false
            }
            Err(e) => {
                error!("Error while loading encoders from {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Load the classifier from the configured path.
    pub fn try_load_model(&self) -> ServingResult<()> {
        let artifact = ClassifierArtifact::from_path(&self.config.model_path)?;
        self.install_model(Arc::new(artifact));
        Ok(())
    }

    /// Load the encoder set from the configured path.
    pub fn try_load_encoders(&self) -> ServingResult<()> {
        let encoders = EncoderSet::from_path(&self.config.encoders_path)?;
        debug!("Loaded {} categorical encoders", encoders.len());
        self.install_encoders(encoders);
        Ok(())
    }

    /// Replace the classifier with an already constructed one.
    pub fn install_model(&self, classifier: Arc<dyn Classifier>) {
        *self.classifier.write() = Some(classifier);
    }

    /// Replace the encoder set.
    pub fn install_encoders(&self, encoders: EncoderSet) {
        *self.encoders.write() = Some(Arc::new(encoders));
    }

    /// Encode a feature record into a single classifier row.
    ///
    /// Categorical columns with an encoder are replaced by their codes;
    /// everything else passes through unchanged.
    pub fn preprocess(&self, record: &FeatureRecord) -> ServingResult<EncodedRecord> {
        let encoders = self.encoders.read().clone();
        encode_record(record, encoders.as_deref())
    }

    /// Predict the churn label and churn probability for a record.
    ///
    /// # Errors
    ///
    /// Returns [`ServingError::ModelNotLoaded`] if no classifier is loaded.
    pub fn predict(&self, record: &FeatureRecord) -> ServingResult<Prediction> {
        let classifier = self
            .classifier
            .read()
            .clone()
            .ok_or(ServingError::ModelNotLoaded)?;

        let row = self.preprocess(record)?;
        let label = ChurnLabel::from_class(classifier.predict(&row)?)?;
        let proba = classifier.predict_proba(&row)?;
        let churn_probability = positive_class_probability(&proba)?;
        if !churn_probability.is_finite() {
            return Err(ServingError::prediction(format!(
                "classifier returned a non-finite probability: {churn_probability}"
            )));
        }

        debug!(
            "Model prediction: label={:?} churn_probability={:.4}",
            label, churn_probability
        );
        Ok(Prediction::new(label, churn_probability))
    }

    /// Whether a classifier is currently held.
    pub fn is_loaded(&self) -> bool {
        self.classifier.read().is_some()
    }

    /// Whether an encoder set is currently held.
    pub fn encoders_loaded(&self) -> bool {
        self.encoders.read().is_some()
    }

    /// Get the current classifier.
    pub fn current_model(&self) -> Option<Arc<dyn Classifier>> {
        self.classifier.read().clone()
    }

    /// Get the current encoder set.
    pub fn current_encoders(&self) -> Option<Arc<EncoderSet>> {
        self.encoders.read().clone()
    }

    /// Drop both artifacts.
    pub fn unload(&self) {
        let mut classifier = self.classifier.write();
        if classifier.is_some() {
            info!("Unloading current model");
            *classifier = None;
        }
        *self.encoders.write() = None;
    }

    /// Path of the classifier artifact.
    pub fn model_path(&self) -> &Path {
        &self.config.model_path
    }

    /// Get the loader configuration.
    pub fn config(&self) -> &ModelLoaderConfig {
        &self.config
    }
}

impl std::fmt::Debug for ModelLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelLoader")
            .field("config", &self.config)
            .field("has_model", &self.is_loaded())
            .field("has_encoders", &self.encoders_loaded())
            .finish()
    }
}

/// Encode `record` with an optional encoder set.
pub fn encode_record(
    record: &FeatureRecord,
    encoders: Option<&EncoderSet>,
) -> ServingResult<EncodedRecord> {
    let mut row = EncodedRecord::from_record(record);
    let Some(encoders) = encoders.filter(|set| !set.is_empty()) else {
        return Ok(row);
    };

    for column in CATEGORICAL_COLUMNS {
        let Some(encoder) = encoders.get(column) else {
            continue;
        };
        let value = match row.get(column) {
            Some(FeatureValue::Text(value)) => value.clone(),
            _ => continue,
        };
        let code = encoder
            .transform(&value)
            .ok_or_else(|| ServingError::UnknownCategory {
                column: column.to_string(),
                value,
            })?;
        row.set(column, FeatureValue::Int(code));
    }

    Ok(row)
}
