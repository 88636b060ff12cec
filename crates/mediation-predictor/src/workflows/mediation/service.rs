use serde::Serialize;
use tracing::{debug, warn};

use super::decision::{decide, DisplayState, ProceedBand};
use super::encoder::{CategoryField, EncoderStore, UnseenCategory};
use super::features::{self, CaseInput, FeatureVector};
use super::model::{ModelKind, ModelStore};

/// Immutable context holding the fitted encoders and both classifiers.
///
/// Built once at startup and shared by reference with every request.
pub struct MediationPredictor {
    encoders: EncoderStore,
    models: ModelStore,
}

/// Everything computed for one submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub input: CaseInput,
    pub features: FeatureVector,
    pub proceed_probability: f64,
    pub settled_probability: Option<f64>,
    pub display: DisplayState,
}

/// Per-submission failures; the predictor stays usable after any of them.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    UnseenCategory(#[from] UnseenCategory),
    #[error("{} model returned {value}, expected a probability in [0, 1]", .model.label())]
    InvalidProbability { model: ModelKind, value: f64 },
}

impl MediationPredictor {
    pub fn new(encoders: EncoderStore, models: ModelStore) -> Self {
        Self { encoders, models }
    }

    pub fn known_categories(&self, field: CategoryField) -> &[String] {
        self.encoders.known_categories(field)
    }

    pub fn build_features(&self, input: &CaseInput) -> Result<FeatureVector, UnseenCategory> {
        features::build(input, &self.encoders)
    }

    /// Score a case and choose what to display.
    ///
    /// The settlement model only runs when the proceed probability reaches the
    /// borderline floor.
    pub fn predict(&self, input: &CaseInput) -> Result<Prediction, PredictionError> {
        let features = self.build_features(input).map_err(|err| {
            warn!(field = err.field.key(), value = %err.value, "rejected unseen category");
            err
        })?;

        let proceed_probability = self.score(ModelKind::ProceedToMediation, &features)?;
        let band = ProceedBand::classify(proceed_probability);
        let settled_probability = if band.requires_settlement() {
            Some(self.score(ModelKind::SettledGivenMediation, &features)?)
        } else {
            None
        };

        let display = decide(proceed_probability, settled_probability);
        debug!(
            ?band,
            proceed_probability,
            ?settled_probability,
            is_weekend = features.is_weekend,
            "case scored"
        );

        Ok(Prediction {
            input: input.clone(),
            features,
            proceed_probability,
            settled_probability,
            display,
        })
    }

    fn score(&self, kind: ModelKind, features: &FeatureVector) -> Result<f64, PredictionError> {
        let value = self.models.model(kind).score(features);
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(PredictionError::InvalidProbability { model: kind, value })
        }
    }
}
