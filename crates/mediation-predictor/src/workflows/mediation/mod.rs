//! Mediation and settlement outlook for newly registered dispute cases.
//!
//! Raw case attributes are turned into the three-column feature vector the
//! trained classifiers expect, scored, and mapped onto a display state. The
//! settlement model is only consulted once the proceed probability reaches
//! the borderline band.

pub mod artifacts;
pub mod decision;
pub mod encoder;
pub mod features;
pub mod model;
pub mod router;
pub mod service;
pub mod views;

#[cfg(test)]
mod tests;

pub use artifacts::{load_predictor, Artifact, ArtifactLoadError};
pub use decision::{decide, DisplayState, ProceedBand, SettlementOutlook};
pub use encoder::{CategoryEncoder, CategoryField, EncoderStore, UnseenCategory};
pub use features::{is_weekend, CaseInput, FeatureVector, FEATURE_NAMES};
pub use model::{BoostedTreeClassifier, Classifier, ModelKind, ModelStore};
pub use router::{prediction_router, PredictionRequest, PredictionView};
pub use service::{MediationPredictor, Prediction, PredictionError};
pub use views::{format_percentage, panels, PanelKind, PanelTone, ResultPanel};
