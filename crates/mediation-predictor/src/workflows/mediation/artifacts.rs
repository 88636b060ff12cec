use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::info;

use super::encoder::{
    CategoryEncoder, CategoryField, EncoderDocument, EncoderError, EncoderStore,
};
use super::model::{BoostedTreeClassifier, EnsembleDocument, ModelError, ModelStore};
use super::service::MediationPredictor;
use crate::config::ArtifactConfig;

/// The four files the predictor cannot run without.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    ProceedModel,
    SettledModel,
    IntakeEncoder,
    DisputeEncoder,
}

impl Artifact {
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProceedModel => "proceed-to-mediation model",
            Self::SettledModel => "settled-given-mediation model",
            Self::IntakeEncoder => "intake encoder",
            Self::DisputeEncoder => "dispute encoder",
        }
    }

    pub fn path(self, config: &ArtifactConfig) -> PathBuf {
        match self {
            Self::ProceedModel => config.proceed_model_path(),
            Self::SettledModel => config.settled_model_path(),
            Self::IntakeEncoder => config.intake_encoder_path(),
            Self::DisputeEncoder => config.dispute_encoder_path(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactLoadError {
    #[error("required {} not found at {}", .artifact.label(), .path.display())]
    Missing { artifact: Artifact, path: PathBuf },
    #[error("could not read {} at {}: {source}", .artifact.label(), .path.display())]
    Unreadable {
        artifact: Artifact,
        path: PathBuf,
        source: io::Error,
    },
    #[error("{} at {} is not valid JSON: {source}", .artifact.label(), .path.display())]
    Malformed {
        artifact: Artifact,
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} at {} is unusable: {source}", .artifact.label(), .path.display())]
    InvalidEncoder {
        artifact: Artifact,
        path: PathBuf,
        source: EncoderError,
    },
    #[error("{} at {} is unusable: {source}", .artifact.label(), .path.display())]
    InvalidModel {
        artifact: Artifact,
        path: PathBuf,
        source: ModelError,
    },
}

impl ArtifactLoadError {
    pub fn artifact(&self) -> Artifact {
        match self {
            Self::Missing { artifact, .. }
            | Self::Unreadable { artifact, .. }
            | Self::Malformed { artifact, .. }
            | Self::InvalidEncoder { artifact, .. }
            | Self::InvalidModel { artifact, .. } => *artifact,
        }
    }
}

fn read_document<T: DeserializeOwned>(
    artifact: Artifact,
    path: &Path,
) -> Result<T, ArtifactLoadError> {
    let raw = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ArtifactLoadError::Missing {
                artifact,
                path: path.to_path_buf(),
            }
        } else {
            ArtifactLoadError::Unreadable {
                artifact,
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    serde_json::from_str(&raw).map_err(|source| ArtifactLoadError::Malformed {
        artifact,
        path: path.to_path_buf(),
        source,
    })
}

fn load_encoder(
    config: &ArtifactConfig,
    artifact: Artifact,
    field: CategoryField,
) -> Result<CategoryEncoder, ArtifactLoadError> {
    let path = artifact.path(config);
    let document: EncoderDocument = read_document(artifact, &path)?;
    CategoryEncoder::from_document(field, document).map_err(|source| {
        ArtifactLoadError::InvalidEncoder {
            artifact,
            path,
            source,
        }
    })
}

fn load_model(
    config: &ArtifactConfig,
    artifact: Artifact,
) -> Result<BoostedTreeClassifier, ArtifactLoadError> {
    let path = artifact.path(config);
    let document: EnsembleDocument = read_document(artifact, &path)?;
    BoostedTreeClassifier::from_document(document).map_err(|source| {
        ArtifactLoadError::InvalidModel {
            artifact,
            path,
            source,
        }
    })
}

/// Load all four artifacts; the first failure aborts the load.
pub fn load_predictor(config: &ArtifactConfig) -> Result<MediationPredictor, ArtifactLoadError> {
    let intake = load_encoder(config, Artifact::IntakeEncoder, CategoryField::TypeOfIntake)?;
    let dispute = load_encoder(config, Artifact::DisputeEncoder, CategoryField::TypeOfDispute)?;
    let proceed = load_model(config, Artifact::ProceedModel)?;
    let settled = load_model(config, Artifact::SettledModel)?;

    info!(
        artifact_dir = %config.dir.display(),
        intake_categories = intake.known_categories().len(),
        dispute_categories = dispute.known_categories().len(),
        proceed_trees = proceed.tree_count(),
        settled_trees = settled.tree_count(),
        "prediction artifacts loaded"
    );

    Ok(MediationPredictor::new(
        EncoderStore::new(intake, dispute),
        ModelStore::new(Box::new(proceed), Box::new(settled)),
    ))
}

impl MediationPredictor {
    pub fn load(config: &ArtifactConfig) -> Result<Self, ArtifactLoadError> {
        load_predictor(config)
    }
}
