use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Which categorical column a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryField {
    TypeOfIntake,
    TypeOfDispute,
}

impl CategoryField {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TypeOfIntake => "Type of Intake",
            Self::TypeOfDispute => "Type of Dispute",
        }
    }

    pub const fn key(self) -> &'static str {
        match self {
            Self::TypeOfIntake => "type_of_intake",
            Self::TypeOfDispute => "type_of_dispute",
        }
    }
}

impl fmt::Display for CategoryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A submitted value that the encoder never saw during training.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} '{value}' was not seen during training")]
pub struct UnseenCategory {
    pub field: CategoryField,
    pub value: String,
}

/// Reasons an encoder document cannot be turned into a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncoderError {
    #[error("encoder has no classes")]
    Empty,
    #[error("encoder lists class '{0}' more than once")]
    DuplicateClass(String),
}

/// Serialized form of a fitted label encoder.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EncoderDocument {
    pub classes: Vec<String>,
}

/// Fixed vocabulary for one categorical column; the code is the class index.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    field: CategoryField,
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl CategoryEncoder {
    pub fn new(field: CategoryField, classes: Vec<String>) -> Result<Self, EncoderError> {
        if classes.is_empty() {
            return Err(EncoderError::Empty);
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (index, class) in classes.iter().enumerate() {
            if codes.insert(class.clone(), index as u32).is_some() {
                return Err(EncoderError::DuplicateClass(class.clone()));
            }
        }

        Ok(Self {
            field,
            classes,
            codes,
        })
    }

    pub fn from_document(
        field: CategoryField,
        document: EncoderDocument,
    ) -> Result<Self, EncoderError> {
        Self::new(field, document.classes)
    }

    pub fn encode(&self, value: &str) -> Result<u32, UnseenCategory> {
        self.codes
            .get(value)
            .copied()
            .ok_or_else(|| UnseenCategory {
                field: self.field,
                value: value.to_string(),
            })
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    /// Classes in the order they were fit.
    pub fn known_categories(&self) -> &[String] {
        &self.classes
    }
}

/// Intake and dispute encoders, loaded together and never mutated.
#[derive(Debug, Clone)]
pub struct EncoderStore {
    intake: CategoryEncoder,
    dispute: CategoryEncoder,
}

impl EncoderStore {
    pub fn new(intake: CategoryEncoder, dispute: CategoryEncoder) -> Self {
        Self { intake, dispute }
    }

    pub fn encode(&self, intake: &str, dispute: &str) -> Result<(u32, u32), UnseenCategory> {
        let intake_code = self.intake.encode(intake)?;
        let dispute_code = self.dispute.encode(dispute)?;
        Ok((intake_code, dispute_code))
    }

    pub fn known_categories(&self, field: CategoryField) -> &[String] {
        self.encoder(field).known_categories()
    }

    pub fn encoder(&self, field: CategoryField) -> &CategoryEncoder {
        match field {
            CategoryField::TypeOfIntake => &self.intake,
            CategoryField::TypeOfDispute => &self.dispute,
        }
    }
}
