use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::encoder::{EncoderStore, UnseenCategory};

/// Column order both classifiers were trained on.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["is_weekend", "type_of_intake", "type_of_dispute"];
pub const FEATURE_COUNT: usize = 3;

/// Raw attributes of a newly registered case, as submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInput {
    pub date_registered: NaiveDate,
    pub type_of_intake: String,
    pub type_of_dispute: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub is_weekend: u8,
    pub type_of_intake_code: u32,
    pub type_of_dispute_code: u32,
}

impl FeatureVector {
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.is_weekend),
            f64::from(self.type_of_intake_code),
            f64::from(self.type_of_dispute_code),
        ]
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// 1 for Saturday and Sunday, 0 otherwise.
pub fn is_weekend(date: NaiveDate) -> u8 {
    u8::from(date.weekday().num_days_from_monday() >= 5)
}

pub fn build(input: &CaseInput, encoders: &EncoderStore) -> Result<FeatureVector, UnseenCategory> {
    let (type_of_intake_code, type_of_dispute_code) =
        encoders.encode(&input.type_of_intake, &input.type_of_dispute)?;

    Ok(FeatureVector {
        is_weekend: is_weekend(input.date_registered),
        type_of_intake_code,
        type_of_dispute_code,
    })
}
