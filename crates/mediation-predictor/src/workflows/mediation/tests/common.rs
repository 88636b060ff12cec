use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::mediation::encoder::{CategoryEncoder, CategoryField, EncoderStore};
use crate::workflows::mediation::features::{CaseInput, FeatureVector};
use crate::workflows::mediation::model::{Classifier, ModelStore};
use crate::workflows::mediation::service::MediationPredictor;

/// Classifier returning a fixed probability and counting invocations.
pub(super) struct FixedClassifier {
    probability: f64,
    calls: Arc<AtomicUsize>,
}

impl Classifier for FixedClassifier {
    fn score(&self, _features: &FeatureVector) -> f64 {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.probability
    }
}

pub(super) struct Harness {
    pub(super) predictor: Arc<MediationPredictor>,
    pub(super) proceed_calls: Arc<AtomicUsize>,
    pub(super) settled_calls: Arc<AtomicUsize>,
}

impl Harness {
    pub(super) fn proceed_calls(&self) -> usize {
        self.proceed_calls.load(Ordering::SeqCst)
    }

    pub(super) fn settled_calls(&self) -> usize {
        self.settled_calls.load(Ordering::SeqCst)
    }
}

pub(super) fn encoders() -> EncoderStore {
    EncoderStore::new(
        CategoryEncoder::new(
            CategoryField::TypeOfIntake,
            vec![
                "Community".to_string(),
                "Consumer".to_string(),
                "Court Referral".to_string(),
            ],
        )
        .expect("intake encoder"),
        CategoryEncoder::new(
            CategoryField::TypeOfDispute,
            vec![
                "Billing".to_string(),
                "Contract".to_string(),
                "Neighbor".to_string(),
            ],
        )
        .expect("dispute encoder"),
    )
}

pub(super) fn harness(proceed: f64, settled: f64) -> Harness {
    let proceed_calls = Arc::new(AtomicUsize::new(0));
    let settled_calls = Arc::new(AtomicUsize::new(0));
    let models = ModelStore::new(
        Box::new(FixedClassifier {
            probability: proceed,
            calls: proceed_calls.clone(),
        }),
        Box::new(FixedClassifier {
            probability: settled,
            calls: settled_calls.clone(),
        }),
    );

    Harness {
        predictor: Arc::new(MediationPredictor::new(encoders(), models)),
        proceed_calls,
        settled_calls,
    }
}

pub(super) fn saturday_case(intake: &str, dispute: &str) -> CaseInput {
    CaseInput {
        date_registered: NaiveDate::from_ymd_opt(2024, 1, 6).expect("valid date"),
        type_of_intake: intake.to_string(),
        type_of_dispute: dispute.to_string(),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
