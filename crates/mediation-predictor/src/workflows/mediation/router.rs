use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::decision::{DisplayState, ProceedBand};
use super::encoder::CategoryField;
use super::features::{parse_date, CaseInput, FeatureVector};
use super::service::{MediationPredictor, Prediction, PredictionError};
use super::views::{panels, ResultPanel};

/// JSON body accepted by the prediction endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PredictionRequest {
    #[serde(default)]
    pub date_registered: Option<String>,
    pub type_of_intake: String,
    pub type_of_dispute: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub date_registered: NaiveDate,
    pub type_of_intake: String,
    pub type_of_dispute: String,
    pub features: FeatureVector,
    pub proceed_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settled_probability: Option<f64>,
    pub band: ProceedBand,
    pub display: DisplayState,
    pub panels: Vec<ResultPanel>,
}

impl From<Prediction> for PredictionView {
    fn from(prediction: Prediction) -> Self {
        let Prediction {
            input,
            features,
            proceed_probability,
            settled_probability,
            display,
        } = prediction;

        Self {
            date_registered: input.date_registered,
            type_of_intake: input.type_of_intake,
            type_of_dispute: input.type_of_dispute,
            features,
            proceed_probability,
            settled_probability,
            band: display.band(),
            panels: panels(&display),
            display,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoriesView {
    pub intake: Vec<String>,
    pub dispute: Vec<String>,
}

/// Router exposing the JSON prediction API over a shared predictor.
pub fn prediction_router(predictor: Arc<MediationPredictor>) -> Router {
    Router::new()
        .route("/api/v1/mediation/categories", get(categories_handler))
        .route("/api/v1/mediation/predictions", post(predict_handler))
        .with_state(predictor)
}

pub(crate) async fn categories_handler(
    State(predictor): State<Arc<MediationPredictor>>,
) -> axum::Json<CategoriesView> {
    axum::Json(CategoriesView {
        intake: predictor
            .known_categories(CategoryField::TypeOfIntake)
            .to_vec(),
        dispute: predictor
            .known_categories(CategoryField::TypeOfDispute)
            .to_vec(),
    })
}

pub(crate) async fn predict_handler(
    State(predictor): State<Arc<MediationPredictor>>,
    axum::Json(request): axum::Json<PredictionRequest>,
) -> Response {
    let parsed = request
        .date_registered
        .as_deref()
        .ok_or_else(|| "date_registered is required (YYYY-MM-DD)".to_string())
        .and_then(parse_date);
    let date_registered = match parsed {
        Ok(date) => date,
        Err(message) => {
            let payload = json!({ "error": message });
            return (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response();
        }
    };

    let input = CaseInput {
        date_registered,
        type_of_intake: request.type_of_intake,
        type_of_dispute: request.type_of_dispute,
    };

    match predictor.predict(&input) {
        Ok(prediction) => {
            let view = PredictionView::from(prediction);
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(PredictionError::UnseenCategory(unseen)) => {
            let payload = json!({
                "error": unseen.to_string(),
                "field": unseen.field,
                "value": unseen.value,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        Err(other) => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
