use crate::infra::{parse_form_date, AppState};
use crate::page::{self, PageModel, PageOutcome};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Form, Json};
use chrono::{Local, NaiveDate};
use mediation_predictor::workflows::mediation::{
    panels, prediction_router, CaseInput, CategoryField, MediationPredictor, PredictionError,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

/// Fields posted by the predictor form.
#[derive(Debug, Deserialize)]
pub(crate) struct CaseForm {
    #[serde(default)]
    pub(crate) date_registered: Option<String>,
    pub(crate) type_of_intake: String,
    pub(crate) type_of_dispute: String,
}

pub(crate) fn with_prediction_routes(predictor: Arc<MediationPredictor>) -> axum::Router {
    prediction_router(predictor)
        .route("/", get(form_page))
        .route("/predict", post(submit_form))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

fn page_response(
    status: StatusCode,
    predictor: &MediationPredictor,
    date_registered: NaiveDate,
    selection: Option<(&str, &str)>,
    outcome: PageOutcome,
) -> Response {
    let html = page::render(&PageModel {
        intake_options: predictor.known_categories(CategoryField::TypeOfIntake),
        dispute_options: predictor.known_categories(CategoryField::TypeOfDispute),
        date_registered,
        selected_intake: selection.map(|(intake, _)| intake),
        selected_dispute: selection.map(|(_, dispute)| dispute),
        outcome,
    });
    (status, Html(html)).into_response()
}

pub(crate) async fn form_page(Extension(state): Extension<AppState>) -> Response {
    let today = Local::now().date_naive();
    page_response(
        StatusCode::OK,
        &state.predictor,
        today,
        None,
        PageOutcome::Blank,
    )
}

pub(crate) async fn submit_form(
    Extension(state): Extension<AppState>,
    Form(form): Form<CaseForm>,
) -> Response {
    let CaseForm {
        date_registered,
        type_of_intake,
        type_of_dispute,
    } = form;

    let today = Local::now().date_naive();
    let date_registered = match parse_form_date(date_registered.as_deref()) {
        Ok(date) => date.unwrap_or(today),
        Err(message) => {
            return page_response(
                StatusCode::BAD_REQUEST,
                &state.predictor,
                today,
                Some((type_of_intake.as_str(), type_of_dispute.as_str())),
                PageOutcome::Error(format!("Date of Registration is invalid: {message}")),
            );
        }
    };

    let input = CaseInput {
        date_registered,
        type_of_intake,
        type_of_dispute,
    };
    let selection = Some((input.type_of_intake.as_str(), input.type_of_dispute.as_str()));

    match state.predictor.predict(&input) {
        Ok(prediction) => page_response(
            StatusCode::OK,
            &state.predictor,
            input.date_registered,
            selection,
            PageOutcome::Panels(panels(&prediction.display)),
        ),
        Err(PredictionError::UnseenCategory(unseen)) => page_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            &state.predictor,
            input.date_registered,
            selection,
            PageOutcome::Error(format!(
                "Input contains categories not seen during training: {} '{}'",
                unseen.field, unseen.value
            )),
        ),
        Err(other) => {
            error!(error = %other, "prediction failed");
            page_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &state.predictor,
                input.date_registered,
                selection,
                PageOutcome::Error(format!("Prediction could not be completed: {other}")),
            )
        }
    }
}
