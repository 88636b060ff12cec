use super::common::*;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::workflows::mediation::router::{
    categories_handler, predict_handler, prediction_router, PredictionRequest,
};

fn request(date: &str, intake: &str, dispute: &str) -> PredictionRequest {
    PredictionRequest {
        date_registered: Some(date.to_string()),
        type_of_intake: intake.to_string(),
        type_of_dispute: dispute.to_string(),
    }
}

#[tokio::test]
async fn categories_handler_lists_fit_order() {
    let harness = harness(0.5, 0.5);
    let axum::Json(view) = categories_handler(State(harness.predictor.clone())).await;
    assert_eq!(view.intake, vec!["Community", "Consumer", "Court Referral"]);
    assert_eq!(view.dispute, vec!["Billing", "Contract", "Neighbor"]);
}

#[tokio::test]
async fn predict_handler_returns_panels_for_likely_case() {
    let harness = harness(0.62, 0.71);
    let response = predict_handler(
        State(harness.predictor.clone()),
        axum::Json(request("2024-01-06", "Consumer", "Billing")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["band"], "likely");
    assert_eq!(payload["features"]["is_weekend"], 1);
    assert_eq!(payload["display"]["state"], "proceed_likely");
    assert_eq!(payload["display"]["settlement"]["outlook"], "settled_likely");
    assert_eq!(payload["panels"][0]["percentage"], "62.00%");
    assert_eq!(payload["panels"][1]["percentage"], "71.00%");
}

#[tokio::test]
async fn predict_handler_omits_settlement_for_unlikely_case() {
    let harness = harness(0.1, 0.9);
    let response = predict_handler(
        State(harness.predictor.clone()),
        axum::Json(request("2024-01-08", "Consumer", "Billing")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["display"]["state"], "proceed_unlikely");
    assert!(payload.get("settled_probability").is_none());
    assert_eq!(payload["panels"].as_array().map(Vec::len), Some(1));
    assert_eq!(harness.settled_calls(), 0);
}

#[tokio::test]
async fn predict_handler_rejects_unseen_category() {
    let harness = harness(0.62, 0.71);
    let response = predict_handler(
        State(harness.predictor.clone()),
        axum::Json(request("2024-01-06", "Foo", "Billing")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["field"], "type_of_intake");
    assert_eq!(payload["value"], "Foo");
    assert_eq!(harness.proceed_calls(), 0);
}

#[tokio::test]
async fn predict_handler_rejects_malformed_date() {
    let harness = harness(0.62, 0.71);
    let response = predict_handler(
        State(harness.predictor.clone()),
        axum::Json(request("January 6th", "Consumer", "Billing")),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(harness.proceed_calls(), 0);
}

#[tokio::test]
async fn prediction_route_accepts_json_payloads() {
    let harness = harness(0.45, 0.55);
    let router = prediction_router(harness.predictor.clone());

    let response = router
        .oneshot(
            Request::post("/api/v1/mediation/predictions")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({
                        "date_registered": "2024-01-07",
                        "type_of_intake": "Court Referral",
                        "type_of_dispute": "Neighbor"
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["band"], "borderline");
    assert_eq!(payload["features"]["type_of_intake_code"], 2);
    assert_eq!(payload["features"]["type_of_dispute_code"], 2);
    assert_eq!(payload["panels"][1]["headline"], "Likely to be settled");
}

#[tokio::test]
async fn categories_route_is_mounted() {
    let harness = harness(0.5, 0.5);
    let response = prediction_router(harness.predictor.clone())
        .oneshot(
            Request::get("/api/v1/mediation/categories")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["intake"][1], "Consumer");
}

#[tokio::test]
async fn prediction_route_answers_missing_or_null_date_with_bad_request() {
    let harness = harness(0.62, 0.71);
    let bodies = [
        json!({ "type_of_intake": "Consumer", "type_of_dispute": "Billing" }),
        json!({
            "date_registered": null,
            "type_of_intake": "Consumer",
            "type_of_dispute": "Billing"
        }),
    ];

    for body in bodies {
        let response = prediction_router(harness.predictor.clone())
            .oneshot(
                Request::post("/api/v1/mediation/predictions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert!(payload["error"]
            .as_str()
            .is_some_and(|message| message.contains("date_registered is required")));
        assert!(payload.get("field").is_none());
    }

    assert_eq!(harness.proceed_calls(), 0);
}
