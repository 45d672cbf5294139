use super::common::*;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::prediction::router::{predict_handler, prediction_router, WELCOME_MESSAGE};
use crate::prediction::service::SalesPredictionService;

async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("body is json")
}

fn post_predict(body: impl Into<Body>) -> Request<Body> {
    Request::post("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request builds")
}

#[tokio::test]
async fn welcome_route_returns_static_message() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(Request::get("/").body(Body::empty()).expect("request builds"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "message": WELCOME_MESSAGE }));
}

#[tokio::test]
async fn predict_route_returns_rounded_prediction() {
    let (service, _, _) = build_service(7045.678);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict(payload().to_string()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({ "prediction": 7045.68 }));
}

#[tokio::test]
async fn predict_route_warns_on_low_traffic() {
    let (service, _, _) = build_service(950.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict(
            payload_with("nb_customers_on_day", json!(120)).to_string(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "prediction": 950.0,
            "warning": "Very few customers on this day. Prediction may be unreliable."
        })
    );
}

#[tokio::test]
async fn predict_route_short_circuits_closed_stores() {
    let (service, scaler, _) = build_service(950.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict(payload_with("open", json!(0)).to_string()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "prediction": 0.0,
            "message": "Store is closed or has no customers. Sales prediction is set to 0."
        })
    );
    assert_eq!(scaler.calls(), 0);
}

#[tokio::test]
async fn predict_route_lists_missing_fields() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict(json!({ "store_ID": 3, "open": 1 }).to_string()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "Missing required fields",
            "missing": [
                "day_of_week",
                "date",
                "nb_customers_on_day",
                "promotion",
                "state_holiday",
                "school_holiday"
            ]
        })
    );
}

#[tokio::test]
async fn predict_route_names_invalid_field() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict(payload_with("day_of_week", json!(8)).to_string()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "day_of_week must be an integer between 1 and 7" })
    );
}

#[tokio::test]
async fn predict_route_rejects_bad_dates() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict(
            payload_with("date", json!("2015-06-15")).to_string(),
        ))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "date must be in format DD/MM/YYYY" })
    );
}

#[tokio::test]
async fn predict_route_rejects_unparseable_bodies() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict("{\"store_ID\": 1,"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "Invalid or missing JSON payload" })
    );
}

#[tokio::test]
async fn predict_route_rejects_non_json_content_type() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let request = Request::post("/predict")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from(payload().to_string()))
        .expect("request builds");
    let response = router.oneshot(request).await.expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_route_rejects_json_arrays() {
    let (service, _, _) = build_service(1.0);
    let router = prediction_router(service);

    let response = router
        .oneshot(post_predict("[1, 2, 3]"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn predict_handler_maps_collaborator_failures_to_internal_error() {
    let service = Arc::new(SalesPredictionService::new(
        Arc::new(RecordingScaler::default()),
        Arc::new(FailingRegressor),
    ));

    let response = predict_handler::<RecordingScaler, FailingRegressor>(
        State(service),
        Ok(axum::Json(payload())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await,
        json!({
            "error": "Internal server error",
            "details": "invalid artifact: booster unavailable"
        })
    );
}
