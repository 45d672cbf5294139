use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::artifacts::{Regressor, Scaler};
use super::service::{PredictionError, SalesPredictionService};
use super::validation::ValidationError;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Sales Prediction API. Use POST /predict with the required fields.";

/// Router exposing the welcome and prediction endpoints.
pub fn prediction_router<S, M>(service: Arc<SalesPredictionService<S, M>>) -> Router
where
    S: Scaler + 'static,
    M: Regressor + 'static,
{
    Router::new()
        .route("/", get(welcome_handler))
        .route("/predict", post(predict_handler::<S, M>))
        .with_state(service)
}

pub(crate) async fn welcome_handler() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

pub(crate) async fn predict_handler<S, M>(
    State(service): State<Arc<SalesPredictionService<S, M>>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response
where
    S: Scaler + 'static,
    M: Regressor + 'static,
{
    let payload = match payload {
        Ok(Json(payload)) => payload,
        Err(rejection) => {
            debug!(%rejection, "unparseable prediction body");
            return error_response(PredictionError::Validation(
                ValidationError::MalformedPayload,
            ));
        }
    };

    match service.predict(&payload) {
        Ok(outcome) => (StatusCode::OK, Json(outcome.response())).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) fn error_response(err: PredictionError) -> Response {
    match err {
        PredictionError::Validation(ValidationError::MissingFields(ref missing)) => {
            let payload = json!({
                "error": err.to_string(),
                "missing": missing,
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        err if err.is_client_error() => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        other => {
            error!(error = %other, "prediction failed");
            let payload = json!({
                "error": "Internal server error",
                "details": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}
