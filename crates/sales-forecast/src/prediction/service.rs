use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use super::artifacts::{ArtifactError, Regressor, Scaler};
use super::features::{encode, EncodingError, FeatureVector};
use super::request::PredictionRequest;
use super::rules::{
    is_low_traffic, zero_sales_reason, ZeroSalesReason, LOW_TRAFFIC_WARNING, SHORTCUT_MESSAGE,
};
use super::validation::{validate, ValidationError};

/// Orchestrates validation, the zero-sales rule, encoding, scaling, and inference.
///
/// Holds the loaded artifacts read-only, so a single instance can serve any number
/// of concurrent requests.
pub struct SalesPredictionService<S, M> {
    scaler: Arc<S>,
    regressor: Arc<M>,
}

impl<S, M> SalesPredictionService<S, M>
where
    S: Scaler + 'static,
    M: Regressor + 'static,
{
    pub fn new(scaler: Arc<S>, regressor: Arc<M>) -> Self {
        Self { scaler, regressor }
    }

    /// Runs the full pipeline on an untrusted payload.
    pub fn predict(&self, payload: &Value) -> Result<PredictionOutcome, PredictionError> {
        let request = validate(payload).inspect_err(|err| {
            debug!(error = %err, "rejected prediction payload");
        })?;
        self.predict_request(&request)
    }

    /// Runs everything after validation.
    pub fn predict_request(
        &self,
        request: &PredictionRequest,
    ) -> Result<PredictionOutcome, PredictionError> {
        if let Some(reason) = zero_sales_reason(request) {
            debug!(
                store_id = request.store_id,
                reason = reason.label(),
                "zero-sales rule applied"
            );
            return Ok(PredictionOutcome::ZeroSales { reason });
        }

        let features = encode(request)?;
        let scaled = self.scale(&features)?;
        let raw = self.regress(scaled)?;

        let low_traffic = is_low_traffic(request);
        if low_traffic {
            debug!(
                store_id = request.store_id,
                customers = request.customer_count,
                "prediction made on low customer traffic"
            );
        }

        Ok(PredictionOutcome::Modelled {
            sales: round_to_cents(raw),
            low_traffic,
        })
    }

    fn scale(&self, features: &FeatureVector) -> Result<Vec<f64>, PredictionError> {
        let mut rows = self
            .scaler
            .transform(&[features.to_row()])
            .inspect_err(|err| error!(error = %err, "scaler failed"))?;
        if rows.len() != 1 {
            return Err(PredictionError::Internal(format!(
                "scaler returned {} rows for a single input row",
                rows.len()
            )));
        }
        let row = rows.swap_remove(0);
        if row.len() != features.as_slice().len() {
            return Err(ArtifactError::ShapeMismatch {
                expected: features.as_slice().len(),
                found: row.len(),
            }
            .into());
        }
        Ok(row)
    }

    fn regress(&self, scaled: Vec<f64>) -> Result<f64, PredictionError> {
        let predictions = self
            .regressor
            .predict(&[scaled])
            .inspect_err(|err| error!(error = %err, "regressor failed"))?;
        match predictions.as_slice() {
            [value] if value.is_finite() => Ok(*value),
            [value] => Err(PredictionError::Internal(format!(
                "model produced a non-finite prediction ({value})"
            ))),
            other => Err(PredictionError::Internal(format!(
                "model returned {} predictions for a single input row",
                other.len()
            ))),
        }
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionOutcome {
    ZeroSales { reason: ZeroSalesReason },
    Modelled { sales: f64, low_traffic: bool },
}

impl PredictionOutcome {
    pub fn sales(&self) -> f64 {
        match self {
            Self::ZeroSales { .. } => 0.0,
            Self::Modelled { sales, .. } => *sales,
        }
    }

    pub fn response(&self) -> PredictionResponse {
        match *self {
            Self::ZeroSales { .. } => PredictionResponse {
                prediction: 0.0,
                message: Some(SHORTCUT_MESSAGE),
                warning: None,
            },
            Self::Modelled { sales, low_traffic } => PredictionResponse {
                prediction: sales,
                message: None,
                warning: low_traffic.then_some(LOW_TRAFFIC_WARNING),
            },
        }
    }
}

/// Body returned to callers on success.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResponse {
    pub prediction: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
}

/// Error raised by the prediction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Encoding(#[from] EncodingError),
    #[error(transparent)]
    Artifact(#[from] ArtifactError),
    #[error("{0}")]
    Internal(String),
}

impl PredictionError {
    /// Whether the caller can fix the request and resend it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Encoding(_))
    }
}

/// Two decimal places, rounding the exact binary value with ties to even.
///
/// Formatting with a fixed precision is correctly rounded, so `2.675` (stored as
/// `2.67499...`) becomes `2.67` and the exact tie `0.125` becomes `0.12`.
pub fn round_to_cents(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
