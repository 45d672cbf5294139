//! Daily sales prediction for a single store.
//!
//! A payload flows through [`validation`], the zero-sales rule in [`rules`], the
//! fixed-order encoder in [`features`], and finally the fitted [`artifacts`]. The
//! [`service`] sequences those steps and [`router`] exposes them over HTTP.

pub mod artifacts;
pub mod batch;
pub mod features;
pub mod request;
pub mod router;
pub mod rules;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use artifacts::{ArtifactError, Regressor, Scaler, StandardScaler, TreeEnsemble};
pub use batch::{BatchError, BatchRow, BatchScorer, BatchSummary};
pub use features::{encode, EncodingError, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use request::{DayOfWeek, PredictionRequest, StateHoliday, REQUIRED_FIELDS};
pub use router::prediction_router;
pub use rules::{ZeroSalesReason, LOW_TRAFFIC_THRESHOLD};
pub use service::{
    PredictionError, PredictionOutcome, PredictionResponse, SalesPredictionService,
};
pub use validation::{validate, ValidationError};
