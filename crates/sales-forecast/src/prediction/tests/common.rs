use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::prediction::artifacts::{ArtifactError, Regressor, Scaler};
use crate::prediction::request::{DayOfWeek, PredictionRequest, StateHoliday};
use crate::prediction::service::SalesPredictionService;

/// Identity scaler that counts how often it is consulted.
#[derive(Default)]
pub(super) struct RecordingScaler {
    calls: AtomicUsize,
}

impl RecordingScaler {
    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Scaler for RecordingScaler {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ArtifactError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(rows.to_vec())
    }
}

/// Regressor returning a fixed value and remembering the rows it saw.
pub(super) struct RecordingRegressor {
    value: f64,
    seen: Mutex<Vec<Vec<f64>>>,
}

impl RecordingRegressor {
    pub(super) fn returning(value: f64) -> Self {
        Self {
            value,
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn seen(&self) -> Vec<Vec<f64>> {
        self.seen.lock().expect("regressor mutex poisoned").clone()
    }
}

impl Regressor for RecordingRegressor {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError> {
        self.seen
            .lock()
            .expect("regressor mutex poisoned")
            .extend(rows.iter().cloned());
        Ok(vec![self.value; rows.len()])
    }
}

pub(super) struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn predict(&self, _rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError> {
        Err(ArtifactError::Invalid("booster unavailable".to_string()))
    }
}

pub(super) struct SilentRegressor;

impl Regressor for SilentRegressor {
    fn predict(&self, _rows: &[Vec<f64>]) -> Result<Vec<f64>, ArtifactError> {
        Ok(Vec::new())
    }
}

/// Scaler that drops the last column of every row.
pub(super) struct TruncatingScaler;

impl Scaler for TruncatingScaler {
    fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ArtifactError> {
        Ok(rows
            .iter()
            .map(|row| row[..row.len() - 1].to_vec())
            .collect())
    }
}

pub(super) type RecordingService = SalesPredictionService<RecordingScaler, RecordingRegressor>;

pub(super) fn build_service(
    value: f64,
) -> (
    Arc<RecordingService>,
    Arc<RecordingScaler>,
    Arc<RecordingRegressor>,
) {
    let scaler = Arc::new(RecordingScaler::default());
    let regressor = Arc::new(RecordingRegressor::returning(value));
    let service = Arc::new(SalesPredictionService::new(
        scaler.clone(),
        regressor.clone(),
    ));
    (service, scaler, regressor)
}

pub(super) fn payload() -> Value {
    json!({
        "store_ID": 1,
        "day_of_week": 3,
        "date": "15/06/2015",
        "nb_customers_on_day": 500,
        "open": 1,
        "promotion": 1,
        "state_holiday": "0",
        "school_holiday": 0
    })
}

pub(super) fn payload_with(key: &str, value: Value) -> Value {
    let mut payload = payload();
    payload
        .as_object_mut()
        .expect("payload is an object")
        .insert(key.to_string(), value);
    payload
}

pub(super) fn request() -> PredictionRequest {
    PredictionRequest {
        store_id: 1,
        day_of_week: DayOfWeek::new(3).expect("valid day"),
        date: "15/06/2015".to_string(),
        customer_count: 500,
        is_open: true,
        has_promotion: true,
        state_holiday: StateHoliday::None,
        school_holiday: false,
    }
}

/// Ordinal of 2015-06-15, 0001-01-01 being day 1.
pub(super) const JUNE_15_2015: f64 = 735_764.0;
