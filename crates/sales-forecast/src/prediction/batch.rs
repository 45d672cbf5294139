use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};

use super::artifacts::{Regressor, Scaler};
use super::request::{
    CUSTOMER_COUNT, DAY_OF_WEEK, OPEN, PROMOTION, SCHOOL_HOLIDAY, STORE_ID,
};
use super::service::{PredictionError, PredictionOutcome, SalesPredictionService};

/// Columns whose cells become JSON integers when they parse as one. Everything
/// else, including `state_holiday`, stays textual.
const INTEGER_COLUMNS: [&str; 6] = [
    STORE_ID,
    DAY_OF_WEEK,
    CUSTOMER_COUNT,
    OPEN,
    PROMOTION,
    SCHOOL_HOLIDAY,
];

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("failed to read batch input: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid batch CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Outcome of one CSV data row.
#[derive(Debug)]
pub struct BatchRow {
    pub line: u64,
    pub result: Result<PredictionOutcome, PredictionError>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub modelled: usize,
    pub zero_sales: usize,
    pub rejected: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_rows(rows: &[BatchRow]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            match &row.result {
                Ok(PredictionOutcome::Modelled { .. }) => summary.modelled += 1,
                Ok(PredictionOutcome::ZeroSales { .. }) => summary.zero_sales += 1,
                Err(err) if err.is_client_error() => summary.rejected += 1,
                Err(_) => summary.failed += 1,
            }
            summary
        })
    }
}

/// Scores every row of a CSV whose headers are the request wire keys.
///
/// Row-level failures are recorded and scoring continues; unreadable CSV aborts.
pub struct BatchScorer;

impl BatchScorer {
    pub fn from_path<P, S, M>(
        path: P,
        service: &SalesPredictionService<S, M>,
    ) -> Result<Vec<BatchRow>, BatchError>
    where
        P: AsRef<Path>,
        S: Scaler + 'static,
        M: Regressor + 'static,
    {
        let file = File::open(path)?;
        Self::from_reader(file, service)
    }

    pub fn from_reader<R, S, M>(
        reader: R,
        service: &SalesPredictionService<S, M>,
    ) -> Result<Vec<BatchRow>, BatchError>
    where
        R: Read,
        S: Scaler + 'static,
        M: Regressor + 'static,
    {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut rows = Vec::new();

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, csv::Position::line);
            let payload = row_payload(&headers, &record);
            rows.push(BatchRow {
                line,
                result: service.predict(&payload),
            });
        }

        Ok(rows)
    }
}

/// Builds the JSON object the endpoint would have received for this row. Empty
/// cells are left out so they surface as missing fields.
pub fn row_payload(headers: &csv::StringRecord, record: &csv::StringRecord) -> Value {
    let mut object = Map::new();
    for (header, cell) in headers.iter().zip(record.iter()) {
        if cell.is_empty() {
            continue;
        }
        let value = if INTEGER_COLUMNS.contains(&header) {
            cell.parse::<i64>()
                .map(|number| Value::Number(Number::from(number)))
                .unwrap_or_else(|_| Value::String(cell.to_string()))
        } else {
            Value::String(cell.to_string())
        };
        object.insert(header.to_string(), value);
    }
    Value::Object(object)
}
