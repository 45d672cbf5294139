//! Encoding of validated requests into the fixed-order model input.
//!
//! The column layout below is the one the scaler and regressor were fitted on.
//! Reordering, inserting, or dropping a column silently corrupts predictions.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::request::{DayOfWeek, PredictionRequest, StateHoliday};

pub const FEATURE_COUNT: usize = 14;

pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "date_ordinal",
    "nb_customers_on_day",
    "promotion",
    "school_holiday",
    "open",
    "state_holiday_a",
    "state_holiday_b",
    "state_holiday_c",
    "day_of_week_2",
    "day_of_week_3",
    "day_of_week_4",
    "day_of_week_5",
    "day_of_week_6",
    "day_of_week_7",
];

pub const DATE_FORMAT: &str = "%d/%m/%Y";

const HOLIDAY_OFFSET: usize = 5;
const DAY_OF_WEEK_OFFSET: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("date must be in format DD/MM/YYYY")]
    InvalidDateFormat,
}

/// Model input row, laid out as [`FEATURE_NAMES`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn to_row(&self) -> Vec<f64> {
        self.0.to_vec()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|candidate| *candidate == name)
            .map(|index| self.0[index])
    }
}

pub fn encode(request: &PredictionRequest) -> Result<FeatureVector, EncodingError> {
    let date = parse_date(&request.date)?;

    let mut values = [0.0; FEATURE_COUNT];
    values[0] = date_ordinal(date) as f64;
    values[1] = request.customer_count as f64;
    values[2] = indicator(request.has_promotion);
    values[3] = indicator(request.school_holiday);
    values[4] = indicator(request.is_open);
    values[HOLIDAY_OFFSET..DAY_OF_WEEK_OFFSET]
        .copy_from_slice(&holiday_indicators(request.state_holiday.code()));
    values[DAY_OF_WEEK_OFFSET..].copy_from_slice(&day_of_week_indicators(request.day_of_week));

    Ok(FeatureVector(values))
}

/// Parses `DD/MM/YYYY`. Day and month may drop the leading zero; the year is
/// always four digits.
pub fn parse_date(raw: &str) -> Result<NaiveDate, EncodingError> {
    let mut parts = raw.split('/');
    let well_formed = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(day), Some(month), Some(year), None) => {
            digits(day, 1, 2) && digits(month, 1, 2) && digits(year, 4, 4)
        }
        _ => false,
    };
    if !well_formed {
        return Err(EncodingError::InvalidDateFormat);
    }

    let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map_err(|_| EncodingError::InvalidDateFormat)?;
    if date.year() < 1 {
        return Err(EncodingError::InvalidDateFormat);
    }
    Ok(date)
}

/// Proleptic Gregorian ordinal; 0001-01-01 is day 1.
pub fn date_ordinal(date: NaiveDate) -> i32 {
    date.num_days_from_ce()
}

/// Monday is the dropped reference column and encodes as all zeros.
pub fn day_of_week_indicators(day: DayOfWeek) -> [f64; 6] {
    let mut slots = [0.0; 6];
    if let Some(slot) = usize::from(day.number()).checked_sub(2) {
        slots[slot] = 1.0;
    }
    slots
}

/// No holiday is the dropped reference column. Codes outside the known set also
/// encode as no holiday rather than failing; validation keeps them from reaching
/// here today.
pub fn holiday_indicators(code: &str) -> [f64; 3] {
    match StateHoliday::from_code(code) {
        Some(StateHoliday::Public) => [1.0, 0.0, 0.0],
        Some(StateHoliday::Easter) => [0.0, 1.0, 0.0],
        Some(StateHoliday::Christmas) => [0.0, 0.0, 1.0],
        Some(StateHoliday::None) | None => [0.0; 3],
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

fn digits(part: &str, min: usize, max: usize) -> bool {
    (min..=max).contains(&part.len()) && part.bytes().all(|byte| byte.is_ascii_digit())
}
