use serde_json::{Map, Value};

use super::request::{
    DayOfWeek, PredictionRequest, StateHoliday, CUSTOMER_COUNT, DATE, DAY_OF_WEEK, OPEN,
    PROMOTION, REQUIRED_FIELDS, SCHOOL_HOLIDAY, STATE_HOLIDAY, STORE_ID,
};

/// Rejection raised before any numeric work happens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid or missing JSON payload")]
    MalformedPayload,
    #[error("Missing required fields")]
    MissingFields(Vec<&'static str>),
    #[error("{field} must be {constraint}")]
    InvalidField {
        field: &'static str,
        constraint: &'static str,
    },
}

impl ValidationError {
    fn invalid(field: &'static str, constraint: &'static str) -> Self {
        Self::InvalidField { field, constraint }
    }
}

/// Turns an untrusted JSON value into a typed request.
///
/// Every absent key is reported at once. Type and domain checks stop at the first
/// offending field, in [`REQUIRED_FIELDS`] order except that the three flags are
/// checked before `state_holiday`.
pub fn validate(payload: &Value) -> Result<PredictionRequest, ValidationError> {
    let object = payload
        .as_object()
        .ok_or(ValidationError::MalformedPayload)?;

    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|key| !object.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    let store_id = non_negative(object, STORE_ID)
        .ok_or_else(|| ValidationError::invalid(STORE_ID, "a positive integer"))?;

    let day_of_week = non_negative(object, DAY_OF_WEEK)
        .and_then(|value| u8::try_from(value).ok())
        .and_then(DayOfWeek::new)
        .ok_or_else(|| ValidationError::invalid(DAY_OF_WEEK, "an integer between 1 and 7"))?;

    let date = object[DATE]
        .as_str()
        .ok_or_else(|| ValidationError::invalid(DATE, "a string in format DD/MM/YYYY"))?
        .to_string();

    let customer_count = non_negative(object, CUSTOMER_COUNT)
        .ok_or_else(|| ValidationError::invalid(CUSTOMER_COUNT, "a positive integer"))?;

    let is_open = flag(object, OPEN)?;
    let has_promotion = flag(object, PROMOTION)?;
    let school_holiday = flag(object, SCHOOL_HOLIDAY)?;

    let state_holiday = object[STATE_HOLIDAY]
        .as_str()
        .and_then(StateHoliday::from_code)
        .ok_or_else(|| {
            ValidationError::invalid(STATE_HOLIDAY, "one of: '0', 'a', 'b', 'c'")
        })?;

    Ok(PredictionRequest {
        store_id,
        day_of_week,
        date,
        customer_count,
        is_open,
        has_promotion,
        state_holiday,
        school_holiday,
    })
}

// Floats (even 1.0), booleans, and negatives all yield None. serde_json reads `-0`
// as the float -0.0 and has no integer wider than u64, so both are rejected too.
fn non_negative(object: &Map<String, Value>, key: &str) -> Option<u64> {
    object.get(key).and_then(Value::as_u64)
}

fn flag(object: &Map<String, Value>, key: &'static str) -> Result<bool, ValidationError> {
    match non_negative(object, key) {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => Err(ValidationError::invalid(key, "0 or 1")),
    }
}
