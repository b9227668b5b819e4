use serde_json::Value;
use std::error::Error;
use std::fmt;

use crate::models::trip_plan::TripPlan;

const REQUIRED_KEYS: [&str; 4] = ["tripDetails", "accommodation", "attractions", "dailyPlan"];

#[derive(Debug)]
pub enum ValidationError {
    NotAnObject,
    MissingField(String),
    InvalidShape(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotAnObject => {
                write!(f, "Model response is not a JSON object")
            }
            ValidationError::MissingField(name) => {
                write!(f, "Missing required property: {}", name)
            }
            ValidationError::InvalidShape(detail) => {
                write!(f, "Malformed trip plan: {}", detail)
            }
        }
    }
}

impl Error for ValidationError {}

/// A required key holding `null`, `false`, `0` or `""` is as useless to
/// consumers as one that is absent, so all of them count as missing.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Checks the repaired value against the required top-level shape and
/// converts it into a `TripPlan`. Presence-only: anything below the four
/// required containers is trusted from the model and consumed defensively
/// downstream.
pub fn validate_trip_plan(value: Value) -> Result<TripPlan, ValidationError> {
    let object = match value.as_object() {
        Some(object) => object,
        None => return Err(ValidationError::NotAnObject),
    };

    for key in REQUIRED_KEYS {
        match object.get(key) {
            None => return Err(ValidationError::MissingField(key.to_string())),
            Some(value) if is_falsy(value) => {
                return Err(ValidationError::MissingField(key.to_string()))
            }
            _ => {}
        }
    }

    serde_json::from_value(value).map_err(|err| ValidationError::InvalidShape(err.to_string()))
}
