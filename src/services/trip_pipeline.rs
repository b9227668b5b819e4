use std::error::Error;
use std::fmt;

use crate::models::trip_plan::TripPlan;
use crate::services::json_repair::{self, JsonRepairError};
use crate::services::normalizer;
use crate::services::validator::{self, ValidationError};

#[derive(Debug)]
pub enum RecoveryError {
    Repair(JsonRepairError),
    Validation(ValidationError),
}

impl RecoveryError {
    /// Sample of the raw model text for the error envelope. Only repair
    /// failures carry one; a validation failure means the text parsed fine
    /// and its shape is already described by the error itself.
    pub fn response_sample(&self) -> Option<String> {
        match self {
            RecoveryError::Repair(err) => Some(err.sample.clone()),
            RecoveryError::Validation(_) => None,
        }
    }
}

impl fmt::Display for RecoveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecoveryError::Repair(err) => err.fmt(f),
            RecoveryError::Validation(err) => err.fmt(f),
        }
    }
}

impl Error for RecoveryError {}

/// Runs the text-to-plan recovery stages in order: normalize the raw model
/// output, repair and parse it, then validate the top-level shape.
/// Enrichment is separate; it needs the photo client.
pub fn recover_trip_plan(raw: &str) -> Result<TripPlan, RecoveryError> {
    let candidate = normalizer::normalize_response(raw);
    let value = json_repair::repair_and_parse(&candidate).map_err(RecoveryError::Repair)?;
    validator::validate_trip_plan(value).map_err(RecoveryError::Validation)
}
