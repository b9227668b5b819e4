use serde::Serialize;

use crate::models::trip_plan::TripPlan;

#[derive(Debug, Serialize)]
pub struct GenerateTripResponse {
    pub success: bool,
    pub data: TripPlan,
    pub message: String,
}

/// Uniform error envelope for failed pipeline runs. `response_sample`
/// carries the head of the raw model text so prompt/model drift can be
/// diagnosed from client-side bug reports.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub details: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_sample: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: &str, details: String, response_sample: Option<String>) -> Self {
        Self {
            success: false,
            error: error.to_string(),
            details,
            timestamp: chrono::Utc::now().to_rfc3339(),
            response_sample,
        }
    }
}
