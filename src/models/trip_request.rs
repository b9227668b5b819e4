use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// User-submitted trip preferences. Deserialized once per request and
/// treated as immutable from there on.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TripRequest {
    #[serde(default)]
    pub origin: String,
    pub destination: String,
    pub travelers: Travelers,
    pub dates: TripDates,
    pub budget: Budget,
    pub transportation: TransportationPrefs,
    pub accommodation: AccommodationPrefs,
    pub activities: ActivityPrefs,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Travelers {
    pub count: u32,
    pub label: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripDates {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub duration: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Budget {
    pub level: BudgetLevel,
    pub allocations: BudgetAllocations,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum BudgetLevel {
    Budget,
    Moderate,
    Luxury,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct BudgetAllocations {
    pub transportation: u32,
    pub accommodation: u32,
    pub food: u32,
    pub activities: u32,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TransportationPrefs {
    /// Mode name -> preference weight, e.g. "train": "preferred"
    pub modes: HashMap<String, String>,
    pub route_preference: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AccommodationPrefs {
    #[serde(rename = "type")]
    pub kind: String,
    pub rating: u8,
    pub amenities: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ActivityPrefs {
    pub interests: Vec<String>,
    pub pace: TravelPace,
    pub schedule: ActivitySchedule,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum TravelPace {
    Relaxed,
    Moderate,
    Intensive,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ActivitySchedule {
    pub rest_days: String,
    #[serde(default)]
    pub special_requirements: String,
}
