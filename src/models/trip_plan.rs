use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Canonical itinerary produced by the recovery pipeline. Only the parts the
/// server actually touches (photo enrichment targets and the required
/// top-level containers) are typed; everything else the model produced rides
/// along untouched in the flattened `extra` maps so the response relays the
/// full document.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub trip_details: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub transportation: Value,
    pub accommodation: Accommodation,
    pub attractions: Vec<Attraction>,
    pub daily_plan: Vec<DayPlan>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub best_time_to_visit: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Accommodation {
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Hotel {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "photoUrl", default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Attraction {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DayPlan {
    #[serde(default)]
    pub day: Option<i64>,
    #[serde(default)]
    pub activities: Vec<Value>,
    #[serde(default)]
    pub meals: Vec<Meal>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Meal {
    #[serde(default)]
    pub restaurant: String,
    #[serde(rename = "imageUrl", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Persisted trip document for the save/list/delete surface.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SavedTrip {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: String,
    pub email: String,
    pub trip_data: TripPlan,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
