use actix_web::{web, HttpResponse, Responder};
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::trip_plan::{SavedTrip, TripPlan};

fn saved_trips(client: &Client, db_name: &str) -> mongodb::Collection<SavedTrip> {
    client.database(db_name).collection("Saved")
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveTripRequest {
    pub trip_data: Option<TripPlan>,
    pub user_id: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct SaveTripData {
    #[serde(rename = "tripId")]
    trip_id: String,
}

#[derive(Debug, Serialize)]
struct SaveTripResponse {
    success: bool,
    data: SaveTripData,
}

#[derive(Debug, Serialize)]
struct UserTripsResponse {
    success: bool,
    data: Vec<SavedTrip>,
}

#[derive(Debug, Serialize)]
struct FailureResponse {
    success: bool,
    error: String,
}

/*
    POST /save-trip
*/
pub async fn save_trip(
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
    input: web::Json<SaveTripRequest>,
) -> impl Responder {
    let body = input.into_inner();

    let (trip_data, user_id, email) = match (body.trip_data, body.user_id, body.email) {
        (Some(trip_data), Some(user_id), Some(email)) => (trip_data, user_id, email),
        _ => {
            return HttpResponse::BadRequest().json(FailureResponse {
                success: false,
                error: "tripData, userId and email are required".to_string(),
            })
        }
    };

    let document = SavedTrip {
        id: None,
        user_id,
        email,
        trip_data,
        created_at: Some(Utc::now()),
    };

    match saved_trips(&data, &config.db_name).insert_one(&document).await {
        Ok(result) => {
            let trip_id = result
                .inserted_id
                .as_object_id()
                .map(|id| id.to_hex())
                .unwrap_or_default();
            HttpResponse::Ok().json(SaveTripResponse {
                success: true,
                data: SaveTripData { trip_id },
            })
        }
        Err(err) => {
            eprintln!("Failed to insert trip: {:?}", err);
            HttpResponse::InternalServerError().json(FailureResponse {
                success: false,
                error: "Failed to save trip".to_string(),
            })
        }
    }
}

/*
    GET /user-trips/{userId}
*/
pub async fn get_user_trips(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let user_id = path.into_inner();
    let filter = doc! { "userId": &user_id };

    match saved_trips(&data, &config.db_name).find(filter).await {
        Ok(cursor) => match cursor.try_collect::<Vec<SavedTrip>>().await {
            Ok(trips) => HttpResponse::Ok().json(UserTripsResponse {
                success: true,
                data: trips,
            }),
            Err(err) => {
                eprintln!("Failed to collect trips: {:?}", err);
                HttpResponse::InternalServerError().json(FailureResponse {
                    success: false,
                    error: "Failed to retrieve trips".to_string(),
                })
            }
        },
        Err(err) => {
            eprintln!("Failed to find trips: {:?}", err);
            HttpResponse::InternalServerError().json(FailureResponse {
                success: false,
                error: "Failed to retrieve trips".to_string(),
            })
        }
    }
}

/*
    DELETE /trip/{tripId}
*/
pub async fn delete_trip(
    path: web::Path<String>,
    data: web::Data<Arc<Client>>,
    config: web::Data<AppConfig>,
) -> impl Responder {
    let trip_id = match ObjectId::parse_str(path.into_inner().as_str()) {
        Ok(id) => id,
        Err(_) => return HttpResponse::BadRequest().body("Invalid trip ID"),
    };

    match saved_trips(&data, &config.db_name)
        .delete_one(doc! { "_id": trip_id })
        .await
    {
        Ok(result) if result.deleted_count > 0 => HttpResponse::Ok().json(SaveTripResponse {
            success: true,
            data: SaveTripData {
                trip_id: trip_id.to_hex(),
            },
        }),
        Ok(_) => HttpResponse::NotFound().json(FailureResponse {
            success: false,
            error: "Trip not found or not deleted".to_string(),
        }),
        Err(err) => {
            eprintln!("Failed to delete trip: {:?}", err);
            HttpResponse::InternalServerError().json(FailureResponse {
                success: false,
                error: "Failed to delete trip".to_string(),
            })
        }
    }
}
