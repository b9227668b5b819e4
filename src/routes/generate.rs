use actix_web::{web, HttpResponse, Responder};

use crate::config::AppConfig;
use crate::models::response::{ErrorResponse, GenerateTripResponse};
use crate::models::trip_request::TripRequest;
use crate::services::enrichment::enrich_trip_plan;
use crate::services::gemini_service::GeminiService;
use crate::services::photo_service::PlacesPhotoService;
use crate::services::prompt_builder::build_prompt;
use crate::services::trip_pipeline::recover_trip_plan;

/*
    POST /generate-trip
*/
pub async fn generate_trip(
    config: web::Data<AppConfig>,
    gemini: web::Data<GeminiService>,
    photos: web::Data<PlacesPhotoService>,
    input: web::Json<TripRequest>,
) -> impl Responder {
    let request = input.into_inner();
    println!(
        "Generating {}-day trip to {}",
        request.dates.duration, request.destination
    );

    let prompt = build_prompt(&request);

    let raw = match gemini.generate(&prompt).await {
        Ok(text) => text,
        Err(err) => {
            eprintln!("Error generating trip: {}", err);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to generate trip",
                err.to_string(),
                None,
            ));
        }
    };

    let mut plan = match recover_trip_plan(&raw) {
        Ok(plan) => plan,
        Err(err) => {
            eprintln!("Error recovering trip plan: {}", err);
            return HttpResponse::InternalServerError().json(ErrorResponse::new(
                "Failed to generate trip",
                err.to_string(),
                err.response_sample(),
            ));
        }
    };

    // Soft invariant: consumers render one dailyPlan entry per trip day
    if plan.daily_plan.len() != request.dates.duration as usize {
        eprintln!(
            "dailyPlan has {} entries for a {}-day trip",
            plan.daily_plan.len(),
            request.dates.duration
        );
    }

    enrich_trip_plan(
        &mut plan,
        &request.destination,
        photos.get_ref(),
        config.photo_concurrency,
    )
    .await;

    HttpResponse::Ok().json(GenerateTripResponse {
        success: true,
        data: plan,
        message: "Trip generated successfully".to_string(),
    })
}
