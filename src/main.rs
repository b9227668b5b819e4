use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use atlas_trips_api::config::AppConfig;
use atlas_trips_api::db;
use atlas_trips_api::routes;
use atlas_trips_api::services::gemini_service::GeminiService;
use atlas_trips_api::services::photo_service::PlacesPhotoService;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    println!("Application starting...");

    env_logger::init_from_env(Env::default().default_filter_or("info"));
    println!("Logger initialized");

    if cfg!(debug_assertions) {
        dotenv::dotenv().ok();
    } else {
        println!("Release mode");
    }

    let config = AppConfig::from_env().expect("Invalid configuration");
    println!("Attempting to bind to {}:{}", config.host, config.port);

    let mongo_client = db::mongo::create_mongo_client(&config.mongodb_uri, &config.db_name).await;
    println!("MongoDB connection established");

    let gemini = GeminiService::new(config.gemini_api_key.clone(), config.model_timeout_secs);
    let photos = PlacesPhotoService::new(config.places_api_key.clone());

    let bind_addr = (config.host.clone(), config.port);
    println!("Starting HTTP server...");

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .app_data(web::Data::new(config.clone()))
            .app_data(web::Data::new(mongo_client.clone()))
            .app_data(web::Data::new(gemini.clone()))
            .app_data(web::Data::new(photos.clone()))
            .route("/health", web::get().to(|| async { "OK" }))
            .route(
                "/generate-trip",
                web::post().to(routes::generate::generate_trip),
            )
            .route("/save-trip", web::post().to(routes::trips::save_trip))
            .route(
                "/user-trips/{user_id}",
                web::get().to(routes::trips::get_user_trips),
            )
            .route("/trip/{trip_id}", web::delete().to(routes::trips::delete_trip))
            .route(
                "/api/place-photo",
                web::get().to(routes::photo::get_place_photo),
            )
    })
    .bind(bind_addr)?
    .run()
    .await
}
