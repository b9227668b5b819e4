use actix_web::{web, HttpResponse, Responder};
use serde::{Deserialize, Serialize};

use crate::services::photo_service::{PhotoLookup, PlacesPhotoService};

#[derive(Debug, Deserialize)]
pub struct PhotoQuery {
    query: String,
    #[serde(default)]
    location: String,
}

#[derive(Debug, Serialize)]
struct PhotoResponse {
    #[serde(rename = "imageUrl")]
    image_url: Option<String>,
}

/*
    GET /api/place-photo?query=&location=
*/
pub async fn get_place_photo(
    photos: web::Data<PlacesPhotoService>,
    params: web::Query<PhotoQuery>,
) -> impl Responder {
    let image_url = match photos.lookup_photo(&params.query, &params.location).await {
        Ok(url) => url,
        Err(err) => {
            eprintln!("Photo lookup failed for '{}': {}", params.query, err);
            None
        }
    };

    HttpResponse::Ok().json(PhotoResponse { image_url })
}
