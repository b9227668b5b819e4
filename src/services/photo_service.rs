use reqwest::Client;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const TEXT_SEARCH_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/textsearch/json";
const PHOTO_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/photo";
const PHOTO_MAX_WIDTH: u32 = 800;
const LOOKUP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug)]
pub enum PhotoLookupError {
    HttpError(reqwest::Error),
    BadResponse(String),
}

impl fmt::Display for PhotoLookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoLookupError::HttpError(err) => write!(f, "HTTP error: {}", err),
            PhotoLookupError::BadResponse(msg) => write!(f, "Places API error: {}", msg),
        }
    }
}

impl Error for PhotoLookupError {}

impl From<reqwest::Error> for PhotoLookupError {
    fn from(err: reqwest::Error) -> Self {
        PhotoLookupError::HttpError(err)
    }
}

/// Seam between the enrichment orchestrator and the Places API so tests can
/// substitute a stub. `Ok(None)` means the lookup ran but found no photo;
/// `Err` means the lookup itself failed. The orchestrator treats both as
/// "leave the field alone".
#[allow(async_fn_in_trait)]
pub trait PhotoLookup {
    async fn lookup_photo(
        &self,
        name: &str,
        location: &str,
    ) -> Result<Option<String>, PhotoLookupError>;
}

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    #[serde(default)]
    results: Vec<PlaceResult>,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    #[serde(default)]
    photos: Vec<PlacePhoto>,
}

#[derive(Debug, Deserialize)]
struct PlacePhoto {
    photo_reference: String,
}

/// Google Places photo lookup: one text search for `"<name> <location>"`,
/// then the first photo reference turned into a fetchable URL. Without an
/// API key every lookup resolves to `Ok(None)` so the rest of the pipeline
/// keeps working in development.
#[derive(Clone)]
pub struct PlacesPhotoService {
    client: Client,
    api_key: Option<String>,
}

impl PlacesPhotoService {
    pub fn new(api_key: Option<String>) -> Self {
        if api_key.is_none() {
            println!("GOOGLE_PLACES_API_KEY not set; photo lookups will return no images");
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(LOOKUP_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client for Places");

        Self { client, api_key }
    }
}

impl PhotoLookup for PlacesPhotoService {
    async fn lookup_photo(
        &self,
        name: &str,
        location: &str,
    ) -> Result<Option<String>, PhotoLookupError> {
        let api_key = match &self.api_key {
            Some(key) => key,
            None => return Ok(None),
        };

        let query = format!("{} {}", name, location);
        let response = self
            .client
            .get(TEXT_SEARCH_ENDPOINT)
            .query(&[("query", query.as_str()), ("key", api_key.as_str())])
            .send()
            .await?;

        let parsed: TextSearchResponse = response.json().await?;
        if !parsed.status.is_empty() && parsed.status != "OK" && parsed.status != "ZERO_RESULTS" {
            return Err(PhotoLookupError::BadResponse(parsed.status));
        }

        let reference = parsed
            .results
            .into_iter()
            .next()
            .and_then(|place| place.photos.into_iter().next())
            .map(|photo| photo.photo_reference);

        Ok(reference.map(|reference| {
            format!(
                "{}?maxwidth={}&photo_reference={}&key={}",
                PHOTO_ENDPOINT, PHOTO_MAX_WIDTH, reference, api_key
            )
        }))
    }
}
