use std::env;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DB_NAME: &str = "Trips";
const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PHOTO_CONCURRENCY: usize = 10;

/// Process-wide configuration, read once at startup and shared via
/// `web::Data`. Nothing else in the codebase reads environment variables
/// for API keys or connection strings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini_api_key: String,
    pub places_api_key: Option<String>,
    pub mongodb_uri: String,
    pub db_name: String,
    pub model_timeout_secs: u64,
    pub photo_concurrency: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let gemini_api_key = env::var("GEMINI_API_KEY")
            .map_err(|_| "GEMINI_API_KEY must be set".to_string())?;
        let mongodb_uri =
            env::var("MONGODB_URI").map_err(|_| "MONGODB_URI must be set".to_string())?;

        // Photo lookups degrade to "no image" without a key, so it stays optional
        let places_api_key = env::var("GOOGLE_PLACES_API_KEY").ok();

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            gemini_api_key,
            places_api_key,
            mongodb_uri,
            db_name: env::var("MONGODB_DB").unwrap_or_else(|_| DEFAULT_DB_NAME.to_string()),
            model_timeout_secs: env::var("MODEL_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS),
            photo_concurrency: env::var("PHOTO_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_PHOTO_CONCURRENCY),
        })
    }
}
