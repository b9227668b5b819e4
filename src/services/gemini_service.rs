use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;
use std::time::Duration;

const GEMINI_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug)]
pub enum ModelCallError {
    HttpError(reqwest::Error),
    ApiError(String),
    EmptyResponse,
}

impl fmt::Display for ModelCallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelCallError::HttpError(err) => write!(f, "HTTP error: {}", err),
            ModelCallError::ApiError(msg) => write!(f, "Gemini API error: {}", msg),
            ModelCallError::EmptyResponse => write!(f, "Gemini returned no candidates"),
        }
    }
}

impl Error for ModelCallError {}

impl From<reqwest::Error> for ModelCallError {
    fn from(err: reqwest::Error) -> Self {
        ModelCallError::HttpError(err)
    }
}

/// Thin client for the Generative Language REST API. The request timeout
/// covers the whole call; generation is the one long-latency external call
/// in the pipeline, so a failed or timed-out attempt is retried once before
/// surfacing `ModelCallError`.
#[derive(Clone)]
pub struct GeminiService {
    client: Client,
    api_key: String,
}

impl GeminiService {
    pub fn new(api_key: String, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build HTTP client for Gemini");

        Self { client, api_key }
    }

    /// Generates a completion for the prompt, retrying once on failure.
    /// Generative output is non-deterministic, so a second attempt can
    /// succeed where the first produced nothing usable.
    pub async fn generate(&self, prompt: &str) -> Result<String, ModelCallError> {
        match self.generate_once(prompt).await {
            Ok(text) => Ok(text),
            Err(err) => {
                eprintln!("Model call failed, retrying once: {}", err);
                self.generate_once(prompt).await
            }
        }
    }

    async fn generate_once(&self, prompt: &str) -> Result<String, ModelCallError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt.to_string(),
                }],
            }],
        };

        let response = self
            .client
            .post(GEMINI_ENDPOINT)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelCallError::ApiError(format!("{}: {}", status, body)));
        }

        let parsed: GenerateContentResponse = response.json().await?;

        parsed
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or(ModelCallError::EmptyResponse)
    }
}
