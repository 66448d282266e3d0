use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::TextModel;
use crate::error::QueryError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Google Generative Language `generateContent` endpoint.
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    api_key: String,
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, QueryError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| QueryError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key,
            model,
            base_url,
            http,
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[async_trait]
impl TextModel for GeminiBackend {
    async fn generate(&self, prompt: &str) -> Result<String, QueryError> {
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent request");

        let response = self
            .http
            .post(self.generate_url())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "model API rejected the credential");
            return Err(QueryError::Credential(format!(
                "API key rejected with status {status}: {}",
                truncate_body(&body)
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Network(format!(
                "model API returned status {status}: {}",
                truncate_body(&body)
            )));
        }

        let envelope: GenerateResponse = response
            .json()
            .await
            .map_err(|e| QueryError::Format(format!("malformed response envelope: {e}")))?;

        let text: String = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(QueryError::Format(
                "response envelope contained no text candidate".to_string(),
            ));
        }

        debug!(response_len = text.len(), "received model response");
        Ok(text)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        let mut end = MAX;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}...", &body[..end])
    } else {
        body.to_string()
    }
}
