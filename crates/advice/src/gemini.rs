//! Gemini `generateContent` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::advice::{parse_advice, response_schema};
use crate::{Advice, AdviceError, AdviceRequest, AdviceSource};

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API root, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub endpoint: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: api_key.into(),
            timeout: Duration::from_secs(30),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

pub struct GeminiAdvisor {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiAdvisor {
    pub fn new(config: GeminiConfig) -> Result<Self, AdviceError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        info!(model = %config.model, "advice via Gemini");
        Ok(Self { client, config })
    }

    /// Request body for one advice call.
    pub fn request_body(request: &AdviceRequest) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt() }]
            }],
            "generationConfig": {
                "responseMimeType": "application/json",
                "responseSchema": response_schema()
            }
        })
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Pull the advice out of a `generateContent` response body.
pub(crate) fn parse_generate_response(body: &str) -> Result<Advice, AdviceError> {
    let response: GenerateResponse = serde_json::from_str(body)?;
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
        .ok_or(AdviceError::NoCandidates)?;
    Ok(parse_advice(&text)?)
}

#[async_trait]
impl AdviceSource for GeminiAdvisor {
    async fn request_advice(&self, request: &AdviceRequest) -> Result<Advice, AdviceError> {
        debug!(fen = %request.fen, best = %request.best_move, "requesting advice");
        let response = self
            .client
            .post(self.config.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&Self::request_body(request))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AdviceError::Status {
                status: status.as_u16(),
                body,
            });
        }
        parse_generate_response(&body)
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
#[path = "gemini_tests.rs"]
mod gemini_tests;
