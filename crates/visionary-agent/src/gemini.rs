use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::traits::TextGenerator;
use crate::{AgentError, Result};

const SERVICE: &str = "gemini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

// ─── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

// ─── GeminiClient ─────────────────────────────────────────────────────────

/// Client for the Gemini `generateContent` REST endpoint.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            model: model.into(),
            base_url: base_url.into(),
        })
    }

    fn endpoint(&self) -> String {
        let model = self.model.trim();
        let model = model.strip_prefix("models/").unwrap_or(model);
        format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    /// Returns the text parts of the first candidate, concatenated.
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(AgentError::Status {
                service: SERVICE,
                status: status.as_u16(),
                body: text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|source| {
            AgentError::Decode {
                service: SERVICE,
                source,
            }
        })?;

        let output: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if output.trim().is_empty() {
            return Err(AgentError::EmptyResponse(SERVICE));
        }
        tracing::debug!(model = %self.model, chars = output.len(), "gemini response received");
        Ok(output)
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
