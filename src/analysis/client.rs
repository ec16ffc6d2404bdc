//! Core `RecipeAnalyzer` trait and the Gemini-backed implementation.
//!
//! [`GeminiAnalyzer`] calls the `generateContent` REST endpoint with the
//! captured frame as base64 `inline_data`, the instruction prompt, and a JSON
//! response schema.  All connection details come from [`AnalysisConfig`].

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use thiserror::Error;

use crate::analysis::parse::parse_analysis;
use crate::analysis::prompt::PromptBuilder;
use crate::config::AnalysisConfig;
use crate::recipe::FridgeAnalysis;

// ---------------------------------------------------------------------------
// AnalysisError
// ---------------------------------------------------------------------------

/// Errors that can occur while analysing a fridge photo.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// No API key in the config or the environment.
    #[error("no API key configured (set analysis.api_key or GEMINI_API_KEY)")]
    MissingApiKey,

    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("analysis request timed out")]
    Timeout,

    /// The service answered with a non-success status.
    #[error("analysis service returned {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered without any candidate text.
    #[error("analysis service returned an empty response")]
    EmptyResponse,

    /// The model output is not a JSON document.
    #[error("model output is not JSON: {0}")]
    NotJson(String),

    /// The model output is JSON but does not describe a complete analysis.
    #[error("model output is malformed: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for AnalysisError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AnalysisError::Timeout
        } else {
            AnalysisError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// RecipeAnalyzer trait
// ---------------------------------------------------------------------------

/// Async trait for turning a fridge photo into ingredients and recipes.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn RecipeAnalyzer>`.
///
/// # Arguments
/// * `image` – JPEG-encoded still frame.
#[async_trait]
pub trait RecipeAnalyzer: Send + Sync {
    async fn analyze(&self, image: &[u8]) -> Result<FridgeAnalysis, AnalysisError>;
}

// ---------------------------------------------------------------------------
// Wire types (response side)
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
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
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// GeminiAnalyzer
// ---------------------------------------------------------------------------

/// Calls Gemini `models/{model}:generateContent`.
pub struct GeminiAnalyzer {
    client: reqwest::Client,
    config: AnalysisConfig,
    prompt_builder: PromptBuilder,
}

impl GeminiAnalyzer {
    /// Build a `GeminiAnalyzer` from application config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used if the builder fails.
    pub fn from_config(config: &AnalysisConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(config.recipe_count),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Request body for one frame.
    fn request_body(&self, image: &[u8]) -> serde_json::Value {
        let data = base64::engine::general_purpose::STANDARD.encode(image);

        serde_json::json!({
            "contents": [{
                "parts": [
                    { "inline_data": { "mime_type": "image/jpeg", "data": data } },
                    { "text": self.prompt_builder.instructions() }
                ]
            }],
            "generationConfig": {
                "temperature":      self.config.temperature,
                "responseMimeType": "application/json",
                "responseSchema":   self.prompt_builder.response_schema()
            }
        })
    }
}

#[async_trait]
impl RecipeAnalyzer for GeminiAnalyzer {
    async fn analyze(&self, image: &[u8]) -> Result<FridgeAnalysis, AnalysisError> {
        let key = self
            .config
            .resolve_api_key()
            .ok_or(AnalysisError::MissingApiKey)?;

        log::info!(
            "analysis: sending {} byte frame to {}",
            image.len(),
            self.config.model
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", key)
            .json(&self.request_body(image))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let reply: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AnalysisError::NotJson(e.to_string()))?;

        let text = reply.into_text().ok_or(AnalysisError::EmptyResponse)?;
        let analysis = parse_analysis(&text)?;

        if analysis.recipes.len() != self.prompt_builder.recipe_count() {
            log::warn!(
                "analysis: asked for {} recipes, model returned {}",
                self.prompt_builder.recipe_count(),
                analysis.recipes.len()
            );
        }
        log::info!(
            "analysis: {} ingredients, {} recipes",
            analysis.ingredients.len(),
            analysis.recipes.len()
        );

        Ok(analysis)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
