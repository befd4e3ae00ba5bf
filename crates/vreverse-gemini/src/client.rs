//! HTTP client for the Gemini `generateContent` endpoint.
//!
//! Wraps `reqwest` with API key management, provider error decoding, and the
//! full analysis pipeline: validate, compose, call once, normalize. There are
//! no retries; every failure surfaces to the caller immediately.

use std::time::Duration;

use reqwest::{Client, Url};
use vreverse_core::{AnalysisConfig, AnalysisResult, MediaInput};

use crate::compose::{compose, VARIATION_ARCHETYPES};
use crate::error::AnalysisError;
use crate::normalize::normalize;
use crate::types::{ApiErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const API_KEY_HEADER: &str = "x-goog-api-key";
const ERROR_BODY_PREVIEW: usize = 512;

/// Client for Gemini media analysis.
///
/// Use [`GeminiClient::new`] for production or [`GeminiClient::with_base_url`]
/// to point at a mock server in tests.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: Url,
    strict_variations: bool,
}

impl GeminiClient {
    /// Creates a new client pointed at the production Gemini API.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, AnalysisError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`AnalysisError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, AnalysisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vreverse/0.1 (media-analysis)")
            .build()?;

        // Exactly one trailing slash so `Url::join` appends instead of
        // replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| AnalysisError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            model: model.to_owned(),
            base_url: parsed,
            strict_variations: false,
        })
    }

    /// Rejects results whose variation count is not exactly five.
    #[must_use]
    pub fn with_strict_variations(mut self, strict: bool) -> Self {
        self.strict_variations = strict;
        self
    }

    /// Analyzes `input` for `target_model` and returns a normalized result.
    ///
    /// Input is validated before any network activity. Search grounding is
    /// requested only for URL inputs, and citations are read only then.
    ///
    /// # Errors
    ///
    /// - [`AnalysisError::Input`] for empty inputs or an out-of-range config.
    /// - [`AnalysisError::Http`] / [`AnalysisError::Provider`] on transport failure.
    /// - [`AnalysisError::MalformedResponse`] when the output is not a
    ///   complete result.
    pub async fn analyze(
        &self,
        input: &MediaInput,
        target_model: &str,
        config: &AnalysisConfig,
    ) -> Result<AnalysisResult, AnalysisError> {
        input.validate()?;
        config.validate()?;
        let target_model = target_model.trim();
        if target_model.is_empty() {
            return Err(AnalysisError::Input("target model is empty".to_string()));
        }

        let composed = compose(input, target_model, config);
        let retrieval_enabled = composed.retrieval_enabled;

        tracing::info!(
            input_kind = %input.kind(),
            target_model,
            model = %self.model,
            fidelity = config.fidelity,
            detail_level = config.detail_level,
            retrieval_enabled,
            "gemini: starting analysis"
        );

        let response = self.generate(&composed.into_request()).await?;

        let text = response
            .text()
            .ok_or_else(|| AnalysisError::malformed("response", response.empty_reason()))?;

        let metadata = if retrieval_enabled {
            response.grounding_metadata()
        } else {
            None
        };
        if let Some(metadata) = metadata {
            tracing::debug!(
                queries = ?metadata.web_search_queries,
                chunks = metadata.grounding_chunks.len(),
                "gemini: search grounding ran"
            );
        }
        let result = normalize(&text, metadata)?;

        let variations = result.viral_variations.len();
        if variations != VARIATION_ARCHETYPES.len() {
            if self.strict_variations {
                return Err(AnalysisError::malformed(
                    "viralVariations",
                    format!(
                        "expected {} variations, got {variations}",
                        VARIATION_ARCHETYPES.len()
                    ),
                ));
            }
            tracing::warn!(
                variations,
                expected = VARIATION_ARCHETYPES.len(),
                "gemini: unexpected variation count"
            );
        }

        tracing::info!(
            variations,
            grounding_sources = result.grounding_sources.as_ref().map_or(0, Vec::len),
            "gemini: analysis complete"
        );

        Ok(result)
    }

    fn endpoint(&self) -> Result<Url, AnalysisError> {
        self.base_url
            .join(&format!("models/{}:generateContent", self.model))
            .map_err(|e| AnalysisError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Sends one request and decodes the response envelope.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Provider`] on a non-2xx status, with the
    /// provider's own message when the body carries one.
    async fn generate(
        &self,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, AnalysisError> {
        let url = self.endpoint()?;
        let response = self
            .client
            .post(url)
            .header(API_KEY_HEADER, &self.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = match serde_json::from_str::<ApiErrorEnvelope>(&body) {
                Ok(envelope) => match envelope.error.status {
                    Some(code) => format!("{code}: {}", envelope.error.message),
                    None => envelope.error.message,
                },
                Err(_) => body.chars().take(ERROR_BODY_PREVIEW).collect(),
            };
            tracing::warn!(status = status.as_u16(), "gemini: provider returned an error");
            return Err(AnalysisError::Provider {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| AnalysisError::malformed("response envelope", e.to_string()))
    }
}
