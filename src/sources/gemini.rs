//! Gemini `generateContent` source implementation.

use async_trait::async_trait;
use reqwest::StatusCode;
use url::Url;

use crate::config::ApiConfig;
use crate::models::{GenerateRequest, GenerateResponse};
use crate::sources::{QuoteSource, SourceError};
use crate::utils::HttpClient;

/// Base URL of the public Gemini API
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when none is configured
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Longest error body kept in [`SourceError::Api`] messages
const MAX_ERROR_BODY: usize = 300;

/// Gemini text generation source
///
/// The API key travels as the `key` query parameter.
#[derive(Debug, Clone)]
pub struct GeminiSource {
    client: HttpClient,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiSource {
    /// Create a source from API configuration
    pub fn new(config: &ApiConfig) -> Result<Self, SourceError> {
        let client = HttpClient::with_timeout(config.timeout())?;
        Ok(Self::with_client(
            client,
            config.endpoint.clone(),
            config.model.clone(),
            config.key.clone(),
        ))
    }

    /// Create a source around an existing HTTP client
    pub fn with_client(
        client: HttpClient,
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        }
    }

    /// Model this source calls
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Endpoint URL for `generateContent`, without the API key
    pub fn generate_url(&self) -> Result<Url, SourceError> {
        let base = self.endpoint.trim_end_matches('/');
        Ok(Url::parse(&format!(
            "{}/models/{}:generateContent",
            base, self.model
        ))?)
    }

    fn request_url(&self) -> Result<Url, SourceError> {
        let mut url = self.generate_url()?;
        if let Some(key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", key);
        }
        Ok(url)
    }
}

#[async_trait]
impl QuoteSource for GeminiSource {
    fn id(&self) -> &str {
        "gemini"
    }

    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, SourceError> {
        let url = self.request_url()?;
        tracing::debug!(
            "POST {} (model: {}, key: {})",
            self.generate_url()?,
            self.model,
            if self.has_api_key() { "set" } else { "missing" }
        );

        let response = self.client.client().post(url).json(request).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimit);
        }

        let body = response.text().await?;

        if !status.is_success() {
            return Err(SourceError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// Extract a readable message from an error body.
///
/// Google APIs wrap errors as `{"error": {"message": ...}}`; anything else is
/// returned trimmed and shortened.
fn error_message(body: &str) -> String {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string());

    if message.chars().count() > MAX_ERROR_BODY {
        let truncated: String = message.chars().take(MAX_ERROR_BODY).collect();
        format!("{}...", truncated)
    } else {
        message
    }
}
