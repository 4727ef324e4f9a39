//! Generation service backends.
//!
//! This module defines the [`QuoteSource`] trait, the seam between the quote
//! search pipeline and the remote text generation service. [`GeminiSource`]
//! talks to the Gemini `generateContent` endpoint over HTTP; [`MockSource`]
//! replays scripted envelopes and failures for tests and demos.

mod gemini;
pub mod mock;

pub use gemini::{GeminiSource, DEFAULT_ENDPOINT, DEFAULT_MODEL};
pub use mock::MockSource;

use crate::models::{GenerateRequest, GenerateResponse};
use async_trait::async_trait;

/// A backend able to answer a generation request with a response envelope.
#[async_trait]
pub trait QuoteSource: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "gemini")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Send one generation request.
    ///
    /// A single call, no retries; callers wrap this in a retry policy.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, SourceError>;
}

/// Errors that can occur when calling a source
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// Network or transport error
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded (HTTP 429)
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Response body could not be decoded as an envelope
    #[error("Parse error: {0}")]
    Parse(String),

    /// Source is misconfigured (bad endpoint, model, ...)
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<url::ParseError> for SourceError {
    fn from(err: url::ParseError) -> Self {
        SourceError::Config(format!("invalid endpoint URL: {}", err))
    }
}
