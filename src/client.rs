//! Retrying client around a [`QuoteSource`].

use std::sync::Arc;

use crate::models::{GenerateRequest, GenerateResponse};
use crate::sources::{QuoteSource, SourceError};
use crate::utils::{with_retry, RetryConfig, RetryOutcome};

/// Every attempt to reach the source failed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{source_id} unavailable after {attempts} attempts: {last_error}")]
pub struct ExhaustedError {
    /// Source that was called
    pub source_id: String,
    /// Number of calls made
    pub attempts: u32,
    /// Error from the final attempt
    #[source]
    pub last_error: SourceError,
}

/// Sends generation requests with exponential-backoff retry.
///
/// Every failure is retried (network errors, error statuses, undecodable
/// bodies) until the attempt cap is reached.
#[derive(Debug, Clone)]
pub struct RetryingClient {
    source: Arc<dyn QuoteSource>,
    config: RetryConfig,
}

impl RetryingClient {
    /// Create a client with the default policy (5 attempts, 1s doubling delay)
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self::with_config(source, RetryConfig::default())
    }

    /// Create a client with a custom retry policy
    pub fn with_config(source: Arc<dyn QuoteSource>, config: RetryConfig) -> Self {
        Self { source, config }
    }

    /// The underlying source
    pub fn source(&self) -> &Arc<dyn QuoteSource> {
        &self.source
    }

    /// Send a request, retrying failures until the attempt cap.
    pub async fn send(
        &self,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ExhaustedError> {
        let source = &self.source;

        match with_retry(self.config, || source.generate(request)).await {
            RetryOutcome::Success(response) => Ok(response),
            RetryOutcome::Exhausted {
                attempts,
                last_error,
            } => Err(ExhaustedError {
                source_id: source.id().to_string(),
                attempts,
                last_error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBuilder;
    use crate::sources::MockSource;

    #[tokio::test(start_paused = true)]
    async fn test_send_retries_until_success() {
        let mock = Arc::new(MockSource::with_text("[]"));
        mock.push_error(SourceError::Network("reset".to_string()));
        mock.push_error(SourceError::Api {
            status: 500,
            message: "internal".to_string(),
        });

        let client = RetryingClient::new(mock.clone());
        let response = client
            .send(&PromptBuilder::new().build("love"))
            .await
            .unwrap();

        assert_eq!(response.first_text(), Some("[]"));
        assert_eq!(mock.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_send_exhausts() {
        let mock = Arc::new(MockSource::failing(SourceError::RateLimit));
        let client = RetryingClient::new(mock.clone());

        let started = tokio::time::Instant::now();
        let err = client
            .send(&PromptBuilder::new().build("love"))
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 5);
        assert_eq!(err.source_id, "mock");
        assert_eq!(err.last_error, SourceError::RateLimit);
        assert_eq!(mock.call_count(), 5);
        assert_eq!(started.elapsed().as_millis(), 15_000);
    }

    #[tokio::test]
    async fn test_send_does_not_retry_success() {
        let mock = Arc::new(MockSource::new());
        let client = RetryingClient::new(mock.clone());

        client.send(&PromptBuilder::new().build("x")).await.unwrap();
        assert_eq!(mock.call_count(), 1);
    }
}
