//! End-to-end quote search: prompt, retrying call, parse, session update.

use std::sync::Arc;

use crate::client::RetryingClient;
use crate::config::Config;
use crate::parser::parse_quotes;
use crate::prompt::PromptBuilder;
use crate::session::{SearchSession, ViewState};
use crate::sources::{GeminiSource, QuoteSource, SourceError};
use crate::utils::RetryConfig;

/// Runs quote searches against a source and records them in a session
#[derive(Debug, Clone)]
pub struct QuoteFinder {
    prompt: PromptBuilder,
    client: RetryingClient,
}

impl QuoteFinder {
    /// Create a finder with the default prompt and retry policy
    pub fn new(source: Arc<dyn QuoteSource>) -> Self {
        Self {
            prompt: PromptBuilder::new(),
            client: RetryingClient::new(source),
        }
    }

    /// Create a finder for the Gemini source described by `config`
    pub fn from_config(config: &Config) -> Result<Self, SourceError> {
        let source = GeminiSource::new(&config.api)?;
        tracing::debug!("Using {} model {}", source.name(), source.model());
        if !source.has_api_key() {
            tracing::warn!("No API key configured; requests will be rejected by the service");
        }

        Ok(Self::new(Arc::new(source)).with_retry(config.retry.to_retry_config()))
    }

    /// Replace the retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.client = RetryingClient::with_config(self.client.source().clone(), retry);
        self
    }

    /// Replace the prompt builder
    pub fn with_prompt(mut self, prompt: PromptBuilder) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn client(&self) -> &RetryingClient {
        &self.client
    }

    /// Run a search and store its results in `session`.
    ///
    /// Failures never surface here: an exhausted client and an unparsable
    /// payload both complete the session with no results.
    pub async fn search(&self, session: &mut SearchSession, term: &str) -> ViewState {
        let request = session.begin_search(term);
        let payload = self.prompt.build(&request.term);

        let envelope = match self.client.send(&payload).await {
            Ok(envelope) => Some(envelope),
            Err(e) => {
                tracing::debug!("Quote search for {:?} abandoned: {}", request.term, e);
                None
            }
        };

        let quotes = parse_quotes(envelope.as_ref());
        tracing::info!("Found {} quotes for {:?}", quotes.len(), request.term);

        session.complete_search(quotes)
    }
}
