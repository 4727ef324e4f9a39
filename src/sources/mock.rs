//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::models::{GenerateRequest, GenerateResponse, QuoteRecord};
use crate::sources::{QuoteSource, SourceError};

pub type Reply = Result<GenerateResponse, SourceError>;

/// A mock source that replays scripted replies.
///
/// Scripted replies are consumed in order; once the script is empty every
/// call returns the fallback reply.
#[derive(Debug)]
pub struct MockSource {
    script: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Reply>,
    last_request: Mutex<Option<GenerateRequest>>,
    calls: AtomicUsize,
}

impl Default for MockSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockSource {
    /// Create a mock source that answers with an empty envelope.
    pub fn new() -> Self {
        Self::with_fallback(Ok(GenerateResponse::default()))
    }

    /// Create a mock source that always answers with the given candidate text.
    pub fn with_text(text: impl Into<String>) -> Self {
        Self::with_fallback(Ok(GenerateResponse::from_text(text)))
    }

    /// Create a mock source that always answers with the given records.
    pub fn with_quotes(quotes: &[QuoteRecord]) -> Self {
        let text = serde_json::to_string(quotes).unwrap_or_else(|_| "[]".to_string());
        Self::with_text(text)
    }

    /// Create a mock source that fails every call with the given error.
    pub fn failing(error: SourceError) -> Self {
        Self::with_fallback(Err(error))
    }

    fn with_fallback(fallback: Reply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(fallback),
            last_request: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a reply to return before the fallback.
    pub fn push_reply(&self, reply: Reply) {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
    }

    /// Queue a failure to return before the fallback.
    pub fn push_error(&self, error: SourceError) {
        self.push_reply(Err(error));
    }

    /// Number of calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request received.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl QuoteSource for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self
            .last_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(request.clone());

        let scripted = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front();

        match scripted {
            Some(reply) => reply,
            None => self
                .fallback
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }
}

/// Helper function to create numbered quote records for testing.
pub fn make_quotes(count: usize) -> Vec<QuoteRecord> {
    (1..=count)
        .map(|i| {
            QuoteRecord::new(
                format!("Quote {} about love", i),
                format!("Book {}", i),
                format!("Author {:02}", i),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBuilder;

    #[tokio::test]
    async fn test_script_then_fallback() {
        let source = MockSource::with_text("[]");
        source.push_error(SourceError::Network("down".to_string()));

        let request = PromptBuilder::new().build("love");
        assert!(source.generate(&request).await.is_err());
        assert_eq!(
            source.generate(&request).await.unwrap().first_text(),
            Some("[]")
        );
        assert_eq!(source.call_count(), 2);
        assert_eq!(source.last_request(), Some(request));
    }

    #[test]
    fn test_make_quotes() {
        let quotes = make_quotes(3);
        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[2].author, "Author 03");
    }
}
