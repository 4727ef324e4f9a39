//! Prompt construction for quote searches.
//!
//! The prompt asks the model for a fixed number of quotes containing the
//! search term and pins the output to a JSON array of
//! `{quote, book, author}` objects through a response schema.

use serde_json::json;

use crate::models::{Content, GenerateRequest, GenerationConfig, Part};

/// Number of quotes requested per search
pub const DEFAULT_QUOTE_COUNT: usize = 10;

/// MIME type requested for the generated text
pub const JSON_MIME_TYPE: &str = "application/json";

/// Builds `generateContent` request payloads from search terms
#[derive(Debug, Clone, Copy)]
pub struct PromptBuilder {
    count: usize,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            count: DEFAULT_QUOTE_COUNT,
        }
    }
}

impl PromptBuilder {
    /// Create a builder requesting the default number of quotes
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the number of quotes requested
    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    /// Number of quotes this builder asks for
    pub fn count(&self) -> usize {
        self.count
    }

    /// Build the request payload for a search term.
    ///
    /// The term is embedded verbatim; empty or unusual terms are passed
    /// through to the service unchanged.
    pub fn build(&self, term: &str) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: self.instruction(term),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: JSON_MIME_TYPE.to_string(),
                response_schema: quote_list_schema(),
            },
        }
    }

    fn instruction(&self, term: &str) -> String {
        format!(
            "Find exactly {count} quotes from books that contain the word \"{term}\". \
             For each quote, provide the quote itself, the title of the book it is from, \
             and the author of the book. Return the result as a JSON array of objects, \
             each with the fields \"quote\", \"book\" and \"author\".",
            count = self.count,
            term = term
        )
    }
}

/// Schema describing an array of `{quote, book, author}` string objects
pub fn quote_list_schema() -> serde_json::Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "quote": { "type": "STRING" },
                "book": { "type": "STRING" },
                "author": { "type": "STRING" }
            },
            "propertyOrdering": ["quote", "book", "author"]
        }
    })
}
