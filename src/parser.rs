//! Extraction of quote records from response envelopes.
//!
//! Parsing never fails: a missing envelope, an envelope without candidates,
//! and undecodable JSON all produce an empty list, so the caller always
//! reaches a displayable state.

use serde_json::{Map, Value};

use crate::models::{GenerateResponse, QuoteRecord};

/// Parse the quotes carried by a response envelope.
pub fn parse_quotes(envelope: Option<&GenerateResponse>) -> Vec<QuoteRecord> {
    let Some(envelope) = envelope else {
        tracing::debug!("No response envelope, treating as empty result");
        return Vec::new();
    };

    if envelope.candidates.is_empty() {
        tracing::debug!("Response has no candidates");
        return Vec::new();
    }

    match envelope.first_text() {
        Some(text) => parse_quote_text(text),
        None => {
            tracing::debug!("First candidate carries no text part");
            Vec::new()
        }
    }
}

/// Parse the JSON text generated by the model.
///
/// Records are taken as they come: missing fields become empty strings and
/// non-string fields keep their JSON text. Only object elements of a
/// top-level array are kept.
pub fn parse_quote_text(text: &str) -> Vec<QuoteRecord> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to parse generated JSON: {}", e);
            return Vec::new();
        }
    };

    let Value::Array(items) = value else {
        tracing::warn!("Generated JSON is not an array, ignoring");
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| match item {
            Value::Object(fields) => Some(record_from_fields(&fields)),
            other => {
                tracing::debug!("Skipping non-object element: {}", other);
                None
            }
        })
        .collect()
}

fn record_from_fields(fields: &Map<String, Value>) -> QuoteRecord {
    QuoteRecord {
        quote: field_text(fields, "quote"),
        book: field_text(fields, "book"),
        author: field_text(fields, "author"),
    }
}

fn field_text(fields: &Map<String, Value>, name: &str) -> String {
    match fields.get(name) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Candidate, CandidateContent};

    #[test]
    fn test_no_envelope() {
        assert!(parse_quotes(None).is_empty());
    }

    #[test]
    fn test_empty_candidates() {
        let envelope = GenerateResponse::default();
        assert!(parse_quotes(Some(&envelope)).is_empty());
    }

    #[test]
    fn test_candidate_without_parts() {
        let envelope = GenerateResponse {
            candidates: vec![Candidate {
                content: Some(CandidateContent { parts: Vec::new() }),
            }],
        };
        assert!(parse_quotes(Some(&envelope)).is_empty());
    }

    #[test]
    fn test_empty_array() {
        let envelope = GenerateResponse::from_text("[]");
        assert!(parse_quotes(Some(&envelope)).is_empty());
    }

    #[test]
    fn test_invalid_json() {
        let envelope = GenerateResponse::from_text("{not json");
        assert!(parse_quotes(Some(&envelope)).is_empty());
    }

    #[test]
    fn test_non_array_json() {
        assert!(parse_quote_text(r#"{"quote": "x"}"#).is_empty());
        assert!(parse_quote_text("42").is_empty());
    }

    #[test]
    fn test_valid_records_in_order() {
        let text = r#"[
            {"quote": "All you need is love.", "book": "Lyrics", "author": "Lennon"},
            {"quote": "Love is patient.", "book": "Corinthians", "author": "Paul"}
        ]"#;
        let envelope = GenerateResponse::from_text(text);
        let quotes = parse_quotes(Some(&envelope));

        assert_eq!(
            quotes,
            vec![
                QuoteRecord::new("All you need is love.", "Lyrics", "Lennon"),
                QuoteRecord::new("Love is patient.", "Corinthians", "Paul"),
            ]
        );
    }

    #[test]
    fn test_malformed_records_pass_through() {
        let text = r#"[
            {"quote": "Only a quote"},
            {"quote": "Numbered", "book": 1984, "author": null, "extra": true},
            "stray string",
            {}
        ]"#;
        let quotes = parse_quote_text(text);

        assert_eq!(quotes.len(), 3);
        assert_eq!(quotes[0], QuoteRecord::new("Only a quote", "", ""));
        assert_eq!(quotes[1], QuoteRecord::new("Numbered", "1984", ""));
        assert_eq!(quotes[2], QuoteRecord::default());
    }

    #[test]
    fn test_uses_first_candidate_only() {
        let mut envelope = GenerateResponse::from_text(r#"[{"quote": "first"}]"#);
        envelope
            .candidates
            .extend(GenerateResponse::from_text(r#"[{"quote": "second"}]"#).candidates);

        let quotes = parse_quotes(Some(&envelope));
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].quote, "first");
    }
}
