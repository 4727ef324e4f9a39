//! Request and response envelopes for the `generateContent` endpoint.

use serde::{Deserialize, Serialize};

/// Request body sent to the generation service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    /// Conversation turns (a single user turn for quote searches)
    pub contents: Vec<Content>,

    /// Output format constraints
    pub generation_config: GenerationConfig,
}

impl GenerateRequest {
    /// Text of the first part of the first turn, if any
    pub fn prompt_text(&self) -> Option<&str> {
        self.contents
            .first()
            .and_then(|c| c.parts.first())
            .map(|p| p.text.as_str())
    }
}

/// A single conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Text part of a conversation turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Generation parameters requesting structured JSON output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// MIME type of the generated text (`application/json`)
    pub response_mime_type: String,

    /// Schema the generated JSON must follow
    pub response_schema: serde_json::Value,
}

/// Response envelope returned by the generation service.
///
/// Every level is optional so that partial envelopes still decode; the
/// parser decides what an incomplete envelope means.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// Build an envelope holding a single candidate with the given text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(CandidateContent {
                    parts: vec![ResponsePart {
                        text: Some(text.into()),
                    }],
                }),
            }],
        }
    }

    /// Text of the first part of the first candidate
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
    }
}

/// One generated completion
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_envelope() {
        let body = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "[]"}]}, "finishReason": "STOP"}
            ],
            "usageMetadata": {"promptTokenCount": 12}
        }"#;

        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text(), Some("[]"));
    }

    #[test]
    fn test_decode_empty_object() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_candidate_without_content() {
        let body = r#"{"candidates": [{"finishReason": "SAFETY"}]}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.candidates.len(), 1);
        assert_eq!(response.first_text(), None);
    }

    #[test]
    fn test_from_text() {
        let response = GenerateResponse::from_text("hello");
        assert_eq!(response.first_text(), Some("hello"));
    }
}
