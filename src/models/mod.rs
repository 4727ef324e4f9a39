//! Core data models for quote searches and the generation service envelopes.

mod generation;
mod quote;

pub use generation::{
    Candidate, CandidateContent, Content, GenerateRequest, GenerateResponse, GenerationConfig,
    Part, ResponsePart,
};
pub use quote::{QuoteRecord, SearchRequest, SortKey};
