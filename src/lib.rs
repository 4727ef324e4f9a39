//! # Quote Finder
//!
//! Search for book quotes containing a word using a generative text service,
//! then sort and page through the results in the terminal.
//!
//! ## Architecture
//!
//! A search flows through these modules:
//!
//! - [`prompt`]: builds the `generateContent` request with a JSON output schema
//! - [`client`]: sends it through a [`sources::QuoteSource`] with exponential backoff
//! - [`parser`]: pulls quote records out of the response envelope
//! - [`session`]: holds results, loading flags, sort key and current page
//! - [`view`]: renders the session as a table, plain text or JSON
//!
//! [`finder::QuoteFinder`] ties these together. Failures never escape a
//! search: an unreachable service or unparsable output ends in the same
//! "no quotes" state as a search with no matches.
//!
//! ```rust,no_run
//! use quote_finder::{config, QuoteFinder, SearchSession};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let finder = QuoteFinder::from_config(&config::get_config())?;
//! let mut session = SearchSession::new();
//!
//! finder.search(&mut session, "love").await;
//! for quote in session.page_items() {
//!     println!("{} ({}, {})", quote.quote, quote.book, quote.author);
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod finder;
pub mod models;
pub mod parser;
pub mod prompt;
pub mod session;
pub mod sources;
pub mod ui;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use client::{ExhaustedError, RetryingClient};
pub use finder::QuoteFinder;
pub use models::{QuoteRecord, SearchRequest, SortKey};
pub use prompt::PromptBuilder;
pub use session::{SearchSession, ViewState, PAGE_SIZE};
pub use sources::{QuoteSource, SourceError};
pub use view::{OutputFormat, RenderOptions, ResultsView};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
