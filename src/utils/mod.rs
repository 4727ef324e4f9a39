//! Utility modules supporting quote searches.
//!
//! - [`HttpClient`]: shared reqwest client with timeouts and user agent
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff around async calls
//! - [`truncate_with_ellipsis`], [`quote_table_columns`]: terminal layout helpers
//!
//! # Retry with Backoff
//!
//! ```rust,no_run
//! use quote_finder::utils::{with_retry, RetryConfig, RetryOutcome};
//!
//! # async fn fetch_data() -> Result<String, String> { Ok("data".to_string()) }
//! # #[tokio::main]
//! # async fn main() {
//! let outcome = with_retry(RetryConfig::default().max_attempts(3), || fetch_data()).await;
//! if let RetryOutcome::Exhausted { attempts, last_error } = outcome {
//!     eprintln!("gave up after {} attempts: {}", attempts, last_error);
//! }
//! # }
//! ```

mod display;
mod http;
mod retry;

pub use display::{
    calculate_column_widths, display_width, is_terminal, quote_table_columns, terminal_info,
    terminal_width, truncate_with_ellipsis, ColumnConfig, Terminal, DEFAULT_WIDTH,
};
pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use retry::{with_retry, RetryConfig, RetryOutcome};
