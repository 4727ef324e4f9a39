//! Terminal display utilities for robust CLI output formatting.
//!
//! This module provides utilities for formatting CLI output that handles
//! different screen sizes, Unicode text, and terminal capabilities.

use std::io::{self, IsTerminal};
use std::sync::OnceLock;
use terminal_size::terminal_size;
use unicode_width::UnicodeWidthChar;

/// Terminal information with cached size and capabilities.
#[derive(Debug, Clone)]
pub struct Terminal {
    width: usize,
    is_tty: bool,
}

static TERMINAL_INFO: OnceLock<Terminal> = OnceLock::new();

/// Get the global terminal information, initialized on first call.
pub fn terminal_info() -> &'static Terminal {
    TERMINAL_INFO.get_or_init(|| {
        let width = terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH);

        Terminal {
            width,
            is_tty: io::stdout().is_terminal(),
        }
    })
}

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

/// Get the current terminal width in characters.
#[inline]
pub fn terminal_width() -> usize {
    terminal_info().width
}

/// Check if stdout is a terminal.
#[inline]
pub fn is_terminal() -> bool {
    terminal_info().is_tty
}

/// Display width of a string, counting wide characters as two columns.
pub fn display_width(text: &str) -> usize {
    text.chars().map(|c| c.width().unwrap_or(1)).sum()
}

/// Truncate text to fit within the specified width using unicode-aware truncation.
///
/// Returns a string that fits within `max_width` columns, appending an
/// ellipsis if truncation occurred.
///
/// # Examples
///
/// ```
/// use quote_finder::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();

    for c in text.chars() {
        let w = c.width().unwrap_or(1);
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated)
}

/// Column width configuration for table display.
#[derive(Debug, Clone, Copy)]
pub struct ColumnConfig {
    pub min_width: usize,
    pub max_width: usize,
    pub weight: usize,
}

impl ColumnConfig {
    /// Create a new column config with minimum width.
    pub fn new(min_width: usize) -> Self {
        ColumnConfig {
            min_width,
            max_width: usize::MAX,
            weight: 1,
        }
    }

    /// Set the maximum width.
    pub fn max(mut self, max_width: usize) -> Self {
        self.max_width = max_width;
        self
    }

    /// Set the weight for space distribution.
    pub fn weight(mut self, weight: usize) -> Self {
        self.weight = weight;
        self
    }
}

/// Split `width` columns between table columns.
///
/// Every column gets its minimum; the rest is shared by weight and capped at
/// each column's maximum. If the minimums do not fit, the minimums are
/// returned unchanged. `overhead` is reserved for borders and padding.
pub fn calculate_column_widths(
    width: usize,
    overhead: usize,
    configs: &[ColumnConfig],
) -> Vec<usize> {
    let mut widths: Vec<usize> = configs.iter().map(|c| c.min_width).collect();

    let available = width.saturating_sub(overhead);
    let min_sum: usize = widths.iter().sum();
    if min_sum >= available {
        return widths;
    }

    let mut remaining = available - min_sum;

    // Weighted shares first, then hand out rounding leftovers in order
    let total_weight: usize = configs.iter().map(|c| c.weight).sum();
    if total_weight > 0 {
        let pool = remaining;
        for (i, config) in configs.iter().enumerate() {
            let share = pool * config.weight / total_weight;
            let room = config.max_width.saturating_sub(widths[i]);
            let take = share.min(room).min(remaining);
            widths[i] += take;
            remaining -= take;
        }
    }

    for (i, config) in configs.iter().enumerate() {
        if remaining == 0 {
            break;
        }
        if config.weight == 0 {
            continue;
        }
        let room = config.max_width.saturating_sub(widths[i]);
        let take = room.min(remaining);
        widths[i] += take;
        remaining -= take;
    }

    widths
}

/// Column widths for the quote table.
///
/// Returns (number, quote, book, author). The quote column takes most of the
/// space; book and author are capped so long titles get truncated.
pub fn quote_table_columns(width: usize) -> (usize, usize, usize, usize) {
    let configs = [
        ColumnConfig::new(2).max(3).weight(0),
        ColumnConfig::new(20).weight(4),
        ColumnConfig::new(10).max(32).weight(1),
        ColumnConfig::new(10).max(24).weight(1),
    ];

    // Four columns: five borders plus one space of padding on each side
    let widths = calculate_column_widths(width, 5 + 2 * configs.len(), &configs);
    (widths[0], widths[1], widths[2], widths[3])
}
