//! CLI UI helpers: status icons, colored messages and the loading spinner.

use owo_colors::OwoColorize;
use std::time::Duration;

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Format a status message, colored when `color` is set.
pub fn status_message(status: Status, msg: &str, color: bool) -> String {
    let icon = status_icon(status);
    if !color {
        return format!("{} {}", icon, msg);
    }

    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Search => format!("{} {}", icon.yellow(), msg),
    }
}

/// Welcome banner for interactive mode.
pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");

    println!();
    println!("{}", format!("━━━ Quote Finder v{} ━━━", version).bold().cyan());
    println!("Find book quotes containing a word.");
    println!("Type {} for commands.", "help".bold());
    println!();
}

/// Command reference for interactive mode.
pub fn print_help() {
    println!("Commands:");
    println!("  search <word>, s <word>   Search for quotes containing <word>");
    println!("  next, n                   Next page");
    println!("  prev, p                   Previous page");
    println!("  page <N>                  Jump to page N");
    println!("  sort author|book          Change the sort order");
    println!("  help, h                   Show this help");
    println!("  quit, q                   Exit");
}

/// Print a loading spinner with message.
pub struct Spinner {
    pb: indicatif::ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| indicatif::ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// Remove the spinner from the terminal.
    pub fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }
}
