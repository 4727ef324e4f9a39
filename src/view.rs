//! Rendering of a [`SearchSession`] for the terminal.
//!
//! The view shows one of four states: a hint before the first search, a
//! loading line while a request is in flight, a "no quotes" message, or the
//! current page of results followed by the pagination controls.

use comfy_table::{presets, Attribute, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::models::{QuoteRecord, SortKey};
use crate::session::{PageControls, SearchSession, ViewState};
use crate::utils::{quote_table_columns, truncate_with_ellipsis, DEFAULT_WIDTH};

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Bordered table
    #[default]
    Table,
    /// Plain text, one quote per block
    Plain,
    /// JSON document describing the current page
    Json,
}

/// Render settings
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub format: OutputFormat,
    pub color: bool,
    pub width: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            color: false,
            width: DEFAULT_WIDTH,
        }
    }
}

/// Machine-readable snapshot of the current page
#[derive(Debug, Clone, Serialize)]
pub struct PageView<'a> {
    pub term: &'a str,
    pub state: ViewState,
    pub sort: SortKey,
    pub total_results: usize,
    pub controls: PageControls,
    pub quotes: &'a [QuoteRecord],
}

impl<'a> PageView<'a> {
    pub fn from_session(session: &'a SearchSession) -> Self {
        Self {
            term: session.term(),
            state: session.view_state(),
            sort: session.sort_key(),
            total_results: session.results().len(),
            controls: session.page_controls(),
            quotes: session.page_items(),
        }
    }
}

/// Renders sessions to strings
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultsView {
    options: RenderOptions,
}

impl ResultsView {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render the session in the configured format
    pub fn render(&self, session: &SearchSession) -> String {
        match self.options.format {
            OutputFormat::Json => self.render_json(session),
            OutputFormat::Table | OutputFormat::Plain => self.render_text(session),
        }
    }

    /// One-line status for non-populated states
    pub fn status_line(&self, session: &SearchSession) -> String {
        match session.view_state() {
            ViewState::Idle => {
                self.paint("Enter a word to search for quotes.", |t| t.dimmed().to_string())
            }
            ViewState::Loading => format!(
                "{} Searching for quotes containing \"{}\"...",
                self.paint("◐", |t| t.cyan().to_string()),
                session.term()
            ),
            ViewState::Empty => format!(
                "{} No quotes found for \"{}\".",
                self.paint("✗", |t| t.yellow().bold().to_string()),
                session.term()
            ),
            ViewState::Populated => format!(
                "{} Quotes containing \"{}\" · {} found · sorted by {}",
                self.paint("🔍", |t| t.yellow().to_string()),
                self.paint(session.term(), |t| t.cyan().bold().to_string()),
                session.results().len(),
                session.sort_key()
            ),
        }
    }

    /// Pagination controls, e.g. `« Prev  [1]  2  Next »`.
    ///
    /// Disabled controls lose their arrow (and are dimmed when colored).
    pub fn controls_line(&self, controls: &PageControls) -> String {
        let prev = if controls.prev_enabled {
            "« Prev".to_string()
        } else {
            self.paint("  Prev", |t| t.dimmed().to_string())
        };
        let next = if controls.next_enabled {
            "Next »".to_string()
        } else {
            self.paint("Next  ", |t| t.dimmed().to_string())
        };

        let pages: Vec<String> = controls
            .pages
            .iter()
            .map(|&p| {
                if p == controls.current {
                    self.paint(&format!("[{}]", p), |t| t.green().bold().to_string())
                } else {
                    format!(" {} ", p)
                }
            })
            .collect();

        format!(
            "{}  {}  {}   page {} of {}",
            prev,
            pages.join(" "),
            next,
            controls.current,
            controls.total
        )
    }

    fn render_text(&self, session: &SearchSession) -> String {
        let status = self.status_line(session);
        if session.view_state() != ViewState::Populated {
            return status;
        }

        let body = match self.options.format {
            OutputFormat::Plain => self.plain_rows(session),
            _ => self.table(session),
        };

        format!(
            "{}\n{}\n{}",
            status,
            body,
            self.controls_line(&session.page_controls())
        )
    }

    fn table(&self, session: &SearchSession) -> String {
        let (num_width, _, book_width, author_width) = quote_table_columns(self.options.width);

        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_width(self.options.width.min(u16::MAX as usize) as u16);
        if !self.options.color {
            table.force_no_tty();
        }

        table.set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Quote").add_attribute(Attribute::Bold),
            Cell::new("Book").add_attribute(Attribute::Bold),
            Cell::new("Author").add_attribute(Attribute::Bold),
        ]);

        let offset = session.page_offset();
        for (i, record) in session.page_items().iter().enumerate() {
            table.add_row(vec![
                Cell::new(truncate_with_ellipsis(&(offset + i + 1).to_string(), num_width)),
                Cell::new(&record.quote).add_attribute(Attribute::Italic),
                Cell::new(truncate_with_ellipsis(&record.book, book_width)),
                Cell::new(truncate_with_ellipsis(&record.author, author_width)),
            ]);
        }

        table.to_string()
    }

    fn plain_rows(&self, session: &SearchSession) -> String {
        let offset = session.page_offset();
        session
            .page_items()
            .iter()
            .enumerate()
            .map(|(i, record)| {
                format!(
                    "{}. \"{}\"\n   - {}, {}",
                    offset + i + 1,
                    record.quote,
                    record.book,
                    record.author
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render_json(&self, session: &SearchSession) -> String {
        serde_json::to_string_pretty(&PageView::from_session(session))
            .unwrap_or_else(|e| format!("{{\"error\": \"{}\"}}", e))
    }

    fn paint<F>(&self, text: &str, style: F) -> String
    where
        F: FnOnce(&str) -> String,
    {
        if self.options.color {
            style(text)
        } else {
            text.to_string()
        }
    }
}
