//! Search session state: results, loading flags, sorting and pagination.
//!
//! [`SearchSession`] is mutated only through its entry points:
//! [`begin_search`](SearchSession::begin_search),
//! [`complete_search`](SearchSession::complete_search), the page controls
//! and [`set_sort`](SearchSession::set_sort).

use serde::Serialize;

use crate::models::{QuoteRecord, SearchRequest, SortKey};

/// Number of quotes shown per page
pub const PAGE_SIZE: usize = 5;

/// What the results view should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewState {
    /// No search has been made yet
    Idle,
    /// A request is in flight
    Loading,
    /// The last search produced no quotes
    Empty,
    /// The last search produced quotes
    Populated,
}

/// State of the pagination controls
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageControls {
    /// Current page, 1-based
    pub current: usize,
    /// Total number of pages
    pub total: usize,
    /// Every page number, in order
    pub pages: Vec<usize>,
    /// Whether "Previous" is usable
    pub prev_enabled: bool,
    /// Whether "Next" is usable
    pub next_enabled: bool,
}

/// State of one search session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSession {
    term: String,
    results: Vec<QuoteRecord>,
    is_loading: bool,
    has_searched: bool,
    current_page: usize,
    sort_key: SortKey,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self {
            term: String::new(),
            results: Vec::new(),
            is_loading: false,
            has_searched: false,
            current_page: 1,
            sort_key: SortKey::default(),
        }
    }
}

impl SearchSession {
    /// Create a session with default state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session sorting by the given key
    pub fn with_sort(sort_key: SortKey) -> Self {
        Self {
            sort_key,
            ..Self::default()
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    /// All results, in the current sort order
    pub fn results(&self) -> &[QuoteRecord] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_searched(&self) -> bool {
        self.has_searched
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    /// Start a new search.
    ///
    /// Clears the previous results, resets to page 1 and marks the session
    /// as loading.
    pub fn begin_search(&mut self, term: impl Into<String>) -> SearchRequest {
        self.term = term.into();
        self.results.clear();
        self.current_page = 1;
        self.is_loading = true;
        self.has_searched = true;

        SearchRequest::new(self.term.clone())
    }

    /// Finish the in-flight search with the parsed results.
    ///
    /// Results are sorted by the current key. There is no request identity
    /// check: whichever completion arrives last wins.
    pub fn complete_search(&mut self, mut results: Vec<QuoteRecord>) -> ViewState {
        let key = self.sort_key;
        results.sort_by(|a, b| key.compare(a, b));

        self.results = results;
        self.is_loading = false;
        self.has_searched = true;

        self.view_state()
    }

    /// Change the sort key and re-sort all results; the page is kept.
    pub fn set_sort(&mut self, key: SortKey) {
        self.sort_key = key;
        self.results.sort_by(|a, b| key.compare(a, b));
    }

    pub fn view_state(&self) -> ViewState {
        if self.is_loading {
            ViewState::Loading
        } else if !self.has_searched {
            ViewState::Idle
        } else if self.results.is_empty() {
            ViewState::Empty
        } else {
            ViewState::Populated
        }
    }

    /// Number of pages, `ceil(results / PAGE_SIZE)`
    pub fn total_pages(&self) -> usize {
        self.results.len().div_ceil(PAGE_SIZE)
    }

    /// Records on the current page
    pub fn page_items(&self) -> &[QuoteRecord] {
        self.page(self.current_page)
    }

    /// Records on an arbitrary page; empty when out of range
    pub fn page(&self, page: usize) -> &[QuoteRecord] {
        if page == 0 {
            return &[];
        }
        let len = self.results.len();
        let start = ((page - 1) * PAGE_SIZE).min(len);
        let end = (start + PAGE_SIZE).min(len);
        &self.results[start..end]
    }

    /// Index of the first record on the current page
    pub fn page_offset(&self) -> usize {
        (self.current_page - 1) * PAGE_SIZE
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Jump to a page. Returns `false` and leaves the page unchanged when
    /// `page` is outside `1..=total_pages`.
    pub fn set_page(&mut self, page: usize) -> bool {
        if (1..=self.total_pages()).contains(&page) {
            self.current_page = page;
            true
        } else {
            false
        }
    }

    /// Go to the next page; no-op on the last page
    pub fn next_page(&mut self) -> bool {
        if self.has_next() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go to the previous page; no-op on the first page
    pub fn prev_page(&mut self) -> bool {
        if self.has_prev() {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    pub fn page_controls(&self) -> PageControls {
        let total = self.total_pages();
        PageControls {
            current: self.current_page,
            total,
            pages: (1..=total).collect(),
            prev_enabled: self.has_prev(),
            next_enabled: self.has_next(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::mock::make_quotes;

    fn populated(count: usize) -> SearchSession {
        let mut session = SearchSession::new();
        session.begin_search("love");
        session.complete_search(make_quotes(count));
        session
    }

    #[test]
    fn test_defaults() {
        let session = SearchSession::new();
        assert_eq!(session.term(), "");
        assert!(session.results().is_empty());
        assert!(!session.is_loading());
        assert!(!session.has_searched());
        assert_eq!(session.current_page(), 1);
        assert_eq!(session.sort_key(), SortKey::Author);
        assert_eq!(session.view_state(), ViewState::Idle);
    }

    #[test]
    fn test_state_transitions() {
        let mut session = SearchSession::new();

        let request = session.begin_search("love");
        assert_eq!(request.term, "love");
        assert_eq!(session.view_state(), ViewState::Loading);

        assert_eq!(session.complete_search(make_quotes(2)), ViewState::Populated);
        assert!(session.has_searched());
        assert!(!session.is_loading());

        session.begin_search("zzz");
        assert_eq!(session.view_state(), ViewState::Loading);
        assert!(session.results().is_empty());

        assert_eq!(session.complete_search(Vec::new()), ViewState::Empty);
    }

    #[test]
    fn test_new_search_resets_page() {
        let mut session = populated(12);
        assert!(session.set_page(3));

        session.begin_search("hope");
        assert_eq!(session.current_page(), 1);
    }

    #[test]
    fn test_total_pages() {
        for (count, pages) in [(0, 0), (1, 1), (5, 1), (6, 2), (10, 2), (11, 3)] {
            assert_eq!(populated(count).total_pages(), pages, "count {}", count);
        }
    }

    #[test]
    fn test_pages_reconstruct_results() {
        for count in 0..=23 {
            let session = populated(count);
            let rebuilt: Vec<QuoteRecord> = (1..=session.total_pages())
                .flat_map(|p| session.page(p).to_vec())
                .collect();
            assert_eq!(rebuilt, session.results());
        }
    }

    #[test]
    fn test_boundaries_are_disabled() {
        let mut session = populated(7);

        let controls = session.page_controls();
        assert!(!controls.prev_enabled);
        assert!(controls.next_enabled);
        assert!(!session.prev_page());
        assert_eq!(session.current_page(), 1);

        assert!(session.next_page());
        let controls = session.page_controls();
        assert_eq!(controls.current, 2);
        assert!(controls.prev_enabled);
        assert!(!controls.next_enabled);
        assert!(!session.next_page());
        assert_eq!(session.current_page(), 2);
    }

    #[test]
    fn test_set_page_out_of_range() {
        let mut session = populated(7);
        assert!(!session.set_page(0));
        assert!(!session.set_page(3));
        assert_eq!(session.current_page(), 1);
        assert!(session.set_page(2));
        assert_eq!(session.page_items().len(), 2);
    }

    #[test]
    fn test_page_controls_list_every_page() {
        let session = populated(23);
        assert_eq!(session.page_controls().pages, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_sort_change_keeps_page_and_elements() {
        let mut session = SearchSession::new();
        session.begin_search("love");
        session.complete_search(vec![
            QuoteRecord::new("q1", "Zebra", "Adams"),
            QuoteRecord::new("q2", "Apple", "Clarke"),
            QuoteRecord::new("q3", "Mango", "Brown"),
            QuoteRecord::new("q4", "Apple", "Adams"),
            QuoteRecord::new("q5", "Kiwi", "Doe"),
            QuoteRecord::new("q6", "Banana", "Evans"),
        ]);

        let authors: Vec<&str> = session.results().iter().map(|q| q.quote.as_str()).collect();
        assert_eq!(authors, vec!["q1", "q4", "q3", "q2", "q5", "q6"]);

        assert!(session.set_page(2));
        let mut before = session.results().to_vec();

        session.set_sort(SortKey::Book);
        assert_eq!(session.current_page(), 2);

        let books: Vec<&str> = session.results().iter().map(|q| q.quote.as_str()).collect();
        // Equal books keep their author order
        assert_eq!(books, vec!["q4", "q2", "q6", "q5", "q3", "q1"]);

        let mut after = session.results().to_vec();
        before.sort_by(|a, b| a.quote.cmp(&b.quote));
        after.sort_by(|a, b| a.quote.cmp(&b.quote));
        assert_eq!(before, after);
    }

    #[test]
    fn test_complete_uses_current_sort_key() {
        let mut session = SearchSession::with_sort(SortKey::Book);
        session.begin_search("love");
        session.complete_search(vec![
            QuoteRecord::new("q1", "b", "a"),
            QuoteRecord::new("q2", "a", "b"),
        ]);
        assert_eq!(session.results()[0].quote, "q2");
    }

    #[test]
    fn test_complete_sorts_accented_authors_with_base_letter() {
        let mut session = SearchSession::new();
        session.begin_search("love");
        session.complete_search(vec![
            QuoteRecord::new("q1", "White Teeth", "Zadie Smith"),
            QuoteRecord::new("q2", "Germinal", "Émile Zola"),
            QuoteRecord::new("q3", "Poems", "Anna"),
        ]);

        let authors: Vec<&str> = session.results().iter().map(|q| q.author.as_str()).collect();
        assert_eq!(authors, vec!["Anna", "Émile Zola", "Zadie Smith"]);
    }

    #[test]
    fn test_late_completion_overwrites() {
        let mut session = SearchSession::new();
        session.begin_search("first");
        session.begin_search("second");
        session.complete_search(make_quotes(1));

        assert_eq!(session.term(), "second");
        assert_eq!(session.view_state(), ViewState::Populated);

        session.complete_search(make_quotes(3));
        assert_eq!(session.results().len(), 3);
    }
}
