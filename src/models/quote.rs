//! Quote record and search request models.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A single quote returned by the generation service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    /// The quoted text
    #[serde(default)]
    pub quote: String,

    /// Title of the book the quote comes from
    #[serde(default)]
    pub book: String,

    /// Author of the book
    #[serde(default)]
    pub author: String,
}

impl QuoteRecord {
    /// Create a new quote record
    pub fn new(
        quote: impl Into<String>,
        book: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            quote: quote.into(),
            book: book.into(),
            author: author.into(),
        }
    }

    /// Get the field used for the given sort key
    pub fn sort_field(&self, key: SortKey) -> &str {
        match key {
            SortKey::Author => &self.author,
            SortKey::Book => &self.book,
        }
    }
}

/// Field used to order search results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    #[default]
    Author,
    Book,
}

impl SortKey {
    /// Compare two records by this key.
    ///
    /// Letters are compared first without accents or case ("Émile" sorts
    /// with "emile"), then by the lowercase form, then by the raw strings so
    /// that the ordering is total.
    pub fn compare(&self, a: &QuoteRecord, b: &QuoteRecord) -> Ordering {
        collate(a.sort_field(*self), b.sort_field(*self))
    }
}

impl std::fmt::Display for SortKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortKey::Author => write!(f, "author"),
            SortKey::Book => write!(f, "book"),
        }
    }
}

impl std::str::FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "author" | "a" => Ok(SortKey::Author),
            "book" | "b" => Ok(SortKey::Book),
            other => Err(format!("unknown sort key '{}' (expected author or book)", other)),
        }
    }
}

fn collate(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| {
            a.chars()
                .flat_map(char::to_lowercase)
                .cmp(b.chars().flat_map(char::to_lowercase))
        })
        .then_with(|| a.cmp(b))
}

/// Lowercase letters with combining marks stripped after NFD decomposition
fn base_letters(s: &str) -> impl Iterator<Item = char> + '_ {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

/// A single search invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The word quotes must contain
    pub term: String,
}

impl SearchRequest {
    /// Create a new search request
    pub fn new(term: impl Into<String>) -> Self {
        Self { term: term.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_from_str() {
        assert_eq!("author".parse::<SortKey>().unwrap(), SortKey::Author);
        assert_eq!("Book".parse::<SortKey>().unwrap(), SortKey::Book);
        assert_eq!("b".parse::<SortKey>().unwrap(), SortKey::Book);
        assert!("title".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_key_default_is_author() {
        assert_eq!(SortKey::default(), SortKey::Author);
    }

    #[test]
    fn test_compare_ignores_case() {
        let a = QuoteRecord::new("q", "b", "alice");
        let b = QuoteRecord::new("q", "b", "Bob");
        assert_eq!(SortKey::Author.compare(&a, &b), Ordering::Less);
        assert_eq!(SortKey::Author.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_compare_accented_initial_sorts_with_base_letter() {
        let zola = QuoteRecord::new("q", "Germinal", "Émile Zola");
        let smith = QuoteRecord::new("q", "White Teeth", "Zadie Smith");
        let anna = QuoteRecord::new("q", "Poems", "Anna");
        assert_eq!(SortKey::Author.compare(&zola, &smith), Ordering::Less);

        let mut records = vec![smith, zola, anna];
        records.sort_by(|a, b| SortKey::Author.compare(a, b));
        let authors: Vec<&str> = records.iter().map(|r| r.author.as_str()).collect();
        assert_eq!(authors, vec!["Anna", "Émile Zola", "Zadie Smith"]);
    }

    #[test]
    fn test_compare_accent_breaks_tie_after_base_letters() {
        let plain = QuoteRecord::new("q", "b", "Eve");
        let accented = QuoteRecord::new("q", "b", "Ève");
        assert_eq!(SortKey::Author.compare(&plain, &accented), Ordering::Less);
        assert_eq!(SortKey::Author.compare(&accented, &plain), Ordering::Greater);
    }

    #[test]
    fn test_compare_mixed_case_tie_is_total() {
        let upper = QuoteRecord::new("q", "De Profundis", "Oscar Wilde");
        let lower = QuoteRecord::new("q", "de Profundis", "Oscar Wilde");
        let other = QuoteRecord::new("q", "Dracula", "Bram Stoker");

        assert_eq!(SortKey::Book.compare(&upper, &lower), Ordering::Less);
        assert_eq!(SortKey::Book.compare(&lower, &upper), Ordering::Greater);
        assert_eq!(SortKey::Book.compare(&lower, &other), Ordering::Less);
    }

    #[test]
    fn test_compare_precomposed_and_decomposed_agree() {
        let precomposed = QuoteRecord::new("q", "b", "Br\u{f6}nte");
        let decomposed = QuoteRecord::new("q", "b", "Bro\u{308}nte");
        let later = QuoteRecord::new("q", "b", "Brooke");
        assert_eq!(SortKey::Author.compare(&precomposed, &later), Ordering::Less);
        assert_eq!(SortKey::Author.compare(&decomposed, &later), Ordering::Less);
    }

    #[test]
    fn test_compare_equal_fields() {
        let a = QuoteRecord::new("first", "Emma", "Austen");
        let b = QuoteRecord::new("second", "Emma", "Austen");
        assert_eq!(SortKey::Book.compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn test_record_deserialize_missing_fields() {
        let record: QuoteRecord = serde_json::from_str(r#"{"quote": "Hello"}"#).unwrap();
        assert_eq!(record.quote, "Hello");
        assert!(record.book.is_empty());
        assert!(record.author.is_empty());
    }
}
