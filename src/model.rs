// Core structs: TextLayers, FieldValue, ListingAttributes, Listing
use chrono::{DateTime, Utc};
use std::fmt;

/// The three text sources of one listing, ranked by evidentiary trust.
/// `url` and `title` outrank `body`; `body` is lower-cased by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayers {
    pub url: String,
    pub title: String,
    pub body: String,
}

impl TextLayers {
    pub fn new(url: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Outcome of searching one phrase across the layers of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    FoundInTitleOrUrl,
    FoundInBodyOnly,
    NotFound,
}

impl MatchResult {
    pub fn is_found(self) -> bool {
        !matches!(self, MatchResult::NotFound)
    }
}

/// One phrase tested against a listing as evidence for an attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Candidate {
    /// Searched as `display`, reported as `digits` ("16 gb" -> "16").
    Numeric { digits: String, display: String },
    /// Searched and reported as the literal phrase.
    Text(String),
}

impl Candidate {
    pub fn numeric(display: impl Into<String>) -> Self {
        let display = display.into();
        let digits = crate::utils::digits_only(&display);
        Candidate::Numeric { digits, display }
    }

    pub fn text(phrase: impl Into<String>) -> Self {
        Candidate::Text(phrase.into())
    }

    /// The text handed to the matcher.
    pub fn phrase(&self) -> &str {
        match self {
            Candidate::Numeric { display, .. } => display,
            Candidate::Text(phrase) => phrase,
        }
    }

    /// The value reported when this candidate matches.
    pub fn normalized(&self) -> &str {
        match self {
            Candidate::Numeric { digits, .. } => digits,
            Candidate::Text(phrase) => phrase,
        }
    }
}

/// Result of reducing every matched candidate of one attribute.
///
/// `Ambiguous` holds the distinct values sorted ascending and never fewer
/// than two of them. Neither `Absent` nor `Ambiguous` is ever resolved to a
/// guess.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue<T> {
    Absent,
    Single(T),
    Ambiguous(Vec<T>),
}

impl<T: PartialOrd> FieldValue<T> {
    /// Collapses matched values: none -> `Absent`, one distinct -> `Single`,
    /// several distinct -> `Ambiguous`.
    pub fn from_matches(mut values: Vec<T>) -> Self {
        values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        values.dedup_by(|a, b| a == b);

        match values.len() {
            0 => FieldValue::Absent,
            1 => FieldValue::Single(values.remove(0)),
            _ => FieldValue::Ambiguous(values),
        }
    }
}

impl<T> FieldValue<T> {
    pub fn single(&self) -> Option<&T> {
        match self {
            FieldValue::Single(value) => Some(value),
            _ => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for FieldValue<T> {
    /// Absent renders empty, ambiguous renders as `{a, b}`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Absent => Ok(()),
            FieldValue::Single(value) => write!(f, "{}", value),
            FieldValue::Ambiguous(values) => {
                write!(f, "{{")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                write!(f, "}}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Air,
    Pro,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Air => "Air",
            Variant::Pro => "Pro",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything inferred from the text of one listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingAttributes {
    pub date: String,
    pub variant: Variant,
    pub year: FieldValue<String>,
    pub ram: FieldValue<String>,
    pub storage: FieldValue<String>,
    pub touchbar: FieldValue<String>,
    pub m1_chip: bool,
    pub cpu_ghz: FieldValue<f64>,
    pub url: String,
}

/// Numeric fields from the key/value table at the bottom of a listing page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingMetadata {
    pub views: Option<u64>,
    pub price: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct Listing {
    pub attributes: ListingAttributes,
    pub metadata: ListingMetadata,
    pub fetched_at: DateTime<Utc>,
}

impl Listing {
    pub fn price(&self) -> Option<u64> {
        self.metadata.price
    }

    pub fn url(&self) -> &str {
        &self.attributes.url
    }
}

/// Raw content of one listing page as produced by the page fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    pub url: String,
    pub title: String,
    pub description: String,
    pub metadata_rows: Vec<(String, String)>,
}

impl ListingPage {
    pub fn layers(&self) -> TextLayers {
        TextLayers::new(&self.url, &self.title, &self.description)
    }
}

#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub query: String,
    pub zip_code: u32,
    pub distance_km: u32,
    pub min_price: u64,
    pub max_price: u64,
    pub offset: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("title has no bracketed date token: {0:?}")]
    MalformedTitle(String),
    #[error("cannot build search pattern for {phrase:?}: {source}")]
    InvalidPattern {
        phrase: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("http error: {0}")]
    HttpError(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected response status {0}")]
    InvalidResponse(u16),
    #[error(transparent)]
    Parse(#[from] ParserError),
}

impl From<reqwest::Error> for ScraperError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScraperError::Timeout
        } else {
            ScraperError::HttpError(e.to_string())
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("html parse error: {0}")]
    HtmlParseError(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    DatabaseError(#[from] rusqlite::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("api error: {0}")]
    ApiError(String),
    #[error("telegram unreachable")]
    Unreachable,
}

/// Why a single listing was dropped from the result set.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error(transparent)]
    Scrape(#[from] ScraperError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_matches_absent() {
        let value: FieldValue<String> = FieldValue::from_matches(vec![]);
        assert_eq!(value, FieldValue::Absent);
    }

    #[test]
    fn test_from_matches_collapses_duplicates() {
        let value = FieldValue::from_matches(vec!["16".to_string(), "16".to_string()]);
        assert_eq!(value, FieldValue::Single("16".to_string()));
    }

    #[test]
    fn test_from_matches_ambiguous_is_sorted() {
        let value = FieldValue::from_matches(vec![2.6, 2.3, 2.6]);
        assert_eq!(value, FieldValue::Ambiguous(vec![2.3, 2.6]));
    }

    #[test]
    fn test_field_value_display() {
        assert_eq!(FieldValue::<String>::Absent.to_string(), "");
        assert_eq!(FieldValue::Single(2.3).to_string(), "2.3");
        let ambiguous = FieldValue::Ambiguous(vec!["8".to_string(), "16".to_string()]);
        assert_eq!(ambiguous.to_string(), "{8, 16}");
    }

    #[test]
    fn test_numeric_candidate_normalizes_to_digits() {
        let candidate = Candidate::numeric("16 gb");
        assert_eq!(candidate.phrase(), "16 gb");
        assert_eq!(candidate.normalized(), "16");

        let text = Candidate::text("touch bar");
        assert_eq!(text.phrase(), "touch bar");
        assert_eq!(text.normalized(), "touch bar");
    }

    #[test]
    fn test_extract_error_display() {
        let err = ExtractError::MalformedTitle("Macbook Pro".to_string());
        assert!(err.to_string().contains("Macbook Pro"));
    }
}
