//! Case-insensitive response header access and pagination header parsing.
//!
//! Servers and proxies disagree on header casing, and browsers only expose
//! the pagination headers when CORS allows it, so every lookup goes through
//! [`ResponseHeaders::get`] and absence is an ordinary outcome.

use unicase::UniCase;

pub const TOTAL_COUNT: &str = "X-Total-Count";
pub const TOTAL_PAGES: &str = "X-Total-Pages";
pub const CURRENT_PAGE: &str = "X-Current-Page";
pub const PAGE_SIZE: &str = "X-Page-Size";

/// Response headers as received, looked up without regard to case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    entries: Vec<(String, String)>,
}

impl ResponseHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder-style [`ResponseHeaders::insert`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    /// First value whose name matches `name` case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        let wanted = UniCase::new(name);
        self.entries
            .iter()
            .find(|(key, _)| UniCase::new(key.as_str()) == wanted)
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Capture the headers of a reqwest response. Non-UTF-8 values are skipped.
    pub fn from_header_map(map: &reqwest::header::HeaderMap) -> Self {
        let entries = map
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        Self { entries }
    }

    fn get_number(&self, name: &str) -> Option<u64> {
        let raw = self.get(name)?;
        match raw.trim().parse::<u64>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::debug!(header = name, value = raw, "ignoring non-numeric header");
                None
            }
        }
    }
}

/// Pagination metadata a server may attach to a page response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaginationHeaders {
    pub total_count: Option<u64>,
    pub total_pages: Option<u32>,
    pub current_page: Option<u32>,
    pub page_size: Option<u32>,
}

impl PaginationHeaders {
    /// Parse the pagination headers. Missing or non-numeric values are `None`.
    pub fn parse(headers: &ResponseHeaders) -> Self {
        let as_u32 = |value: u64| u32::try_from(value).ok();
        Self {
            total_count: headers.get_number(TOTAL_COUNT),
            total_pages: headers.get_number(TOTAL_PAGES).and_then(as_u32),
            current_page: headers.get_number(CURRENT_PAGE).and_then(as_u32),
            page_size: headers.get_number(PAGE_SIZE).and_then(as_u32),
        }
    }

    /// True when the server reported both totals.
    pub fn is_complete(&self) -> bool {
        self.total_count.is_some() && self.total_pages.is_some()
    }
}
