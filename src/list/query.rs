use url::form_urlencoded;

use crate::remote::CollectionRequest;

/// The page/search intent held by a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    /// Committed search text, already trimmed. Empty means server pagination.
    pub search: String,
}

impl ListQuery {
    pub fn new(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
            search: String::new(),
        }
    }

    /// Inverse projection of [`ListQuery::snapshot`]. A search pins the page to 1.
    pub fn from_snapshot(snapshot: &NavigationSnapshot, page_size: u32) -> Self {
        let search = snapshot.search.trim().to_string();
        let page = if search.is_empty() {
            snapshot.page.max(1)
        } else {
            1
        };

        Self {
            page,
            page_size: page_size.max(1),
            search,
        }
    }

    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            page: self.page,
            search: self.search.clone(),
        }
    }

    pub fn is_search(&self) -> bool {
        !self.search.is_empty()
    }

    /// Lower-cased needle handed to record predicates.
    pub fn normalized_search(&self) -> String {
        self.search.trim().to_lowercase()
    }

    pub fn request(&self) -> CollectionRequest {
        if self.is_search() {
            CollectionRequest::Search {
                text: self.search.clone(),
            }
        } else {
            CollectionRequest::Page {
                page: self.page,
                page_size: self.page_size,
            }
        }
    }
}

/// What survives in the navigation state: `?page=2` or `?search=acme`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationSnapshot {
    pub page: u32,
    pub search: String,
}

impl Default for NavigationSnapshot {
    fn default() -> Self {
        Self {
            page: 1,
            search: String::new(),
        }
    }
}

impl NavigationSnapshot {
    /// Parse a query string, with or without its leading `?`.
    ///
    /// Unknown keys are ignored and a missing or unusable page becomes 1.
    pub fn parse(query: &str) -> Self {
        let query = query.trim().trim_start_matches('?');
        let mut snapshot = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "page" => {
                    snapshot.page = value.trim().parse::<u32>().ok().filter(|p| *p > 0).unwrap_or(1);
                }
                "search" => snapshot.search = value.into_owned(),
                _ => {}
            }
        }

        snapshot
    }

    /// Query string without the leading `?`; empty for page 1 with no search.
    pub fn to_query_string(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        if self.page > 1 {
            serializer.append_pair("page", &self.page.to_string());
        }
        if !self.search.is_empty() {
            serializer.append_pair("search", &self.search);
        }
        serializer.finish()
    }
}
