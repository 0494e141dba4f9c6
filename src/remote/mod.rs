//! Access to the REST record collections.
//!
//! Every collection follows the same contract:
//! - `GET {base}?page={n}&pageSize={m}` returns one page as a JSON array, with
//!   optional `X-Total-Count` / `X-Total-Pages` headers
//! - `GET {base}?search={text}` returns the whole collection (any filtering
//!   the server applies is advisory; callers filter again)
//! - `POST {base}`, `PUT {base}/{id}` and `DELETE {base}/{id}` mutate it

pub mod error;
pub mod headers;
pub mod http;
pub mod memory;

use std::future::Future;

use crate::entity::{Record, RecordId};
use crate::error::Result;

pub use headers::{PaginationHeaders, ResponseHeaders};
pub use http::HttpCollectionClient;
pub use memory::InMemoryCollection;

/// A read against a collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectionRequest {
    /// One server-side page.
    Page { page: u32, page_size: u32 },
    /// The entire collection, with the search text passed along as a hint.
    Search { text: String },
}

impl CollectionRequest {
    /// Query-string pairs for this request, in a stable order.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            CollectionRequest::Page { page, page_size } => vec![
                ("page", page.to_string()),
                ("pageSize", page_size.to_string()),
            ],
            CollectionRequest::Search { text } => vec![("search", text.clone())],
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, CollectionRequest::Search { .. })
    }
}

/// Decoded body plus the headers needed for pagination.
#[derive(Debug, Clone)]
pub struct CollectionResponse<R> {
    pub items: Vec<R>,
    pub headers: ResponseHeaders,
}

impl<R> CollectionResponse<R> {
    pub fn new(items: Vec<R>, headers: ResponseHeaders) -> Self {
        Self { items, headers }
    }
}

/// Common interface for record collection backends
pub trait CollectionClient: Send + Sync + 'static {
    type Record: Record;

    /// Fetch a page or the full collection
    fn list(
        &self,
        request: &CollectionRequest,
    ) -> impl Future<Output = Result<CollectionResponse<Self::Record>>> + Send;

    /// Create a record, returning it with its id populated
    fn create(
        &self,
        draft: &<Self::Record as Record>::Draft,
    ) -> impl Future<Output = Result<Self::Record>> + Send;

    /// Replace an existing record's fields
    fn update(
        &self,
        id: &RecordId,
        draft: &<Self::Record as Record>::Draft,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Delete a record
    fn remove(&self, id: &RecordId) -> impl Future<Output = Result<()>> + Send;
}
