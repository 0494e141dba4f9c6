//! Building a [`PageResult`] from a server response.

use serde::Serialize;

use crate::remote::{PaginationHeaders, ResponseHeaders};

/// Where a page's totals came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TotalsOrigin {
    /// Both pagination headers were present.
    Headers,
    /// Count header only; pages computed from it.
    CountHeader,
    /// No count header; the page length stood in for the total.
    PageLength,
    /// Client-side search over the whole collection.
    Filtered,
}

/// One rendered page plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult<R> {
    pub items: Vec<R>,
    pub total_count: u64,
    pub total_pages: u32,
    pub totals: TotalsOrigin,
}

impl<R> PageResult<R> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 1,
            totals: TotalsOrigin::PageLength,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.totals, TotalsOrigin::PageLength | TotalsOrigin::CountHeader)
    }
}

/// `max(1, ceil(count / page_size))`
pub fn total_pages_for(count: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = count.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Reconcile a server page with whatever pagination headers survived.
///
/// Reported values win; anything missing degrades to a local computation
/// and is logged, never raised. `X-Current-Page` and `X-Page-Size` are only
/// checked against the request.
pub fn reconcile_server_page<R>(
    items: Vec<R>,
    headers: &ResponseHeaders,
    page: u32,
    page_size: u32,
) -> PageResult<R> {
    let reported = PaginationHeaders::parse(headers);

    if reported.current_page.is_some_and(|current| current != page)
        || reported.page_size.is_some_and(|size| size != page_size)
    {
        tracing::info!(
            target: "steward::pagination",
            requested_page = page,
            requested_page_size = page_size,
            current_page = ?reported.current_page,
            page_size = ?reported.page_size,
            "server answered a different page than requested"
        );
    }

    let (total_count, counted) = match reported.total_count {
        Some(count) => (count, true),
        None => (items.len() as u64, false),
    };

    let (total_pages, totals) = match (reported.total_pages, counted) {
        (Some(pages), true) => (pages.max(1), TotalsOrigin::Headers),
        (Some(pages), false) => (pages.max(1), TotalsOrigin::PageLength),
        (None, true) => (total_pages_for(total_count, page_size), TotalsOrigin::CountHeader),
        (None, false) => (total_pages_for(total_count, page_size), TotalsOrigin::PageLength),
    };

    if !reported.is_complete() {
        tracing::info!(
            target: "steward::pagination",
            total_count_header = reported.total_count.is_some(),
            total_pages_header = reported.total_pages.is_some(),
            total_count,
            total_pages,
            "pagination headers missing, using computed totals"
        );
    }

    PageResult {
        items,
        total_count,
        total_pages,
        totals,
    }
}

/// Filter the full collection locally, keeping server order.
pub fn filter_locally<R>(
    items: Vec<R>,
    needle: &str,
    matches: impl Fn(&R, &str) -> bool,
) -> PageResult<R> {
    let items: Vec<R> = items
        .into_iter()
        .filter(|item| matches(item, needle))
        .collect();

    PageResult {
        total_count: items.len() as u64,
        total_pages: 1,
        totals: TotalsOrigin::Filtered,
        items,
    }
}
