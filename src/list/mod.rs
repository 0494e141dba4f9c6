//! List-view synchronisation: one controller per record list.
//!
//! The controller reconciles the committed search text and page number
//! against a remote collection. Search text is debounced, a newer fetch
//! always supersedes an older one, and mutations are followed by a refresh
//! rather than a local patch.

mod controller;
mod debounce;
mod navigation;
mod page;
mod query;
mod scroll;

#[cfg(test)]
mod tests;

pub use controller::{
    ControllerBuilder, ControllerOptions, FetchOutcome, ListSnapshot, ListSyncController,
    LoadStatus, Matcher,
};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use navigation::{MemoryNavigation, NavigationState, NoNavigation, SavedView, sync};
pub use page::{PageResult, TotalsOrigin, filter_locally, reconcile_server_page, total_pages_for};
pub use query::{ListQuery, NavigationSnapshot};
pub use scroll::{NoScroll, ScrollAnchor, ScrollOffset, ScrollToken};
