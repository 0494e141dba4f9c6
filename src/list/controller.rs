use std::collections::BTreeSet;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;

use crate::config::Config;
use crate::entity::{EntityKind, Record, RecordId};
use crate::error::{Result, StewardError};
use crate::remote::CollectionClient;
use crate::validation::{FieldErrors, Validate};

use super::debounce::{Debouncer, SEARCH_DEBOUNCE};
use super::navigation::{self, NavigationState, NoNavigation};
use super::page::{PageResult, TotalsOrigin, filter_locally, reconcile_server_page};
use super::query::{ListQuery, NavigationSnapshot};
use super::scroll::{NoScroll, ScrollAnchor};

/// Search predicate: `(record, lower-cased needle) -> matches`.
pub type Matcher<R> = Arc<dyn Fn(&R, &str) -> bool + Send + Sync>;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Idle,
    Fetching,
    Ready,
    Failed(String),
}

/// Everything a view needs to render one list.
#[derive(Debug, Clone)]
pub struct ListSnapshot<R> {
    pub query: ListQuery,
    pub page: PageResult<R>,
    pub status: LoadStatus,
    /// Message from the last failed create/update/remove, cleared on success.
    pub mutation_error: Option<String>,
    pub expanded: BTreeSet<RecordId>,
    /// Search text as typed, not yet committed by the debounce.
    pub pending_search: String,
}

#[derive(Debug, Clone)]
pub struct ControllerOptions {
    pub page_size: u32,
    pub debounce: Duration,
    pub request_timeout: Duration,
}

impl ControllerOptions {
    pub fn new(page_size: u32) -> Self {
        Self {
            page_size: page_size.max(1),
            debounce: SEARCH_DEBOUNCE,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    pub fn from_config(config: &Config, kind: EntityKind) -> Self {
        Self {
            page_size: config.page_size(kind),
            debounce: config.search_debounce(),
            request_timeout: config.request_timeout(),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// How a single fetch settled.
#[derive(Debug, Clone)]
pub enum FetchOutcome<R> {
    Ok(PageResult<R>),
    ValidationFailed(FieldErrors),
    Failed(String),
}

impl<R> FetchOutcome<R> {
    pub fn from_error(error: StewardError) -> Self {
        match error {
            StewardError::Validation(fields) => FetchOutcome::ValidationFailed(fields),
            other => FetchOutcome::Failed(other.user_message()),
        }
    }
}

struct Inner<R> {
    query: ListQuery,
    page: PageResult<R>,
    status: LoadStatus,
    mutation_error: Option<String>,
    expanded: BTreeSet<RecordId>,
    pending_search: String,
    /// Bumped by every fetch; a result is applied only if it still matches.
    generation: u64,
}

impl<R: Clone> Inner<R> {
    fn snapshot(&self) -> ListSnapshot<R> {
        ListSnapshot {
            query: self.query.clone(),
            page: self.page.clone(),
            status: self.status.clone(),
            mutation_error: self.mutation_error.clone(),
            expanded: self.expanded.clone(),
            pending_search: self.pending_search.clone(),
        }
    }

    fn commit_search(&mut self) {
        self.query.search = self.pending_search.trim().to_string();
        self.query.page = 1;
        self.expanded.clear();
    }

    fn apply(&mut self, outcome: FetchOutcome<R>) {
        match outcome {
            FetchOutcome::Ok(page) => {
                if self.query.is_search() {
                    self.query.page = 1;
                }
                self.page = page;
                self.status = LoadStatus::Ready;
            }
            FetchOutcome::ValidationFailed(fields) => {
                self.status = LoadStatus::Failed(fields.to_string());
            }
            FetchOutcome::Failed(message) => {
                self.status = LoadStatus::Failed(message);
            }
        }
    }

    /// The last page, when the settled page came back empty beyond it.
    ///
    /// Totals computed from the page length say nothing about later pages,
    /// so they never move the view.
    fn step_back_target(&self) -> Option<u32> {
        let past_end = self.status == LoadStatus::Ready
            && !self.query.is_search()
            && self.page.items.is_empty()
            && self.page.totals != TotalsOrigin::PageLength
            && self.query.page > self.page.total_pages;
        past_end.then_some(self.page.total_pages)
    }
}

struct Shared<C: CollectionClient> {
    client: C,
    matcher: Matcher<C::Record>,
    options: ControllerOptions,
    inner: Mutex<Inner<C::Record>>,
    debouncer: Debouncer,
    navigation: Arc<dyn NavigationState>,
    scroll: Arc<dyn ScrollAnchor>,
    snapshots: watch::Sender<ListSnapshot<C::Record>>,
}

pub struct ControllerBuilder<C: CollectionClient> {
    client: C,
    options: ControllerOptions,
    matcher: Option<Matcher<C::Record>>,
    navigation: Arc<dyn NavigationState>,
    scroll: Arc<dyn ScrollAnchor>,
}

impl<C: CollectionClient> ControllerBuilder<C> {
    /// Replace the record type's own search predicate.
    pub fn matcher(
        mut self,
        matcher: impl Fn(&C::Record, &str) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.matcher = Some(Arc::new(matcher));
        self
    }

    /// Seed from, and sync to, `navigation`.
    pub fn navigation(mut self, navigation: Arc<dyn NavigationState>) -> Self {
        self.navigation = navigation;
        self
    }

    pub fn scroll(mut self, scroll: Arc<dyn ScrollAnchor>) -> Self {
        self.scroll = scroll;
        self
    }

    pub fn build(self) -> ListSyncController<C> {
        let seed = NavigationSnapshot::parse(&self.navigation.current());
        let query = ListQuery::from_snapshot(&seed, self.options.page_size);

        let inner = Inner {
            pending_search: query.search.clone(),
            query,
            page: PageResult::empty(),
            status: LoadStatus::Idle,
            mutation_error: None,
            expanded: BTreeSet::new(),
            generation: 0,
        };
        let (snapshots, _) = watch::channel(inner.snapshot());

        let matcher: Matcher<C::Record> = match self.matcher {
            Some(matcher) => matcher,
            None => Arc::new(|record: &C::Record, needle: &str| record.matches(needle)),
        };

        ListSyncController {
            shared: Arc::new(Shared {
                client: self.client,
                matcher,
                debouncer: Debouncer::new(self.options.debounce),
                options: self.options,
                inner: Mutex::new(inner),
                navigation: self.navigation,
                scroll: self.scroll,
                snapshots,
            }),
        }
    }
}

/// Keeps one list view's query and page consistent with a remote collection.
///
/// Cheap to clone; clones share state. Search debouncing spawns onto the
/// current tokio runtime.
pub struct ListSyncController<C: CollectionClient> {
    shared: Arc<Shared<C>>,
}

impl<C: CollectionClient> Clone for ListSyncController<C> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<C: CollectionClient> ListSyncController<C> {
    pub fn builder(client: C, options: ControllerOptions) -> ControllerBuilder<C> {
        ControllerBuilder {
            client,
            options,
            matcher: None,
            navigation: Arc::new(NoNavigation),
            scroll: Arc::new(NoScroll),
        }
    }

    pub fn new(client: C, options: ControllerOptions) -> Self {
        Self::builder(client, options).build()
    }

    pub fn client(&self) -> &C {
        &self.shared.client
    }

    pub fn options(&self) -> &ControllerOptions {
        &self.shared.options
    }

    pub fn kind(&self) -> EntityKind {
        <C::Record as Record>::KIND
    }

    pub fn snapshot(&self) -> ListSnapshot<C::Record> {
        self.shared.inner.lock().snapshot()
    }

    pub fn subscribe(&self) -> watch::Receiver<ListSnapshot<C::Record>> {
        self.shared.snapshots.subscribe()
    }

    /// Initial fetch for the navigation-seeded query.
    ///
    /// A bookmarked page past the end steps back to the last page.
    pub async fn mount(&self) {
        self.fetch().await;
        self.step_back_if_past_end().await;
    }

    /// Record typed text; the search commits after the debounce delay.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.shared.inner.lock().pending_search = text.into();
        self.publish();

        let shared: Weak<Shared<C>> = Arc::downgrade(&self.shared);
        self.shared.debouncer.schedule(async move {
            if let Some(shared) = shared.upgrade() {
                let controller = ListSyncController { shared };
                controller.fetch_with(Inner::commit_search).await;
            }
        });
    }

    /// Commit the typed text now, cancelling any pending debounce.
    pub async fn submit_search_immediately(&self) {
        self.shared.debouncer.cancel();
        self.fetch_with(Inner::commit_search).await;
    }

    /// Whether typed text is still waiting on the debounce.
    pub fn has_pending_search(&self) -> bool {
        self.shared.debouncer.is_pending()
    }

    /// Move to page `n`, clamped to `[1, total_pages]`.
    ///
    /// Ignored while searching. Does not refetch when already settled there.
    pub async fn go_to_page(&self, n: u32) {
        let target = {
            let inner = self.shared.inner.lock();
            if inner.query.is_search() {
                tracing::debug!(page = n, "ignoring page change during search");
                return;
            }

            let target = n.clamp(1, inner.page.total_pages.max(1));
            if target == inner.query.page && inner.status == LoadStatus::Ready {
                return;
            }
            target
        };

        self.fetch_with(|inner| inner.query.page = target).await;
    }

    /// Re-fetch the current query unchanged.
    pub async fn refresh(&self) {
        self.fetch().await;
    }

    /// Create a record, then show page 1 with no search.
    pub async fn create(
        &self,
        draft: <C::Record as Record>::Draft,
    ) -> Result<C::Record> {
        let result = match draft.validate() {
            Ok(()) => self.bounded(self.shared.client.create(&draft)).await,
            Err(fields) => Err(StewardError::Validation(fields)),
        };
        let created = self.settle_mutation(result)?;

        self.shared.debouncer.cancel();
        self.fetch_with(|inner| {
            inner.pending_search.clear();
            inner.commit_search();
        })
        .await;

        Ok(created)
    }

    /// Update a record and refresh, keeping the scroll position.
    pub async fn update(
        &self,
        id: &RecordId,
        draft: <C::Record as Record>::Draft,
    ) -> Result<()> {
        if let Err(fields) = draft.validate() {
            return self.settle_mutation(Err(StewardError::Validation(fields)));
        }

        let token = self.shared.scroll.capture();
        let result = self.bounded(self.shared.client.update(id, &draft)).await;
        self.settle_mutation(result)?;

        self.fetch().await;
        self.shared.scroll.restore(token);
        Ok(())
    }

    /// Delete a record and refresh, keeping the scroll position.
    ///
    /// Deleting the only row of the last page steps back one page.
    pub async fn remove(&self, id: &RecordId) -> Result<()> {
        let token = self.shared.scroll.capture();
        let result = self.bounded(self.shared.client.remove(id)).await;
        self.settle_mutation(result)?;

        self.fetch_with(|inner| {
            inner.expanded.remove(id);
        })
        .await;
        self.step_back_if_past_end().await;
        self.shared.scroll.restore(token);
        Ok(())
    }

    /// Expand or collapse a row's detail panel. Returns whether it is now expanded.
    pub fn toggle_expanded(&self, id: &RecordId) -> bool {
        let expanded = {
            let mut inner = self.shared.inner.lock();
            if inner.expanded.remove(id) {
                false
            } else {
                inner.expanded.insert(id.clone());
                true
            }
        };
        self.publish();
        expanded
    }

    async fn fetch(&self) {
        self.fetch_with(|_| {}).await;
    }

    /// Adjust the query and start a fetch under one lock, so no older
    /// result can land between the two.
    async fn fetch_with<F>(&self, prepare: F)
    where
        F: FnOnce(&mut Inner<C::Record>) + Send,
    {
        let (generation, query) = {
            let mut inner = self.shared.inner.lock();
            prepare(&mut *inner);
            inner.generation += 1;
            inner.status = LoadStatus::Fetching;
            (inner.generation, inner.query.clone())
        };
        self.publish();

        tracing::debug!(
            kind = %self.kind(),
            generation,
            page = query.page,
            search = %query.search,
            "fetching list"
        );
        let outcome = self.load(&query).await;

        let applied = {
            let mut inner = self.shared.inner.lock();
            if inner.generation == generation {
                inner.apply(outcome);
                true
            } else {
                tracing::debug!(
                    kind = %self.kind(),
                    generation,
                    latest = inner.generation,
                    "discarding stale fetch"
                );
                false
            }
        };

        if applied {
            self.sync_navigation();
            self.publish();
        }
    }

    async fn load(&self, query: &ListQuery) -> FetchOutcome<C::Record> {
        let response = match self.bounded(self.shared.client.list(&query.request())).await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(kind = %self.kind(), error = %e, "list fetch failed");
                return FetchOutcome::from_error(e);
            }
        };

        let page = if query.is_search() {
            let matcher = &self.shared.matcher;
            filter_locally(response.items, &query.normalized_search(), |record, needle| {
                matcher(record, needle)
            })
        } else {
            reconcile_server_page(response.items, &response.headers, query.page, query.page_size)
        };
        FetchOutcome::Ok(page)
    }

    /// Bound a client call by the request timeout.
    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        let timeout = self.shared.options.request_timeout;
        match tokio::time::timeout(timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(StewardError::Timeout(timeout.as_secs().max(1))),
        }
    }

    /// Record a mutation's failure without touching the query or page.
    fn settle_mutation<T>(&self, result: Result<T>) -> Result<T> {
        let message = result.as_ref().err().map(StewardError::user_message);
        self.shared.inner.lock().mutation_error = message;
        self.publish();
        result
    }

    async fn step_back_if_past_end(&self) {
        let target = self.shared.inner.lock().step_back_target();
        if let Some(last) = target {
            tracing::debug!(kind = %self.kind(), page = last, "page past the end, stepping back");
            self.fetch_with(|inner| inner.query.page = last).await;
        }
    }

    fn sync_navigation(&self) {
        let snapshot = self.shared.inner.lock().query.snapshot();
        navigation::sync(self.shared.navigation.as_ref(), &snapshot);
    }

    fn publish(&self) {
        let snapshot = self.snapshot();
        self.shared.snapshots.send_replace(snapshot);
    }
}
