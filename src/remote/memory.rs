//! In-process [`CollectionClient`] with the same contract as the REST
//! services: server pagination with optional headers, advisory search,
//! id assignment on create.
//!
//! Latency and failures can be injected, and every call is logged with the
//! (tokio) instant it arrived, so behaviour under paused time is observable.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

use crate::entity::{Record, RecordId};
use crate::error::{Result, StewardError};
use crate::list::total_pages_for;

use super::headers::{TOTAL_COUNT, TOTAL_PAGES};
use super::{CollectionClient, CollectionRequest, CollectionResponse, ResponseHeaders};

type LatencyFn = Arc<dyn Fn(&CollectionRequest) -> Duration + Send + Sync>;

/// A call received by an [`InMemoryCollection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(CollectionRequest),
    Create,
    Update(RecordId),
    Remove(RecordId),
}

struct State<R> {
    records: Vec<R>,
    next_id: u64,
    expose_headers: bool,
    calls: Vec<(Instant, Call)>,
    failures: VecDeque<StewardError>,
}

pub struct InMemoryCollection<R> {
    state: Mutex<State<R>>,
    latency: Option<LatencyFn>,
}

impl<R: Record> Default for InMemoryCollection<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Record> InMemoryCollection<R> {
    /// Seed the collection. Pagination headers are exposed by default.
    pub fn new(records: Vec<R>) -> Self {
        let next_id = records
            .iter()
            .filter_map(|r| r.id().as_str().parse::<u64>().ok())
            .max()
            .map_or(1, |max| max + 1);

        Self {
            state: Mutex::new(State {
                records,
                next_id,
                expose_headers: true,
                calls: Vec::new(),
                failures: VecDeque::new(),
            }),
            latency: None,
        }
    }

    /// Whether page responses carry `X-Total-Count` / `X-Total-Pages`.
    pub fn expose_headers(self, expose: bool) -> Self {
        self.state.lock().expose_headers = expose;
        self
    }

    /// Delay every list response by `latency(request)`.
    pub fn with_list_latency(
        mut self,
        latency: impl Fn(&CollectionRequest) -> Duration + Send + Sync + 'static,
    ) -> Self {
        self.latency = Some(Arc::new(latency));
        self
    }

    /// Make the next call (of any kind) fail with `error`.
    pub fn fail_next(&self, error: StewardError) {
        self.state.lock().failures.push_back(error);
    }

    pub fn records(&self) -> Vec<R> {
        self.state.lock().records.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state
            .lock()
            .calls
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    pub fn list_requests(&self) -> Vec<CollectionRequest> {
        self.list_requests_at()
            .into_iter()
            .map(|(_, request)| request)
            .collect()
    }

    /// List requests paired with the instant each arrived.
    pub fn list_requests_at(&self) -> Vec<(Instant, CollectionRequest)> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|(at, call)| match call {
                Call::List(request) => Some((*at, request.clone())),
                _ => None,
            })
            .collect()
    }

    /// Log the call and take any injected failure.
    fn begin(&self, call: Call) -> Option<StewardError> {
        let mut state = self.state.lock();
        state.calls.push((Instant::now(), call));
        state.failures.pop_front()
    }

    fn serve(&self, request: &CollectionRequest) -> CollectionResponse<R> {
        let state = self.state.lock();
        match request {
            CollectionRequest::Search { .. } => {
                CollectionResponse::new(state.records.clone(), ResponseHeaders::new())
            }
            CollectionRequest::Page { page, page_size } => {
                let size = (*page_size).max(1) as usize;
                let start = (page.saturating_sub(1) as usize).saturating_mul(size);
                let items = state
                    .records
                    .iter()
                    .skip(start)
                    .take(size)
                    .cloned()
                    .collect();

                let mut headers = ResponseHeaders::new();
                if state.expose_headers {
                    let total = state.records.len() as u64;
                    // Lower-case on purpose: lookups must not depend on casing.
                    headers.insert(TOTAL_COUNT.to_lowercase(), total.to_string());
                    headers.insert(
                        TOTAL_PAGES.to_lowercase(),
                        total_pages_for(total, *page_size).to_string(),
                    );
                }
                CollectionResponse::new(items, headers)
            }
        }
    }
}

impl<R: Record> CollectionClient for InMemoryCollection<R> {
    type Record = R;

    async fn list(&self, request: &CollectionRequest) -> Result<CollectionResponse<R>> {
        let failure = self.begin(Call::List(request.clone()));
        let response = self.serve(request);

        if let Some(latency) = &self.latency {
            tokio::time::sleep(latency(request)).await;
        }

        match failure {
            Some(err) => Err(err),
            None => Ok(response),
        }
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        if let Some(err) = self.begin(Call::Create) {
            return Err(err);
        }

        let mut state = self.state.lock();
        let id = RecordId::from(state.next_id);
        state.next_id += 1;
        let record = R::from_draft(id, draft.clone());
        state.records.push(record.clone());
        Ok(record)
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<()> {
        if let Some(err) = self.begin(Call::Update(id.clone())) {
            return Err(err);
        }

        let mut state = self.state.lock();
        let slot = state
            .records
            .iter_mut()
            .find(|r| r.id() == id)
            .ok_or_else(|| StewardError::NotFound("record not found".to_string()))?;
        *slot = R::from_draft(id.clone(), draft.clone());
        Ok(())
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        if let Some(err) = self.begin(Call::Remove(id.clone())) {
            return Err(err);
        }

        let mut state = self.state.lock();
        let before = state.records.len();
        state.records.retain(|r| r.id() != id);
        if state.records.len() == before {
            return Err(StewardError::NotFound("record not found".to_string()));
        }
        Ok(())
    }
}
