//! reqwest-backed [`CollectionClient`].

use std::marker::PhantomData;
use std::time::Duration;

use reqwest::{Client, Response};
use url::Url;

use crate::config::Config;
use crate::entity::{Record, RecordId};
use crate::error::{Result, StewardError};

use super::error::{error_from_response, transport_error};
use super::{CollectionClient, CollectionRequest, CollectionResponse, ResponseHeaders};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Talks to `<base_url>/<kind>` for one record type.
pub struct HttpCollectionClient<R> {
    client: Client,
    collection: Url,
    timeout: Duration,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> HttpCollectionClient<R> {
    /// Create a client rooted at `base_url`, which must end in `/`.
    pub fn new(base_url: &Url, timeout: Duration) -> Result<Self> {
        let collection = base_url.join(R::KIND.path())?;
        let client = Client::builder()
            .user_agent(concat!("steward/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| StewardError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            collection,
            timeout,
            _record: PhantomData,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.base_url()?, config.request_timeout())
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection
    }

    fn item_url(&self, id: &RecordId) -> Result<Url> {
        let mut url = self.collection.clone();
        url.path_segments_mut()
            .map_err(|_| {
                StewardError::Config(format!("'{}' cannot hold resource paths", self.collection))
            })?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }

    fn timeout_secs(&self) -> u64 {
        self.timeout.as_secs().max(1)
    }

    /// Send a request and turn non-2xx statuses into errors.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Response> {
        let response = request
            .send()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::debug!(status = status.as_u16(), url = %self.collection, "request failed");
        Err(error_from_response(status, &body))
    }

    async fn read_body(&self, response: Response) -> Result<String> {
        response
            .text()
            .await
            .map_err(|e| transport_error(e, self.timeout_secs()))
    }
}

impl<R: Record> CollectionClient for HttpCollectionClient<R> {
    type Record = R;

    async fn list(&self, request: &CollectionRequest) -> Result<CollectionResponse<R>> {
        let response = self
            .send(self.client.get(self.collection.clone()).query(&request.query_pairs()))
            .await?;

        let headers = ResponseHeaders::from_header_map(response.headers());
        let body = self.read_body(response).await?;
        let items: Vec<R> = serde_json::from_str(&body).map_err(|e| {
            StewardError::MalformedResponse(format!("expected a list of {}: {e}", R::KIND))
        })?;

        Ok(CollectionResponse::new(items, headers))
    }

    async fn create(&self, draft: &R::Draft) -> Result<R> {
        let response = self
            .send(self.client.post(self.collection.clone()).json(draft))
            .await?;

        let body = self.read_body(response).await?;
        serde_json::from_str(&body).map_err(|e| {
            StewardError::MalformedResponse(format!("expected the created {}: {e}", R::KIND))
        })
    }

    async fn update(&self, id: &RecordId, draft: &R::Draft) -> Result<()> {
        // The body, if any, is ignored; callers refresh instead.
        self.send(self.client.put(self.item_url(id)?).json(draft))
            .await?;
        Ok(())
    }

    async fn remove(&self, id: &RecordId) -> Result<()> {
        self.send(self.client.delete(self.item_url(id)?)).await?;
        Ok(())
    }
}
