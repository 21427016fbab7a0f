//! Remote action store
//!
//! Actions live at `{apiURL}/api/projects/@current/actions/`. Every request
//! from the toolbar carries the short-lived `temporary_token` as a query
//! parameter instead of a session cookie.

use std::future::Future;
use std::pin::Pin;

use reqwest::{Client, Method, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

use crate::config::ToolbarConfig;
use crate::error::ApiError;
use crate::model::{ActionId, ActionPayload, ActionRecord};

/// Boxed future returned by [`RemoteActionStore`] calls
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// CRUD on persisted actions.
///
/// Calls return owned futures so they can be moved into spawned tasks.
pub trait RemoteActionStore: Send + Sync {
    fn list(&self) -> BoxFuture<Result<Vec<ActionRecord>, ApiError>>;

    fn create(&self, payload: ActionPayload) -> BoxFuture<Result<ActionRecord, ApiError>>;

    fn update(
        &self,
        id: ActionId,
        payload: ActionPayload,
    ) -> BoxFuture<Result<ActionRecord, ApiError>>;

    fn delete(&self, id: ActionId) -> BoxFuture<Result<(), ApiError>>;
}

/// One page of the list endpoint
#[derive(Debug, Deserialize)]
struct Page<T> {
    results: Vec<T>,
    #[serde(default)]
    next: Option<String>,
}

/// [`RemoteActionStore`] over HTTP.
#[derive(Clone, Debug)]
pub struct HttpActionStore {
    client: Client,
    api_url: String,
    temporary_token: Option<String>,
}

impl HttpActionStore {
    pub fn new(config: &ToolbarConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &ToolbarConfig) -> Self {
        Self {
            client,
            api_url: config.api_url().to_string(),
            temporary_token: config.temporary_token.clone(),
        }
    }

    fn authorize(&self, mut url: Url) -> Url {
        if let Some(token) = &self.temporary_token {
            url.query_pairs_mut().append_pair("temporary_token", token);
        }
        url
    }

    /// `{apiURL}/api/projects/@current/actions/?temporary_token=T`
    pub fn collection_url(&self) -> Result<Url, ApiError> {
        let url = Url::parse(&format!("{}/api/projects/@current/actions/", self.api_url))?;
        Ok(self.authorize(url))
    }

    /// `{apiURL}/api/projects/@current/actions/{id}/?temporary_token=T`
    pub fn resource_url(&self, id: ActionId) -> Result<Url, ApiError> {
        let url = Url::parse(&format!(
            "{}/api/projects/@current/actions/{}/",
            self.api_url, id
        ))?;
        Ok(self.authorize(url))
    }

    fn send_json(
        &self,
        method: Method,
        url: Result<Url, ApiError>,
        payload: ActionPayload,
    ) -> BoxFuture<Result<ActionRecord, ApiError>> {
        let client = self.client.clone();
        Box::pin(async move {
            let url = url?;
            tracing::debug!(%method, %url, "Sending action");
            let response = client.request(method, url).json(&payload).send().await?;
            decode(check_status(response).await?).await
        })
    }
}

async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        status: status.as_u16(),
        body,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl RemoteActionStore for HttpActionStore {
    fn list(&self) -> BoxFuture<Result<Vec<ActionRecord>, ApiError>> {
        let client = self.client.clone();
        let url = self.collection_url();
        Box::pin(async move {
            let mut next = Some(url?);
            let mut actions = Vec::new();
            while let Some(url) = next.take() {
                tracing::debug!(%url, "Loading actions page");
                let response = check_status(client.get(url).send().await?).await?;
                let page: Page<ActionRecord> = decode(response).await?;
                actions.extend(page.results);
                next = page.next.map(|n| Url::parse(&n)).transpose()?;
            }
            Ok(actions)
        })
    }

    fn create(&self, payload: ActionPayload) -> BoxFuture<Result<ActionRecord, ApiError>> {
        self.send_json(Method::POST, self.collection_url(), payload)
    }

    fn update(
        &self,
        id: ActionId,
        payload: ActionPayload,
    ) -> BoxFuture<Result<ActionRecord, ApiError>> {
        self.send_json(Method::PATCH, self.resource_url(id), payload)
    }

    fn delete(&self, id: ActionId) -> BoxFuture<Result<(), ApiError>> {
        let client = self.client.clone();
        let url = self.resource_url(id);
        Box::pin(async move {
            let url = url?;
            tracing::debug!(%url, "Deleting action");
            check_status(client.delete(url).send().await?).await?;
            Ok(())
        })
    }
}
