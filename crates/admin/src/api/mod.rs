//! Typed HTTP client for the shop server's admin endpoints.
//!
//! Thin JSON-over-REST: every endpoint answers with the
//! `{success, message, ...}` envelope (the product save form is the one
//! exception, replying 2xx-or-raw-text). The client is clone-cheap; handlers
//! share one connection pool.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use pawmart_core::Envelope;

use crate::config::AdminConfig;

mod error;

pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;

pub use error::ApiError;

/// Client for the admin endpoints of the shop server.
#[derive(Clone)]
pub struct AdminApi {
    inner: Arc<AdminApiInner>,
}

struct AdminApiInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminApi {
    /// Create a new admin API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(config: &AdminConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(AdminApiInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// Absolute URL for an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// GET an envelope endpoint and unwrap its payload.
    pub(crate) async fn get_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self.inner.client.get(self.endpoint(path)).send().await?;
        Self::parse_envelope(response).await
    }

    /// PUT a JSON body to an envelope endpoint and unwrap its payload.
    pub(crate) async fn put_envelope<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .put(self.endpoint(path))
            .json(body)
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    /// DELETE an envelope endpoint and unwrap its payload.
    pub(crate) async fn delete_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .delete(self.endpoint(path))
            .send()
            .await?;
        Self::parse_envelope(response).await
    }

    /// POST with no body to an envelope endpoint, discarding the payload.
    pub(crate) async fn post_ack(&self, path: &str) -> Result<(), ApiError> {
        let response = self.inner.client.post(self.endpoint(path)).send().await?;
        Self::parse_envelope::<serde_json::Value>(response).await?;
        Ok(())
    }

    /// Raw access for the non-envelope endpoints.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.inner.client
    }

    /// Absolute URL builder shared with the call modules.
    pub(crate) fn url(&self, path: &str) -> String {
        self.endpoint(path)
    }

    /// Decode an envelope response, mapping `success: false` to [`ApiError::Api`].
    ///
    /// The pages decode the body regardless of HTTP status - failure
    /// envelopes ride on 4xx/5xx responses.
    async fn parse_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let text = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        envelope
            .into_result()
            .map_err(|message| ApiError::Api { message })
    }
}
