//! Typed HTTP client for the shop server's storefront endpoints.
//!
//! Everything here is JSON POSTs answered with the `{success, message, ...}`
//! envelope. The client is clone-cheap; pages share one connection pool.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use pawmart_core::Envelope;

use crate::config::StorefrontConfig;

pub mod cart;
pub mod profile;

/// Errors that can occur when calling the shop server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (network/transport).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The envelope came back with `success: false`.
    #[error("API error: {message}")]
    Api {
        /// Server-supplied message.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ApiError {
    /// The message to surface to the user; transport and parse failures
    /// collapse to the generic network toast.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api { message } => message.clone(),
            Self::Http(_) | Self::Parse(_) => "Lỗi mạng xảy ra".to_string(),
        }
    }
}

/// Client for the storefront endpoints of the shop server.
#[derive(Clone)]
pub struct ShopApi {
    inner: Arc<ShopApiInner>,
}

struct ShopApiInner {
    client: reqwest::Client,
    base_url: String,
}

impl ShopApi {
    /// Create a new storefront API client.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn new(config: &StorefrontConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(ShopApiInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
            }),
        }
    }

    /// POST a JSON body to an envelope endpoint and unwrap its payload.
    ///
    /// The body is decoded regardless of HTTP status - failure envelopes
    /// ride on 4xx/5xx responses.
    pub(crate) async fn post_envelope<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .post(format!("{}{path}", self.inner.base_url))
            .json(body)
            .send()
            .await?;

        let text = response.text().await?;
        let envelope: Envelope<T> = serde_json::from_str(&text)?;
        envelope
            .into_result()
            .map_err(|message| ApiError::Api { message })
    }
}
