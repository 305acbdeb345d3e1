//! HTTP exchanger.
//!
//! One case is one POST. The exchanger knows nothing about expected
//! outcomes; it reports what came back and leaves judgement to
//! [`crate::validate`]. No retries are attempted, and unless a timeout is
//! configured a hanging server hangs the exchange.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::redirect;
use tracing::{debug, trace};

use crate::error::TransportError;
use crate::jsonrpc::RequestEnvelope;

/// What the server sent back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    /// HTTP status code.
    pub status: u16,
    /// `Content-Type` header of the response, if any.
    pub content_type: Option<String>,
    /// Raw response body.
    pub body: Bytes,
}

impl Exchange {
    /// Body decoded as UTF-8, invalid sequences replaced.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Sends one request envelope and captures the response.
#[async_trait]
pub trait Exchanger: Send + Sync {
    /// Performs exactly one exchange.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if no complete response was received.
    async fn exchange(
        &self,
        request: &RequestEnvelope,
        content_type: &str,
    ) -> Result<Exchange, TransportError>;
}

/// [`Exchanger`] backed by a pooled `reqwest` client.
#[derive(Debug, Clone)]
pub struct HttpExchanger {
    client: reqwest::Client,
    url: String,
}

impl HttpExchanger {
    /// Creates an exchanger POSTing to `url`.
    ///
    /// Redirects are not followed: a conformant endpoint answers directly.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().redirect(redirect::Policy::none());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// Target URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Exchanger for HttpExchanger {
    async fn exchange(
        &self,
        request: &RequestEnvelope,
        content_type: &str,
    ) -> Result<Exchange, TransportError> {
        let payload = serde_json::to_vec(request)
            .map_err(|e| TransportError::InvalidRequest(e.to_string()))?;

        trace!(
            url = %self.url,
            content_type,
            payload = %String::from_utf8_lossy(&payload),
            "sending request"
        );

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, content_type)
            .body(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        debug!(status, bytes = body.len(), "response received");

        Ok(Exchange {
            status,
            content_type,
            body,
        })
    }
}
