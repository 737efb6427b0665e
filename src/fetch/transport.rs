//! Rate Transport
//!
//! The network seam of the coordinator: one GET returning status and body.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;

use crate::error::ConvertError;

/// Raw HTTP reply handed back by a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn ok_json(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }
}

/// Issues GET requests for the coordinator.
///
/// Implementations report connection and read failures as
/// [`ConvertError::Network`]; status codes are left to the caller.
pub trait RateTransport: Send + Sync {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, ConvertError>>;
}

// == Reqwest Transport ==
/// Production transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Builds the client. Fails when the TLS backend cannot be initialized.
    pub fn new() -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("fx_relay/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self::with_client(client))
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl RateTransport for ReqwestTransport {
    fn get<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<HttpResponse, ConvertError>> {
        async move {
            let response = self
                .client
                .get(url)
                .header("Accept", "application/json")
                .header("Cache-Control", "no-cache")
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() {
                        ConvertError::Network(format!("connection failed: {}", e))
                    } else {
                        ConvertError::Network(format!("request failed: {}", e))
                    }
                })?;

            let status = response.status().as_u16();
            let body = response.text().await.map_err(|e| {
                ConvertError::Network(format!("failed to read response body: {}", e))
            })?;

            Ok(HttpResponse { status, body })
        }
        .boxed()
    }
}
