//! Status page fetching.

use crate::error::FetchError;
use crate::target::HostTarget;
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

/// Source of raw stub status bodies.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the status page of `target`.
    async fn fetch(&self, target: &HostTarget) -> Result<Bytes, FetchError>;
}

/// Timeouts applied to every status fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// TCP connect timeout
    pub connect_timeout: Duration,
    /// Time allowed for the response headers, on top of the connect budget
    pub header_timeout: Duration,
    /// Time allowed for reading the body once headers arrived
    pub body_timeout: Duration,
}

impl FetchOptions {
    /// Deadline for `send()`: the connect budget followed by the header
    /// budget, so a slow handshake does not eat into the wait for headers.
    pub fn send_deadline(&self) -> Duration {
        self.connect_timeout + self.header_timeout
    }
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(1),
            header_timeout: Duration::from_secs(1),
            body_timeout: Duration::from_secs(1),
        }
    }
}

/// HTTP status fetcher sharing one client across all hosts.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    options: FetchOptions,
}

impl HttpFetcher {
    /// Build the fetcher and its HTTP client.
    pub fn new(options: FetchOptions) -> Result<Self, FetchError> {
        // Status pages are always fetched directly, never through HTTP_PROXY
        let client = reqwest::Client::builder()
            .no_proxy()
            .connect_timeout(options.connect_timeout)
            .user_agent(concat!("nginx-exporter/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self { client, options })
    }
}

#[async_trait]
impl StatusSource for HttpFetcher {
    async fn fetch(&self, target: &HostTarget) -> Result<Bytes, FetchError> {
        let request = self.client.get(target.endpoint());

        let deadline = self.options.send_deadline();
        let response = match timeout(deadline, request.send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return Err(FetchError::from_send(e)),
            Err(_) => return Err(FetchError::HeaderTimeout(deadline)),
        };

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = match timeout(self.options.body_timeout, response.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return Err(FetchError::Body(e)),
            Err(_) => return Err(FetchError::BodyTimeout(self.options.body_timeout)),
        };

        debug!(endpoint = %target.endpoint(), bytes = body.len(), "Fetched status page");
        Ok(body)
    }
}
