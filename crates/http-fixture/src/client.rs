//! HTTP client used by probes, backed by reqwest.
//!
//! Transport failures come back as [`TransportError`]; a non-2xx status is a
//! normal [`HttpResponse`].

use std::error::Error as StdError;

use http::HeaderMap;
use http::header::CONTENT_TYPE;

use crate::config::HarnessConfig;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("connection refused: {0}")]
    ConnectionRefused(#[source] reqwest::Error),
    #[error("request timed out: {0}")]
    Timeout(#[source] reqwest::Error),
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
}

impl TransportError {
    fn from_request(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            return Self::Timeout(error);
        }
        if error.is_connect() && chain_mentions_refused(&error) {
            return Self::ConnectionRefused(error);
        }
        Self::Request(error)
    }

    pub fn is_connection_refused(&self) -> bool {
        matches!(self, Self::ConnectionRefused(_))
    }
}

/// Walk the source chain looking for a refused connection.
fn chain_mentions_refused(error: &(dyn StdError + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::ConnectionRefused {
                return true;
            }
        }
        if err.to_string().to_ascii_lowercase().contains("refused") {
            return true;
        }
        current = err.source();
    }
    false
}

pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new(config: &HarnessConfig) -> Result<Self, TransportError> {
        let inner = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()
            .map_err(TransportError::Build)?;
        Ok(Self { inner })
    }

    pub fn with_client(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    pub async fn get(
        &self,
        url: &str,
        headers: Option<&HeaderMap>,
    ) -> Result<HttpResponse, TransportError> {
        let mut req = self.inner.get(url);
        if let Some(headers) = headers {
            req = req.headers(headers.clone());
        }
        let inner = req.send().await.map_err(TransportError::from_request)?;
        tracing::debug!(url, status = inner.status().as_u16(), "GET completed");
        Ok(HttpResponse { inner })
    }
}

/// A response whose body has not been read yet.
pub struct HttpResponse {
    inner: reqwest::Response,
}

impl HttpResponse {
    pub fn status(&self) -> u16 {
        self.inner.status().as_u16()
    }

    /// Every `Content-Type` value, in order of appearance.
    pub fn content_types(&self) -> Vec<String> {
        self.inner
            .headers()
            .get_all(CONTENT_TYPE)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect()
    }

    /// Read the whole body, consuming the response so the connection is
    /// released on every path.
    pub async fn read_body(self) -> Result<Vec<u8>, reqwest::Error> {
        Ok(self.inner.bytes().await?.to_vec())
    }
}
