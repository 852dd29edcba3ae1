//! HTTP transport for catalog and mod file downloads.

use std::io::Read;
use std::time::Duration;

use modlinks::catalog::{Manifest, parse_catalog};
use modlinks::error::TransportError;
use modlinks::{Response, Transport};
use reqwest::blocking::Client;

use crate::error::Result;

/// Default time allowed for a whole download (10 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Default time allowed to establish a connection (30 seconds).
const CONNECT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("hkmod/", env!("CARGO_PKG_VERSION"));

/// [`Transport`] over a blocking `reqwest` client.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// Create a transport with default settings.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a transport with a custom overall timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self { client, timeout })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<Response, TransportError> {
        tracing::debug!("GET {url}");
        let response = self.client.get(url).send().map_err(|e| {
            let message = if e.is_timeout() {
                format!("timed out after {}s", self.timeout.as_secs())
            } else {
                e.to_string()
            };
            TransportError::Request {
                url: url.to_string(),
                message,
            }
        })?;

        Ok(Response {
            status: response.status().as_u16(),
            content_length: response.content_length(),
            body: Box::new(response),
        })
    }
}

/// Read a whole successful response body.
pub fn fetch_bytes<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<Vec<u8>> {
    let mut response = transport.get(url)?.error_for_status(url)?;
    let mut content = Vec::new();
    response
        .body
        .read_to_end(&mut content)
        .map_err(|source| TransportError::Body {
            url: url.to_string(),
            source,
        })?;
    Ok(content)
}

/// Download and parse the catalog at `url`.
pub fn fetch_catalog<T: Transport + ?Sized>(transport: &T, url: &str) -> Result<Vec<Manifest>> {
    let content = fetch_bytes(transport, url)?;
    let catalog = parse_catalog(&content)?;
    tracing::debug!("Catalog {url} lists {} mods", catalog.len());
    Ok(catalog)
}
