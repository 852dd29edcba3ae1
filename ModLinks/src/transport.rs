//! Byte-fetching capability used by the content cache
//!
//! The engine never talks HTTP itself. Applications hand it something that
//! implements [`Transport`]; tests hand it an in-memory fake.

use std::fmt;
use std::io::Read;

use crate::error::TransportError;

/// A response whose body has not been read yet.
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Body length, when the server announced one.
    pub content_length: Option<u64>,
    /// The body stream.
    pub body: Box<dyn Read>,
}

impl Response {
    /// A `200 OK` response over an in-memory body.
    #[must_use]
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            content_length: Some(body.len() as u64),
            body: Box::new(std::io::Cursor::new(body)),
        }
    }

    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into [`TransportError::Status`].
    pub fn error_for_status(self, url: &str) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response")
            .field("status", &self.status)
            .field("content_length", &self.content_length)
            .finish_non_exhaustive()
    }
}

/// Fetches the bytes behind a URL.
pub trait Transport {
    /// Start a GET request. Non-2xx statuses may be returned as a `Response`;
    /// callers check [`Response::is_success`].
    fn get(&self, url: &str) -> Result<Response, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, url: &str) -> Result<Response, TransportError> {
        (**self).get(url)
    }
}
