//! HTTP transport shared by every provider.

mod http;

pub use http::{Auth, HttpTransport, RawResponse};

/// Low-level transport failure (connection, TLS, timeout, body read).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{0}")]
    Other(String),
}
