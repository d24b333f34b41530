use std::path::PathBuf;

use downtime_audit_query::ObjectQueryError;
use reqwest::StatusCode;
use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// The CA bundle could not be read.
    #[error("failed to read CA certificate {path}: {source}")]
    CaCertificateRead {
        /// Path of the bundle.
        path: PathBuf,

        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The CA bundle is not valid PEM.
    #[error("invalid CA certificate {path}: {source}")]
    CaCertificateParse {
        /// Path of the bundle.
        path: PathBuf,

        /// Underlying parse error.
        source: reqwest::Error,
    },

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(reqwest::Error),

    /// The response body did not match the expected schema.
    #[error("failed to decode response from {path}: {source}")]
    Decode {
        /// Queried object path.
        path: String,

        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The server answered with a status code of 400 or above.
    #[error("{path} returned {status}")]
    Status {
        /// Queried object path.
        path: String,

        /// Status returned by the server.
        status: StatusCode,
    },

    /// Connection, TLS or timeout failure.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server address could not be turned into a URL.
    #[error("invalid server address: {0}")]
    Url(#[from] url::ParseError),
}

impl ObjectQueryError for Error {}
