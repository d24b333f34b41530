use std::sync::Arc;

use downtime_audit_query::ObjectQueryError;
use thiserror::Error;

/// The result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in this crate.
#[derive(Clone, Debug, Error)]
pub enum Error {
    /// Canned results could not be decoded into the requested type.
    #[error(transparent)]
    Decode(Arc<serde_json::Error>),

    /// No results were registered for the path.
    #[error("no results registered for {0}")]
    NotFound(String),

    /// Injected status failure.
    #[error("{path} returned {status}")]
    Status {
        /// Queried object path.
        path: String,

        /// Injected status code.
        status: u16,
    },

    /// Injected transport failure.
    #[error("{0} unavailable")]
    Unavailable(String),
}

impl ObjectQueryError for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(Arc::new(err))
    }
}
