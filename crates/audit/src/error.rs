use downtime_audit_query::ObjectQueryError;
use thiserror::Error;

/// Errors that can occur while fetching the two record sets.
#[derive(Debug, Error)]
pub enum Error<E>
where
    E: ObjectQueryError,
{
    /// Both queries failed.
    #[error("scheduled downtime query failed: {scheduled_downtimes}; downtime query failed: {downtimes}")]
    Both {
        /// Error from the scheduled-downtime query.
        scheduled_downtimes: E,

        /// Error from the downtime query.
        downtimes: E,
    },

    /// The downtime query failed.
    #[error("downtime query failed: {0}")]
    Downtimes(#[source] E),

    /// A query task panicked or was cancelled.
    #[error("query task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The scheduled-downtime query failed.
    #[error("scheduled downtime query failed: {0}")]
    ScheduledDowntimes(#[source] E),
}
