//! In-memory implementation of the object-query API for tests.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use downtime_audit_query::{
    DOWNTIMES_PATH, ObjectQuery, Query, QueryResult, SCHEDULED_DOWNTIMES_PATH,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

#[derive(Clone, Debug)]
enum Response {
    Results(Vec<Value>),
    Failure(Error),
}

/// Object-query client answering from canned, per-path responses.
#[derive(Clone, Debug, Default)]
pub struct MockObjectQuery {
    responses: Arc<HashMap<String, Response>>,
    calls: Arc<AtomicUsize>,
}

impl MockObjectQuery {
    /// Create a mock with no registered responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer queries for `path` with the given raw results.
    #[must_use]
    pub fn with_results(self, path: &str, results: Vec<Value>) -> Self {
        self.with_response(path, Response::Results(results))
    }

    /// Fail queries for `path` with `error`.
    #[must_use]
    pub fn with_failure(self, path: &str, error: Error) -> Self {
        self.with_response(path, Response::Failure(error))
    }

    /// Answer the scheduled-downtime query with one result per
    /// `(name, host, service, zone)` tuple.
    #[must_use]
    pub fn with_scheduled_downtimes(self, records: &[(&str, &str, &str, &str)]) -> Self {
        let results = records
            .iter()
            .map(|(name, host, service, zone)| {
                json!({
                    "attrs": {
                        "host_name": host,
                        "service_name": service,
                        "zone": zone,
                    },
                    "name": name,
                    "type": "ScheduledDowntime",
                })
            })
            .collect();

        self.with_results(SCHEDULED_DOWNTIMES_PATH, results)
    }

    /// Answer the downtime query with one result per config owner.
    #[must_use]
    pub fn with_downtimes(self, config_owners: &[&str]) -> Self {
        let results = config_owners
            .iter()
            .enumerate()
            .map(|(i, owner)| {
                json!({
                    "attrs": {
                        "author": "mock",
                        "config_owner": owner,
                    },
                    "name": format!("mock-downtime-{i}"),
                    "type": "Downtime",
                })
            })
            .collect();

        self.with_results(DOWNTIMES_PATH, results)
    }

    /// Number of queries served so far, failed ones included.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn with_response(self, path: &str, response: Response) -> Self {
        let mut responses = Arc::unwrap_or_clone(self.responses);
        responses.insert(path.to_string(), response);

        Self {
            responses: Arc::new(responses),
            calls: self.calls,
        }
    }
}

#[async_trait]
impl ObjectQuery for MockObjectQuery {
    type Error = Error;

    async fn query<A>(&self, query: &Query) -> Result<Vec<QueryResult<A>>>
    where
        A: DeserializeOwned + Send + 'static,
    {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.responses.get(&query.path) {
            Some(Response::Results(results)) => results
                .iter()
                .cloned()
                .map(|result| serde_json::from_value(result).map_err(Error::from))
                .collect(),
            Some(Response::Failure(error)) => Err(error.clone()),
            None => Err(Error::NotFound(query.path.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use downtime_audit_query::{DowntimeAttrs, ScheduledDowntimeAttrs};

    #[tokio::test]
    async fn test_canned_results_decode() {
        let mock = MockObjectQuery::new()
            .with_scheduled_downtimes(&[("dt-1", "h1", "", "z1")])
            .with_downtimes(&["dt-1", "dt-9"]);

        let scheduled = mock
            .query::<ScheduledDowntimeAttrs>(&Query::scheduled_downtimes())
            .await
            .unwrap();
        let downtimes = mock
            .query::<DowntimeAttrs>(&Query::downtimes())
            .await
            .unwrap();

        assert_eq!(scheduled.len(), 1);
        assert_eq!(scheduled[0].name, "dt-1");
        assert_eq!(scheduled[0].attrs.zone, "z1");
        assert_eq!(downtimes.len(), 2);
        assert_eq!(downtimes[1].attrs.config_owner, "dt-9");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let mock = MockObjectQuery::new().with_failure(
            DOWNTIMES_PATH,
            Error::Status {
                path: DOWNTIMES_PATH.to_string(),
                status: 503,
            },
        );

        let err = mock
            .query::<DowntimeAttrs>(&Query::downtimes())
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "/v1/objects/downtimes returned 503");
    }

    #[tokio::test]
    async fn test_unregistered_path() {
        let mock = MockObjectQuery::new();

        let result = mock.query::<DowntimeAttrs>(&Query::downtimes()).await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_clones_share_call_count() {
        let mock = MockObjectQuery::new().with_downtimes(&[]);
        let clone = mock.clone();

        clone
            .query::<DowntimeAttrs>(&Query::downtimes())
            .await
            .unwrap();

        assert_eq!(mock.calls(), 1);
    }
}
