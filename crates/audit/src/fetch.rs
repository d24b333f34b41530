use downtime_audit_query::{
    DowntimeAttrs, ObjectQuery, Query, ScheduledDowntimeAttrs, ScheduledDowntimeRecord,
};
use tracing::{debug, error, info};

use crate::error::Error;
use crate::reconcile::OwnershipSet;

/// Both record sets of one audit run.
#[derive(Clone, Debug, Default)]
pub struct FetchedRecords {
    /// Scheduled downtimes in the order the server returned them.
    pub scheduled_downtimes: Vec<ScheduledDowntimeRecord>,

    /// Config owners of every downtime.
    pub ownership: OwnershipSet,
}

/// Runs the scheduled-downtime and downtime queries in parallel and waits for
/// both to finish.
///
/// # Errors
///
/// This function will return an error if either query fails, or both if both
/// fail. No partial result is returned.
pub async fn fetch<Q>(client: &Q) -> Result<FetchedRecords, Error<Q::Error>>
where
    Q: ObjectQuery,
{
    let scheduled_client = client.clone();
    let scheduled_task = tokio::spawn(async move {
        let query = Query::scheduled_downtimes();
        debug!("querying {}", query.path);
        scheduled_client.query::<ScheduledDowntimeAttrs>(&query).await
    });

    let downtime_client = client.clone();
    let downtime_task = tokio::spawn(async move {
        let query = Query::downtimes();
        debug!("querying {}", query.path);
        downtime_client.query::<DowntimeAttrs>(&query).await
    });

    let (scheduled, downtimes) = tokio::join!(scheduled_task, downtime_task);

    match (scheduled?, downtimes?) {
        (Ok(scheduled_downtimes), Ok(downtimes)) => {
            let ownership = OwnershipSet::from_downtimes(&downtimes);

            info!(
                "fetched {} scheduled downtimes and {} downtimes ({} distinct owners)",
                scheduled_downtimes.len(),
                downtimes.len(),
                ownership.len()
            );

            Ok(FetchedRecords {
                scheduled_downtimes,
                ownership,
            })
        }
        (Err(e), Ok(_)) => {
            error!("scheduled downtime query failed: {}", e);
            Err(Error::ScheduledDowntimes(e))
        }
        (Ok(_), Err(e)) => {
            error!("downtime query failed: {}", e);
            Err(Error::Downtimes(e))
        }
        (Err(scheduled_downtimes), Err(downtimes)) => {
            error!(
                "both queries failed: {}; {}",
                scheduled_downtimes, downtimes
            );
            Err(Error::Both {
                scheduled_downtimes,
                downtimes,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use downtime_audit_query::{DOWNTIMES_PATH, SCHEDULED_DOWNTIMES_PATH};
    use downtime_audit_query_mock::{Error as MockError, MockObjectQuery};

    fn unavailable(path: &str) -> MockError {
        MockError::Unavailable(path.to_string())
    }

    #[tokio::test]
    async fn test_fetch_both() {
        let mock = MockObjectQuery::new()
            .with_scheduled_downtimes(&[("dt-1", "h1", "", "z1"), ("dt-2", "h1", "", "z1")])
            .with_downtimes(&["dt-1", "dt-1"]);

        let fetched = fetch(&mock).await.unwrap();

        assert_eq!(fetched.scheduled_downtimes.len(), 2);
        assert_eq!(fetched.scheduled_downtimes[1].name, "dt-2");
        assert_eq!(fetched.ownership.len(), 1);
        assert!(fetched.ownership.contains("dt-1"));
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_downtime_failure_aborts() {
        let mock = MockObjectQuery::new()
            .with_scheduled_downtimes(&[("dt-1", "h1", "", "z1")])
            .with_failure(
                DOWNTIMES_PATH,
                MockError::Status {
                    path: DOWNTIMES_PATH.to_string(),
                    status: 503,
                },
            );

        let err = fetch(&mock).await.unwrap_err();

        assert!(matches!(
            err,
            Error::Downtimes(MockError::Status { status: 503, .. })
        ));
        // The other query still ran to completion before the join.
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_scheduled_downtime_failure_aborts() {
        let mock = MockObjectQuery::new()
            .with_failure(
                SCHEDULED_DOWNTIMES_PATH,
                unavailable(SCHEDULED_DOWNTIMES_PATH),
            )
            .with_downtimes(&["dt-1"]);

        let err = fetch(&mock).await.unwrap_err();

        assert!(matches!(err, Error::ScheduledDowntimes(_)));
    }

    #[tokio::test]
    async fn test_both_failures_reported() {
        let mock = MockObjectQuery::new()
            .with_failure(
                SCHEDULED_DOWNTIMES_PATH,
                unavailable(SCHEDULED_DOWNTIMES_PATH),
            )
            .with_failure(DOWNTIMES_PATH, unavailable(DOWNTIMES_PATH));

        let err = fetch(&mock).await.unwrap_err();

        let message = err.to_string();
        assert!(message.contains(SCHEDULED_DOWNTIMES_PATH));
        assert!(message.contains(DOWNTIMES_PATH));
        assert!(matches!(err, Error::Both { .. }));
    }

    #[tokio::test]
    async fn test_malformed_results_abort() {
        let mock = MockObjectQuery::new()
            .with_results(
                SCHEDULED_DOWNTIMES_PATH,
                vec![serde_json::json!({ "attrs": "not an object", "name": "dt-1" })],
            )
            .with_downtimes(&[]);

        let err = fetch(&mock).await.unwrap_err();

        assert!(matches!(
            err,
            Error::ScheduledDowntimes(MockError::Decode(_))
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_fetch_on_multi_thread_runtime() {
        let mock = MockObjectQuery::new()
            .with_scheduled_downtimes(&[])
            .with_downtimes(&[]);

        let fetched = fetch(&mock).await.unwrap();

        assert!(fetched.scheduled_downtimes.is_empty());
        assert!(fetched.ownership.is_empty());
    }
}
