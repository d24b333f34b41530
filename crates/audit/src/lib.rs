//! Audits scheduled downtimes against the downtimes that claim them.
//!
//! Both record sets are fetched in parallel through an [`ObjectQuery`]
//! client, then every scheduled downtime is grouped by zone and checkable
//! and classified as claimed, when some downtime names it as its
//! `config_owner`, or missing otherwise.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;
mod fetch;
mod reconcile;
mod report;

pub use error::Error;
pub use fetch::{FetchedRecords, fetch};
pub use reconcile::{Checkable, CheckableKey, OwnershipSet, Reconciliation, Zone};
pub use report::{render, render_to_string};

use downtime_audit_query::ObjectQuery;
use tracing::info;

/// Fetches both record sets and reconciles them.
///
/// # Errors
///
/// This function will return an error if either query fails.
pub async fn audit<Q>(client: &Q) -> Result<Reconciliation, Error<Q::Error>>
where
    Q: ObjectQuery,
{
    let fetched = fetch(client).await?;
    let reconciliation = Reconciliation::build(&fetched.scheduled_downtimes, &fetched.ownership);

    info!(
        "{} of {} scheduled downtimes in {} zones are unclaimed",
        reconciliation.missing(),
        reconciliation.total(),
        reconciliation.zones().len()
    );

    Ok(reconciliation)
}
