//! Abstract interface for querying objects from the monitoring server's
//! object-query API, plus the wire types shared by every implementation.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::error::Error;
use std::fmt::Debug;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Object path of the scheduled-downtime collection.
pub const SCHEDULED_DOWNTIMES_PATH: &str = "/v1/objects/scheduleddowntimes";

/// Object path of the downtime collection.
pub const DOWNTIMES_PATH: &str = "/v1/objects/downtimes";

/// A query against one object path, restricted to a set of attributes.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query {
    /// Path of the object collection, e.g. `/v1/objects/downtimes`.
    pub path: String,

    /// Attribute names to request. Empty requests every attribute.
    pub attrs: Vec<String>,
}

impl Query {
    /// Creates a query for `path` requesting the given attributes.
    pub fn new<P, I, A>(path: P, attrs: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            path: path.into(),
            attrs: attrs.into_iter().map(Into::into).collect(),
        }
    }

    /// Query for every scheduled downtime with the attributes needed to place
    /// it in a zone and checkable.
    #[must_use]
    pub fn scheduled_downtimes() -> Self {
        Self::new(
            SCHEDULED_DOWNTIMES_PATH,
            ["host_name", "service_name", "zone"],
        )
    }

    /// Query for every downtime with all of its attributes.
    #[must_use]
    pub fn downtimes() -> Self {
        Self::new(DOWNTIMES_PATH, Vec::<String>::new())
    }

    /// The JSON request body sent to the query endpoint.
    #[must_use]
    pub fn body(&self) -> QueryBody<'_> {
        QueryBody { attrs: &self.attrs }
    }
}

/// Request body of the object-query endpoint.
#[derive(Debug, Serialize)]
pub struct QueryBody<'a> {
    /// Attribute names to return.
    pub attrs: &'a [String],
}

/// Response envelope of the object-query endpoint.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct QueryResults<A> {
    /// Matching objects.
    pub results: Vec<QueryResult<A>>,
}

/// One object returned by the object-query endpoint.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct QueryResult<A> {
    /// The requested attributes of the object.
    pub attrs: A,

    /// Full name of the object.
    #[serde(default)]
    pub name: String,
}

/// Attributes requested for scheduled downtimes.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ScheduledDowntimeAttrs {
    /// Host the downtime applies to.
    #[serde(default)]
    pub host_name: String,

    /// Service the downtime applies to. Empty for host downtimes.
    #[serde(default)]
    pub service_name: String,

    /// Zone the object belongs to.
    #[serde(default)]
    pub zone: String,
}

/// The attributes of a downtime this crate cares about.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DowntimeAttrs {
    /// Name of the scheduled downtime that created this downtime.
    #[serde(default)]
    pub config_owner: String,
}

/// A scheduled downtime as returned by the query endpoint.
pub type ScheduledDowntimeRecord = QueryResult<ScheduledDowntimeAttrs>;

/// A downtime as returned by the query endpoint.
pub type DowntimeRecord = QueryResult<DowntimeAttrs>;

/// Marker trait for `ObjectQuery` errors.
pub trait ObjectQueryError: Debug + Error + Send + Sync + 'static {}

/// Trait for clients of the object-query API.
#[async_trait]
pub trait ObjectQuery
where
    Self: Clone + Send + Sync + 'static,
{
    /// The error type for the client.
    type Error: ObjectQueryError;

    /// Runs `query` and decodes each result's attributes into `A`.
    async fn query<A>(&self, query: &Query) -> Result<Vec<QueryResult<A>>, Self::Error>
    where
        A: DeserializeOwned + Send + 'static;
}
