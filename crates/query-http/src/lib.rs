//! HTTPS client for the monitoring server's object-query API.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod error;

pub use error::{Error, Result};

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use downtime_audit_query::{ObjectQuery, Query, QueryResult, QueryResults};
use reqwest::header::ACCEPT;
use reqwest::{Certificate, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, info};
use url::Url;

/// Options for `HttpObjectQuery`.
#[derive(Clone)]
pub struct HttpObjectQueryOptions {
    /// Base URL of the API, e.g. `https://localhost:5665`.
    pub base_url: Url,

    /// Username for basic authentication.
    pub username: String,

    /// Password for basic authentication.
    pub password: String,

    /// PEM bundle to validate the server certificate against. When unset the
    /// server certificate is not validated.
    pub ca_cert: Option<PathBuf>,

    /// Per-request timeout. Unset waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Builds the HTTPS base URL for a `host:port` server address.
///
/// # Errors
///
/// This function will return an error if `addr` does not form a valid URL.
pub fn base_url_for_addr(addr: &str) -> Result<Url> {
    Ok(Url::parse(&format!("https://{addr}"))?)
}

/// Client for the object-query API using HTTP basic authentication.
#[derive(Clone)]
pub struct HttpObjectQuery {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
}

impl HttpObjectQuery {
    /// Creates a new `HttpObjectQuery`.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The CA bundle cannot be read or parsed
    /// - The underlying HTTP client cannot be built
    pub fn new(options: HttpObjectQueryOptions) -> Result<Self> {
        let mut builder = Client::builder();

        if let Some(path) = options.ca_cert {
            let pem = std::fs::read(&path).map_err(|source| Error::CaCertificateRead {
                path: path.clone(),
                source,
            })?;
            let certificate = Certificate::from_pem(&pem)
                .map_err(|source| Error::CaCertificateParse { path, source })?;

            builder = builder.add_root_certificate(certificate);
        } else {
            info!("server certificate validation is disabled");
            builder = builder.danger_accept_invalid_certs(true);
        }

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(Error::Client)?;

        Ok(Self {
            client,
            base_url: options.base_url,
            username: options.username,
            password: options.password,
        })
    }
}

#[async_trait]
impl ObjectQuery for HttpObjectQuery {
    type Error = Error;

    async fn query<A>(&self, query: &Query) -> Result<Vec<QueryResult<A>>>
    where
        A: DeserializeOwned + Send + 'static,
    {
        let url = self.base_url.join(&query.path)?;

        debug!("querying {} for attrs {:?}", url, query.attrs);

        let response = self
            .client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .header(ACCEPT, "application/json")
            .json(&query.body())
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(Error::Status {
                path: query.path.clone(),
                status,
            });
        }

        let json = response.text().await?;
        debug!("{} returned {} bytes", query.path, json.len());

        let results: QueryResults<A> =
            serde_json::from_str(&json).map_err(|source| Error::Decode {
                path: query.path.clone(),
                source,
            })?;

        Ok(results.results)
    }
}
