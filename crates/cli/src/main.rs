//! CLI binary to report scheduled downtimes that no downtime claims.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use downtime_audit::{audit, render};
use downtime_audit_query_http::{HttpObjectQuery, HttpObjectQueryOptions, base_url_for_addr};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// CLI-specific error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Audit error
    #[error(transparent)]
    Audit(#[from] downtime_audit::Error<downtime_audit_query_http::Error>),

    /// Client setup error
    #[error(transparent)]
    Client(#[from] downtime_audit_query_http::Error),

    /// Writing the report failed
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// API username
    #[arg(long, default_value = "root", env = "DOWNTIME_AUDIT_USER")]
    user: String,

    /// API password
    #[arg(long, env = "DOWNTIME_AUDIT_PASS", hide_env_values = true)]
    pass: String,

    /// API address as HOST:PORT
    #[arg(long, default_value = "localhost:5665", env = "DOWNTIME_AUDIT_ADDR")]
    addr: String,

    /// PEM bundle to validate the server certificate against; without it the
    /// certificate is not validated
    #[arg(long, env = "DOWNTIME_AUDIT_CA_CERT")]
    ca_cert: Option<PathBuf>,

    /// Per-request timeout in seconds
    #[arg(long, env = "DOWNTIME_AUDIT_TIMEOUT")]
    timeout: Option<u64>,
}

impl Args {
    fn client_options(self) -> Result<HttpObjectQueryOptions, Error> {
        Ok(HttpObjectQueryOptions {
            base_url: base_url_for_addr(&self.addr)?,
            username: self.user,
            password: self.pass,
            ca_cert: self.ca_cert,
            timeout: self.timeout.map(Duration::from_secs),
        })
    }
}

/// Warnings and above unless `RUST_LOG` says otherwise.
fn env_filter() -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

async fn run(args: Args) -> Result<(), Error> {
    let client = HttpObjectQuery::new(args.client_options()?)?;
    let reconciliation = audit(&client).await?;

    let mut stdout = std::io::stdout().lock();
    render(&reconciliation, &mut stdout)?;
    stdout.flush()?;

    Ok(())
}

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    // The report owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["downtime-audit", "--pass", "secret"]).unwrap();

        assert_eq!(args.user, "root");
        assert_eq!(args.addr, "localhost:5665");
        assert!(args.ca_cert.is_none());
        assert!(args.timeout.is_none());

        let options = args.client_options().unwrap();
        assert_eq!(options.base_url.as_str(), "https://localhost:5665/");
        assert_eq!(options.username, "root");
        assert_eq!(options.password, "secret");
    }

    #[test]
    fn test_overrides() {
        let args = Args::try_parse_from([
            "downtime-audit",
            "--user",
            "audit",
            "--pass",
            "secret",
            "--addr",
            "icinga.example.com:5665",
            "--ca-cert",
            "/etc/icinga2/pki/ca.crt",
            "--timeout",
            "30",
        ])
        .unwrap();

        let options = args.client_options().unwrap();
        assert_eq!(options.base_url.host_str(), Some("icinga.example.com"));
        assert_eq!(options.username, "audit");
        assert_eq!(
            options.ca_cert,
            Some(PathBuf::from("/etc/icinga2/pki/ca.crt"))
        );
        assert_eq!(options.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_env_filter_defaults_to_warn() {
        if std::env::var_os(EnvFilter::DEFAULT_ENV).is_some() {
            return;
        }

        assert_eq!(env_filter().max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn test_invalid_addr() {
        let args =
            Args::try_parse_from(["downtime-audit", "--pass", "secret", "--addr", "host:port"])
                .unwrap();

        assert!(matches!(args.client_options(), Err(Error::Client(_))));
    }
}
