//! Error taxonomy for probe operations
//!
//! Three operator-facing failure classes: DNS resolution, client
//! configuration, and connection. Driver errors are classified so that the
//! minimal `test` command can map them to the right exit code.

use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use mongodb::error::{Error as DriverError, ErrorKind};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProbeError {
    /// Name or service-record lookup failed.
    #[error("DNS resolution failed: {0}")]
    Dns(#[from] ResolveError),

    /// Lookup succeeded but the answer section was empty.
    #[error("DNS resolution returned no addresses for {0}")]
    EmptyAnswer(String),

    /// Malformed URI or client options.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network, auth, or server-selection failure from the driver.
    #[error("connection failed: {0}")]
    Connection(mongodb::error::Error),

    /// Connected, but the server reported no version string.
    #[error("server reported an empty version string")]
    EmptyVersion,
}

impl ProbeError {
    /// Classify a driver error: invalid-argument kinds are configuration
    /// errors (bad URI, bad options), everything else is a connection
    /// failure.
    pub fn from_driver(err: DriverError) -> Self {
        match err.kind.as_ref() {
            ErrorKind::InvalidArgument { message, .. } => ProbeError::Config(message.clone()),
            _ => ProbeError::Connection(err),
        }
    }

    /// True for configuration-class failures.
    pub fn is_configuration(&self) -> bool {
        matches!(self, ProbeError::Config(_))
    }

    /// True when a DNS failure means "name exists but publishes no such
    /// record", which the transcripts report as an expected miss rather
    /// than an infrastructure problem.
    pub fn is_no_records(&self) -> bool {
        match self {
            ProbeError::Dns(err) => {
                matches!(err.kind(), ResolveErrorKind::NoRecordsFound { .. })
            }
            _ => false,
        }
    }
}
