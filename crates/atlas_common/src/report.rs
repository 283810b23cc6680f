//! Structured diagnostic report
//!
//! The transcript the CLI prints is built from this; `--json` emits it
//! verbatim. Each probe step lands in a `StepOutcome` envelope carrying
//! either its data or the native failure message.

use std::fmt;
use std::net::IpAddr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dns::SrvTarget;
use crate::error::ProbeError;
use crate::mongo::ServerInfo;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepOutcome<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> StepOutcome<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(err: impl fmt::Display) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(err.to_string()),
        }
    }

    /// Placeholder for a step that never ran (e.g. no URI for the
    /// connection step of a DNS-only probe).
    pub fn skipped() -> Self {
        Self {
            success: false,
            data: None,
            error: None,
        }
    }

    /// True when the step actually ran: it produced data or a failure
    /// message. Skipped placeholders have neither.
    pub fn ran(&self) -> bool {
        self.data.is_some() || self.error.is_some()
    }
}

impl<T> From<Result<T, ProbeError>> for StepOutcome<T> {
    fn from(result: Result<T, ProbeError>) -> Self {
        match result {
            Ok(data) => StepOutcome::ok(data),
            Err(err) => StepOutcome::failed(err),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub generated_at: DateTime<Utc>,
    /// Hostname the DNS steps probed.
    pub hostname: String,
    /// SRV owner name that was looked up.
    pub srv_name: String,
    pub hostname_resolution: StepOutcome<Vec<IpAddr>>,
    pub srv_resolution: StepOutcome<Vec<SrvTarget>>,
    pub connection: StepOutcome<ServerInfo>,
}

impl DiagnosticReport {
    pub fn new(hostname: String, srv_name: String) -> Self {
        Self {
            generated_at: Utc::now(),
            hostname,
            srv_name,
            hostname_resolution: StepOutcome::skipped(),
            srv_resolution: StepOutcome::skipped(),
            connection: StepOutcome::skipped(),
        }
    }

    /// True when every step that ran succeeded; skipped steps don't count
    /// against the report.
    pub fn all_succeeded(&self) -> bool {
        fn step_ok<T>(step: &StepOutcome<T>) -> bool {
            !step.ran() || step.success
        }
        step_ok(&self.hostname_resolution)
            && step_ok(&self.srv_resolution)
            && step_ok(&self.connection)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
