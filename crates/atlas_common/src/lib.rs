//! Shared library for atlas-doctor connectivity probes.
//!
//! Provides the building blocks the `atlasctl` CLI composes into diagnostic
//! transcripts: URI handling, DNS probes (hostname + SRV service discovery),
//! driver connection inspection, and the structured report types.

pub mod config;
pub mod dns;
pub mod error;
pub mod mongo;
pub mod report;
pub mod uri;

pub use config::ProbeConfig;
pub use error::ProbeError;
