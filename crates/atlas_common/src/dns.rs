//! DNS probes: direct hostname resolution and SRV service discovery
//!
//! Mirrors what the driver does internally for `mongodb+srv` URIs, but step
//! by step and with every intermediate result surfaced, so an operator can
//! see exactly where discovery breaks on a given machine.

use std::net::IpAddr;
use std::time::Instant;

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::TokioAsyncResolver;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ProbeError;

/// SRV owner-name prefix for the MongoDB service.
pub const SRV_SERVICE_PREFIX: &str = "_mongodb._tcp";

/// One discovered SRV target, with the outcome of re-resolving it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SrvTarget {
    pub target: String,
    pub port: u16,
    pub priority: u16,
    pub weight: u16,
    /// Addresses the target resolved to; empty when resolution failed.
    pub addresses: Vec<IpAddr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_error: Option<String>,
}

/// Build the SRV owner name for a cluster hostname.
pub fn srv_name(host: &str) -> String {
    format!("{}.{}", SRV_SERVICE_PREFIX, host.trim_end_matches('.'))
}

/// Order targets the way a client would try them: lowest priority first,
/// heavier weight first within a priority.
pub fn sort_targets(targets: &mut [SrvTarget]) {
    targets.sort_by_key(|t| (t.priority, std::cmp::Reverse(t.weight)));
}

pub struct DnsProber {
    resolver: TokioAsyncResolver,
}

impl DnsProber {
    /// Resolver from system configuration (resolv.conf on unix), falling
    /// back to the library defaults when none can be read.
    pub fn new() -> Self {
        let resolver = TokioAsyncResolver::tokio_from_system_conf().unwrap_or_else(|_| {
            TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
        });
        Self { resolver }
    }

    /// A/AAAA lookup. An empty answer section is reported as a failure.
    pub async fn resolve_hostname(&self, name: &str) -> Result<Vec<IpAddr>, ProbeError> {
        let started = Instant::now();
        let lookup = self.resolver.lookup_ip(name).await?;
        let addresses: Vec<IpAddr> = lookup.iter().collect();
        debug!(
            host = name,
            addresses = addresses.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "hostname resolution finished"
        );
        if addresses.is_empty() {
            return Err(ProbeError::EmptyAnswer(name.to_string()));
        }
        Ok(addresses)
    }

    /// `_mongodb._tcp.<host>` SRV lookup. Every discovered target is
    /// re-resolved; a target that fails to resolve is kept in the result
    /// with its failure message instead of aborting the probe.
    pub async fn resolve_service_record(&self, host: &str) -> Result<Vec<SrvTarget>, ProbeError> {
        let name = srv_name(host);
        let started = Instant::now();
        let lookup = self.resolver.srv_lookup(name.as_str()).await?;

        let mut targets = Vec::new();
        for record in lookup.iter() {
            let target = record.target().to_utf8();
            let target = target.trim_end_matches('.').to_string();
            let (addresses, resolution_error) = match self.resolve_hostname(&target).await {
                Ok(addresses) => (addresses, None),
                Err(err) => (Vec::new(), Some(err.to_string())),
            };
            targets.push(SrvTarget {
                target,
                port: record.port(),
                priority: record.priority(),
                weight: record.weight(),
                addresses,
                resolution_error,
            });
        }
        sort_targets(&mut targets);
        debug!(
            srv = name.as_str(),
            targets = targets.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "service record resolution finished"
        );
        Ok(targets)
    }
}

impl Default for DnsProber {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str, priority: u16, weight: u16) -> SrvTarget {
        SrvTarget {
            target: name.to_string(),
            port: 27017,
            priority,
            weight,
            addresses: Vec::new(),
            resolution_error: None,
        }
    }

    #[test]
    fn test_srv_name_prefixes_service() {
        assert_eq!(
            srv_name("cluster0.ab12cd.mongodb.net"),
            "_mongodb._tcp.cluster0.ab12cd.mongodb.net"
        );
    }

    #[test]
    fn test_srv_name_trims_root_dot() {
        assert_eq!(srv_name("example.net."), "_mongodb._tcp.example.net");
    }

    #[test]
    fn test_sort_targets_priority_then_weight() {
        let mut targets = vec![
            target("c", 10, 0),
            target("a", 0, 5),
            target("b", 0, 10),
        ];
        sort_targets(&mut targets);
        let order: Vec<&str> = targets.iter().map(|t| t.target.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
    }

    // Live-network checks. Run with `cargo test -- --ignored` on a host
    // with working DNS.

    #[tokio::test]
    #[ignore]
    async fn test_live_known_good_hostname_resolves() {
        let prober = DnsProber::new();
        let addresses = prober.resolve_hostname("dns.google").await.unwrap();
        assert!(!addresses.is_empty());
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_known_bad_hostname_fails_cleanly() {
        let prober = DnsProber::new();
        let err = prober
            .resolve_hostname("no-such-host.invalid")
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Dns(_)));
    }

    #[tokio::test]
    #[ignore]
    async fn test_live_srv_miss_is_reported_not_thrown() {
        let prober = DnsProber::new();
        let err = prober
            .resolve_service_record("example.com")
            .await
            .unwrap_err();
        assert!(err.is_no_records());
    }
}
