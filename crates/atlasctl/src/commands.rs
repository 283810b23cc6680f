//! Command handlers
//!
//! Each handler runs a single linear pass: every probe step is individually
//! guarded, failures are printed with the library's own message, and the
//! transcript moves on. Only `test` turns a failure into a nonzero exit.

use std::path::PathBuf;

use anyhow::Result;
use atlas_common::config::ProbeConfig;
use atlas_common::dns::{srv_name, DnsProber};
use atlas_common::mongo::{connect_and_inspect, ServerInfo};
use atlas_common::report::{DiagnosticReport, StepOutcome};
use atlas_common::uri;

use crate::errors::{EXIT_PROBE_FAILED, EXIT_SUCCESS};
use crate::output;

/// `atlasctl debug` — the full transcript. Every failure, including a
/// missing or malformed URI, is printed and the run moves on to whatever
/// diagnostics remain; the command always exits 0 once the pass completes.
pub async fn debug(
    cli_uri: Option<String>,
    config: Option<PathBuf>,
    timeout_ms: Option<u64>,
    host: Option<String>,
    json: bool,
) -> Result<i32> {
    output::banner("MongoDB connection deep debug");

    let mut invocation_ok = true;
    let cfg = match ProbeConfig::resolve(cli_uri, config, timeout_ms) {
        Ok(cfg) => {
            println!("URI:  {}", uri::redact(&cfg.uri));
            Some(cfg)
        }
        Err(err) => {
            output::fail(&err.to_string());
            invocation_ok = false;
            None
        }
    };

    // An explicit --host works even when the URI is unusable.
    let host = match (host, &cfg) {
        (Some(host), _) => Some(host),
        (None, Some(cfg)) => match uri::seed_host(&cfg.uri) {
            Ok(host) => Some(host),
            Err(err) => {
                output::fail(&err.to_string());
                invocation_ok = false;
                None
            }
        },
        (None, None) => None,
    };

    let mut report = match &host {
        Some(host) => {
            println!("Host: {host}");
            DiagnosticReport::new(host.clone(), srv_name(host))
        }
        None => DiagnosticReport::new(String::new(), String::new()),
    };

    match &host {
        Some(host) => {
            let prober = DnsProber::new();
            dns_steps(&prober, host, &mut report).await;
        }
        None => {
            output::section("Test 1: basic hostname resolution");
            output::detail("skipped: no hostname to probe (pass --host)");
            output::section("Test 2: SRV record resolution");
            output::detail("skipped: no hostname to probe (pass --host)");
        }
    }

    output::section("Test 3: driver connection analysis");
    match &cfg {
        Some(cfg) => {
            match connect_and_inspect(&cfg.uri, cfg.server_selection_timeout(), &cfg.app_name)
                .await
            {
                Ok(info) => {
                    output::ok("connection successful");
                    print_server_info(&info);
                    report.connection = StepOutcome::ok(info);
                }
                Err(err) => {
                    output::fail(&format!("connection analysis failed: {err}"));
                    report.connection = StepOutcome::failed(&err);
                }
            }
        }
        None => output::detail("skipped: no connection URI"),
    }

    println!();
    if invocation_ok && report.all_succeeded() {
        output::ok("no failures detected");
    } else {
        output::fail("failures detected; see transcript above");
    }

    if json {
        println!();
        println!("{}", report.to_json_pretty()?);
    }

    Ok(EXIT_SUCCESS)
}

/// `atlasctl test` — minimal connection check with the exit-code contract:
/// 0 on success, 1 on connection or configuration failure.
pub async fn test(
    cli_uri: Option<String>,
    config: Option<PathBuf>,
    timeout_ms: Option<u64>,
) -> Result<i32> {
    let cfg = match ProbeConfig::resolve(cli_uri, config, timeout_ms) {
        Ok(cfg) => cfg,
        Err(err) => {
            output::fail(&err.to_string());
            return Ok(EXIT_PROBE_FAILED);
        }
    };

    match connect_and_inspect(&cfg.uri, cfg.server_selection_timeout(), &cfg.app_name).await {
        Ok(info) => {
            output::ok("successfully connected to the server");
            println!("Server version: {}", info.version);
            Ok(EXIT_SUCCESS)
        }
        Err(err) => {
            output::fail(&err.to_string());
            Ok(EXIT_PROBE_FAILED)
        }
    }
}

/// `atlasctl dns <host>` — the DNS half of the debug transcript, for hosts
/// where no credential is at hand.
pub async fn dns(host: &str) -> Result<i32> {
    output::banner("DNS resolution debug");
    println!("Host: {host}");

    let mut report = DiagnosticReport::new(host.to_string(), srv_name(host));
    let prober = DnsProber::new();
    dns_steps(&prober, host, &mut report).await;

    println!();
    if report.all_succeeded() {
        output::ok("no failures detected");
    } else {
        output::fail("failures detected; see transcript above");
    }

    Ok(EXIT_SUCCESS)
}

/// Tests 1 and 2: direct hostname resolution, then SRV discovery with
/// per-target re-resolution.
async fn dns_steps(prober: &DnsProber, host: &str, report: &mut DiagnosticReport) {
    output::section("Test 1: basic hostname resolution");
    match prober.resolve_hostname(host).await {
        Ok(addresses) => {
            let joined: Vec<String> = addresses.iter().map(|a| a.to_string()).collect();
            output::ok(&format!(
                "basic resolution successful: {host} -> {}",
                joined.join(", ")
            ));
            report.hostname_resolution = StepOutcome::ok(addresses);
        }
        Err(err) => {
            output::fail(&format!("basic resolution failed: {err}"));
            report.hostname_resolution = StepOutcome::failed(&err);
        }
    }

    output::section("Test 2: SRV record resolution");
    println!("Record: {}", report.srv_name);
    match prober.resolve_service_record(host).await {
        Ok(targets) => {
            output::ok(&format!(
                "SRV resolution successful: found {} records",
                targets.len()
            ));
            for (index, target) in targets.iter().enumerate() {
                output::detail(&output::format_target_line(index, target));
                output::detail(&format!("   {}", output::format_target_resolution(target)));
            }
            report.srv_resolution = StepOutcome::ok(targets);
        }
        Err(err) if err.is_no_records() => {
            output::fail(&format!(
                "no service record published for {}",
                report.srv_name
            ));
            report.srv_resolution = StepOutcome::failed(&err);
        }
        Err(err) => {
            output::fail(&format!("SRV resolution failed: {err}"));
            report.srv_resolution = StepOutcome::failed(&err);
        }
    }
}

/// Topology details under a successful connection line.
fn print_server_info(info: &ServerInfo) {
    for seed in &info.seed_list {
        output::detail(&format!("seed: {seed}"));
    }
    output::detail(&format!("server version: {}", info.version));
    if let Some(primary) = &info.primary {
        output::detail(&format!("primary: {primary}"));
    }
    if let Some(set_name) = &info.set_name {
        output::detail(&format!("replica set: {set_name}"));
    }
    if info.is_writable_primary && info.primary.is_none() {
        output::detail("writable server (standalone or mongos)");
    }
    for member in &info.members {
        output::detail(&format!(
            "server: {} - {}",
            member.address,
            member.role.as_str()
        ));
    }
}
