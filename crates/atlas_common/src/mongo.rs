//! Driver connection analysis
//!
//! Builds a client against the URI with a bounded server-selection timeout,
//! forces an eager connection, and inspects what the server reports about
//! itself: version, writable primary, and the topology membership.

use std::time::{Duration, Instant};

use mongodb::bson::{doc, Document};
use mongodb::options::ClientOptions;
use mongodb::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::ProbeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    Primary,
    Secondary,
    Passive,
    Arbiter,
    Mongos,
}

impl MemberRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemberRole::Primary => "primary",
            MemberRole::Secondary => "secondary",
            MemberRole::Passive => "passive",
            MemberRole::Arbiter => "arbiter",
            MemberRole::Mongos => "mongos",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopologyMember {
    pub address: String,
    pub role: MemberRole,
}

/// Everything the connection analysis step reports on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Server version from `buildInfo`.
    pub version: String,
    /// Hosts the driver parsed out of the URI (post SRV expansion for
    /// `mongodb+srv`).
    pub seed_list: Vec<String>,
    /// Current primary, when the deployment has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_name: Option<String>,
    /// Whether the answering server takes writes.
    pub is_writable_primary: bool,
    /// Known members with their roles.
    pub members: Vec<TopologyMember>,
}

/// Parse the URI, connect eagerly, and inspect the server.
///
/// URI parse failures surface as configuration errors; everything after
/// that (network, auth, server selection) as connection failures.
pub async fn connect_and_inspect(
    uri: &str,
    server_selection_timeout: Duration,
    app_name: &str,
) -> Result<ServerInfo, ProbeError> {
    let mut options = ClientOptions::parse(uri)
        .await
        .map_err(ProbeError::from_driver)?;
    options.server_selection_timeout = Some(server_selection_timeout);
    options.app_name = Some(app_name.to_string());

    let seed_list: Vec<String> = options.hosts.iter().map(|h| h.to_string()).collect();
    debug!(seeds = seed_list.len(), "client options parsed");

    let client = Client::with_options(options).map_err(ProbeError::from_driver)?;
    let admin = client.database("admin");

    // The driver connects lazily; ping forces server selection now, under
    // the configured timeout.
    let started = Instant::now();
    admin
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(ProbeError::from_driver)?;
    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "server selection succeeded"
    );

    let build_info = admin
        .run_command(doc! { "buildInfo": 1 })
        .await
        .map_err(ProbeError::from_driver)?;
    let version = build_info.get_str("version").unwrap_or_default().to_string();
    if version.is_empty() {
        return Err(ProbeError::EmptyVersion);
    }

    let hello = admin
        .run_command(doc! { "hello": 1 })
        .await
        .map_err(ProbeError::from_driver)?;

    Ok(server_info_from_hello(&hello, version, seed_list))
}

/// Fold a `hello` response into a `ServerInfo`.
fn server_info_from_hello(hello: &Document, version: String, seed_list: Vec<String>) -> ServerInfo {
    let primary = hello.get_str("primary").ok().map(str::to_string);
    let set_name = hello.get_str("setName").ok().map(str::to_string);
    let is_writable_primary = hello.get_bool("isWritablePrimary").unwrap_or(false);

    ServerInfo {
        version,
        seed_list,
        members: members_from_hello(hello, primary.as_deref()),
        primary,
        set_name,
        is_writable_primary,
    }
}

/// Derive the member list with roles from a `hello` response.
///
/// Replica sets advertise `hosts`/`passives`/`arbiters`; mongos answers
/// with `msg: "isdbgrid"` and no membership arrays.
fn members_from_hello(hello: &Document, primary: Option<&str>) -> Vec<TopologyMember> {
    let mut members = Vec::new();

    if hello.get_str("msg").ok() == Some("isdbgrid") {
        if let Ok(me) = hello.get_str("me") {
            members.push(TopologyMember {
                address: me.to_string(),
                role: MemberRole::Mongos,
            });
        }
        return members;
    }

    for host in string_array(hello, "hosts") {
        let role = if primary == Some(host.as_str()) {
            MemberRole::Primary
        } else {
            MemberRole::Secondary
        };
        members.push(TopologyMember {
            address: host,
            role,
        });
    }
    for host in string_array(hello, "passives") {
        members.push(TopologyMember {
            address: host,
            role: MemberRole::Passive,
        });
    }
    for host in string_array(hello, "arbiters") {
        members.push(TopologyMember {
            address: host,
            role: MemberRole::Arbiter,
        });
    }

    members
}

fn string_array(doc: &Document, key: &str) -> Vec<String> {
    doc.get_array(key)
        .map(|values| {
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
