//! Probe configuration
//!
//! The connection URI carries credentials, so it never lives in source.
//! Resolution order: `--uri` flag, then the `ATLAS_DOCTOR_URI` environment
//! variable, then a TOML config file (explicit `--config` path, else the
//! XDG location).

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ProbeError;

pub const URI_ENV_VAR: &str = "ATLAS_DOCTOR_URI";
pub const DEFAULT_SERVER_SELECTION_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_APP_NAME: &str = "atlas-doctor";

/// Fully resolved configuration for a probe run.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    pub uri: String,
    pub server_selection_timeout_ms: u64,
    pub app_name: String,
}

/// On-disk shape of the config file. Everything optional; the resolution
/// chain fills the gaps.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub uri: Option<String>,
    pub server_selection_timeout_ms: Option<u64>,
    pub app_name: Option<String>,
}

impl ConfigFile {
    pub fn parse(contents: &str) -> Result<Self, ProbeError> {
        toml::from_str(contents)
            .map_err(|e| ProbeError::Config(format!("invalid config file: {e}")))
    }

    fn load(path: &Path) -> Result<Self, ProbeError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            ProbeError::Config(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::parse(&contents)
    }
}

impl ProbeConfig {
    /// Resolve configuration from CLI flags, environment, and config file.
    ///
    /// An explicitly given config path must exist and parse; the discovered
    /// XDG path is optional.
    pub fn resolve(
        cli_uri: Option<String>,
        config_path: Option<PathBuf>,
        cli_timeout_ms: Option<u64>,
    ) -> Result<Self, ProbeError> {
        let file = match config_path {
            Some(path) => Some(ConfigFile::load(&path)?),
            None => match discover_config_path() {
                Some(path) if path.exists() => Some(ConfigFile::load(&path)?),
                _ => None,
            },
        };
        let env_uri = std::env::var(URI_ENV_VAR).ok();
        Self::from_parts(cli_uri, env_uri, cli_timeout_ms, file)
    }

    /// The pure half of `resolve`, split out so the precedence rules are
    /// testable without touching the process environment.
    pub fn from_parts(
        cli_uri: Option<String>,
        env_uri: Option<String>,
        cli_timeout_ms: Option<u64>,
        file: Option<ConfigFile>,
    ) -> Result<Self, ProbeError> {
        let file = file.unwrap_or_default();
        let uri = cli_uri
            .or(env_uri)
            .or(file.uri)
            .ok_or_else(|| {
                ProbeError::Config(format!(
                    "no connection URI: pass --uri, set {URI_ENV_VAR}, or put `uri` in the config file"
                ))
            })?;

        Ok(Self {
            uri,
            server_selection_timeout_ms: cli_timeout_ms
                .or(file.server_selection_timeout_ms)
                .unwrap_or(DEFAULT_SERVER_SELECTION_TIMEOUT_MS),
            app_name: file.app_name.unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
        })
    }

    pub fn server_selection_timeout(&self) -> Duration {
        Duration::from_millis(self.server_selection_timeout_ms)
    }
}

/// Config file discovery: `$XDG_CONFIG_HOME/atlas-doctor/config.toml`,
/// falling back to `~/.config/atlas-doctor/config.toml`.
fn discover_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Some(PathBuf::from(xdg).join("atlas-doctor/config.toml"));
    }
    if let Ok(home) = std::env::var("HOME") {
        return Some(PathBuf::from(home).join(".config/atlas-doctor/config.toml"));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_beats_env_beats_file() {
        let file = ConfigFile {
            uri: Some("mongodb://file.example.net".to_string()),
            ..Default::default()
        };

        let cfg = ProbeConfig::from_parts(
            Some("mongodb://flag.example.net".to_string()),
            Some("mongodb://env.example.net".to_string()),
            None,
            Some(file.clone()),
        )
        .unwrap();
        assert_eq!(cfg.uri, "mongodb://flag.example.net");

        let cfg = ProbeConfig::from_parts(
            None,
            Some("mongodb://env.example.net".to_string()),
            None,
            Some(file.clone()),
        )
        .unwrap();
        assert_eq!(cfg.uri, "mongodb://env.example.net");

        let cfg = ProbeConfig::from_parts(None, None, None, Some(file)).unwrap();
        assert_eq!(cfg.uri, "mongodb://file.example.net");
    }

    #[test]
    fn test_missing_uri_is_configuration_error() {
        let err = ProbeConfig::from_parts(None, None, None, None).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains(URI_ENV_VAR));
    }

    #[test]
    fn test_defaults_apply_without_file() {
        let cfg = ProbeConfig::from_parts(
            Some("mongodb://db.example.net".to_string()),
            None,
            None,
            None,
        )
        .unwrap();
        assert_eq!(
            cfg.server_selection_timeout(),
            Duration::from_millis(DEFAULT_SERVER_SELECTION_TIMEOUT_MS)
        );
        assert_eq!(cfg.app_name, DEFAULT_APP_NAME);
    }

    #[test]
    fn test_config_file_parse_and_precedence() {
        let file = ConfigFile::parse(
            r#"
            uri = "mongodb+srv://user:pw@cluster0.ab12cd.mongodb.net/forum"
            server_selection_timeout_ms = 2500
            app_name = "probe-lab"
            "#,
        )
        .unwrap();

        let cfg = ProbeConfig::from_parts(None, None, Some(1000), Some(file)).unwrap();
        // CLI timeout beats the file value.
        assert_eq!(cfg.server_selection_timeout_ms, 1000);
        assert_eq!(cfg.app_name, "probe-lab");
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = ConfigFile::parse("uri = [broken").unwrap_err();
        assert!(err.is_configuration());
    }
}
