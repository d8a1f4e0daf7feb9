//! Gateway configuration: TOML file + CLI overrides.

use pgw_core::{PgwError, PgwResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Top-level config file structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub upstream: UpstreamSection,
    #[serde(default)]
    pub policy: PolicySection,
}

/// `[server]` section of the config TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSection {
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            port: default_port(),
        }
    }
}

/// `[upstream]` section of the config TOML: where the backend and the
/// policy authority live.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamSection {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
    /// Deadline for each authority call, in seconds. A stalled authority
    /// must never pin handler capacity indefinitely.
    #[serde(default = "default_authority_timeout")]
    pub authority_timeout: u64,
}

impl Default for UpstreamSection {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            authority_url: default_authority_url(),
            authority_timeout: default_authority_timeout(),
        }
    }
}

/// `[policy]` section of the config TOML.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PolicySection {
    #[serde(default)]
    pub command_mode: CommandMode,
}

/// How the `cmd` field of the authorization query is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandMode {
    /// `"METHOD path"` derived from each request.
    #[default]
    Derived,
    /// The legacy fixed command, for authorities that only know one verb.
    Fixed,
}

fn default_port() -> u16 {
    3000
}
fn default_backend_url() -> String {
    "http://rust-backend:5000".to_string()
}
fn default_authority_url() -> String {
    "http://policy-engine:8000/check".to_string()
}
fn default_authority_timeout() -> u64 {
    5
}

/// Resolved gateway configuration (CLI overrides applied, timeout as a
/// `Duration`, backend URL normalized). Built once at startup and shared
/// read-only; nothing re-reads configuration during request handling.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    /// Backend base URL, no trailing slash.
    pub backend_url: String,
    pub authority_url: String,
    pub authority_timeout: Duration,
    pub command_mode: CommandMode,
}

impl GatewayConfig {
    /// Load config from TOML file, then apply CLI overrides.
    pub fn load(
        config_path: Option<&Path>,
        cli_port: Option<u16>,
        cli_backend_url: Option<&str>,
        cli_authority_url: Option<&str>,
        cli_authority_timeout: Option<u64>,
    ) -> PgwResult<Self> {
        // Load base config from file
        let file_config = if let Some(path) = config_path {
            let expanded = expand_tilde(path);
            if expanded.exists() {
                info!(path = %expanded.display(), "loading config file");
                let content = std::fs::read_to_string(&expanded)?;
                toml::from_str::<ConfigFile>(&content)
                    .map_err(|e| PgwError::Config(format!("config parse error: {e}")))?
            } else {
                info!(path = %expanded.display(), "config file not found, using defaults");
                ConfigFile::default()
            }
        } else {
            ConfigFile::default()
        };

        Ok(Self::resolve(
            file_config,
            cli_port,
            cli_backend_url,
            cli_authority_url,
            cli_authority_timeout,
        ))
    }

    /// Merge CLI overrides into the file config.
    fn resolve(
        file_config: ConfigFile,
        cli_port: Option<u16>,
        cli_backend_url: Option<&str>,
        cli_authority_url: Option<&str>,
        cli_authority_timeout: Option<u64>,
    ) -> Self {
        let port = cli_port.unwrap_or(file_config.server.port);
        let backend_url = cli_backend_url
            .map(|s| s.to_string())
            .unwrap_or(file_config.upstream.backend_url);
        let authority_url = cli_authority_url
            .map(|s| s.to_string())
            .unwrap_or(file_config.upstream.authority_url);
        let timeout_secs = cli_authority_timeout.unwrap_or(file_config.upstream.authority_timeout);

        Self {
            port,
            backend_url: backend_url.trim_end_matches('/').to_string(),
            authority_url,
            authority_timeout: Duration::from_secs(timeout_secs),
            command_mode: file_config.policy.command_mode,
        }
    }
}

/// Expand `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    if let Some(rest) = s.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(s.as_ref())
}
