//! Server configuration management.
//!
//! Configuration is stored as TOML:
//! - Linux: `~/.config/pap/server.toml`
//! - Windows: `%APPDATA%/pap/server.toml`

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use pap_file_ops::DEFAULT_FALLBACK_HOME;
use pap_protocol::DEFAULT_PORT;
use pap_server::ServerConfig;

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address to listen on.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// TCP port (0 = auto-assign).
    #[serde(default = "default_port")]
    pub port: u16,

    /// Home used for `~` when neither the client identity nor `$HOME`
    /// provides one.
    #[serde(default = "default_fallback_home")]
    pub fallback_home: String,
}

fn default_bind_address() -> String {
    "0.0.0.0".into()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_fallback_home() -> String {
    DEFAULT_FALLBACK_HOME.into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            fallback_home: default_fallback_home(),
        }
    }
}

impl Config {
    /// Loads configuration from disk, or creates a default if not found.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)
                .with_context(|| format!("invalid config {}", path.display()))?;
            Ok(config)
        } else {
            let config = Config::default();
            config.save_to(path)?;
            Ok(config)
        }
    }

    fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
        }

        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Listener settings for [`pap_server::PapServer`].
    pub fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let bind_address: IpAddr = self
            .bind_address
            .parse()
            .with_context(|| format!("invalid bind_address {:?}", self.bind_address))?;
        Ok(ServerConfig {
            bind_address,
            port: self.port,
        })
    }
}

/// Returns the platform-specific configuration file path.
fn config_path() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".into());
        Ok(PathBuf::from(home)
            .join(".config")
            .join("pap")
            .join("server.toml"))
    }

    #[cfg(target_os = "windows")]
    {
        let appdata =
            std::env::var("APPDATA").unwrap_or_else(|_| "C:\\Users\\Default\\AppData".into());
        Ok(PathBuf::from(appdata).join("pap").join("server.toml"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Ok(PathBuf::from("/tmp/pap/server.toml"))
    }
}
