//! Configuration file support.
//!
//! Loads and validates configuration from TOML files.
//! Default location: /etc/networkd-apply/networkd-apply.conf

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{NetError, NetResult};

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "/etc/networkd-apply/networkd-apply.conf";

/// systemd-networkd settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkdConfig {
    /// Runtime directory read by systemd-networkd
    #[serde(default = "default_runtime_dir")]
    pub runtime_dir: PathBuf,

    /// Unit restarted to apply the configuration
    #[serde(default = "default_unit")]
    pub unit: String,

    /// Delay between the two unit restarts in seconds
    #[serde(default = "default_restart_delay")]
    pub restart_delay_secs: u64,

    /// Mode for created runtime directories
    #[serde(default = "default_dir_mode")]
    pub dir_mode: u32,

    /// Mode for written artifacts
    #[serde(default = "default_file_mode")]
    pub file_mode: u32,
}

/// Kernel module names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModulesConfig {
    /// Module providing 802.1Q VLAN tagging
    #[serde(default = "default_vlan_module")]
    pub vlan_module: String,

    /// Module providing interface bonding
    #[serde(default = "default_bonding_module")]
    pub bonding_module: String,
}

/// Complete configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyConfig {
    /// systemd-networkd settings
    #[serde(default)]
    pub networkd: NetworkdConfig,

    /// Kernel module names
    #[serde(default)]
    pub modules: ModulesConfig,
}

// Default functions
fn default_runtime_dir() -> PathBuf {
    PathBuf::from("/run/systemd/network")
}

fn default_unit() -> String {
    "systemd-networkd.service".to_string()
}

fn default_restart_delay() -> u64 {
    5
}

fn default_dir_mode() -> u32 {
    0o755
}

fn default_file_mode() -> u32 {
    0o444
}

fn default_vlan_module() -> String {
    "8021q".to_string()
}

fn default_bonding_module() -> String {
    "bonding".to_string()
}

impl Default for NetworkdConfig {
    fn default() -> Self {
        Self {
            runtime_dir: default_runtime_dir(),
            unit: default_unit(),
            restart_delay_secs: default_restart_delay(),
            dir_mode: default_dir_mode(),
            file_mode: default_file_mode(),
        }
    }
}

impl Default for ModulesConfig {
    fn default() -> Self {
        Self {
            vlan_module: default_vlan_module(),
            bonding_module: default_bonding_module(),
        }
    }
}

impl ApplyConfig {
    /// Load configuration from file, falling back to defaults if file not found
    pub fn load_or_default(path: impl AsRef<Path>) -> NetResult<Self> {
        let path = path.as_ref();

        match fs::read_to_string(path) {
            Ok(content) => {
                let config: Self = toml::from_str(&content).map_err(|e| {
                    NetError::Configuration(format!(
                        "Failed to parse config file {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                config.validate()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "Config file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(NetError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Load from default location or defaults
    pub fn load() -> NetResult<Self> {
        Self::load_or_default(DEFAULT_CONFIG_PATH)
    }

    /// Get the delay between unit restarts as Duration
    pub fn restart_delay(&self) -> Duration {
        Duration::from_secs(self.networkd.restart_delay_secs)
    }

    /// Validate configuration
    pub fn validate(&self) -> NetResult<()> {
        if self.networkd.unit.trim().is_empty() {
            return Err(NetError::Configuration("unit must not be empty".to_string()));
        }

        if self.networkd.runtime_dir.as_os_str().is_empty() {
            return Err(NetError::Configuration(
                "runtime_dir must not be empty".to_string(),
            ));
        }

        if self.networkd.file_mode & 0o444 == 0 {
            return Err(NetError::Configuration(format!(
                "file_mode {:o} grants no read access",
                self.networkd.file_mode
            )));
        }

        if self.networkd.file_mode > 0o7777 || self.networkd.dir_mode > 0o7777 {
            return Err(NetError::Configuration(
                "file_mode and dir_mode must be permission bits".to_string(),
            ));
        }

        if self.modules.vlan_module.trim().is_empty() || self.modules.bonding_module.trim().is_empty()
        {
            return Err(NetError::Configuration(
                "module names must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
