//! Configuration parsing and overrides

use std::fs;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::path::PathBuf;

use log::{error, info};
use serde::Deserialize;
use thiserror::Error;

use duet_core::config::{NodeConfig, MAX_NAME_LEN};

use crate::parse_args::AppArgs;

/// Embedded default configuration (compiled into the binary)
/// Edit node.toml and rebuild to change the defaults
pub const EMBEDDED_CONFIG: &str = include_str!("../../node.toml");

/// UDP port used when nothing else is configured
pub const DEFAULT_PORT: u16 = 47800;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML syntax or schema error
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// Header label does not fit the display
    #[error("name '{0}' is longer than {max} characters", max = MAX_NAME_LEN)]
    NameTooLong(String),
    /// A zero demo duration would rotate every frame
    #[error("node.timing.demo_duration_ms must be greater than zero")]
    ZeroDuration,
}

/// UDP endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LinkConfig {
    /// Local socket address
    pub bind: SocketAddrV4,
    /// Destination for discovery broadcasts
    pub discovery: SocketAddrV4,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, DEFAULT_PORT),
            discovery: SocketAddrV4::new(Ipv4Addr::BROADCAST, DEFAULT_PORT),
        }
    }
}

/// Everything node.toml holds
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub node: NodeConfig,
    pub link: LinkConfig,
}

/// Parse and validate a TOML configuration
pub fn parse_config(text: &str) -> Result<FileConfig, ConfigError> {
    let config: FileConfig = toml::from_str(text)?;
    if config.node.timing.demo_duration_ms == 0 {
        return Err(ConfigError::ZeroDuration);
    }
    Ok(config)
}

/// Load the configuration selected by the command line
///
/// Uses `--config` when given, otherwise the embedded node.toml, then
/// applies the CLI overrides.
pub fn load_config(args: &AppArgs) -> Result<FileConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.clone(),
                source,
            })?;
            let config = parse_config(&text)?;
            info!("Loaded configuration from {}", path.display());
            config
        }
        None => embedded_config(),
    };

    apply_overrides(&mut config, args)?;
    Ok(config)
}

/// Parse the embedded node.toml
///
/// build.rs validates the file, so the fallback only triggers if the
/// schema and the validator drift apart.
fn embedded_config() -> FileConfig {
    match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Failed to parse embedded config: {}", e);
            error!("Using built-in defaults");
            FileConfig::default()
        }
    }
}

fn apply_overrides(config: &mut FileConfig, args: &AppArgs) -> Result<(), ConfigError> {
    if let Some(role) = args.role {
        config.node.role = role;
    }
    if let Some(name) = &args.name {
        config.node.name = heapless::String::try_from(name.as_str())
            .map_err(|_| ConfigError::NameTooLong(name.clone()))?;
    }
    if let Some(bind) = args.bind {
        config.link.bind = bind;
    }
    if let Some(discovery) = args.discovery {
        config.link.discovery = discovery;
    }
    Ok(())
}
