//! Configuration loading
//!
//! The embedded node.toml is the default; a file given on the command line
//! replaces it and CLI flags override individual values.

pub mod loader;

pub use loader::{load_config, ConfigError, FileConfig, LinkConfig};
