//! Startup errors

use std::io;

use thiserror::Error;

use crate::config::ConfigError;

/// Anything that stops the node before its loop starts
#[derive(Debug, Error)]
pub enum NodeError {
    #[error("invalid arguments: {0}")]
    Args(#[from] pico_args::Error),
    #[error("cannot open log file: {0}")]
    Log(#[source] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot take over the terminal: {0}")]
    Terminal(#[source] io::Error),
    #[error("link unavailable: {0}")]
    Link(#[source] io::Error),
}

impl NodeError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            NodeError::Args(_) => 2,
            _ => 1,
        }
    }
}
