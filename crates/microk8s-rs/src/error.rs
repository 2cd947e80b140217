//! Error types for microk8s-rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when driving the microk8s CLI
#[derive(Error, Debug)]
pub enum Microk8sError {
    /// The microk8s binary is missing or not executable
    #[error("microk8s not found at {}", .0.display())]
    BinaryNotFound(PathBuf),

    /// The command could not be started at all
    #[error("Failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file not found
    #[error("Config file not found: {0}")]
    ConfigNotFound(String),

    /// Failed to parse configuration
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    ConfigInvalid(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No per-user config directory on this platform
    #[error("Could not determine config directory")]
    NoConfigDirectory,
}
