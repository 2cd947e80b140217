//! microk8s-rs: Rust SDK for the MicroK8s command-line tool
//!
//! MicroK8s exposes addon management only through its `microk8s` wrapper
//! script, so everything here goes through child processes.

pub mod config;
pub mod error;
pub mod microk8sctl;

pub use config::Microk8sConfig;
pub use error::Microk8sError;
pub use microk8sctl::{CommandOutput, CommandRunner, Microk8s, SystemRunner, DEFAULT_BINARY};
