//! microk8s-pilot: declarative addon management for MicroK8s

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::Result;
use microk8s_pilot_core::{AddonAction, ReconcileOptions, ReconcileResult, Reconciler};
use microk8s_rs::{Microk8sConfig, Microk8sError, SystemRunner, microk8sctl};
use std::fs::File;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{EnvFilter, prelude::*};

/// microk8s-pilot: bring MicroK8s addons to a desired state
#[derive(Parser, Debug)]
#[command(name = "microk8s-pilot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to config file (default: <config_dir>/microk8s-pilot/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to the microk8s binary (overrides config)
    #[arg(long, global = true)]
    binary: Option<PathBuf>,

    /// Report what would change without changing anything
    #[arg(short, long, global = true)]
    test: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Log file path (default: <temp_dir>/microk8s-pilot.log)
    #[arg(long, global = true)]
    log_file: Option<String>,

    /// Result output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    output: OutputFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensure an addon is enabled
    Enabled {
        /// Addon name (e.g. dns, ingress)
        #[arg(value_parser = addon_name)]
        name: String,
    },
    /// Ensure an addon is disabled
    Disabled {
        /// Addon name (e.g. dns, ingress)
        #[arg(value_parser = addon_name)]
        name: String,
    },
    /// Check that microk8s is installed
    Probe,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Json,
    Yaml,
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize error handling
    color_eyre::install()?;

    // Log to a file so stdout carries only the result
    let log_path = resolve_log_path(cli.log_file.clone());
    let log_file = File::create(&log_path)?;

    let filter = if cli.debug {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false)
                .with_target(false),
        )
        .with(filter)
        .init();

    tracing::info!("Starting microk8s-pilot");

    let mut config = Microk8sConfig::load(cli.config.as_deref())?;
    if let Some(binary) = cli.binary {
        config.binary = binary;
    }
    config.test |= cli.test;
    tracing::info!("Using binary: {}", config.binary.display());

    let (name, action) = match cli.command {
        Command::Enabled { name } => (name, AddonAction::Enable),
        Command::Disabled { name } => (name, AddonAction::Disable),
        Command::Probe => match microk8sctl::probe(&config.binary) {
            Ok(()) => {
                println!("true");
                return Ok(());
            }
            Err(e) => {
                tracing::warn!("{}", e);
                println!("false: {}", e);
                std::process::exit(1);
            }
        },
    };

    let reconciler = match Reconciler::new(
        &config.binary,
        SystemRunner,
        ReconcileOptions {
            dry_run: config.test,
        },
    ) {
        Ok(r) => r,
        Err(e @ Microk8sError::BinaryNotFound(_)) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(
        "Reconciling {} to {} (test mode: {})",
        name,
        action.target_state(),
        reconciler.options().dry_run
    );
    let ret = reconciler.reconcile(&name, action)?;
    println!("{}", render(&ret, cli.output)?);

    tracing::info!("{} {}: {}", ret.symbol(), ret.name, ret.comment);
    if ret.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}

/// Reject empty addon names before anything runs
fn addon_name(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("addon name must not be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Render a result for stdout
fn render(ret: &ReconcileResult, format: OutputFormat) -> Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string_pretty(ret)?,
        OutputFormat::Yaml => serde_yaml::to_string(ret)?,
    };
    Ok(text)
}

/// Resolve the log file path, falling back to the platform temp directory.
fn resolve_log_path(log_file: Option<String>) -> PathBuf {
    match log_file {
        Some(path) => PathBuf::from(path),
        None => std::env::temp_dir().join("microk8s-pilot.log"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use microk8s_pilot_core::Changes;

    #[test]
    fn default_log_path_uses_temp_dir() {
        let path = resolve_log_path(None);
        let expected = std::env::temp_dir().join("microk8s-pilot.log");
        assert_eq!(path, expected);
    }

    #[test]
    fn explicit_log_path_is_used() {
        let custom = "/some/custom/path.log".to_string();
        let path = resolve_log_path(Some(custom.clone()));
        assert_eq!(path, PathBuf::from(custom));
    }

    #[test]
    fn cli_parses_global_flags_after_subcommand() {
        let args = ["microk8s-pilot", "enabled", "dns", "--test", "-o", "yaml"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.test);
        assert_eq!(cli.output, OutputFormat::Yaml);
        assert!(matches!(cli.command, Command::Enabled { ref name } if name == "dns"));
    }

    #[test]
    fn cli_rejects_empty_addon_name() {
        assert!(Cli::try_parse_from(["microk8s-pilot", "disabled", ""]).is_err());
    }

    #[test]
    fn render_yaml_has_null_result_for_test_mode() {
        let ret = ReconcileResult::pending("dns", "Would enable addon dns".to_string());
        let text = render(&ret, OutputFormat::Yaml).unwrap();
        assert!(text.contains("result: null"));
        assert!(text.contains("comment: Would enable addon dns"));
    }

    #[test]
    fn render_json_changes() {
        let ret = ReconcileResult::changed(
            "dns",
            Changes::transition(false, true),
            "Successfully enabled addon dns".to_string(),
        );
        let text = render(&ret, OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["changes"]["new"], true);
        assert_eq!(value["result"], true);
    }
}
