//! On-disk configuration
//!
//! ```yaml
//! binary: /snap/bin/microk8s
//! test: false
//! ```

use crate::error::Microk8sError;
use crate::microk8sctl::DEFAULT_BINARY;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings shared by every invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Microk8sConfig {
    /// Path to the microk8s wrapper script
    pub binary: PathBuf,
    /// Report what would change without changing anything
    pub test: bool,
}

impl Default for Microk8sConfig {
    fn default() -> Self {
        Self {
            binary: PathBuf::from(DEFAULT_BINARY),
            test: false,
        }
    }
}

impl Microk8sConfig {
    /// Default config location: `<config_dir>/microk8s-pilot/config.yaml`
    pub fn default_path() -> Result<PathBuf, Microk8sError> {
        dirs_next::config_dir()
            .map(|dir| dir.join("microk8s-pilot").join("config.yaml"))
            .ok_or(Microk8sError::NoConfigDirectory)
    }

    /// Load from an explicit path, or from the default location
    ///
    /// An explicit path must exist. A missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Microk8sError> {
        match path {
            Some(path) => Self::load_from(path),
            None => {
                let path = match Self::default_path() {
                    Ok(path) => path,
                    Err(_) => return Ok(Self::default()),
                };
                if path.exists() {
                    Self::load_from(&path)
                } else {
                    tracing::debug!("no config at {}, using defaults", path.display());
                    Ok(Self::default())
                }
            }
        }
    }

    /// Load from a specific file
    pub fn load_from(path: &Path) -> Result<Self, Microk8sError> {
        if !path.exists() {
            return Err(Microk8sError::ConfigNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Parse from YAML text
    pub fn from_yaml(yaml: &str) -> Result<Self, Microk8sError> {
        // An empty document deserializes to unit, not a map
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), Microk8sError> {
        if !self.binary.is_absolute() {
            return Err(Microk8sError::ConfigInvalid(format!(
                "binary must be an absolute path, got {}",
                self.binary.display()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
binary: /opt/microk8s/bin/microk8s
test: true
"#;

        let config = Microk8sConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.binary, PathBuf::from("/opt/microk8s/bin/microk8s"));
        assert!(config.test);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = Microk8sConfig::from_yaml("test: true\n").unwrap();
        assert_eq!(config.binary, PathBuf::from(DEFAULT_BINARY));
        assert!(config.test);

        assert_eq!(
            Microk8sConfig::from_yaml("").unwrap(),
            Microk8sConfig::default()
        );
    }

    #[test]
    fn test_relative_binary_rejected() {
        let err = Microk8sConfig::from_yaml("binary: microk8s\n").unwrap_err();
        assert!(matches!(err, Microk8sError::ConfigInvalid(_)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Microk8sConfig::from_yaml("retries: 3\n").unwrap_err();
        assert!(matches!(err, Microk8sError::ConfigParse(_)));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let err = Microk8sConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, Microk8sError::ConfigNotFound(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "test: true\n").unwrap();

        let config = Microk8sConfig::load(Some(&path)).unwrap();
        assert!(config.test);
    }
}
