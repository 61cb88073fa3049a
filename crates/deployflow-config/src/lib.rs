pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a config file
pub const CONFIG_PATH_ENV: &str = "DEPLOYFLOW_CONFIG_PATH";

/// Provider the composer serves when nothing else is configured
pub const DEFAULT_PROVIDER: &str = "alicloud";

/// Stage timeout for the unpin stage that runs after a failed deploy (20 minutes)
pub const DEFAULT_FAILED_UNPIN_TIMEOUT_MS: u64 = 20 * 60 * 1000;

const CANDIDATES: [&str; 2] = ["deployflow.local.yaml", "deployflow.yaml"];

/// Composer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposerConfig {
    /// Cloud provider name stages must carry to be composed
    pub provider: String,

    /// Timeout override for the failure-path unpin stage, in milliseconds
    pub failed_unpin_timeout_ms: u64,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            provider: DEFAULT_PROVIDER.to_string(),
            failed_unpin_timeout_ms: DEFAULT_FAILED_UNPIN_TIMEOUT_MS,
        }
    }
}

impl ComposerConfig {
    fn validate(&self, path: &Path) -> Result<()> {
        if self.provider.trim().is_empty() {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                message: "provider must not be empty".to_string(),
            });
        }
        if self.failed_unpin_timeout_ms == 0 {
            return Err(ConfigError::InvalidConfig {
                path: path.to_path_buf(),
                message: "failed_unpin_timeout_ms must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Global DeployFlow config directory
pub fn get_config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("deployflow"))
}

/// Find the composer config file
///
/// Search order:
/// 1. `DEPLOYFLOW_CONFIG_PATH` (must exist when set)
/// 2. current directory: deployflow.local.yaml, deployflow.yaml
/// 3. `./.deployflow/` with the same candidates
/// 4. `~/.config/deployflow/config.yaml`
pub fn find_config_file() -> Result<Option<PathBuf>> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::ConfigFileNotFound(path));
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(Some(path));
        }
    }

    let local_dir = current_dir.join(".deployflow");
    if local_dir.is_dir() {
        for filename in &CANDIDATES {
            let path = local_dir.join(filename);
            if path.exists() {
                return Ok(Some(path));
            }
        }
    }

    if let Ok(config_dir) = get_config_dir() {
        let global_config = config_dir.join("config.yaml");
        if global_config.exists() {
            return Ok(Some(global_config));
        }
    }

    Ok(None)
}

/// Load and validate a config file
pub fn load_config_from(path: impl AsRef<Path>) -> Result<ComposerConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let config: ComposerConfig = serde_yaml::from_str(&content)?;
    config.validate(path)?;
    tracing::debug!(path = %path.display(), "Loaded composer config");
    Ok(config)
}

/// Load the composer config, falling back to defaults when no file exists
pub fn load_config() -> Result<ComposerConfig> {
    match find_config_file()? {
        Some(path) => load_config_from(path),
        None => {
            tracing::debug!("No composer config file found, using defaults");
            Ok(ComposerConfig::default())
        }
    }
}
