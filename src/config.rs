use crate::comment::client::DEFAULT_BASE_URL;
use crate::error::{ActionError, Result};
use crate::git::TagBackend;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "nextversion.toml";

/// Represents the complete configuration for both actions.
///
/// Every value here is a fallback: action inputs and command line flags win.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub version: VersionConfig,

    #[serde(default)]
    pub comment: CommentConfig,
}

/// Defaults for next-version.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct VersionConfig {
    /// Label printed before new revision numbers, e.g. "r" for `1.2.3+r4`
    #[serde(default)]
    pub revision_prefix: Option<String>,

    /// Stage forced onto every computed version
    #[serde(default)]
    pub override_stage: Option<String>,

    #[serde(default)]
    pub tag_source: TagBackend,
}

fn default_release_branch() -> String {
    "master".to_string()
}

fn default_api_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Settings for pr-merge-comment.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommentConfig {
    /// Branch prefix whose push builds get commented on
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

impl Default for CommentConfig {
    fn default() -> Self {
        CommentConfig {
            release_branch: default_release_branch(),
            api_url: default_api_url(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `nextversion.toml` in current directory
/// 3. `.nextversion.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            ActionError::config(format!("Cannot read config file '{}': {}", path, e))
        })?
    } else if local.exists() {
        fs::read_to_string(local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parse configuration from TOML text
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config = toml::from_str(text)?;
    Ok(config)
}
