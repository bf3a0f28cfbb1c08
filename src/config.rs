use crate::error::{ReleaseError, Result};
use crate::host::MAX_PER_PAGE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name searched for in the working directory and the user config directory
pub const CONFIG_FILE_NAME: &str = "release-tagger.toml";

/// Represents the complete configuration for release-tagger.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub github: GithubConfig,

    #[serde(default)]
    pub git: GitConfig,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_upload_url() -> String {
    "https://uploads.github.com".to_string()
}

fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

fn default_remote() -> String {
    "origin".to_string()
}

/// Where and how to reach the GitHub API.
///
/// Point `api_url` and `upload_url` at a GitHub Enterprise instance to publish
/// there instead.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GithubConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_upload_url")]
    pub upload_url: String,

    /// Releases requested per page when listing
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Per-request timeout; none by default
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl Default for GithubConfig {
    fn default() -> Self {
        GithubConfig {
            api_url: default_api_url(),
            upload_url: default_upload_url(),
            per_page: default_per_page(),
            timeout_secs: None,
        }
    }
}

/// Local checkout settings
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct GitConfig {
    /// Remote whose URL names the repository when none is given explicitly
    #[serde(default = "default_remote")]
    pub remote: String,
}

impl Default for GitConfig {
    fn default() -> Self {
        GitConfig {
            remote: default_remote(),
        }
    }
}

impl Config {
    /// Reject values the GitHub API cannot serve
    pub fn validate(&self) -> Result<()> {
        if self.github.per_page == 0 || self.github.per_page > MAX_PER_PAGE {
            return Err(ReleaseError::config(format!(
                "github.per_page must be between 1 and {}, got {}",
                MAX_PER_PAGE, self.github.per_page
            )));
        }
        if self.github.api_url.trim().is_empty() || self.github.upload_url.trim().is_empty() {
            return Err(ReleaseError::config("github api_url and upload_url must be set"));
        }
        if self.git.remote.trim().is_empty() {
            return Err(ReleaseError::config("git.remote must not be empty"));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `release-tagger.toml` in current directory
/// 3. `release-tagger.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read, parsed or validated
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if local.exists() {
        fs::read_to_string(local)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.upload_url, "https://uploads.github.com");
        assert_eq!(config.github.per_page, 100);
        assert_eq!(config.github.timeout_secs, None);
        assert_eq!(config.git.remote, "origin");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[github]\nper_page = 30\n").unwrap();
        assert_eq!(config.github.per_page, 30);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.git.remote, "origin");
    }

    #[test]
    fn test_validate_per_page_bounds() {
        let mut config = Config::default();
        config.github.per_page = 0;
        assert!(config.validate().is_err());
        config.github.per_page = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_remote() {
        let mut config = Config::default();
        config.git.remote = " ".to_string();
        assert!(config.validate().is_err());
    }
}
