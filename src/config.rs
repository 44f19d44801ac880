//! Interpreter configuration
//!
//! Settings come from an optional `eva.toml`; every field has a default so a
//! partial file (or none at all) is fine.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// File name looked up by [`Config::discover`]
pub const CONFIG_FILE: &str = "eva.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub limits: Limits,
    pub modules: ModuleSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Closure activations allowed on the stack at once
    pub max_call_depth: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_call_depth: 2000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleSettings {
    /// Directories searched in order for `<name>.<extension>`
    pub search_paths: Vec<PathBuf>,
    pub extension: String,
    /// Evaluate each module once and reuse it on later imports
    pub memoize: bool,
}

impl Default for ModuleSettings {
    fn default() -> Self {
        ModuleSettings {
            search_paths: vec![PathBuf::from("modules"), PathBuf::from(".")],
            extension: "eva".to_string(),
            memoize: true,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    #[diagnostic(code(config::io))]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}")]
    #[diagnostic(code(config::parse))]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Config, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Config::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Load `eva.toml` from `dir` if present, otherwise defaults
    pub fn discover(dir: &Path) -> Result<Config, ConfigError> {
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!("Loading config from {}", path.display());
            Config::load(&path)
        } else {
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.limits.max_call_depth, 2000);
        assert!(config.modules.memoize);
        assert_eq!(config.modules.extension, "eva");
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml(
            r#"
[modules]
memoize = false
search_paths = ["lib"]
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                limits: Limits::default(),
                modules: ModuleSettings {
                    search_paths: vec![PathBuf::from("lib")],
                    extension: "eva".to_string(),
                    memoize: false,
                },
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(Config::from_toml("[limits]\nmax_call_depth = \"deep\"\n").is_err());
    }

    #[test]
    fn test_discover_without_file() {
        let dir = std::env::temp_dir().join("eva-config-test-missing");
        assert_eq!(Config::discover(&dir).unwrap(), Config::default());
    }
}
