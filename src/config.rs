//! Configuration management for atstart
//!
//! Settings are read from environment variables with defaults that match the
//! layout of an Atmel START project checked into a CMake repository: the
//! generated code lives in `atstart/`, its makefile in `atstart/gcc/Makefile`
//! and the toolchain is written to `atstart/toolchain.cmake`.
//!
//! # Environment Variables
//!
//! - `ATSTART_MAKEFILE`: Makefile to read - default: "atstart/gcc/Makefile"
//! - `ATSTART_TOOLCHAIN`: Toolchain file to write - default: "atstart/toolchain.cmake"
//! - `ATSTART_TEMPLATE`: Custom toolchain template - default: built-in template
//! - `ATSTART_LOG_LEVEL`: Logging level - default: "info"
//!
//! Command line flags take precedence over all of these.

use crate::toolchain::TOOLCHAIN_TEMPLATE;
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_MAKEFILE: &str = "atstart/gcc/Makefile";
const DEFAULT_TOOLCHAIN: &str = "atstart/toolchain.cmake";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),

    /// Custom template could not be read
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtstartConfig {
    /// Atmel START generated makefile
    pub makefile: PathBuf,

    /// Output path of the CMake toolchain
    pub toolchain: PathBuf,

    /// Custom toolchain template, `None` for the built-in one
    pub template: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AtstartConfig {
    /// Loads from `ATSTART_*` environment variables, falling back to defaults
    fn default() -> Self {
        let makefile = env::var("ATSTART_MAKEFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_MAKEFILE));

        let toolchain = env::var("ATSTART_TOOLCHAIN")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_TOOLCHAIN));

        let template = env::var("ATSTART_TEMPLATE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let log_level = env::var("ATSTART_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            makefile,
            toolchain,
            template,
            log_level,
        }
    }
}

impl AtstartConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationFailed` for empty paths or an unknown log level
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.makefile.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Makefile path must not be empty".to_string(),
            ));
        }

        if self.toolchain.as_os_str().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Toolchain path must not be empty".to_string(),
            ));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }

    /// Text of the toolchain template to render
    pub fn load_template(&self) -> Result<String, ConfigError> {
        match &self.template {
            Some(path) => fs::read_to_string(path).map_err(|source| ConfigError::TemplateRead {
                path: path.clone(),
                source,
            }),
            None => Ok(TOOLCHAIN_TEMPLATE.to_string()),
        }
    }

    /// Converts configuration to a display map for output formatting
    pub fn to_display_map(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();

        map.insert("makefile".to_string(), self.makefile.display().to_string());
        map.insert("toolchain".to_string(), self.toolchain.display().to_string());
        map.insert(
            "template".to_string(),
            self.template
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
        );
        map.insert("log_level".to_string(), self.log_level.clone());

        map
    }
}

impl fmt::Display for AtstartConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Atstart Configuration:")?;
        writeln!(f, "  Makefile: {}", self.makefile.display())?;
        writeln!(f, "  Toolchain: {}", self.toolchain.display())?;
        match &self.template {
            Some(path) => writeln!(f, "  Template: {}", path.display())?,
            None => writeln!(f, "  Template: built-in")?,
        }
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
