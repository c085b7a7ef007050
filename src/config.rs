//! Configuration management
//!
//! Settings are layered: built-in defaults, then an optional `.toml`, `.yaml`
//! or `.json` file, then `BIOALGOS_*` environment variables, then command line
//! flags. The configuration is validated after every layer.

use crate::error::{BioAlgosError, Result};
use crate::genome::DEFAULT_EXTENSION;
use crate::logging::{LogLevel, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::debug;
use validator::{Validate, ValidationError};

/// Environment variable naming the genomes directory
pub const ENV_GENOMES_DIR: &str = "BIOALGOS_GENOMES_DIR";
/// Environment variable overriding the log level
pub const ENV_LOG_LEVEL: &str = "BIOALGOS_LOG_LEVEL";
/// Environment variable switching JSON logs on or off
pub const ENV_JSON_LOGS: &str = "BIOALGOS_JSON_LOGS";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate(nested)]
    pub logging: LoggingConfig,

    #[validate(nested)]
    pub session: SessionSettings,
}

/// Settings for genome discovery and result display
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct SessionSettings {
    /// Directory scanned for genome files
    pub genomes_dir: PathBuf,

    /// Extension of genome files, without the dot
    #[validate(length(min = 1, max = 16), custom(function = "validate_extension"))]
    pub file_extension: String,

    /// Maximum number of match offsets printed (0 = all)
    #[validate(range(max = 10_000_000))]
    pub max_display_positions: usize,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            genomes_dir: PathBuf::from("genomes"),
            file_extension: DEFAULT_EXTENSION.to_string(),
            max_display_positions: 0,
        }
    }
}

fn validate_extension(extension: &str) -> std::result::Result<(), ValidationError> {
    if extension.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("file_extension_alphanumeric"))
    }
}

/// Values given on the command line; `None` keeps the current setting
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub genomes_dir: Option<PathBuf>,
    pub log_level: Option<LogLevel>,
    pub json_logs: bool,
}

/// Configuration manager
#[derive(Debug, Default)]
pub struct ConfigManager {
    config: AppConfig,
}

impl ConfigManager {
    /// Create a new configuration manager with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: AppConfig = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::from_str(&content)
                .map_err(|e| BioAlgosError::config(format!("TOML parse error: {}", e)))?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)
                .map_err(|e| BioAlgosError::config(format!("YAML parse error: {}", e)))?,
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| BioAlgosError::config(format!("JSON parse error: {}", e)))?,
            _ => {
                return Err(BioAlgosError::config(
                    "Unsupported config file format. Use .toml, .yaml, .yml, or .json",
                ));
            }
        };

        config
            .validate()
            .map_err(|e| BioAlgosError::config(format!("Configuration validation failed: {}", e)))?;

        debug!(path = %path.display(), "Loaded configuration file");
        Ok(Self { config })
    }

    /// Merge `BIOALGOS_*` environment variables into the current config
    pub fn load_from_env(&mut self) -> Result<()> {
        self.apply_env(|name| env::var(name).ok())
    }

    /// Merge variables supplied by `lookup`, keyed by environment variable name
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_GENOMES_DIR) {
            self.config.session.genomes_dir = PathBuf::from(dir);
        }

        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.config.logging.level = level.parse()?;
        }

        if let Some(json_logs) = lookup(ENV_JSON_LOGS) {
            self.config.logging.json_format = json_logs
                .trim()
                .parse()
                .map_err(|e| BioAlgosError::config(format!("Invalid {}: {}", ENV_JSON_LOGS, e)))?;
        }

        self.validate_current("env override")
    }

    /// Apply command line values on top of everything else
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) -> Result<()> {
        if let Some(dir) = &overrides.genomes_dir {
            self.config.session.genomes_dir = dir.clone();
        }
        if let Some(level) = overrides.log_level {
            self.config.logging.level = level;
        }
        if overrides.json_logs {
            self.config.logging.json_format = true;
        }

        self.validate_current("command line override")
    }

    /// Get current configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Get mutable configuration
    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }

    /// Consume the manager, returning the final configuration
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    /// Save current configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => toml::to_string_pretty(&self.config)
                .map_err(|e| BioAlgosError::config(format!("TOML serialize error: {}", e)))?,
            Some("yaml") | Some("yml") => serde_yaml::to_string(&self.config)
                .map_err(|e| BioAlgosError::config(format!("YAML serialize error: {}", e)))?,
            Some("json") => serde_json::to_string_pretty(&self.config)
                .map_err(|e| BioAlgosError::config(format!("JSON serialize error: {}", e)))?,
            _ => {
                return Err(BioAlgosError::config(
                    "Unsupported config file format. Use .toml, .yaml, .yml, or .json",
                ));
            }
        };

        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate_current(&self, stage: &str) -> Result<()> {
        self.config
            .validate()
            .map_err(|e| BioAlgosError::config(format!("Configuration validation failed after {}: {}", stage, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.genomes_dir, PathBuf::from("genomes"));
        assert_eq!(config.session.file_extension, "txt");
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();

        let toml_str = toml::to_string(&config).unwrap();
        let _: AppConfig = toml::from_str(&toml_str).unwrap();

        let json_str = serde_json::to_string(&config).unwrap();
        let _: AppConfig = serde_json::from_str(&json_str).unwrap();

        let yaml_str = serde_yaml::to_string(&config).unwrap();
        let _: AppConfig = serde_yaml::from_str(&yaml_str).unwrap();
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[session]").unwrap();
        writeln!(file, "genomes_dir = \"data/genomes\"").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "level = \"debug\"").unwrap();
        file.flush().unwrap();

        let manager = ConfigManager::load_from_file(file.path()).unwrap();
        assert_eq!(manager.config().session.genomes_dir, PathBuf::from("data/genomes"));
        assert_eq!(manager.config().session.file_extension, "txt");
        assert_eq!(manager.config().logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_config_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = ConfigManager::new();
        manager.config_mut().session.max_display_positions = 50;

        for name in ["config.toml", "config.yaml", "config.json"] {
            let path = temp_dir.path().join(name);
            manager.save_to_file(&path).unwrap();
            let loaded = ConfigManager::load_from_file(&path).unwrap();
            assert_eq!(loaded.config().session.max_display_positions, 50);
        }
    }

    #[test]
    fn test_unsupported_format() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            ConfigManager::load_from_file(file.path()),
            Err(BioAlgosError::Config(_))
        ));
        assert!(ConfigManager::new().save_to_file("config.ini").is_err());
    }

    #[test]
    fn test_invalid_file_rejected() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"session": {{"file_extension": "t x t"}}}}"#).unwrap();
        file.flush().unwrap();

        assert!(ConfigManager::load_from_file(file.path()).is_err());
    }

    #[test]
    fn test_environment_variable_override() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENV_GENOMES_DIR, "/data/genomes"),
            (ENV_LOG_LEVEL, "debug"),
            (ENV_JSON_LOGS, "true"),
        ]);

        let mut manager = ConfigManager::new();
        manager
            .apply_env(|name| vars.get(name).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(manager.config().session.genomes_dir, PathBuf::from("/data/genomes"));
        assert_eq!(manager.config().logging.level, LogLevel::Debug);
        assert!(manager.config().logging.json_format);
    }

    #[test]
    fn test_invalid_environment_values() {
        let mut manager = ConfigManager::new();
        assert!(manager.apply_env(|name| (name == ENV_LOG_LEVEL).then(|| "chatty".to_string())).is_err());
        assert!(manager.apply_env(|name| (name == ENV_JSON_LOGS).then(|| "maybe".to_string())).is_err());
    }

    #[test]
    fn test_command_line_overrides() {
        let mut manager = ConfigManager::new();
        let overrides = ConfigOverrides {
            genomes_dir: Some(PathBuf::from("other")),
            log_level: Some(LogLevel::Trace),
            json_logs: true,
        };
        manager.apply_overrides(&overrides).unwrap();

        let config = manager.into_config();
        assert_eq!(config.session.genomes_dir, PathBuf::from("other"));
        assert_eq!(config.logging.level, LogLevel::Trace);
        assert!(config.logging.json_format);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();
        assert!(config.validate().is_ok());

        config.session.file_extension = String::new();
        assert!(config.validate().is_err());

        config.session.file_extension = ".txt".to_string();
        assert!(config.validate().is_err());

        config.session.file_extension = "fa".to_string();
        config.session.max_display_positions = 20_000_000;
        assert!(config.validate().is_err());
    }
}
