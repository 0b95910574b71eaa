//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `ToolConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("session-sync.toml")).unwrap();
//! println!("Library: {}", config.library.root.display());
//! ```

mod parser;
mod validator;

pub use contracts::ToolConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<ToolConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load configuration from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(content: &str, format: ConfigFormat) -> Result<ToolConfig, ContractError> {
        let config = parser::parse(content, format)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate an already-built configuration
    ///
    /// Used after CLI flags have been layered over a loaded file.
    pub fn validate(config: &ToolConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize ToolConfig to TOML string
    pub fn to_toml(config: &ToolConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize ToolConfig to JSON string
    pub fn to_json(config: &ToolConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }

    /// Read configuration file content
    fn read_file(path: &Path) -> Result<String, ContractError> {
        Ok(std::fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_TOML: &str = r#"
[recording]
root = "/data/recordings"
sample_rate_hz = 100.0

[library]
root = "/data/library"

[reconcile]
duration_tolerance_s = 0.5
max_start_offset_s = 2.0

[logging]
level = "debug"
format = "json"
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(FULL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.recording.sample_rate_hz, 100.0);
        assert_eq!(config.library.root, Path::new("/data/library"));
        assert_eq!(config.reconcile.max_start_offset_s, 2.0);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = ConfigLoader::load_from_str("", ConfigFormat::Toml).unwrap();
        assert_eq!(config, ToolConfig::default());
        assert_eq!(config.recording.sample_rate_hz, 200.0);
        assert_eq!(config.reconcile.duration_tolerance_s, 1.0);
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(FULL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_round_trip_json() {
        let config = ConfigLoader::load_from_str(FULL_TOML, ConfigFormat::Toml).unwrap();
        let json = ConfigLoader::to_json(&config).unwrap();
        let config2 = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[recording]
sample_rate_hz = 0.0
"#;
        let result = ConfigLoader::load_from_str(content, ConfigFormat::Toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("sample_rate_hz"));
    }

    #[test]
    fn test_load_from_path_detects_format() {
        let dir = tempfile::tempdir().unwrap();

        let path = dir.path().join("tool.json");
        std::fs::write(&path, r#"{ "library": { "root": "lib" } }"#).unwrap();
        let config = ConfigLoader::load_from_path(&path).unwrap();
        assert_eq!(config.library.root, Path::new("lib"));

        let yaml = dir.path().join("tool.yaml");
        std::fs::write(&yaml, "library: {}").unwrap();
        let err = ConfigLoader::load_from_path(&yaml).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }
}
