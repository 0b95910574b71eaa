//! Configuration validation
//!
//! Rules:
//! - recording.sample_rate_hz > 0 and finite
//! - recording.root / library.root not empty
//! - reconcile tolerances >= 0
//! - logging.level / logging.format are known values

use contracts::{ContractError, ToolConfig};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: [&str; 3] = ["json", "pretty", "compact"];

/// Validate a ToolConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &ToolConfig) -> Result<(), ContractError> {
    validate_recording(config)?;
    validate_library(config)?;
    validate_reconcile(config)?;
    validate_logging(config)?;
    Ok(())
}

fn validate_recording(config: &ToolConfig) -> Result<(), ContractError> {
    let rate = config.recording.sample_rate_hz;
    if !rate.is_finite() || rate <= 0.0 {
        return Err(ContractError::config_validation(
            "recording.sample_rate_hz",
            format!("sample_rate_hz must be > 0, got {rate}"),
        ));
    }

    if config.recording.root.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "recording.root",
            "recording root cannot be empty",
        ));
    }
    Ok(())
}

fn validate_library(config: &ToolConfig) -> Result<(), ContractError> {
    if config.library.root.as_os_str().is_empty() {
        return Err(ContractError::config_validation(
            "library.root",
            "library root cannot be empty",
        ));
    }
    Ok(())
}

fn validate_reconcile(config: &ToolConfig) -> Result<(), ContractError> {
    let reconcile = &config.reconcile;
    for (field, value) in [
        ("reconcile.duration_tolerance_s", reconcile.duration_tolerance_s),
        ("reconcile.max_start_offset_s", reconcile.max_start_offset_s),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(ContractError::config_validation(
                field,
                format!("tolerance must be >= 0, got {value}"),
            ));
        }
    }
    Ok(())
}

fn validate_logging(config: &ToolConfig) -> Result<(), ContractError> {
    let logging = &config.logging;
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        return Err(ContractError::config_validation(
            "logging.level",
            format!(
                "unknown log level '{}', expected one of {:?}",
                logging.level, LOG_LEVELS
            ),
        ));
    }
    if !LOG_FORMATS.contains(&logging.format.to_lowercase().as_str()) {
        return Err(ContractError::config_validation(
            "logging.format",
            format!(
                "unknown log format '{}', expected one of {:?}",
                logging.format, LOG_FORMATS
            ),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate(&ToolConfig::default()).is_ok());
    }

    #[test]
    fn test_zero_sample_rate_rejected() {
        let mut config = ToolConfig::default();
        config.recording.sample_rate_hz = 0.0;
        let err = validate(&config).unwrap_err();
        assert!(matches!(
            err,
            ContractError::ConfigValidation { ref field, .. } if field == "recording.sample_rate_hz"
        ));
    }

    #[test]
    fn test_nan_sample_rate_rejected() {
        let mut config = ToolConfig::default();
        config.recording.sample_rate_hz = f64::NAN;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_empty_roots_rejected() {
        let mut config = ToolConfig::default();
        config.library.root = PathBuf::new();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("library.root"));

        let mut config = ToolConfig::default();
        config.recording.root = PathBuf::new();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_negative_tolerance_rejected() {
        let mut config = ToolConfig::default();
        config.reconcile.max_start_offset_s = -0.1;
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("max_start_offset_s"));
    }

    #[test]
    fn test_zero_tolerance_allowed() {
        let mut config = ToolConfig::default();
        config.reconcile.duration_tolerance_s = 0.0;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_unknown_log_format_rejected() {
        let mut config = ToolConfig::default();
        config.logging.format = "xml".into();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
