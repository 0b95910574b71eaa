//! `validate-config` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::ToolConfig;
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<ToolConfig>,
}

/// Execute the `validate-config` command
pub fn run_validate(args: &ValidateArgs, path: &Path) -> Result<()> {
    info!(config = %path.display(), "Validating configuration");

    let result = validate_config(path);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn validate_config(path: &Path) -> ValidationResult {
    let config_path = path.display().to_string();

    if !path.exists() {
        return ValidationResult {
            valid: false,
            config_path,
            error: Some(format!("File not found: {}", path.display())),
            warnings: None,
            config: None,
        };
    }

    match config_loader::ConfigLoader::load_from_path(path) {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                config: Some(config),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            config: None,
        },
    }
}

/// Non-fatal issues
fn collect_warnings(config: &ToolConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.recording.root == config.library.root {
        warnings.push(
            "recording.root and library.root are the same directory - imports copy in place"
                .to_string(),
        );
    }

    if config.recording.sample_rate_hz > 1000.0 {
        warnings.push(format!(
            "recording.sample_rate_hz = {} is above what motion sources typically deliver",
            config.recording.sample_rate_hz
        ));
    }

    if config.reconcile.duration_tolerance_s == 0.0 {
        warnings.push(
            "reconcile.duration_tolerance_s is 0 - only exact length matches will sync"
                .to_string(),
        );
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref config) = result.config {
            println!("\n  Recording root: {}", config.recording.root.display());
            println!("  Sample rate: {} Hz", config.recording.sample_rate_hz);
            println!("  Library root: {}", config.library.root.display());
            println!(
                "  Reconcile: tolerance {}s, max start offset {}s",
                config.reconcile.duration_tolerance_s, config.reconcile.max_start_offset_s
            );
            println!(
                "  Logging: {} ({})",
                config.logging.level, config.logging.format
            );
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
