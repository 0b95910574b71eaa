//! `import` command implementation.

use anyhow::Result;
use contracts::ToolConfig;
use serde::Serialize;
use session_store::{import_sessions, StoreError};
use tracing::info;

use super::{library_root, print_json};
use crate::cli::ImportArgs;

/// Per-folder import report for JSON output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImportReport {
    source: String,
    imported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    created_manifest: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the `import` command
pub fn run_import(args: &ImportArgs, config: &ToolConfig) -> Result<()> {
    let root = library_root(&args.library, config);
    info!(library = %root.display(), sources = args.sources.len(), "Importing sessions");

    let reports: Vec<ImportReport> = import_sessions(&args.sources, &root)
        .into_iter()
        .map(|(source, result)| {
            let source = source.display().to_string();
            match result {
                Ok(outcome) => ImportReport {
                    source,
                    imported: true,
                    name: Some(outcome.name),
                    created_manifest: Some(outcome.created),
                    missing: Vec::new(),
                    error: None,
                },
                Err(e) => ImportReport {
                    source,
                    imported: false,
                    name: None,
                    created_manifest: None,
                    missing: match &e {
                        StoreError::MissingArtifacts { missing, .. } => {
                            missing.iter().map(ToString::to_string).collect()
                        }
                        _ => Vec::new(),
                    },
                    error: Some(e.to_string()),
                },
            }
        })
        .collect();

    if args.json {
        print_json(&reports)?;
    } else {
        print_reports(&reports);
    }

    let failed = reports.iter().filter(|r| !r.imported).count();
    if failed > 0 {
        anyhow::bail!("{failed} of {} folders failed to import", reports.len());
    }
    Ok(())
}

fn print_reports(reports: &[ImportReport]) {
    for report in reports {
        match (&report.name, &report.error) {
            (Some(name), _) => {
                let note = if report.created_manifest == Some(true) {
                    "new"
                } else {
                    "manifest kept"
                };
                println!("✓ {} -> {} ({})", report.source, name, note);
            }
            (None, Some(error)) => {
                println!("✗ {}", report.source);
                if report.missing.is_empty() {
                    println!("   └─ {}", error);
                } else {
                    for (i, missing) in report.missing.iter().enumerate() {
                        let prefix = if i + 1 == report.missing.len() { "└─" } else { "├─" };
                        println!("   {} missing {}", prefix, missing);
                    }
                }
            }
            (None, None) => {}
        }
    }
}
