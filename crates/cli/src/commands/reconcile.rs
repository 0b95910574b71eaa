//! `reconcile` and `attach` command implementations.

use anyhow::Result;
use contracts::ToolConfig;
use session_store::{attach_labels, reconcile, ReconcilePolicy, StoreError};

use super::{library_root, print_json, resolve_session};
use crate::cli::{AttachArgs, SessionArgs};

/// Execute the `reconcile` command
pub fn run_reconcile(args: &SessionArgs, config: &ToolConfig) -> Result<()> {
    let folder = resolve_session(&args.session, &library_root(&args.library, config))?;
    let policy = ReconcilePolicy::from(&config.reconcile);

    match reconcile(&folder, &policy) {
        Ok(report) => {
            if args.json {
                print_json(&report)?;
            } else {
                println!("✓ Synced: {}", folder.display());
                println!("   ├─ Video: {:.3}s", report.mov_length);
                println!(
                    "   ├─ Motion: {} samples, {:.3}s..{:.3}s",
                    report.json_length, report.first_motion_timestamp, report.last_motion_timestamp
                );
                println!(
                    "   └─ Tolerance: {:.3}s, max start offset {:.3}s",
                    policy.duration_tolerance_s, policy.max_start_offset_s
                );
            }
            Ok(())
        }
        Err(StoreError::ReconcileFailed { reasons, .. }) if !args.json => {
            println!("✗ Not synced: {}", folder.display());
            for (i, reason) in reasons.iter().enumerate() {
                let prefix = if i + 1 == reasons.len() { "└─" } else { "├─" };
                println!("   {} {}", prefix, reason);
            }
            anyhow::bail!("reconciliation failed")
        }
        Err(e) => Err(e.into()),
    }
}

/// Execute the `attach` command
pub fn run_attach(args: &AttachArgs, config: &ToolConfig) -> Result<()> {
    let folder = resolve_session(&args.session, &library_root(&args.library, config))?;
    let manifest = attach_labels(&folder, &args.csv)?;

    println!("✓ Attached {} to {}", args.csv.display(), folder.display());
    for csv in &manifest.csvs {
        println!(
            "   - {} ({} rows, {} labelled, labels {:?})",
            csv.path, csv.number_of_rows, csv.number_of_labelled_rows, csv.labels
        );
    }
    Ok(())
}
