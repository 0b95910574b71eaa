//! `list`, `info` and `remove` command implementations.

use anyhow::{Context, Result};
use contracts::{SessionManifest, ToolConfig, TrackingState};
use serde::Serialize;
use session_store::{list_sessions, remove_session, scan_session_dir, ManifestStore, SessionSummary};
use tracing::info;

use super::{library_root, print_json, resolve_session};
use crate::cli::{ListArgs, RemoveArgs, SessionArgs};

/// Execute the `list` command
pub fn run_list(args: &ListArgs, config: &ToolConfig) -> Result<()> {
    let root = library_root(&args.library, config);
    let sessions = list_sessions(&root)
        .with_context(|| format!("Failed to read library {}", root.display()))?;

    if args.json {
        return print_json(&sessions);
    }

    if sessions.is_empty() {
        println!("No sessions in {}", root.display());
        return Ok(());
    }

    println!("📚 Library {} ({} sessions)", root.display(), sessions.len());
    for (i, session) in sessions.iter().enumerate() {
        let prefix = if i + 1 == sessions.len() { "└─" } else { "├─" };
        println!(
            "   {} {:<20} {:<10} {}",
            prefix,
            session.display_name,
            session.state.as_str(),
            detail(session)
        );
    }
    Ok(())
}

fn detail(session: &SessionSummary) -> String {
    if let Some(problem) = &session.problem {
        return format!("⚠ {problem}");
    }
    match &session.manifest {
        Some(m) if m.synced => format!(
            "{:.1}s, {} samples, {} label files",
            m.mov_length,
            m.json_length,
            m.csvs.len()
        ),
        Some(m) => format!("{} label files", m.csvs.len()),
        None => String::new(),
    }
}

/// Session details for JSON output
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionInfo {
    name: String,
    folder: String,
    state: TrackingState,
    #[serde(skip_serializing_if = "Option::is_none")]
    video: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    motion: Option<String>,
    label_files: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<SessionManifest>,
}

/// Execute the `info` command
pub fn run_info(args: &SessionArgs, config: &ToolConfig) -> Result<()> {
    let folder = resolve_session(&args.session, &library_root(&args.library, config))?;
    let files = scan_session_dir(&folder)?;
    let manifest = ManifestStore::try_load(&folder)?;

    let display = |p: &std::path::PathBuf| p.display().to_string();
    let info = SessionInfo {
        name: files.name().unwrap_or(&args.session).to_string(),
        folder: folder.display().to_string(),
        state: TrackingState::from_manifest(manifest.as_ref()),
        video: files.video.as_ref().map(display),
        motion: files.motion.as_ref().map(display),
        label_files: files.labels.iter().map(display).collect(),
        manifest,
    };

    if args.json {
        return print_json(&info);
    }

    println!("🎬 Session {} ({})", contracts::display_name(&info.name), info.state);
    println!("   ├─ Folder: {}", info.folder);
    println!("   ├─ Video: {}", info.video.as_deref().unwrap_or("(missing)"));
    println!("   ├─ Motion: {}", info.motion.as_deref().unwrap_or("(missing)"));
    match &info.manifest {
        Some(m) => {
            println!("   ├─ Imported: {} from {}", m.imported_at, m.source_path);
            println!(
                "   ├─ Lengths: video {:.3}s, {} samples, first at {:.3}s",
                m.mov_length, m.json_length, m.first_motion_timestamp
            );
            println!("   └─ Label files ({}):", m.csvs.len());
            for csv in &m.csvs {
                println!(
                    "        - {} [{:.2}s..{:.2}s] {}/{} rows labelled {:?}",
                    csv.path,
                    csv.mov_start_time,
                    csv.mov_end_time,
                    csv.number_of_labelled_rows,
                    csv.number_of_rows,
                    csv.labels
                );
            }
        }
        None => println!("   └─ Not imported"),
    }
    Ok(())
}

/// Execute the `remove` command
pub fn run_remove(args: &RemoveArgs, config: &ToolConfig) -> Result<()> {
    let root = library_root(&args.library, config);
    if !args.yes {
        let folder = session_store::session_folder(&root, &args.session)?;
        anyhow::bail!(
            "refusing to delete {} without --yes",
            folder.display()
        );
    }

    let folder = remove_session(&root, &args.session)?;
    info!(folder = %folder.display(), "Session removed");
    println!("✓ Removed {}", folder.display());
    Ok(())
}
