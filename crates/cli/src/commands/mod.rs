//! Command implementations.

mod align;
mod import;
mod library;
mod reconcile;
mod record;
mod validate;

pub use align::run_align;
pub use import::run_import;
pub use library::{run_info, run_list, run_remove};
pub use reconcile::{run_attach, run_reconcile};
pub use record::run_record;
pub use validate::run_validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use contracts::ToolConfig;
use serde::Serialize;

use crate::cli::LibraryArgs;

/// `--library`, else `library.root`
fn library_root(args: &LibraryArgs, config: &ToolConfig) -> PathBuf {
    args.library
        .clone()
        .unwrap_or_else(|| config.library.root.clone())
}

/// Resolve a session argument
///
/// A name resolves inside the library; an existing directory given as a
/// path is used as is.
fn resolve_session(session: &str, root: &Path) -> Result<PathBuf> {
    let as_path = Path::new(session);
    if as_path.components().count() > 1 && as_path.is_dir() {
        return Ok(as_path.to_path_buf());
    }
    Ok(session_store::session_folder(root, session)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_root_override() {
        let config = ToolConfig::default();
        let default = library_root(&LibraryArgs { library: None }, &config);
        assert_eq!(default, PathBuf::from("library"));

        let custom = library_root(
            &LibraryArgs {
                library: Some(PathBuf::from("/data/lib")),
            },
            &config,
        );
        assert_eq!(custom, PathBuf::from("/data/lib"));
    }

    #[test]
    fn test_resolve_session() {
        let root = tempfile::tempdir().unwrap();
        let folder = root.path().join("20240814-090507");
        std::fs::create_dir(&folder).unwrap();

        assert_eq!(resolve_session("20240814-090507", root.path()).unwrap(), folder);
        assert_eq!(
            resolve_session(folder.to_str().unwrap(), Path::new("/elsewhere")).unwrap(),
            folder
        );
        assert!(resolve_session("absent", root.path()).is_err());
    }
}
