//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Session Sync - record, import and reconcile head-motion sessions
#[derive(Parser, Debug)]
#[command(
    name = "session-sync",
    author,
    version,
    about = "Head-motion session recording and reconciliation",
    long_about = "Records video and head-motion data into session folders, imports them \n\
                  into a library, reconciles video length against motion data and \n\
                  aligns playback positions with motion samples and labels."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "SESSION_SYNC_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (defaults to `logging.format` from the config)
    #[arg(long, value_enum, global = true, env = "SESSION_SYNC_LOG_FORMAT")]
    pub log_format: Option<LogFormat>,

    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "SESSION_SYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a simulated session (mock video + motion source)
    Record(RecordArgs),

    /// Import recorded session folders into the library
    Import(ImportArgs),

    /// List sessions in the library
    List(ListArgs),

    /// Show one session's manifest and files
    Info(SessionArgs),

    /// Reconcile video length against motion data
    Reconcile(SessionArgs),

    /// Attach a label CSV to a session
    Attach(AttachArgs),

    /// Align a playback position with motion samples and labels
    Align(AlignArgs),

    /// Delete a session folder from the library
    Remove(RemoveArgs),

    /// Validate the configuration file without doing anything else
    ValidateConfig(ValidateArgs),
}

/// Arguments for the `record` command
#[derive(Parser, Debug, Clone)]
pub struct RecordArgs {
    /// Recording length in seconds
    #[arg(short, long, default_value = "5")]
    pub duration: f64,

    /// Set the reference frame this many seconds into the recording
    #[arg(long)]
    pub reference_at: Option<f64>,

    /// Override `recording.root`
    #[arg(long, env = "SESSION_SYNC_RECORDING_ROOT")]
    pub root: Option<PathBuf>,

    /// Override `recording.sample_rate_hz`
    #[arg(long)]
    pub sample_rate: Option<f64>,

    /// Output the session result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Library location shared by the desktop commands
#[derive(Parser, Debug, Clone)]
pub struct LibraryArgs {
    /// Override `library.root`
    #[arg(long, env = "SESSION_SYNC_LIBRARY")]
    pub library: Option<PathBuf>,
}

/// Arguments for the `import` command
#[derive(Parser, Debug)]
pub struct ImportArgs {
    /// Session folders to import
    #[arg(required = true)]
    pub sources: Vec<PathBuf>,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `list` command
#[derive(Parser, Debug)]
pub struct ListArgs {
    #[command(flatten)]
    pub library: LibraryArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// A single session of the library
#[derive(Parser, Debug)]
pub struct SessionArgs {
    /// Session folder name (or a path to a session folder)
    pub session: String,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `attach` command
#[derive(Parser, Debug)]
pub struct AttachArgs {
    /// Session folder name (or a path to a session folder)
    pub session: String,

    /// Label CSV to attach
    pub csv: PathBuf,

    #[command(flatten)]
    pub library: LibraryArgs,
}

/// Arguments for the `align` command
#[derive(Parser, Debug)]
pub struct AlignArgs {
    /// Session folder name (or a path to a session folder)
    pub session: String,

    /// Playback position in [0, 1]
    #[arg(short, long, conflicts_with = "time")]
    pub position: Option<f64>,

    /// Playback time in seconds
    #[arg(short, long)]
    pub time: Option<f64>,

    #[command(flatten)]
    pub library: LibraryArgs,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `remove` command
#[derive(Parser, Debug)]
pub struct RemoveArgs {
    /// Session folder name
    pub session: String,

    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,

    #[command(flatten)]
    pub library: LibraryArgs,
}

/// Arguments for the `validate-config` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
