//! Configuration system for the `studyflow` CLI.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/studyflow/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;

use studyflow_model::{DateFormat, TimeFormat};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    storage: StorageFileConfig,
    display: DisplayFileConfig,
}

/// `[storage]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct StorageFileConfig {
    data_dir: Option<String>,
}

/// `[display]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct DisplayFileConfig {
    time_format: Option<TimeFormat>,
    date_format: Option<DateFormat>,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// User ID the session is scoped to.
    pub user: String,
    /// Directory for local store snapshots; `None` means in-memory only.
    pub data_dir: Option<PathBuf>,
    /// Clock style for displayed times.
    pub time_format: TimeFormat,
    /// Ordering style for displayed dates.
    pub date_format: DateFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user: "local".to_string(),
            data_dir: None,
            time_format: TimeFormat::default(),
            date_format: DateFormat::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration by merging CLI args and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. Otherwise the default path
    /// (`~/.config/studyflow/config.toml`) is tried and silently ignored
    /// if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve an `AppConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default. Separated from `load()` to enable
    /// unit testing without CLI parsing.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();
        let data_dir = if cli.in_memory {
            None
        } else {
            cli.data_dir
                .clone()
                .or_else(|| file.storage.data_dir.clone().map(PathBuf::from))
                .or_else(default_data_dir)
        };
        Self {
            user: cli.user.clone().unwrap_or(defaults.user),
            data_dir,
            time_format: file.display.time_format.unwrap_or(defaults.time_format),
            date_format: file.display.date_format.unwrap_or(defaults.date_format),
        }
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Offline-first student task organizer")]
pub struct CliArgs {
    /// User ID to scope this session to.
    #[arg(long, env = "STUDYFLOW_USER")]
    pub user: Option<String>,

    /// Directory for local store snapshots
    /// (default: `~/.local/share/studyflow`).
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Keep local stores in memory only; nothing is written to disk.
    #[arg(long)]
    pub in_memory: bool,

    /// Path to config file (default: `~/.config/studyflow/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "STUDYFLOW_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/studyflow.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands.
#[derive(clap::Subcommand, Debug, Clone)]
pub enum Command {
    /// List tasks with their subjects and projects.
    Tasks,
    /// Add a task.
    AddTask {
        /// Task name.
        name: String,
        /// Free-form description.
        #[arg(long, default_value = "")]
        description: String,
        /// Subject ID.
        #[arg(long)]
        subject: Option<String>,
        /// Project ID.
        #[arg(long)]
        project: Option<String>,
        /// Priority: high, medium, or low.
        #[arg(long)]
        priority: Option<String>,
        /// Start date (`YYYY-MM-DD`).
        #[arg(long)]
        start: Option<String>,
        /// Due date (`YYYY-MM-DD`).
        #[arg(long)]
        due: Option<String>,
        /// Due time (`HH:MM`); requires a due date.
        #[arg(long)]
        time: Option<String>,
    },
    /// Mark a task completed.
    Done {
        /// Task ID.
        id: String,
    },
    /// Delete a task.
    RemoveTask {
        /// Task ID.
        id: String,
    },
    /// List subjects.
    Subjects,
    /// Add a subject.
    AddSubject {
        /// Subject name.
        name: String,
        /// Semester label, e.g. "Fall 2026".
        #[arg(long, default_value = "")]
        semester: String,
        /// Display color.
        #[arg(long, default_value = "")]
        color: String,
    },
    /// Archive a subject (soft delete).
    ArchiveSubject {
        /// Subject ID.
        id: String,
    },
    /// Delete a subject; its tasks and projects keep existing.
    RemoveSubject {
        /// Subject ID.
        id: String,
    },
    /// List projects with their subjects.
    Projects,
    /// Add a project.
    AddProject {
        /// Project name.
        name: String,
        /// Subject IDs (repeatable).
        #[arg(long = "subject")]
        subjects: Vec<String>,
        /// Due date (`YYYY-MM-DD`).
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a project; its tasks keep existing.
    RemoveProject {
        /// Project ID.
        id: String,
    },
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn default_data_dir() -> Option<PathBuf> {
    dirs::data_dir().map(|d| d.join("studyflow"))
}

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and a missing
/// file is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            // No config dir available — use defaults.
            return Ok(ConfigFile::default());
        };
        config_dir.join("studyflow").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
