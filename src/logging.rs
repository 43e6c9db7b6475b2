//! Process-wide log sink for the customer store.
//!
//! Lines carry a timestamp, the emitting component (tracing target), the
//! level, the operation span and the message. The log file is truncated each
//! time the sink is installed, so a log only ever covers one process run.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use tracing::Subscriber;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

/// Day-first, 12-hour clock timestamps.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %I:%M:%S %p";

/// Logging configuration
#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    /// Filter directive (trace, debug, info, warn, error or an EnvFilter string)
    pub level: String,
    /// Log file, overwritten on init. `None` installs nothing.
    pub file: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            file: Some(PathBuf::from("db.log")),
        }
    }
}

impl LogConfig {
    /// A config that leaves the global subscriber untouched
    pub fn disabled() -> Self {
        Self {
            file: None,
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("cannot create log file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid log level {level:?}: {source}")]
    Filter {
        level: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

/// Create (or truncate) the log file, creating parent directories as needed.
pub fn open_log_file(path: &Path) -> Result<File, LogError> {
    let to_err = |source| LogError::File {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_err)?;
    }
    File::create(path).map_err(to_err)
}

/// Build the subscriber described by `config` without installing it.
/// Returns `None` when no log file is configured.
pub fn build_subscriber(
    config: &LogConfig,
) -> Result<Option<impl Subscriber + Send + Sync + 'static>, LogError> {
    let Some(path) = &config.file else {
        return Ok(None);
    };

    let filter = EnvFilter::try_new(&config.level).map_err(|source| LogError::Filter {
        level: config.level.clone(),
        source,
    })?;
    let file = open_log_file(path)?;

    let subscriber = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_timer(ChronoLocal::new(TIMESTAMP_FORMAT.to_string()))
        .with_env_filter(filter)
        .finish();
    Ok(Some(subscriber))
}

/// Install the global subscriber described by `config`.
pub fn init(config: &LogConfig) -> Result<(), LogError> {
    match build_subscriber(config)? {
        Some(subscriber) => tracing::subscriber::set_global_default(subscriber)
            .map_err(|_| LogError::AlreadyInstalled),
        None => Ok(()),
    }
}

static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Install the sink the first time a store is built; later calls are no-ops.
pub(crate) fn ensure_initialized(config: &LogConfig) {
    INITIALIZED.get_or_init(|| {
        if let Err(err) = init(config) {
            eprintln!("customer store logging not installed: {err}");
        }
    });
}
