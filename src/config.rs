use std::env;
use std::path::PathBuf;

use crate::logging::LogConfig;

pub const DB_PATH_ENV: &str = "CUSTOMER_STORE_DB";
pub const LOG_FILE_ENV: &str = "CUSTOMER_STORE_LOG_FILE";
pub const LOG_LEVEL_ENV: &str = "CUSTOMER_STORE_LOG_LEVEL";
pub const CONSOLE_ENV: &str = "CUSTOMER_STORE_CONSOLE";

/// Customer store configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite database file, created on first connect
    pub db_path: PathBuf,
    /// Print a human-readable line for every operation (stdout unless the
    /// store is given another writer)
    pub console: bool,
    /// Process-wide log sink, applied by the first store constructed
    pub log: LogConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("database.db"),
            console: true,
            log: LogConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Create a config for the given database path with default logging
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    pub fn with_console(mut self, console: bool) -> Self {
        self.console = console;
        self
    }

    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Build a config from `CUSTOMER_STORE_*` environment variables,
    /// falling back to the defaults for anything unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(path) = lookup(DB_PATH_ENV) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(file) = lookup(LOG_FILE_ENV) {
            config.log.file = if file.is_empty() {
                None
            } else {
                Some(PathBuf::from(file))
            };
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV) {
            config.log.level = level;
        }
        if let Some(console) = lookup(CONSOLE_ENV) {
            config.console = !matches!(
                console.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_the_demo_layout() {
        let config = StoreConfig::default();
        assert_eq!(config.db_path, PathBuf::from("database.db"));
        assert!(config.console);
        assert_eq!(config.log.file, Some(PathBuf::from("db.log")));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn env_overrides_each_field() {
        let config = StoreConfig::from_lookup(lookup_from(&[
            (DB_PATH_ENV, "/tmp/customers.db"),
            (LOG_FILE_ENV, "/tmp/customers.log"),
            (LOG_LEVEL_ENV, "warn"),
            (CONSOLE_ENV, "false"),
        ]));
        assert_eq!(config.db_path, PathBuf::from("/tmp/customers.db"));
        assert_eq!(config.log.file, Some(PathBuf::from("/tmp/customers.log")));
        assert_eq!(config.log.level, "warn");
        assert!(!config.console);
    }

    #[test]
    fn empty_log_file_disables_file_sink() {
        let config = StoreConfig::from_lookup(lookup_from(&[(LOG_FILE_ENV, "")]));
        assert_eq!(config.log.file, None);
        assert!(config.console);
    }

    #[test]
    fn builder_keeps_unrelated_fields() {
        let config = StoreConfig::new("other.db")
            .with_console(false)
            .with_log(LogConfig::disabled());
        assert_eq!(config.db_path, PathBuf::from("other.db"));
        assert!(!config.console);
        assert_eq!(config.log.file, None);
    }
}
