use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "ExerciseRx";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const DB_FILE_NAME: &str = "exercise_medicine.db";

/// Overrides the storage file location when set.
pub const DB_PATH_ENV: &str = "EXERCISE_RX_DB";

/// Get the application data directory
/// (platform data dir, or the working directory when there is none)
pub fn app_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Storage file location: `$EXERCISE_RX_DB` if set and non-empty,
/// otherwise `<data dir>/ExerciseRx/exercise_medicine.db`.
pub fn database_path() -> PathBuf {
    resolve_database_path(std::env::var_os(DB_PATH_ENV).map(PathBuf::from))
}

fn resolve_database_path(overridden: Option<PathBuf>) -> PathBuf {
    match overridden {
        Some(path) if !path.as_os_str().is_empty() => path,
        _ => app_data_dir().join(DB_FILE_NAME),
    }
}

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "exercise_rx=info,exercise_rx_lib=info"
}
