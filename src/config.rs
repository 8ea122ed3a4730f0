use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Labforma";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset
pub fn default_log_filter() -> String {
    "info,labforma=debug".to_string()
}

/// Get the application data directory
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("Labforma")
}

/// Get the default database path
pub fn database_path() -> PathBuf {
    app_data_dir().join("labforma.db")
}
