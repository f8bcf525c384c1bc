//! Application configuration loaded from environment variables.

/// Client configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `DATABASE_URL` — PostgreSQL connection string (no default; required by
///   the catalog maintenance commands)
/// - `SNAPSHOT_DIR` — directory for local snapshots (default: `".grocer"`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub snapshot_dir: String,
    pub log_level: String,
}

impl Config {
    /// Loads configuration from environment variables, falling back to
    /// defaults.
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            snapshot_dir: std::env::var("SNAPSHOT_DIR").unwrap_or_else(|_| ".grocer".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            snapshot_dir: ".grocer".to_string(),
            log_level: "info".to_string(),
        }
    }
}
