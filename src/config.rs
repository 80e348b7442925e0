//! Runtime configuration
//!
//! Read from environment variables:
//! - `WELLNESS_DATABASE_PATH`: SQLite file (default `<project>/data/wellness.db`)
//! - `WELLNESS_USER_ID`: user for tool calls that don't name one (default `default`)

use std::path::PathBuf;

/// Fallback user ID
pub const DEFAULT_USER_ID: &str = "default";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub default_user_id: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_path: std::env::var("WELLNESS_DATABASE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_database_path()),
            default_user_id: std::env::var("WELLNESS_USER_ID")
                .ok()
                .filter(|id| !id.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_USER_ID.to_string()),
        }
    }
}

/// `data/wellness.db` next to the project root, found from the executable
fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("wellness.db");
    path
}
