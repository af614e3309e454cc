mod config;

pub use config::{Config, TrendConfig};

use std::path::PathBuf;

/// Returns `~/.config/focus-velocity[-dev]/` based on FOCUS_VELOCITY_ENV.
///
/// Set FOCUS_VELOCITY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("FOCUS_VELOCITY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("focus-velocity-dev")
    } else {
        base_dir.join("focus-velocity")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
