//! Platform-specific paths for settings and persisted state.
//!
//! # Directory Structure
//!
//! - **User config**: `~/.config/fxgraph/` (Linux), `~/Library/Application Support/fxgraph/` (macOS), `%APPDATA%\fxgraph\` (Windows)
//! - **Settings file**: `<user config>/settings.toml`
//! - **State store**: `<user config>/state/` unless overridden in settings

use std::path::PathBuf;

use crate::error::ConfigError;

/// Application name used for directory paths.
const APP_NAME: &str = "fxgraph";

/// Settings file name inside the config directory.
pub const SETTINGS_FILE: &str = "settings.toml";

/// Subdirectory holding the default [`FileStore`](crate::FileStore).
const STATE_SUBDIR: &str = "state";

/// Returns the user-specific configuration directory.
///
/// Returns a fallback path if the config directory cannot be determined.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Returns the default settings file path.
pub fn settings_path() -> PathBuf {
    user_config_dir().join(SETTINGS_FILE)
}

/// Returns the default state store directory.
pub fn default_state_dir() -> PathBuf {
    user_config_dir().join(STATE_SUBDIR)
}

/// Ensure the user config directory exists.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_user_config_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_config_dir();
    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    }
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_share_app_dir() {
        let root = user_config_dir();
        assert!(root.ends_with(APP_NAME));
        assert_eq!(settings_path().parent(), Some(root.as_path()));
        assert!(default_state_dir().starts_with(&root));
    }
}
