use std::path::PathBuf;

use directories::ProjectDirs;

/// Environment variable that relocates all steward state.
pub const HOME_ENV: &str = "STEWARD_HOME";

/// Returns the directory holding configuration, the session marker and saved views.
///
/// Resolution order:
/// 1. `STEWARD_HOME` environment variable (if set and non-empty)
/// 2. The platform configuration directory for `steward`
/// 3. Current working directory + `.steward`
pub fn steward_home() -> PathBuf {
    if let Ok(root) = std::env::var(HOME_ENV)
        && !root.trim().is_empty()
    {
        return PathBuf::from(root);
    }

    ProjectDirs::from("", "", "steward")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".steward"))
}

/// Returns the path to the configuration file.
pub fn config_path() -> PathBuf {
    steward_home().join("config.yaml")
}

/// Returns the path to the authentication marker.
pub fn session_path() -> PathBuf {
    steward_home().join("session.json")
}

/// Returns the path to the saved list views.
pub fn views_path() -> PathBuf {
    steward_home().join("views.yaml")
}
