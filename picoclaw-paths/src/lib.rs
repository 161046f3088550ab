//! XDG Base Directory paths for picoclaw.
//!
//! CLI tools should use XDG paths for cross-platform consistency,
//! not platform-native paths. This matches tools like gh, docker, kubectl.

use std::path::{Path, PathBuf};

/// Environment variable that overrides the credential store location.
pub const AUTH_STORE_ENV: &str = "PICOCLAW_AUTH_STORE";

/// Get the picoclaw config directory.
///
/// Returns `$XDG_CONFIG_HOME/picoclaw` if set, otherwise `~/.config/picoclaw`.
/// This is where the user config and the credential store live.
///
/// # Examples
///
/// ```
/// use picoclaw_paths::config_dir;
///
/// let config = config_dir();
/// let user_config = config.join("config.toml");
/// ```
pub fn config_dir() -> PathBuf {
    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg_config).join("picoclaw")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".config/picoclaw")
    } else {
        PathBuf::from(".config/picoclaw")
    }
}

/// Get the picoclaw data directory.
///
/// Returns `$XDG_DATA_HOME/picoclaw` if set, otherwise `~/.local/share/picoclaw`.
pub fn data_dir() -> PathBuf {
    if let Ok(xdg_data) = std::env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg_data).join("picoclaw")
    } else if let Some(home) = dirs::home_dir() {
        home.join(".local/share/picoclaw")
    } else {
        PathBuf::from(".local/share/picoclaw")
    }
}

/// Default agent workspace, used when the config does not name one.
pub fn default_workspace() -> PathBuf {
    data_dir().join("workspace")
}

/// Path of the persisted credential store.
///
/// `$PICOCLAW_AUTH_STORE` wins when set, otherwise `<config_dir>/auth.json`.
pub fn auth_store_path() -> PathBuf {
    match std::env::var(AUTH_STORE_ENV) {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => config_dir().join("auth.json"),
    }
}

/// Expand a leading `~` to the home directory.
///
/// Paths without a leading `~` (and `~user` forms) are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/")
    };

    match (rest, dirs::home_dir()) {
        (Some(rest), Some(home)) if rest.is_empty() => home,
        (Some(rest), Some(home)) => home.join(Path::new(rest)),
        _ => PathBuf::from(path),
    }
}
