//! XDG path resolution for Lumen configuration files.
//!
//! User files live in `$XDG_CONFIG_HOME/lumen` (`~/.config/lumen` when unset).
//! System-wide fallbacks come from `$XDG_CONFIG_DIRS` (`/etc/xdg` when unset).

use std::ffi::{OsStr, OsString};
use std::path::PathBuf;

/// Application directory name under each XDG config root.
pub const APP_DIR_NAME: &str = "lumen";

/// Default configuration script filename.
pub const DEFAULT_SCRIPT_FILENAME: &str = "init.lua";

/// Default host settings filename.
pub const DEFAULT_SETTINGS_FILENAME: &str = "lumen.toml";

/// System config root used when `$XDG_CONFIG_DIRS` is unset.
const DEFAULT_SYSTEM_CONFIG_DIR: &str = "/etc/xdg";

/// User configuration directory, `~/.config/lumen` on Linux.
///
/// Falls back to the current directory if no home can be determined.
pub fn config_home() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

/// Default configuration script path.
pub fn default_script_path() -> PathBuf {
    config_home().join(DEFAULT_SCRIPT_FILENAME)
}

/// Default host settings path.
pub fn default_settings_path() -> PathBuf {
    config_home().join(DEFAULT_SETTINGS_FILENAME)
}

/// Locate `file_name` in the user directory, then in each system directory.
pub fn find_config_file(file_name: &str) -> Option<PathBuf> {
    let system = std::env::var_os("XDG_CONFIG_DIRS");
    search_dirs(config_home(), system.as_deref())
        .into_iter()
        .map(|dir| dir.join(file_name))
        .find(|candidate| candidate.is_file())
}

/// Ordered search directories: `user_dir` first, then each entry of the
/// colon-separated `xdg_config_dirs` joined with [`APP_DIR_NAME`].
///
/// Empty and relative entries are skipped, as the XDG spec requires.
pub fn search_dirs(user_dir: PathBuf, xdg_config_dirs: Option<&OsStr>) -> Vec<PathBuf> {
    let system: OsString = match xdg_config_dirs {
        Some(value) if !value.is_empty() => value.to_os_string(),
        _ => OsString::from(DEFAULT_SYSTEM_CONFIG_DIR),
    };

    let mut roots = vec![user_dir];
    roots.extend(
        std::env::split_paths(&system)
            .filter(|dir| dir.is_absolute())
            .map(|dir| dir.join(APP_DIR_NAME)),
    );
    roots
}
