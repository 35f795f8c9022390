//! NovaDE directory resolution, following the XDG base directory layout
//! through `directories-next`.

use crate::error::ConfigError;
use directories_next::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "NovaDE";
const APPLICATION: &str = "NovaDE";

/// File name of the launcher configuration inside the NovaDE config directory.
pub const CONFIG_FILE_NAME: &str = "launcher.toml";

/// NovaDE configuration directory, e.g. `~/.config/NovaDE`.
pub fn get_app_config_dir() -> Result<PathBuf, ConfigError> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| ConfigError::DirectoryUnavailable {
            dir_type: "App Config".to_string(),
        })
}

/// NovaDE state directory, used for log files.
///
/// Uses `$XDG_STATE_HOME` when set, otherwise the platform's local data
/// directory (`directories-next` has no state directory accessor).
pub fn get_app_state_dir() -> Result<PathBuf, ConfigError> {
    let base = match std::env::var_os("XDG_STATE_HOME") {
        Some(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => BaseDirs::new().map(|dirs| dirs.data_local_dir().to_path_buf()),
    };
    base.map(|base| base.join(ORGANIZATION).join(APPLICATION))
        .ok_or_else(|| ConfigError::DirectoryUnavailable {
            dir_type: "App State".to_string(),
        })
}

/// Default location of `launcher.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    get_app_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}
