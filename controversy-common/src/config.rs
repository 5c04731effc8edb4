//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "CONTROVERSY_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "controversy.db";

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default
pub fn resolve_root_folder(cli_arg: Option<&Path>, env_var_name: &str) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Ok(config_path) = config_file_path() {
        match root_folder_from_config(&config_path) {
            Ok(Some(root)) => return root,
            Ok(None) => {}
            Err(e) => tracing::warn!("Ignoring config file {}: {}", config_path.display(), e),
        }
    }

    default_root_folder()
}

/// Read the `root_folder` key from a TOML config file
///
/// Returns `Ok(None)` when the file parses but does not set the key.
pub fn root_folder_from_config(config_path: &Path) -> Result<Option<PathBuf>> {
    let content = std::fs::read_to_string(config_path)?;
    let config: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid TOML in {}: {}", config_path.display(), e)))?;

    Ok(config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from))
}

/// Path to the database file for a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Platform config file location (`<config dir>/controversy/config.toml`)
fn config_file_path() -> Result<PathBuf> {
    let path = dirs::config_dir()
        .map(|d| d.join("controversy").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("controversy"))
        .unwrap_or_else(|| PathBuf::from("./controversy_data"))
}
