//! Reading and writing the user config file
//!
//! Settings live in `<config dir>/md2html5/config.json`. Reading is lenient:
//! the CLI always gets usable settings, even from a missing or broken file.

use crate::config::Settings;
use crate::error::{Error, Result, ResultExt};
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "md2html5";
const CONFIG_FILE_NAME: &str = "config.json";
/// Written first, then renamed over the real file
const CONFIG_TEMP_NAME: &str = "config.json.tmp";

// ─────────────────────────────────────────────────────────────────────────────
// Location
// ─────────────────────────────────────────────────────────────────────────────

/// Directory holding the config file.
///
/// - **Windows**: `%APPDATA%\md2html5\`
/// - **macOS**: `~/Library/Application Support/md2html5/`
/// - **Linux**: `$XDG_CONFIG_HOME/md2html5/` or `~/.config/md2html5/`
pub fn get_config_dir() -> Result<PathBuf> {
    let base = dirs::config_dir().ok_or(Error::NoConfigDir)?;
    Ok(base.join(APP_DIR))
}

/// Full path of `config.json`.
pub fn get_config_file_path() -> Result<PathBuf> {
    get_config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

// ─────────────────────────────────────────────────────────────────────────────
// Load
// ─────────────────────────────────────────────────────────────────────────────

/// Settings from the user config file, or the defaults when it cannot be
/// used. Problems are logged as warnings.
pub fn load_config() -> Settings {
    get_config_file_path()
        .and_then(|path| load_config_from_path(&path))
        .unwrap_or_warn_default(Settings::default(), "Ignoring config file")
}

/// Read and sanitize the settings at `path`.
///
/// A missing file or one holding only whitespace means "no overrides".
///
/// # Errors
///
/// `Error::ConfigRead` when the file exists but cannot be read, and
/// `Error::ConfigInvalid` when it is not settings JSON.
pub fn load_config_from_path(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!("No config at {}", path.display());
        return Ok(Settings::default());
    }

    let json = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    if json.trim().is_empty() {
        debug!("Config at {} is blank", path.display());
        return Ok(Settings::default());
    }

    let settings = Settings::from_json_sanitized(&json).map_err(|source| Error::ConfigInvalid {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Loaded settings from {}", path.display());
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Save
// ─────────────────────────────────────────────────────────────────────────────

/// Store `settings` in the user config file and return its path.
pub fn save_config(settings: &Settings) -> Result<PathBuf> {
    let path = get_config_file_path()?;
    save_config_to_path(settings, &path)?;
    Ok(path)
}

/// Store `settings` as pretty JSON at `path`, creating its directory.
///
/// The JSON goes to a sibling temp file that is then renamed over `path`, so
/// an interrupted save never leaves a truncated config behind.
pub fn save_config_to_path(settings: &Settings, path: &Path) -> Result<()> {
    let write_error = |at: &Path, source: Box<dyn std::error::Error + Send + Sync>| {
        Error::ConfigWrite {
            path: at.to_path_buf(),
            source,
        }
    };

    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| write_error(dir, e.into()))?;
    }

    let json = serde_json::to_string_pretty(settings).map_err(|e| write_error(path, e.into()))?;
    let temp = path.with_file_name(CONFIG_TEMP_NAME);
    fs::write(&temp, json).map_err(|e| write_error(&temp, e.into()))?;
    fs::rename(&temp, path).map_err(|e| write_error(path, e.into()))?;

    info!("Saved settings to {}", path.display());
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
