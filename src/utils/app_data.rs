use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

const APP_NAME: &str = "dxi";
const STORE_DIR: &str = "store";

/// Get the application data directory for storing document stores
pub fn get_app_data_dir() -> Result<PathBuf> {
    let base = if cfg!(target_os = "macos") {
        dirs::home_dir().map(|h| h.join("Library").join("Application Support"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
    } else {
        // Linux/Unix: use XDG_DATA_HOME or ~/.local/share
        dirs::data_dir()
    };

    let base = base.context("Could not determine app data directory")?;
    let app_dir = base.join(APP_NAME);

    fs::create_dir_all(&app_dir)?;
    Ok(app_dir)
}

/// Resolve the default document store location under the app data directory.
/// The directory itself is created lazily by the store's schema setup.
pub fn default_store_dir() -> Result<PathBuf> {
    Ok(get_app_data_dir()?.join(STORE_DIR))
}
