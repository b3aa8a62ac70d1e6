//! Writing exported PNGs to disk.

use crate::config::ExportConfig;
use crate::draw::SurfaceError;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while exporting the drawing.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to encode drawing: {0}")]
    Surface(#[from] SurfaceError),

    #[error("Failed to save drawing: {0}")]
    Io(#[from] std::io::Error),
}

/// Generate a filename based on the template and current time.
///
/// # Arguments
/// * `template` - Template string with chrono format specifiers
///
/// # Returns
/// Generated filename with a `.png` extension
pub fn generate_filename(template: &str) -> String {
    let now = Local::now();
    format!("{}.png", now.format(template))
}

/// Ensure the save directory exists, creating it if necessary.
pub fn ensure_directory_exists(directory: &Path) -> Result<PathBuf, ExportError> {
    if !directory.exists() {
        log::info!("Creating export directory: {}", directory.display());
        fs::create_dir_all(directory)?;
    }

    let canonical = directory
        .canonicalize()
        .unwrap_or_else(|_| directory.to_path_buf());

    Ok(canonical)
}

/// Expand tilde (~) in path strings.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}

/// Writes PNG bytes into the configured directory under a timestamped name.
///
/// # Returns
/// Path to the saved file
pub fn save_png(png: &[u8], config: &ExportConfig) -> Result<PathBuf, ExportError> {
    let directory = ensure_directory_exists(&expand_tilde(&config.save_directory))?;
    let file_path = directory.join(generate_filename(&config.filename_template));
    write_png(png, &file_path)?;
    Ok(file_path)
}

/// Writes PNG bytes to an explicit path, creating parent directories.
pub fn write_png(png: &[u8], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory_exists(parent)?;
    }

    log::info!("Saving drawing to: {} ({} bytes)", path.display(), png.len());
    fs::write(path, png)?;
    Ok(())
}
