use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Records `dir` as the prompt directory of the running session
pub fn write_marker(marker: &Path, dir: &Path) -> Result<()> {
    if let Some(parent) = marker.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(marker, dir.to_string_lossy().as_bytes())
        .with_context(|| format!("Failed to write session marker: {}", marker.display()))
}

/// The marked directory, if there is a marker and it still points at a directory
pub fn read_marker(marker: &Path) -> Option<PathBuf> {
    let raw = fs::read_to_string(marker).ok()?;
    let dir = PathBuf::from(raw.trim());
    dir.is_dir().then_some(dir)
}

pub fn clear_marker(marker: &Path) -> Result<()> {
    match fs::remove_file(marker) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e)
            .with_context(|| format!("Failed to remove session marker: {}", marker.display())),
    }
}
