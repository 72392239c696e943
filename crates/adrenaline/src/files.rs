//! Saving edited code

use anyhow::{anyhow, Context, Result};
use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_path(base: &Path, path: &Path) -> PathBuf {
    base.join(path).clean()
}

/// Resolve `path` against the user's home directory
pub fn resolve_home_path(path: &Path) -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not determine home directory"))?;
    Ok(resolve_path(&home, path))
}

/// Write `lines` joined with `\n` to `path`, relative to the home directory.
///
/// Returns the path that was written.
pub fn save_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<PathBuf> {
    let full_path = resolve_home_path(path)?;
    write_lines(&full_path, lines)?;
    Ok(full_path)
}

/// Write `lines` joined with `\n` to exactly `path`
pub fn write_lines<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let content = lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<&str>>()
        .join("\n");

    std::fs::write(path, content)
        .with_context(|| format!("Failed to save {}", path.display()))?;
    log::info!("Saved {} lines to {}", lines.len(), path.display());
    Ok(())
}
