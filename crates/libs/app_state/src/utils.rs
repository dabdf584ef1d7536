use color_eyre::Result;
use std::path::{PathBuf, absolute};

/// Turns a configured folder into an absolute path. Blank values mean "not configured".
pub fn absolute_or_none(value: &str) -> Result<Option<PathBuf>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    Ok(Some(absolute(trimmed)?))
}
