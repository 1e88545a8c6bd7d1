//! Frame sinks.
//!
//! Sinks consume captured frames in capture order and are used by [`crate::Recorder::record`].

use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::PlumResult;

/// `ffmpeg`-based sinks (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> PlumResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}
