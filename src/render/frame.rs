use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::Rgba8;
use crate::foundation::error::{PlumError, PlumResult};
use crate::foundation::math::flatten_over_bg;

/// A captured surface as RGBA8 pixels.
///
/// Frames read back from a [`crate::CpuSurface`] are **premultiplied alpha**; the flag makes this
/// explicit at API boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Number of pixels with non-zero alpha.
    pub fn covered_pixels(&self) -> usize {
        self.data.chunks_exact(4).filter(|px| px[3] != 0).count()
    }

    /// Flatten over an opaque background color, producing straight opaque RGBA8 bytes.
    pub fn flatten_over(&self, background: Rgba8) -> PlumResult<Vec<u8>> {
        if !self.premultiplied {
            return Err(PlumError::render(
                "flatten_over expects premultiplied frame data",
            ));
        }
        let bg = background.premultiplied().to_array();
        let mut out = vec![0u8; self.data.len()];
        if !flatten_over_bg(&mut out, &self.data, [bg[0], bg[1], bg[2], 255]) {
            return Err(PlumError::render(
                "frame data length is not a whole number of rgba8 pixels",
            ));
        }
        Ok(out)
    }

    /// Write the frame as a PNG, flattened over `background`.
    pub fn save_png(&self, path: &Path, background: Rgba8) -> PlumResult<()> {
        let bytes = self.flatten_over(background)?;
        crate::encode::ensure_parent_dir(path)?;
        image::save_buffer_with_format(
            path,
            &bytes,
            self.width,
            self.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
