use std::path::Path;

use anyhow::Context as _;

use crate::{
    encode::ffmpeg::ensure_parent_dir,
    foundation::error::{SketchError, SketchResult},
    render::backend::FrameRGBA,
};

/// Write `frame` as an RGBA PNG, creating parent directories as needed.
pub fn save_png(frame: &FrameRGBA, path: &Path) -> SketchResult<()> {
    let expected = frame.width as usize * frame.height as usize * 4;
    if frame.data.len() != expected {
        return Err(SketchError::validation(format!(
            "frame data is {} bytes, expected {expected} for {}x{}",
            frame.data.len(),
            frame.width,
            frame.height
        )));
    }
    ensure_parent_dir(path)?;

    image::save_buffer_with_format(
        path,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", path.display()))?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/png.rs"]
mod tests;
