use std::path::PathBuf;

use rayon::prelude::*;

use crate::{
    config::SketchbookConfig,
    encode::ffmpeg::{EncodeConfig, FfmpegEncoder},
    foundation::core::{FrameIndex, FrameRange, Viewport},
    foundation::error::{SketchError, SketchResult},
    harness::{registry::SketchKind, runner::Runner},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
    render::cpu::CpuBackend,
    time::clock::TimeSource,
};

/// Draw (without rasterizing) every frame before `target`.
///
/// Sketches carry state from frame to frame, so frame `n` only looks right after frames
/// `0..n` were drawn.
fn fast_forward(
    runner: &mut Runner,
    clock: &dyn TimeSource,
    target: FrameIndex,
) -> SketchResult<()> {
    if runner.frame_count() > target.0 {
        return Err(SketchError::validation(format!(
            "frame {} was already drawn (runner is at frame {})",
            target.0,
            runner.frame_count()
        )));
    }
    while runner.frame_count() < target.0 {
        let f = FrameIndex(runner.frame_count());
        runner.step(clock.reading(f, runner.fps()))?;
    }
    Ok(())
}

/// Render frame `frame` of the sketch hosted by `runner`.
///
/// Returns a [`FrameRGBA`] containing **premultiplied** RGBA8 pixels.
#[tracing::instrument(skip_all, fields(sketch = runner.name(), frame = frame.0))]
pub fn render_frame(
    runner: &mut Runner,
    clock: &dyn TimeSource,
    frame: FrameIndex,
    backend: &mut dyn RenderBackend,
) -> SketchResult<FrameRGBA> {
    fast_forward(runner, clock, frame)?;
    let list = runner.step(clock.reading(frame, runner.fps()))?;
    backend.render_list(&list)
}

/// Render a range of frames (inclusive start, exclusive end).
pub fn render_frames(
    runner: &mut Runner,
    clock: &dyn TimeSource,
    range: FrameRange,
    backend: &mut dyn RenderBackend,
) -> SketchResult<Vec<FrameRGBA>> {
    if range.is_empty() {
        return Err(SketchError::validation("render range must be non-empty"));
    }
    let mut out = Vec::with_capacity(range.len_frames().min(4096) as usize);
    for f in range.start.0..range.end.0 {
        out.push(render_frame(runner, clock, FrameIndex(f), backend)?);
    }
    Ok(out)
}

/// Options for [`render_to_mp4`].
#[derive(Clone, Debug)]
pub struct RenderToMp4Opts {
    /// Frame range to render (start inclusive, end exclusive).
    pub range: FrameRange,
    /// Background color to flatten alpha over (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Whether to overwrite `out_path` if it already exists.
    pub overwrite: bool,
}

impl Default for RenderToMp4Opts {
    fn default() -> Self {
        Self {
            range: FrameRange {
                start: FrameIndex(0),
                end: FrameIndex(1),
            },
            bg_rgba: [255, 255, 255, 255],
            overwrite: true,
        }
    }
}

/// Render a sketch to an MP4 by invoking the system `ffmpeg` binary.
///
/// `ffmpeg` must be installed and on `PATH`. The canvas must have even dimensions and the sketch
/// a whole-number frame rate.
#[tracing::instrument(skip_all, fields(sketch = runner.name(), frames = opts.range.len_frames()))]
pub fn render_to_mp4(
    runner: &mut Runner,
    clock: &dyn TimeSource,
    out_path: impl Into<PathBuf>,
    opts: RenderToMp4Opts,
    backend: &mut dyn RenderBackend,
) -> SketchResult<()> {
    if opts.range.is_empty() {
        return Err(SketchError::validation(
            "render_to_mp4 range must be non-empty",
        ));
    }
    let cfg = EncodeConfig::for_canvas(runner.canvas(), runner.fps(), out_path, opts.overwrite)?;
    let mut enc = FfmpegEncoder::new(cfg, opts.bg_rgba)?;

    for f in opts.range.start.0..opts.range.end.0 {
        let frame = render_frame(runner, clock, FrameIndex(f), backend)?;
        enc.encode_frame(&frame)?;
    }
    enc.finish()
}

/// One rendered still per sketch kind.
#[derive(Debug)]
pub struct GalleryFrame {
    pub kind: SketchKind,
    pub frame: FrameRGBA,
}

/// Render frame `frame` of every sketch in `kinds`, one rayon task per sketch.
///
/// Each task builds its own sketch, runner, and CPU backend, so nothing is shared between them.
#[tracing::instrument(skip_all, fields(sketches = kinds.len(), frame = frame.0))]
pub fn render_gallery(
    cfg: &SketchbookConfig,
    kinds: &[SketchKind],
    viewport: Viewport,
    clock: &dyn TimeSource,
    frame: FrameIndex,
    settings: &RenderSettings,
) -> SketchResult<Vec<GalleryFrame>> {
    kinds
        .par_iter()
        .map(|&kind| -> SketchResult<GalleryFrame> {
            let mut runner = Runner::start(kind.build(cfg), viewport)?;
            let mut backend = CpuBackend::new(settings.clone());
            let rgba = render_frame(&mut runner, clock, frame, &mut backend)?;
            Ok(GalleryFrame { kind, frame: rgba })
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
