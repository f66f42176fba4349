pub(crate) mod balance;
pub(crate) mod countdown;
pub(crate) mod growth;
pub(crate) mod notebook;

use crate::{
    draw::painter::Painter,
    foundation::core::{Canvas, Fps, Viewport},
    foundation::error::SketchResult,
    time::clock::ClockReading,
};

/// What a sketch asks of its host when it is set up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SketchSetup {
    pub canvas: Canvas,
    pub fps: Fps,
}

/// Per-frame inputs handed to [`Sketch::draw`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameContext {
    /// Frames drawn so far including this one; the first frame is `1`.
    pub frame_count: u64,
    pub reading: ClockReading,
    pub canvas: Canvas,
}

/// Contract between a sketch and the harness hosting it.
///
/// The harness calls [`Sketch::setup`] once, then [`Sketch::draw`] once per frame, and
/// [`Sketch::window_resized`] whenever the viewport changes between frames.
pub trait Sketch: Send {
    fn name(&self) -> &'static str;

    fn setup(&mut self, viewport: Viewport) -> SketchResult<SketchSetup>;

    fn draw(&mut self, ctx: &FrameContext, painter: &mut Painter) -> SketchResult<()>;

    /// Canvas the sketch wants after the viewport changed.
    fn window_resized(&mut self, viewport: Viewport) -> Canvas;
}

