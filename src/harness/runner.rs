use crate::{
    draw::{display::DisplayList, painter::Painter},
    foundation::core::{Canvas, Fps, Viewport},
    foundation::error::SketchResult,
    sketches::{FrameContext, Sketch},
    time::clock::ClockReading,
};

/// Hosts one sketch: runs its setup, tracks its canvas, and counts frames.
pub struct Runner {
    sketch: Box<dyn Sketch>,
    canvas: Canvas,
    fps: Fps,
    frame_count: u64,
}

impl Runner {
    pub fn start(mut sketch: Box<dyn Sketch>, viewport: Viewport) -> SketchResult<Self> {
        let setup = sketch.setup(viewport)?;
        setup.canvas.validate()?;
        tracing::debug!(
            sketch = sketch.name(),
            w = setup.canvas.width,
            h = setup.canvas.height,
            fps = setup.fps.as_f64(),
            "sketch started"
        );
        Ok(Self {
            sketch,
            canvas: setup.canvas,
            fps: setup.fps,
            frame_count: 0,
        })
    }

    pub fn name(&self) -> &'static str {
        self.sketch.name()
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Frames drawn so far, which is also the index of the next frame.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Applied before the next [`Runner::step`].
    pub fn resize(&mut self, viewport: Viewport) -> SketchResult<Canvas> {
        let canvas = self.sketch.window_resized(viewport);
        canvas.validate()?;
        if canvas != self.canvas {
            tracing::debug!(
                sketch = self.sketch.name(),
                w = canvas.width,
                h = canvas.height,
                "canvas resized"
            );
        }
        self.canvas = canvas;
        Ok(canvas)
    }

    /// Draw the next frame.
    pub fn step(&mut self, reading: ClockReading) -> SketchResult<DisplayList> {
        self.frame_count += 1;
        let ctx = FrameContext {
            frame_count: self.frame_count,
            reading,
            canvas: self.canvas,
        };
        let mut painter = Painter::new(self.canvas);
        self.sketch.draw(&ctx, &mut painter)?;
        Ok(painter.finish())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/harness/runner.rs"]
mod tests;
