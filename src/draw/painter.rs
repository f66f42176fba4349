use std::f64::consts::TAU;

use crate::{
    draw::{
        color::Rgba8,
        display::{
            AlignX, AlignY, ArcMode, DisplayList, DrawOp, Paint, StrokeCap, StrokeStyle, TextStyle,
        },
    },
    foundation::core::{Affine, Canvas, Point, Rect, Vec2},
};

pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

#[derive(Clone, Debug)]
struct PainterState {
    fill: Option<Rgba8>,
    stroke: Option<Rgba8>,
    stroke_weight: f64,
    stroke_cap: StrokeCap,
    text_size: f64,
    align_x: AlignX,
    align_y: AlignY,
    family: String,
    leading: Option<f64>,
    transform: Affine,
}

impl Default for PainterState {
    fn default() -> Self {
        Self {
            fill: Some(Rgba8::WHITE),
            stroke: Some(Rgba8::BLACK),
            stroke_weight: 1.0,
            stroke_cap: StrokeCap::Round,
            text_size: 12.0,
            align_x: AlignX::Left,
            align_y: AlignY::Baseline,
            family: DEFAULT_FONT_FAMILY.to_string(),
            leading: None,
            transform: Affine::IDENTITY,
        }
    }
}

/// Immediate-mode drawing surface that records into a [`DisplayList`].
///
/// Style state (fill, stroke, text settings, transform) persists across calls the same way it
/// does in a canvas-style drawing API, and [`Painter::push`]/[`Painter::pop`] save and restore it.
pub struct Painter {
    list: DisplayList,
    state: PainterState,
    stack: Vec<PainterState>,
}

impl Painter {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            list: DisplayList::new(canvas),
            state: PainterState::default(),
            stack: Vec::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.list.canvas
    }

    pub fn width(&self) -> f64 {
        self.list.canvas.width_f64()
    }

    pub fn height(&self) -> f64 {
        self.list.canvas.height_f64()
    }

    pub fn finish(self) -> DisplayList {
        self.list
    }

    pub fn background(&mut self, color: impl Into<Rgba8>) {
        self.list.ops.push(DrawOp::Background(color.into()));
    }

    pub fn fill(&mut self, color: impl Into<Rgba8>) {
        self.state.fill = Some(color.into());
    }

    pub fn no_fill(&mut self) {
        self.state.fill = None;
    }

    pub fn stroke(&mut self, color: impl Into<Rgba8>) {
        self.state.stroke = Some(color.into());
    }

    pub fn no_stroke(&mut self) {
        self.state.stroke = None;
    }

    pub fn stroke_weight(&mut self, weight: f64) {
        self.state.stroke_weight = weight.max(0.0);
    }

    pub fn stroke_cap(&mut self, cap: StrokeCap) {
        self.state.stroke_cap = cap;
    }

    pub fn text_size(&mut self, size_px: f64) {
        self.state.text_size = size_px;
    }

    pub fn text_align(&mut self, x: AlignX, y: AlignY) {
        self.state.align_x = x;
        self.state.align_y = y;
    }

    pub fn text_font(&mut self, family: &str) {
        self.state.family = family.to_string();
    }

    pub fn text_leading(&mut self, leading: f64) {
        self.state.leading = Some(leading);
    }

    pub fn push(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Restore the state saved by the matching [`Painter::push`]; unmatched pops are ignored.
    pub fn pop(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform *= Affine::translate(Vec2::new(dx, dy));
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.rounded_rect(x, y, w, h, 0.0);
    }

    pub fn rounded_rect(&mut self, x: f64, y: f64, w: f64, h: f64, radius: f64) {
        let paint = self.paint();
        if paint.is_invisible() {
            return;
        }
        self.list.ops.push(DrawOp::Rect {
            rect: Rect::new(x, y, x + w, y + h),
            corner_radius: radius.max(0.0),
            transform: self.state.transform,
            paint,
        });
    }

    /// Ellipse centered on `(x, y)` with diameters `w` and `h`.
    pub fn ellipse(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let paint = self.paint();
        if paint.is_invisible() {
            return;
        }
        self.list.ops.push(DrawOp::Ellipse {
            center: Point::new(x, y),
            radii: Vec2::new(w / 2.0, h / 2.0),
            transform: self.state.transform,
            paint,
        });
    }

    /// Arc of the ellipse centered on `(x, y)`, from `start` to `stop` radians clockwise.
    ///
    /// A `stop` below `start` wraps once around the circle; equal angles draw nothing.
    #[allow(clippy::too_many_arguments)]
    pub fn arc(&mut self, x: f64, y: f64, w: f64, h: f64, start: f64, stop: f64, mode: ArcMode) {
        let paint = self.paint();
        if paint.is_invisible() {
            return;
        }
        let mut sweep = stop - start;
        if sweep < 0.0 {
            sweep = sweep.rem_euclid(TAU);
        }
        let sweep = sweep.min(TAU);
        if sweep <= f64::EPSILON {
            return;
        }
        self.list.ops.push(DrawOp::Arc {
            center: Point::new(x, y),
            radii: Vec2::new(w / 2.0, h / 2.0),
            start_angle: start,
            sweep_angle: sweep,
            mode,
            transform: self.state.transform,
            paint,
        });
    }

    pub fn line(&mut self, x0: f64, y0: f64, x1: f64, y1: f64) {
        let Some(stroke) = self.stroke_style() else {
            return;
        };
        self.list.ops.push(DrawOp::Line {
            from: Point::new(x0, y0),
            to: Point::new(x1, y1),
            transform: self.state.transform,
            stroke,
        });
    }

    /// Text drawn with the current fill and outlined with the current stroke.
    ///
    /// Nothing is recorded without a fill or for empty text.
    pub fn text(&mut self, text: &str, x: f64, y: f64) {
        let Some(color) = self.state.fill else {
            return;
        };
        if text.is_empty() || self.state.text_size <= 0.0 {
            return;
        }
        self.list.ops.push(DrawOp::Text {
            text: text.to_string(),
            origin: Point::new(x, y),
            transform: self.state.transform,
            style: TextStyle {
                size_px: self.state.text_size,
                align_x: self.state.align_x,
                align_y: self.state.align_y,
                family: self.state.family.clone(),
                color,
                leading: self.state.leading,
                outline: self.stroke_style(),
            },
        });
    }

    fn stroke_style(&self) -> Option<StrokeStyle> {
        let color = self.state.stroke?;
        if self.state.stroke_weight <= 0.0 {
            return None;
        }
        Some(StrokeStyle {
            color,
            width: self.state.stroke_weight,
            cap: self.state.stroke_cap,
        })
    }

    fn paint(&self) -> Paint {
        Paint {
            fill: self.state.fill,
            stroke: self.stroke_style(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/draw/painter.rs"]
mod tests;
