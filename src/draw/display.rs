use crate::{
    draw::color::Rgba8,
    foundation::core::{Affine, Canvas, Point, Rect, Vec2},
};

/// Line end style for stroked shapes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum StrokeCap {
    #[default]
    Round,
    Square,
    Butt,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct StrokeStyle {
    pub color: Rgba8,
    pub width: f64,
    pub cap: StrokeCap,
}

/// Fill and stroke resolved at record time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Paint {
    pub fill: Option<Rgba8>,
    pub stroke: Option<StrokeStyle>,
}

impl Paint {
    pub fn is_invisible(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }
}

/// How an arc is closed when filled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum ArcMode {
    /// Filled along the chord, stroked along the curve only.
    #[default]
    Open,
    /// Closed through the ellipse center.
    Pie,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum AlignX {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum AlignY {
    /// `y` is the baseline of the first line.
    #[default]
    Baseline,
    Top,
    Center,
    Bottom,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TextStyle {
    pub size_px: f64,
    pub align_x: AlignX,
    pub align_y: AlignY,
    pub family: String,
    pub color: Rgba8,
    /// Distance between baselines of consecutive lines; defaults to 1.25 × size.
    pub leading: Option<f64>,
    /// Glyph outline drawn over the fill, from the stroke active when the text was recorded.
    pub outline: Option<StrokeStyle>,
}

/// One recorded drawing primitive. Geometry is in local space; `transform` maps it to canvas space.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub enum DrawOp {
    /// Replace every pixel of the canvas.
    Background(Rgba8),
    Rect {
        rect: Rect,
        corner_radius: f64,
        transform: Affine,
        paint: Paint,
    },
    Ellipse {
        center: Point,
        radii: Vec2,
        transform: Affine,
        paint: Paint,
    },
    Arc {
        center: Point,
        radii: Vec2,
        start_angle: f64,
        sweep_angle: f64, // positive is clockwise on screen
        mode: ArcMode,
        transform: Affine,
        paint: Paint,
    },
    Line {
        from: Point,
        to: Point,
        transform: Affine,
        stroke: StrokeStyle,
    },
    Text {
        text: String,
        origin: Point,
        transform: Affine,
        style: TextStyle,
    },
}

/// Everything one sketch drew for one frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct DisplayList {
    pub canvas: Canvas,
    pub ops: Vec<DrawOp>,
}

impl DisplayList {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            ops: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Text of every text op, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn count_where(&self, pred: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| pred(op)).count()
    }
}
