use crate::foundation::error::{SketchError, SketchResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    pub start: FrameIndex,
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    pub fn new(start: FrameIndex, end: FrameIndex) -> SketchResult<Self> {
        if start.0 > end.0 {
            return Err(SketchError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> SketchResult<Self> {
        if den == 0 {
            return Err(SketchError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(SketchError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Whole-number frame rate, as sketches declare it.
    pub fn whole(num: u32) -> SketchResult<Self> {
        Self::new(num, 1)
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Milliseconds elapsed at the start of `frames`, truncated.
    pub fn frames_to_millis(self, frames: u64) -> u64 {
        let num = u128::from(self.num);
        let den = u128::from(self.den);
        let ms = u128::from(frames) * 1000 * den / num;
        u64::try_from(ms).unwrap_or(u64::MAX)
    }
}

/// Size of the window or viewport the harness hosts sketches in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::str::FromStr for Viewport {
    type Err = SketchError;

    /// Parses `WIDTHxHEIGHT`, e.g. `1280x720`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| SketchError::validation(format!("viewport '{s}' is not WxH")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| SketchError::validation(format!("viewport width '{w}': {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| SketchError::validation(format!("viewport height '{h}': {e}")))?;
        if width == 0 || height == 0 {
            return Err(SketchError::validation("viewport width/height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Fit the canvas to `viewport`, never exceeding `max` on either axis.
    pub fn capped(viewport: Viewport, max: u32) -> Self {
        Self {
            width: viewport.width.min(max).max(1),
            height: viewport.height.min(max).max(1),
        }
    }

    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    pub fn center(self) -> Point {
        Point::new(self.width_f64() / 2.0, self.height_f64() / 2.0)
    }

    pub fn validate(self) -> SketchResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(SketchError::validation("canvas width/height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(SketchError::validation("canvas width/height exceeds u16"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
