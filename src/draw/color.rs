use crate::foundation::math::lerp;

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub const fn gray_alpha(v: u8, a: u8) -> Self {
        Self::rgba(v, v, v, a)
    }
}

impl From<[u8; 4]> for Rgba8 {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self { r, g, b, a }
    }
}

/// Color in the hue/saturation/brightness model with ranges 360/100/100/255.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Hsba {
    pub h: f64,
    pub s: f64,
    pub b: f64,
    pub a: f64,
}

impl Hsba {
    pub fn new(h: f64, s: f64, b: f64) -> Self {
        Self { h, s, b, a: 255.0 }
    }

    pub fn with_alpha(h: f64, s: f64, b: f64, a: f64) -> Self {
        Self { h, s, b, a }
    }

    pub fn to_rgba8(self) -> Rgba8 {
        let h = self.h.rem_euclid(360.0) / 60.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let v = (self.b / 100.0).clamp(0.0, 1.0);

        let c = v * s;
        let x = c * (1.0 - ((h % 2.0) - 1.0).abs());
        let m = v - c;
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgba8 {
            r: unit_to_u8(r + m),
            g: unit_to_u8(g + m),
            b: unit_to_u8(b + m),
            a: self.a.round().clamp(0.0, 255.0) as u8,
        }
    }
}

impl From<Hsba> for Rgba8 {
    fn from(c: Hsba) -> Self {
        c.to_rgba8()
    }
}

/// Channel-wise interpolation in RGB space.
pub fn lerp_rgba8(from: Rgba8, to: Rgba8, t: f64) -> Rgba8 {
    let t = t.clamp(0.0, 1.0);
    let ch = |a: u8, b: u8| lerp(f64::from(a), f64::from(b), t).round().clamp(0.0, 255.0) as u8;
    Rgba8 {
        r: ch(from.r, to.r),
        g: ch(from.g, to.g),
        b: ch(from.b, to.b),
        a: ch(from.a, to.a),
    }
}

fn unit_to_u8(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[cfg(test)]
#[path = "../../tests/unit/draw/color.rs"]
mod tests;
