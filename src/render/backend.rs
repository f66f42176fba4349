use std::path::PathBuf;

use crate::{
    draw::display::DisplayList,
    foundation::error::{SketchError, SketchResult},
};

/// Rendered pixels for one frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data, as image files expect.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if !self.premultiplied {
            return self.data.clone();
        }
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            let a = px[3];
            if a == 0 {
                out.extend_from_slice(&[0, 0, 0, 0]);
                continue;
            }
            let un = |c: u8| -> u8 {
                ((u32::from(c) * 255 + u32::from(a) / 2) / u32::from(a)).min(255) as u8
            };
            out.extend_from_slice(&[un(px[0]), un(px[1]), un(px[2]), a]);
        }
        out
    }

    /// Straight RGBA8 of the pixel at `(x, y)`, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        let mut out = [px[0], px[1], px[2], px[3]];
        if self.premultiplied && out[3] != 0 && out[3] != 255 {
            let a = u32::from(out[3]);
            for c in out.iter_mut().take(3) {
                *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
            }
        }
        Some(out)
    }
}

/// Rasterizes display lists.
pub trait RenderBackend {
    fn render_list(&mut self, list: &DisplayList) -> SketchResult<FrameRGBA>;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    #[default]
    Cpu,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Color every frame starts from before the sketch draws; transparent when unset.
    pub clear_rgba: Option<[u8; 4]>,
    /// Extra directories searched for fonts after system fonts.
    pub font_dirs: Vec<PathBuf>,
}

pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> SketchResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}

pub(crate) fn canvas_dims_u16(list: &DisplayList) -> SketchResult<(u16, u16)> {
    list.canvas.validate()?;
    let w: u16 = list
        .canvas
        .width
        .try_into()
        .map_err(|_| SketchError::render("canvas width exceeds u16"))?;
    let h: u16 = list
        .canvas
        .height
        .try_into()
        .map_err(|_| SketchError::render("canvas height exceeds u16"))?;
    Ok((w, h))
}
