use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use crate::{
    draw::{color::Rgba8, display::TextStyle},
    foundation::error::{SketchError, SketchResult},
};

/// Leading applied between lines of multi-line text, as a multiple of the text size.
pub const DEFAULT_LEADING: f64 = 1.25;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for TextBrushRgba8 {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// Resolves requested font families to font bytes from system fonts and extra font directories.
pub struct FontBook {
    db: usvg::fontdb::Database,
    extra_dirs: Vec<PathBuf>,
    loaded: bool,
}

impl FontBook {
    pub fn new(extra_dirs: Vec<PathBuf>) -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
            extra_dirs,
            loaded: false,
        }
    }

    /// Number of faces known after loading.
    pub fn face_count(&mut self) -> usize {
        self.ensure_loaded();
        self.db.len()
    }

    /// Font bytes and face index for `family`, falling back to generic families and then to any
    /// installed face.
    pub fn resolve(&mut self, family: &str) -> Option<(Vec<u8>, u32)> {
        self.ensure_loaded();

        let families = [
            family_for(family),
            usvg::fontdb::Family::SansSerif,
            usvg::fontdb::Family::Serif,
        ];
        let query = usvg::fontdb::Query {
            families: &families,
            weight: usvg::fontdb::Weight::NORMAL,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let id = self
            .db
            .query(&query)
            .or_else(|| self.db.faces().next().map(|f| f.id))?;
        self.db
            .with_face_data(id, |data, index| (data.to_vec(), index))
    }

    fn ensure_loaded(&mut self) {
        if self.loaded {
            return;
        }
        self.db.load_system_fonts();
        for dir in &self.extra_dirs {
            load_fonts_from_dir(&mut self.db, dir);
        }
        tracing::debug!(faces = self.db.len(), "font database loaded");
        self.loaded = true;
    }
}

fn family_for(name: &str) -> usvg::fontdb::Family<'_> {
    match name.to_ascii_lowercase().as_str() {
        "serif" => usvg::fontdb::Family::Serif,
        "sans-serif" => usvg::fontdb::Family::SansSerif,
        "monospace" => usvg::fontdb::Family::Monospace,
        _ => usvg::fontdb::Family::Name(name),
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    if dir.is_dir() {
        db.load_fonts_dir(dir);
    } else {
        tracing::warn!(dir = %dir.display(), "font directory does not exist");
    }
}

/// One shaped line of text plus the metrics needed to place it.
pub struct ShapedLine {
    pub layout: parley::Layout<TextBrushRgba8>,
    pub width: f64,
    pub height: f64,
    pub baseline: f64,
}

/// Shaped, possibly multi-line text and the font its glyphs come from.
pub struct ShapedText {
    pub font: vello_cpu::peniko::FontData,
    pub lines: Vec<ShapedLine>,
    pub leading: f64,
}

impl ShapedText {
    pub fn width(&self) -> f64 {
        self.lines.iter().map(|l| l.width).fold(0.0, f64::max)
    }

    /// Distance from the top of the first line to the bottom of the last one.
    pub fn block_height(&self) -> f64 {
        let first = self.lines.first().map(|l| l.height).unwrap_or(0.0);
        let extra = self.lines.len().saturating_sub(1) as f64 * self.leading;
        first + extra
    }
}

#[derive(Clone)]
struct RegisteredFont {
    family_name: String,
    data: vello_cpu::peniko::FontData,
}

/// Stateful helper for building Parley text layouts from resolved font bytes.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    book: FontBook,
    registered: HashMap<String, Option<RegisteredFont>>,
}

impl TextLayoutEngine {
    pub fn new(book: FontBook) -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            book,
            registered: HashMap::new(),
        }
    }

    /// Family name Parley registered for a requested family, if one resolved.
    pub fn resolved_family(&mut self, family: &str) -> Option<String> {
        self.register(family).map(|f| f.family_name)
    }

    /// Shape `text` line by line; `Ok(None)` when no font is available for the style's family.
    pub fn shape(&mut self, text: &str, style: &TextStyle) -> SketchResult<Option<ShapedText>> {
        if !style.size_px.is_finite() || style.size_px <= 0.0 {
            return Err(SketchError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(font) = self.register(&style.family) else {
            return Ok(None);
        };

        let brush = TextBrushRgba8::from(style.color);
        let size_px = style.size_px as f32;
        let mut lines = Vec::new();
        for line in text.split('\n') {
            let mut builder = self
                .layout_ctx
                .ranged_builder(&mut self.font_ctx, line, 1.0, true);
            builder.push_default(parley::style::StyleProperty::FontStack(
                parley::style::FontStack::Source(std::borrow::Cow::Owned(
                    font.family_name.clone(),
                )),
            ));
            builder.push_default(parley::style::StyleProperty::FontSize(size_px));
            builder.push_default(parley::style::StyleProperty::Brush(brush));

            let mut layout: parley::Layout<TextBrushRgba8> = builder.build(line);
            layout.break_all_lines(None);

            let mut width = 0.0f64;
            let mut height = 0.0f64;
            let mut baseline = None;
            for l in layout.lines() {
                let m = l.metrics();
                width = width.max(f64::from(m.advance));
                if baseline.is_none() {
                    baseline = Some(height + f64::from(m.ascent + m.leading * 0.5));
                }
                height += f64::from(m.ascent + m.descent + m.leading);
            }

            lines.push(ShapedLine {
                layout,
                width,
                height: height.max(style.size_px),
                baseline: baseline.unwrap_or(style.size_px * 0.8),
            });
        }

        Ok(Some(ShapedText {
            font: font.data,
            lines,
            leading: style.leading.unwrap_or(style.size_px * DEFAULT_LEADING),
        }))
    }

    fn register(&mut self, family: &str) -> Option<RegisteredFont> {
        if let Some(hit) = self.registered.get(family) {
            return hit.clone();
        }

        let registered = self.book.resolve(family).and_then(|(bytes, index)| {
            let families = self
                .font_ctx
                .collection
                .register_fonts(parley::fontique::Blob::from(bytes.clone()), None);
            let family_id = families.first().map(|(id, _)| *id)?;
            let family_name = self.font_ctx.collection.family_name(family_id)?.to_string();
            let data =
                vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes), index);
            Some(RegisteredFont { family_name, data })
        });

        match &registered {
            Some(f) => tracing::debug!(requested = family, resolved = %f.family_name, "font registered"),
            None => tracing::warn!(requested = family, "no font available; text will be skipped"),
        }
        self.registered.insert(family.to_string(), registered.clone());
        registered
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
