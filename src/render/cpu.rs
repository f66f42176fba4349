use std::collections::HashSet;

use vello_cpu::kurbo::{self as ck, Shape as _};

use crate::{
    draw::{
        color::Rgba8,
        display::{
            AlignX, AlignY, ArcMode, DisplayList, DrawOp, Paint, StrokeCap, StrokeStyle, TextStyle,
        },
    },
    foundation::core::{Affine, Point, Vec2},
    foundation::error::SketchResult,
    render::{
        backend::{FrameRGBA, RenderBackend, RenderSettings, canvas_dims_u16},
        text::{FontBook, ShapedText, TextLayoutEngine},
    },
};

const PATH_TOLERANCE: f64 = 0.1;

/// CPU rasterizer for display lists.
pub struct CpuBackend {
    settings: RenderSettings,
    text: TextLayoutEngine,
    skipped_families: HashSet<String>,
}

impl CpuBackend {
    pub fn new(settings: RenderSettings) -> Self {
        let book = FontBook::new(settings.font_dirs.clone());
        Self {
            settings,
            text: TextLayoutEngine::new(book),
            skipped_families: HashSet::new(),
        }
    }
}

impl RenderBackend for CpuBackend {
    #[tracing::instrument(
        skip_all,
        fields(w = list.canvas.width, h = list.canvas.height, ops = list.ops.len())
    )]
    fn render_list(&mut self, list: &DisplayList) -> SketchResult<FrameRGBA> {
        let (width, height) = canvas_dims_u16(list)?;
        let full = ck::Rect::new(0.0, 0.0, f64::from(width), f64::from(height));

        let mut ctx = vello_cpu::RenderContext::new(width, height);
        if let Some(clear) = self.settings.clear_rgba.map(Rgba8::from)
            && clear.a != 0
        {
            ctx.set_transform(ck::Affine::IDENTITY);
            ctx.set_paint(color_to_cpu(clear));
            ctx.fill_rect(&full);
        }

        for op in &list.ops {
            self.draw_op(&mut ctx, op, full)?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);

        Ok(FrameRGBA {
            width: list.canvas.width,
            height: list.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

impl CpuBackend {
    fn draw_op(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        op: &DrawOp,
        full: ck::Rect,
    ) -> SketchResult<()> {
        ctx.set_paint_transform(ck::Affine::IDENTITY);

        match op {
            DrawOp::Background(color) => {
                ctx.set_transform(ck::Affine::IDENTITY);
                ctx.set_paint(color_to_cpu(*color));
                ctx.fill_rect(&full);
            }
            DrawOp::Rect {
                rect,
                corner_radius,
                transform,
                paint,
            } => {
                let r = ck::Rect::new(rect.x0, rect.y0, rect.x1, rect.y1);
                let path = if *corner_radius > 0.0 {
                    ck::RoundedRect::from_rect(r, *corner_radius).to_path(PATH_TOLERANCE)
                } else {
                    r.to_path(PATH_TOLERANCE)
                };
                fill_and_stroke(ctx, *transform, paint, &path, &path);
            }
            DrawOp::Ellipse {
                center,
                radii,
                transform,
                paint,
            } => {
                let path = ck::Ellipse::new(point_to_cpu(*center), vec_to_cpu(*radii), 0.0)
                    .to_path(PATH_TOLERANCE);
                fill_and_stroke(ctx, *transform, paint, &path, &path);
            }
            DrawOp::Arc {
                center,
                radii,
                start_angle,
                sweep_angle,
                mode,
                transform,
                paint,
            } => {
                let arc = ck::Arc::new(
                    point_to_cpu(*center),
                    vec_to_cpu(*radii),
                    *start_angle,
                    *sweep_angle,
                    0.0,
                );
                let (fill_path, stroke_path) = arc_paths(&arc, *mode);
                fill_and_stroke(ctx, *transform, paint, &fill_path, &stroke_path);
            }
            DrawOp::Line {
                from,
                to,
                transform,
                stroke,
            } => {
                let mut path = ck::BezPath::new();
                path.move_to(point_to_cpu(*from));
                path.line_to(point_to_cpu(*to));
                ctx.set_transform(affine_to_cpu(*transform));
                stroke_path(ctx, stroke, &path);
            }
            DrawOp::Text {
                text,
                origin,
                transform,
                style,
            } => {
                let Some(shaped) = self.text.shape(text, style)? else {
                    if self.skipped_families.insert(style.family.clone()) {
                        tracing::warn!(family = %style.family, "skipping text: no font resolved");
                    }
                    return Ok(());
                };
                draw_text(ctx, &shaped, *origin, *transform, style);
            }
        }
        Ok(())
    }
}

fn draw_text(
    ctx: &mut vello_cpu::RenderContext,
    shaped: &ShapedText,
    origin: Point,
    transform: Affine,
    style: &TextStyle,
) {
    let first_baseline = shaped.lines.first().map(|l| l.baseline).unwrap_or(0.0);
    let top = match style.align_y {
        AlignY::Baseline => origin.y - first_baseline,
        AlignY::Top => origin.y,
        AlignY::Center => origin.y - shaped.block_height() / 2.0,
        AlignY::Bottom => origin.y - shaped.block_height(),
    };

    for (i, line) in shaped.lines.iter().enumerate() {
        let dx = match style.align_x {
            AlignX::Left => 0.0,
            AlignX::Center => -line.width / 2.0,
            AlignX::Right => -line.width,
        };
        let offset = Vec2::new(origin.x + dx, top + i as f64 * shaped.leading);
        ctx.set_transform(affine_to_cpu(transform * Affine::translate(offset)));

        for l in line.layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = || {
                    run.glyphs().map(|g| vello_cpu::Glyph {
                        id: g.id,
                        x: g.x,
                        y: g.y,
                    })
                };
                let font_size = run.run().font_size();
                ctx.glyph_run(&shaped.font)
                    .font_size(font_size)
                    .fill_glyphs(glyphs());

                if let Some(outline) = &style.outline {
                    ctx.set_stroke(ck::Stroke::new(outline.width));
                    ctx.set_paint(color_to_cpu(outline.color));
                    ctx.glyph_run(&shaped.font)
                        .font_size(font_size)
                        .stroke_glyphs(glyphs());
                }
            }
        }
    }
}

/// Fill outline and stroke outline for an arc.
///
/// Open arcs fill along the chord but stroke only the curve; pie arcs use the wedge for both.
fn arc_paths(arc: &ck::Arc, mode: ArcMode) -> (ck::BezPath, ck::BezPath) {
    let curve = arc.to_path(PATH_TOLERANCE);
    match mode {
        ArcMode::Open => {
            let mut chord = curve.clone();
            chord.close_path();
            (chord, curve)
        }
        ArcMode::Pie => {
            let start = ck::Point::new(
                arc.center.x + arc.radii.x * arc.start_angle.cos(),
                arc.center.y + arc.radii.y * arc.start_angle.sin(),
            );
            let mut wedge = ck::BezPath::new();
            wedge.move_to(arc.center);
            wedge.line_to(start);
            wedge.extend(arc.append_iter(PATH_TOLERANCE));
            wedge.close_path();
            (wedge.clone(), wedge)
        }
    }
}

fn fill_and_stroke(
    ctx: &mut vello_cpu::RenderContext,
    transform: Affine,
    paint: &Paint,
    fill_path: &ck::BezPath,
    outline: &ck::BezPath,
) {
    ctx.set_transform(affine_to_cpu(transform));
    if let Some(fill) = paint.fill {
        ctx.set_paint(color_to_cpu(fill));
        ctx.fill_path(fill_path);
    }
    if let Some(stroke) = &paint.stroke {
        stroke_path(ctx, stroke, outline);
    }
}

fn stroke_path(ctx: &mut vello_cpu::RenderContext, stroke: &StrokeStyle, path: &ck::BezPath) {
    let cap = match stroke.cap {
        StrokeCap::Round => ck::Cap::Round,
        StrokeCap::Square => ck::Cap::Square,
        StrokeCap::Butt => ck::Cap::Butt,
    };
    ctx.set_stroke(ck::Stroke::new(stroke.width).with_caps(cap));
    ctx.set_paint(color_to_cpu(stroke.color));
    ctx.stroke_path(path);
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn affine_to_cpu(a: Affine) -> ck::Affine {
    ck::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> ck::Point {
    ck::Point::new(p.x, p.y)
}

fn vec_to_cpu(v: Vec2) -> ck::Vec2 {
    ck::Vec2::new(v.x, v.y)
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
