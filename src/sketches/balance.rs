use std::{f64::consts::FRAC_PI_2, path::PathBuf};

use crate::{
    data::diet::{
        Classification, DEFAULT_BALANCE_THRESHOLD, DataState, DietColumns, DietSummary,
        max_abs_balance,
    },
    draw::{
        color::{Rgba8, lerp_rgba8},
        display::{AlignX, AlignY, ArcMode},
        painter::Painter,
    },
    foundation::core::{Canvas, Fps, Viewport},
    foundation::error::SketchResult,
    foundation::math::{map_range, ratio_or},
    sketches::{FrameContext, Sketch, SketchSetup},
};

pub const TITLE: &str = "Fuel vs Burn: Are Your Meals Helping or Hurting?";
pub const SUBTITLE: &str =
    "Vegan and Balanced diets stay steady 🌿; Keto and Paleo show more intake 🍕.";
pub const CAPTION: &str = "Each plate represents one diet type.\n\
    Red = Calories consumed, Blue = Calories burned.\n\
    Higher plate = more balanced ⚖️, Lower plate = excess intake 🍕.";

const GRADIENT_TOP: Rgba8 = Rgba8::rgb(255, 250, 240);
const GRADIENT_BOTTOM: Rgba8 = Rgba8::rgb(245, 225, 190);
const BURN: Rgba8 = Rgba8::rgba(70, 130, 230, 180);
const INTAKE: Rgba8 = Rgba8::rgba(235, 80, 80, 180);
const SHADOW: Rgba8 = Rgba8::rgba(190, 170, 140, 80);

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub data_path: PathBuf,
    pub columns: DietColumns,
    /// Balance magnitude beyond which a diet is surplus or deficit.
    pub threshold: f64,
    pub font_family: String,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 750,
            fps: 60,
            data_path: PathBuf::from("data/diet_sample.csv"),
            columns: DietColumns::default(),
            threshold: DEFAULT_BALANCE_THRESHOLD,
            font_family: "Georgia".to_string(),
        }
    }
}

pub fn classification_color(c: Classification) -> Rgba8 {
    match c {
        Classification::Balanced => Rgba8::rgb(80, 180, 80),
        Classification::Surplus => Rgba8::rgb(235, 80, 80),
        Classification::Deficit => Rgba8::rgb(70, 130, 230),
    }
}

/// Where and how a category's plate is drawn.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateGeometry {
    pub x: f64,
    pub y: f64,
    /// Vertical offset, positive (lower) for surplus.
    pub drop: f64,
    /// Plate scale from the intake share of calories.
    pub stretch: f64,
}

impl PlateGeometry {
    pub fn for_summary(
        summary: &DietSummary,
        index: usize,
        count: usize,
        max_abs_balance: f64,
        canvas: Canvas,
    ) -> Self {
        let x_step = canvas.width_f64() / (count + 1) as f64;
        let drop = if max_abs_balance > 0.0 {
            map_range(summary.balance / max_abs_balance, -1.0, 1.0, -50.0, 50.0)
        } else {
            0.0
        };
        let intake_share = ratio_or(
            summary.mean_intake,
            summary.mean_intake + summary.mean_burn,
            0.5,
        );
        Self {
            x: x_step * (index + 1) as f64,
            y: canvas.height_f64() / 2.0 + 80.0,
            drop,
            stretch: map_range(intake_share, 0.3, 0.7, 0.8, 1.3),
        }
    }
}

/// Static chart: one plate per diet, sunk or raised by its calorie balance.
pub struct Balance {
    cfg: BalanceConfig,
    data: DataState,
}

impl Balance {
    pub fn new(cfg: BalanceConfig, data: DataState) -> Self {
        Self { cfg, data }
    }

    pub fn data(&self) -> &DataState {
        &self.data
    }

    fn canvas(&self) -> Canvas {
        Canvas::new(self.cfg.width, self.cfg.height)
    }
}

impl Sketch for Balance {
    fn name(&self) -> &'static str {
        "balance"
    }

    fn setup(&mut self, _viewport: Viewport) -> SketchResult<SketchSetup> {
        if let DataState::Unavailable { reason } = &self.data {
            tracing::warn!(%reason, "balance chart has no data");
        }
        Ok(SketchSetup {
            canvas: self.canvas(),
            fps: Fps::whole(self.cfg.fps)?,
        })
    }

    fn draw(&mut self, ctx: &FrameContext, p: &mut Painter) -> SketchResult<()> {
        let w = ctx.canvas.width_f64();
        let h = ctx.canvas.height_f64();

        p.text_font(&self.cfg.font_family);
        draw_gradient(p, w, h);

        p.no_stroke();
        p.fill(Rgba8::gray(30));
        p.text_align(AlignX::Center, AlignY::Baseline);
        p.text_size(28.0);
        p.text(TITLE, w / 2.0, 50.0);
        p.text_size(16.0);
        p.text(SUBTITLE, w / 2.0, 80.0);

        let summaries = self.data.summaries();
        if summaries.is_empty() {
            return Ok(());
        }

        let max_abs = max_abs_balance(summaries);
        for (i, d) in summaries.iter().enumerate() {
            let g = PlateGeometry::for_summary(d, i, summaries.len(), max_abs, ctx.canvas);
            draw_plate(p, d, &g);
        }

        draw_legend(p, w, h);
        draw_caption(p);
        Ok(())
    }

    fn window_resized(&mut self, _viewport: Viewport) -> Canvas {
        self.canvas()
    }
}

fn draw_gradient(p: &mut Painter, w: f64, h: f64) {
    p.background(GRADIENT_TOP);
    p.stroke_weight(1.0);
    let rows = h.max(0.0) as u32;
    for row in 0..rows {
        let y = f64::from(row);
        p.stroke(lerp_rgba8(GRADIENT_TOP, GRADIENT_BOTTOM, map_range(y, 0.0, h, 0.0, 1.0)));
        p.line(0.0, y, w, y);
    }
}

fn draw_plate(p: &mut Painter, d: &DietSummary, g: &PlateGeometry) {
    let (pw, ph) = (170.0 * g.stretch, 40.0 * g.stretch);

    p.no_stroke();
    p.fill(SHADOW);
    p.ellipse(g.x + 5.0, g.y + 30.0 + g.drop, 180.0, 45.0);

    p.push();
    p.translate(g.x, g.y + g.drop);
    p.fill(Rgba8::WHITE);
    p.stroke(Rgba8::gray(120));
    p.stroke_weight(2.0);
    p.ellipse(0.0, 0.0, pw, ph);

    p.no_stroke();
    p.fill(BURN);
    p.arc(0.0, 0.0, pw, ph, FRAC_PI_2, 3.0 * FRAC_PI_2, ArcMode::Pie);
    p.fill(INTAKE);
    p.arc(0.0, 0.0, pw, ph, 3.0 * FRAC_PI_2, FRAC_PI_2, ArcMode::Pie);
    p.pop();

    p.no_stroke();
    p.fill(Rgba8::gray(40));
    p.text_size(14.0);
    p.text_align(AlignX::Center, AlignY::Baseline);
    p.text(&d.name, g.x, g.y + 100.0);

    p.text_size(12.0);
    p.fill(Rgba8::gray(70));
    p.text(
        &format!(
            "Calories In: {}\nCalories Burned: {}",
            d.mean_intake.round() as i64,
            d.mean_burn.round() as i64
        ),
        g.x,
        g.y + 120.0,
    );
}

fn draw_legend(p: &mut Painter, w: f64, h: f64) {
    let (x, y) = (w - 220.0, h - 120.0);
    p.text_align(AlignX::Left, AlignY::Baseline);
    p.text_size(13.0);
    p.no_stroke();

    let entries = [
        (Classification::Balanced, "Balanced"),
        (Classification::Surplus, "Surplus (Overeating)"),
        (Classification::Deficit, "Deficit (More Burn)"),
    ];
    for (k, (class, label)) in entries.into_iter().enumerate() {
        let row_y = y + 25.0 * k as f64;
        p.fill(classification_color(class));
        p.ellipse(x, row_y, 14.0, 14.0);
        p.fill(Rgba8::gray(30));
        p.text(label, x + 25.0, row_y);
    }
}

fn draw_caption(p: &mut Painter) {
    p.no_stroke();
    p.fill(Rgba8::gray_alpha(255, 240));
    p.rounded_rect(40.0, 615.0, 650.0, 95.0, 12.0);
    p.fill(Rgba8::gray(40));
    p.text_size(13.0);
    p.text_align(AlignX::Left, AlignY::Baseline);
    p.text_leading(20.0);
    p.text(CAPTION, 60.0, 640.0);
}

#[cfg(test)]
#[path = "../../tests/unit/sketches/balance.rs"]
mod tests;
