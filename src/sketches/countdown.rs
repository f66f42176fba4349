use std::f64::consts::{FRAC_PI_2, TAU};

use crate::{
    draw::{
        color::Hsba,
        display::{AlignX, AlignY, ArcMode, StrokeCap},
        painter::Painter,
    },
    foundation::core::{Canvas, Fps, Point, Viewport},
    foundation::error::SketchResult,
    foundation::math::lerp,
    sketches::{FrameContext, Sketch, SketchSetup},
};

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    pub total_secs: u64,
    /// Remaining time at or below which the warning message shows.
    pub warning_secs: u64,
    /// Time already on the clock when the sketch starts.
    pub start_offset_secs: u64,
    /// Freeze the timer once this much time has elapsed.
    pub pause_after_secs: Option<u64>,
    pub canvas_max: u32,
    pub fps: u32,
    pub font_family: String,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            total_secs: 25 * 60,
            warning_secs: 5 * 60,
            start_offset_secs: 0,
            pause_after_secs: None,
            canvas_max: 800,
            fps: 60,
            font_family: "Helvetica".to_string(),
        }
    }
}

/// Longest duration, in seconds, that still fits in a `u64` of milliseconds.
pub const MAX_DURATION_SECS: u64 = u64::MAX / 1000;

fn secs_to_ms(secs: u64) -> u64 {
    secs.saturating_mul(1000)
}

/// Countdown bookkeeping in milliseconds of sketch time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerState {
    pub total_ms: u64,
    pub start_ms: u64,
    pub paused_elapsed_ms: u64,
    pub paused: bool,
}

impl TimerState {
    pub fn new(total_ms: u64, start_ms: u64) -> Self {
        Self {
            total_ms,
            start_ms,
            paused_elapsed_ms: 0,
            paused: false,
        }
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        if self.paused {
            self.paused_elapsed_ms
        } else {
            now_ms
                .saturating_sub(self.start_ms)
                .saturating_add(self.paused_elapsed_ms)
        }
    }

    /// Always within `0..=total_ms`.
    pub fn remaining_ms(&self, now_ms: u64) -> u64 {
        self.total_ms.saturating_sub(self.elapsed_ms(now_ms))
    }

    /// Fraction of the countdown left, `1.0` at the start and `0.0` once finished.
    pub fn remaining_ratio(&self, now_ms: u64) -> f64 {
        if self.total_ms == 0 {
            return 0.0;
        }
        self.remaining_ms(now_ms) as f64 / self.total_ms as f64
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.paused {
            return;
        }
        self.paused_elapsed_ms = self.elapsed_ms(now_ms);
        self.paused = true;
    }

    pub fn resume(&mut self, now_ms: u64) {
        if !self.paused {
            return;
        }
        self.start_ms = now_ms;
        self.paused = false;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Running,
    Warning,
    Finished,
}

impl TimerStatus {
    pub fn message(self) -> &'static str {
        match self {
            Self::Running => "Stay in the zone ✨",
            Self::Warning => "Hang on, you're almost there",
            Self::Finished => "You did it!",
        }
    }
}

pub fn status_for(remaining_ms: u64, warning_ms: u64) -> TimerStatus {
    if remaining_ms == 0 {
        TimerStatus::Finished
    } else if remaining_ms <= warning_ms {
        TimerStatus::Warning
    } else {
        TimerStatus::Running
    }
}

/// Ring hue: 120 (green) when full, 0 (red) when empty.
pub fn hue_for_ratio(ratio: f64) -> f64 {
    lerp(0.0, 120.0, ratio.clamp(0.0, 1.0))
}

/// `MM:SS` of the whole seconds in `remaining_ms`.
pub fn format_mm_ss(remaining_ms: u64) -> String {
    let secs = remaining_ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingGeometry {
    pub center: Point,
    pub outer_radius: f64,
    pub thickness: f64,
    pub inner_radius: f64,
    pub time_size: f64,
    pub message_size: f64,
}

impl RingGeometry {
    pub fn for_canvas(canvas: Canvas) -> Self {
        let outer_radius = canvas.width_f64().min(canvas.height_f64()) * 0.38;
        let thickness = (outer_radius * 0.14).max(10.0);
        let inner_radius = outer_radius - thickness * 0.6;
        let time_size = (inner_radius * 0.5).max(20.0);
        Self {
            center: canvas.center(),
            outer_radius,
            thickness,
            inner_radius,
            time_size,
            message_size: (time_size * 0.28).max(12.0),
        }
    }
}

/// Focus timer: a ring that empties clockwise from the top as time runs out.
pub struct Countdown {
    cfg: CountdownConfig,
    timer: TimerState,
    auto_paused: bool,
}

impl Countdown {
    pub fn new(cfg: CountdownConfig) -> Self {
        let timer = TimerState::new(secs_to_ms(cfg.total_secs), 0);
        Self {
            cfg,
            timer,
            auto_paused: false,
        }
    }

    pub fn timer(&self) -> &TimerState {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut TimerState {
        &mut self.timer
    }
}

impl Sketch for Countdown {
    fn name(&self) -> &'static str {
        "countdown"
    }

    fn setup(&mut self, viewport: Viewport) -> SketchResult<SketchSetup> {
        self.timer = TimerState::new(secs_to_ms(self.cfg.total_secs), 0);
        self.timer.paused_elapsed_ms = secs_to_ms(self.cfg.start_offset_secs);
        self.auto_paused = false;
        Ok(SketchSetup {
            canvas: Canvas::capped(viewport, self.cfg.canvas_max),
            fps: Fps::whole(self.cfg.fps)?,
        })
    }

    fn draw(&mut self, ctx: &FrameContext, p: &mut Painter) -> SketchResult<()> {
        let now_ms = ctx.reading.elapsed_ms;
        if let Some(limit) = self.cfg.pause_after_secs
            && !self.auto_paused
            && now_ms >= secs_to_ms(limit)
        {
            self.timer.pause(secs_to_ms(limit));
            self.auto_paused = true;
        }

        let remaining = self.timer.remaining_ms(now_ms);
        let ratio = self.timer.remaining_ratio(now_ms);
        let g = RingGeometry::for_canvas(ctx.canvas);
        let (cx, cy) = (g.center.x, g.center.y);
        let d = g.outer_radius * 2.0;

        p.background(Hsba::new(0.0, 0.0, 98.0));

        p.no_fill();
        p.stroke(Hsba::with_alpha(220.0, 8.0, 95.0, 80.0));
        p.stroke_weight(g.thickness);
        p.stroke_cap(StrokeCap::Square);
        p.arc(cx, cy, d, d, 0.0, TAU, ArcMode::Open);

        let start = -FRAC_PI_2;
        p.stroke(Hsba::with_alpha(hue_for_ratio(ratio), 80.0, 75.0, 220.0));
        p.stroke_cap(StrokeCap::Round);
        p.arc(cx, cy, d, d, start, start + TAU * ratio, ArcMode::Open);

        p.no_stroke();
        p.fill(Hsba::new(0.0, 0.0, 100.0));
        p.ellipse(cx, cy, g.inner_radius * 2.0, g.inner_radius * 2.0);

        p.text_font(&self.cfg.font_family);
        p.text_align(AlignX::Center, AlignY::Center);
        p.fill(Hsba::new(0.0, 0.0, 10.0));
        p.text_size(g.time_size);
        p.text(&format_mm_ss(remaining), cx, cy);

        let status = status_for(remaining, secs_to_ms(self.cfg.warning_secs));
        p.text_size(g.message_size);
        p.fill(Hsba::new(0.0, 0.0, 30.0));
        p.text(status.message(), cx, cy + g.inner_radius * 0.6);
        Ok(())
    }

    fn window_resized(&mut self, viewport: Viewport) -> Canvas {
        Canvas::capped(viewport, self.cfg.canvas_max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketches/countdown.rs"]
mod tests;
