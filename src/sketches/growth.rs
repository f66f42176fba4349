use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    draw::{
        color::Hsba,
        display::{AlignX, AlignY},
        painter::Painter,
    },
    foundation::core::{Canvas, Fps, Viewport},
    foundation::error::SketchResult,
    sketches::{FrameContext, Sketch, SketchSetup},
    time::clock::ClockReading,
};

pub const CAPTION: &str = "Knowledge grows with every moment.";

const GRASS_HEIGHT: f64 = 20.0;
const TRUNK_WIDTH: f64 = 20.0;
const LEAF_SPREAD: f64 = 30.0;

/// What happens to placed leaves when the minute wraps back to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeafRollover {
    /// Leaves stay until the sketch is restarted.
    #[default]
    Keep,
    /// Drop every leaf when a new hour starts.
    ResetOnHour,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    pub canvas_max: u32,
    pub fps: u32,
    pub max_leaves: usize,
    pub base_height: f64,
    pub leaf_size: f64,
    /// Trunk growth per hour, in tens of pixels.
    pub growth_rate: f64,
    /// Leaves per minute.
    pub leaf_rate: f64,
    pub leaf_rollover: LeafRollover,
    pub seed: u64,
    pub font_family: String,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            canvas_max: 800,
            fps: 60,
            max_leaves: 100,
            base_height: 100.0,
            leaf_size: 10.0,
            growth_rate: 0.5,
            leaf_rate: 1.0,
            leaf_rollover: LeafRollover::Keep,
            seed: 0x5EED,
            font_family: "Georgia".to_string(),
        }
    }
}

pub fn trunk_height_for(hour: u32, base_height: f64, growth_rate: f64) -> f64 {
    base_height + f64::from(hour) * growth_rate * 10.0
}

pub fn leaf_target(minute: u32, leaf_rate: f64, max_leaves: usize) -> usize {
    let want = (f64::from(minute) * leaf_rate).floor().max(0.0) as usize;
    want.min(max_leaves)
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Leaf {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TreeState {
    pub trunk_height: f64,
    pub leaves: Vec<Leaf>,
    /// Hour of the last reading seen by [`TreeState::advance`].
    pub last_hour: Option<u32>,
}

impl TreeState {
    pub fn new(base_height: f64) -> Self {
        Self {
            trunk_height: base_height,
            leaves: Vec::new(),
            last_hour: None,
        }
    }

    /// Grow the trunk for the current hour and add leaves up to the current minute's target.
    ///
    /// New leaves land in a band above the trunk top. Returns how many were added.
    pub fn advance(
        &mut self,
        reading: &ClockReading,
        canvas: Canvas,
        cfg: &GrowthConfig,
        rng: &mut impl Rng,
    ) -> usize {
        self.trunk_height = trunk_height_for(reading.hour, cfg.base_height, cfg.growth_rate);

        if cfg.leaf_rollover == LeafRollover::ResetOnHour
            && self.last_hour.is_some_and(|h| h != reading.hour)
        {
            tracing::debug!(
                dropped = self.leaves.len(),
                hour = reading.hour,
                "new hour, clearing leaves"
            );
            self.leaves.clear();
        }
        self.last_hour = Some(reading.hour);

        let target = leaf_target(reading.minute, cfg.leaf_rate, cfg.max_leaves);
        let cx = canvas.width_f64() / 2.0;
        let h = canvas.height_f64();
        let before = self.leaves.len();
        while self.leaves.len() < target {
            let x = rng.gen_range(cx - LEAF_SPREAD..cx + LEAF_SPREAD);
            let y = h - self.trunk_height - rng.gen_range(10.0..30.0);
            self.leaves.push(Leaf { x, y });
        }
        self.leaves.len() - before
    }

    /// Nudge every leaf vertically by less than a pixel on even seconds.
    pub fn sparkle(&mut self, second: u32, rng: &mut impl Rng) {
        if second % 2 != 0 {
            return;
        }
        for leaf in &mut self.leaves {
            leaf.y += rng.gen_range(-1.0..1.0);
        }
    }
}

/// Clock drawn as a tree: hours raise the trunk, minutes add leaves.
pub struct Growth {
    cfg: GrowthConfig,
    tree: TreeState,
    rng: StdRng,
}

impl Growth {
    pub fn new(cfg: GrowthConfig) -> Self {
        Self {
            tree: TreeState::new(cfg.base_height),
            rng: StdRng::seed_from_u64(cfg.seed),
            cfg,
        }
    }

    pub fn tree(&self) -> &TreeState {
        &self.tree
    }
}

impl Sketch for Growth {
    fn name(&self) -> &'static str {
        "growth"
    }

    fn setup(&mut self, viewport: Viewport) -> SketchResult<SketchSetup> {
        self.tree = TreeState::new(self.cfg.base_height);
        self.rng = StdRng::seed_from_u64(self.cfg.seed);
        Ok(SketchSetup {
            canvas: Canvas::capped(viewport, self.cfg.canvas_max),
            fps: Fps::whole(self.cfg.fps)?,
        })
    }

    fn draw(&mut self, ctx: &FrameContext, p: &mut Painter) -> SketchResult<()> {
        let w = ctx.canvas.width_f64();
        let h = ctx.canvas.height_f64();

        p.text_font(&self.cfg.font_family);
        p.background(Hsba::new(200.0, 80.0, 90.0));

        self.tree
            .advance(&ctx.reading, ctx.canvas, &self.cfg, &mut self.rng);

        let trunk = self.tree.trunk_height;
        let base_y = h - GRASS_HEIGHT;
        p.fill(Hsba::new(30.0, 60.0, 40.0));
        p.rect(w / 2.0 - TRUNK_WIDTH / 2.0, base_y - trunk, TRUNK_WIDTH, trunk);

        p.fill(Hsba::new(120.0, 80.0, 50.0));
        for leaf in &self.tree.leaves {
            p.ellipse(leaf.x, leaf.y, self.cfg.leaf_size, self.cfg.leaf_size);
        }

        p.fill(Hsba::new(120.0, 60.0, 40.0));
        p.rect(0.0, h - GRASS_HEIGHT, w, GRASS_HEIGHT);

        let ink = Hsba::new(30.0, 20.0, 20.0);
        p.push();
        p.text_align(AlignX::Left, AlignY::Baseline);
        p.text_size(16.0);
        p.fill(ink);
        p.text(CAPTION, 20.0, h - 40.0);
        p.pop();

        p.push();
        p.text_align(AlignX::Right, AlignY::Baseline);
        p.text_size(14.0);
        p.fill(ink);
        p.text(&ctx.reading.hh_mm_ss(), w - 20.0, h - 40.0);
        p.pop();

        self.tree.sparkle(ctx.reading.second, &mut self.rng);
        Ok(())
    }

    fn window_resized(&mut self, viewport: Viewport) -> Canvas {
        Canvas::capped(viewport, self.cfg.canvas_max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketches/growth.rs"]
mod tests;
