use crate::{
    draw::{
        color::Rgba8,
        display::{AlignX, AlignY},
        painter::Painter,
    },
    foundation::core::{Canvas, Fps, Viewport},
    foundation::error::SketchResult,
    sketches::{FrameContext, Sketch, SketchSetup},
};

const CURSOR: char = '|';

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct NotebookConfig {
    pub canvas_max: u32,
    pub fps: u32,
    pub line_height: f64,
    pub margin: f64,
    pub title: String,
    /// Cycled through, one per minute.
    pub phrases: Vec<String>,
    /// Cursor toggles every this many frames.
    pub blink_interval: u64,
    pub font_family: String,
}

impl Default for NotebookConfig {
    fn default() -> Self {
        Self {
            canvas_max: 800,
            fps: 30,
            line_height: 40.0,
            margin: 50.0,
            title: "Notebook of Time".to_string(),
            phrases: [
                "Focus builds progress.",
                "Keep going.",
                "Learning in motion.",
                "Write your time.",
                "One thought at a time.",
            ]
            .map(String::from)
            .to_vec(),
            blink_interval: 30,
            font_family: "Georgia".to_string(),
        }
    }
}

/// Phrase typed on line `index`; phrases repeat once exhausted.
pub fn phrase_for(index: usize, phrases: &[String]) -> &str {
    if phrases.is_empty() {
        return "";
    }
    &phrases[index % phrases.len()]
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NotebookState {
    pub lines: Vec<String>,
    pub current_line: usize,
    pub last_minute: Option<u32>,
    pub cursor_visible: bool,
}

impl Default for NotebookState {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            current_line: 0,
            last_minute: None,
            cursor_visible: true,
        }
    }
}

impl NotebookState {
    /// Start a new line whenever the minute differs from the last one seen.
    ///
    /// Returns `true` when a line was appended.
    pub fn observe_minute(&mut self, minute: u32) -> bool {
        if self.last_minute == Some(minute) {
            return false;
        }
        self.lines.push(String::new());
        self.current_line = self.lines.len() - 1;
        self.last_minute = Some(minute);
        tracing::debug!(minute, line = self.current_line, "notebook line started");
        true
    }

    /// Reveal one character of the active phrase per elapsed second of the minute.
    pub fn update_typing(&mut self, second: u32, phrases: &[String]) {
        let phrase = phrase_for(self.current_line, phrases);
        let Some(line) = self.lines.get_mut(self.current_line) else {
            return;
        };
        *line = phrase.chars().take(second as usize).collect();
    }

    /// Flip the cursor on every `interval`-th frame (1-based count).
    pub fn tick_blink(&mut self, frame_count: u64, interval: u64) -> bool {
        if interval > 0 && frame_count.is_multiple_of(interval) {
            self.cursor_visible = !self.cursor_visible;
        }
        self.cursor_visible
    }

    /// Lines as drawn: the active line carries a cursor while it is still being typed.
    pub fn display_lines(&self, phrases: &[String]) -> Vec<String> {
        self.lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let typing = line.chars().count() < phrase_for(i, phrases).chars().count();
                if i == self.current_line && self.cursor_visible && typing {
                    let mut s = line.clone();
                    s.push(CURSOR);
                    s
                } else {
                    line.clone()
                }
            })
            .collect()
    }
}

/// Typewriter clock: each minute starts a line that types itself out second by second.
pub struct Notebook {
    cfg: NotebookConfig,
    state: NotebookState,
}

impl Notebook {
    pub fn new(cfg: NotebookConfig) -> Self {
        Self {
            cfg,
            state: NotebookState::default(),
        }
    }

    pub fn state(&self) -> &NotebookState {
        &self.state
    }
}

impl Sketch for Notebook {
    fn name(&self) -> &'static str {
        "notebook"
    }

    fn setup(&mut self, viewport: Viewport) -> SketchResult<SketchSetup> {
        self.state = NotebookState::default();
        Ok(SketchSetup {
            canvas: Canvas::capped(viewport, self.cfg.canvas_max),
            fps: Fps::whole(self.cfg.fps)?,
        })
    }

    fn draw(&mut self, ctx: &FrameContext, p: &mut Painter) -> SketchResult<()> {
        let cfg = &self.cfg;
        let w = ctx.canvas.width_f64();
        let h = ctx.canvas.height_f64();

        p.text_font(&cfg.font_family);
        p.background(Rgba8::rgb(240, 230, 220));

        p.stroke(Rgba8::gray(200));
        if cfg.line_height > 0.0 {
            let mut y = cfg.margin;
            while y < h {
                p.line(cfg.margin, y, w - cfg.margin, y);
                y += cfg.line_height;
            }
        }

        p.fill(Rgba8::BLACK);
        p.text_align(AlignX::Center, AlignY::Baseline);
        p.text_size(28.0);
        p.text(&cfg.title, w / 2.0, cfg.margin - 20.0);

        self.state.observe_minute(ctx.reading.minute);
        self.state.update_typing(ctx.reading.second, &cfg.phrases);

        p.text_align(AlignX::Left, AlignY::Baseline);
        p.text_size(18.0);
        for (i, line) in self.state.display_lines(&cfg.phrases).iter().enumerate() {
            p.text(line, cfg.margin, cfg.margin + (i + 1) as f64 * cfg.line_height);
        }

        p.push();
        p.text_align(AlignX::Right, AlignY::Baseline);
        p.text_size(14.0);
        p.text(&ctx.reading.hh_mm_ss(), w - cfg.margin, h - cfg.margin);
        p.pop();

        self.state.tick_blink(ctx.frame_count, cfg.blink_interval);
        Ok(())
    }

    fn window_resized(&mut self, viewport: Viewport) -> Canvas {
        Canvas::capped(viewport, self.cfg.canvas_max)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sketches/notebook.rs"]
mod tests;
