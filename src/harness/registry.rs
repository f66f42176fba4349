use crate::{
    config::SketchbookConfig,
    data::diet::{DataState, load_diet_csv},
    foundation::error::SketchError,
    sketches::{
        Sketch, balance::Balance, countdown::Countdown, growth::Growth, notebook::Notebook,
    },
};

/// Every sketch the harness knows how to host.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    clap::ValueEnum,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SketchKind {
    Countdown,
    Growth,
    Notebook,
    Balance,
}

impl SketchKind {
    pub const ALL: [SketchKind; 4] = [
        SketchKind::Countdown,
        SketchKind::Growth,
        SketchKind::Notebook,
        SketchKind::Balance,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Countdown => "countdown",
            Self::Growth => "growth",
            Self::Notebook => "notebook",
            Self::Balance => "balance",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Countdown => "focus timer ring that empties as the countdown runs",
            Self::Growth => "tree clock: hours raise the trunk, minutes add leaves",
            Self::Notebook => "typewriter notebook writing one line per minute",
            Self::Balance => "static chart of calories in vs burned per diet",
        }
    }

    /// Build a fresh sketch from `cfg`. The chart loads its dataset here; a failed load leaves
    /// it without data rather than failing the build.
    pub fn build(self, cfg: &SketchbookConfig) -> Box<dyn Sketch> {
        match self {
            Self::Countdown => Box::new(Countdown::new(cfg.countdown.clone())),
            Self::Growth => Box::new(Growth::new(cfg.growth.clone())),
            Self::Notebook => Box::new(Notebook::new(cfg.notebook.clone())),
            Self::Balance => {
                let b = &cfg.balance;
                let data = DataState::from_load(
                    load_diet_csv(&b.data_path, &b.columns),
                    b.threshold,
                );
                Box::new(Balance::new(b.clone(), data))
            }
        }
    }
}

impl std::fmt::Display for SketchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for SketchKind {
    type Err = SketchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SketchError::validation(format!("unknown sketch '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/harness/registry.rs"]
mod tests;
