use std::{fs::File, io::BufReader, path::Path};

use crate::{
    foundation::error::{SketchError, SketchResult},
    render::backend::RenderSettings,
    sketches::{
        balance::BalanceConfig,
        countdown::{CountdownConfig, MAX_DURATION_SECS},
        growth::GrowthConfig,
        notebook::NotebookConfig,
    },
};

/// Settings for every registered sketch plus the renderer.
///
/// Every field has a default, so a JSON file only needs the values it changes:
///
/// ```json
/// { "countdown": { "total_secs": 600 }, "growth": { "leaf_rollover": "reset_on_hour" } }
/// ```
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SketchbookConfig {
    pub countdown: CountdownConfig,
    pub growth: GrowthConfig,
    pub notebook: NotebookConfig,
    pub balance: BalanceConfig,
    pub render: RenderSettings,
}

impl SketchbookConfig {
    pub fn from_reader<R: std::io::Read>(r: R) -> SketchResult<Self> {
        let cfg: Self = serde_json::from_reader(r)
            .map_err(|e| SketchError::validation(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_path(path: impl AsRef<Path>) -> SketchResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SketchError::validation(format!("open config JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> SketchResult<()> {
        let c = &self.countdown;
        if c.total_secs == 0 {
            return Err(SketchError::validation("countdown.total_secs must be > 0"));
        }
        if c.warning_secs > c.total_secs {
            return Err(SketchError::validation(
                "countdown.warning_secs must not exceed countdown.total_secs",
            ));
        }
        check_duration("countdown.total_secs", c.total_secs)?;
        check_duration("countdown.start_offset_secs", c.start_offset_secs)?;
        if let Some(limit) = c.pause_after_secs {
            check_duration("countdown.pause_after_secs", limit)?;
        }
        check_canvas_max("countdown", c.canvas_max)?;
        check_fps("countdown", c.fps)?;

        let g = &self.growth;
        check_canvas_max("growth", g.canvas_max)?;
        check_fps("growth", g.fps)?;
        check_non_negative("growth.base_height", g.base_height)?;
        check_non_negative("growth.leaf_size", g.leaf_size)?;
        check_non_negative("growth.growth_rate", g.growth_rate)?;
        check_non_negative("growth.leaf_rate", g.leaf_rate)?;

        let n = &self.notebook;
        check_canvas_max("notebook", n.canvas_max)?;
        check_fps("notebook", n.fps)?;
        if n.phrases.is_empty() {
            return Err(SketchError::validation("notebook.phrases must not be empty"));
        }
        if n.blink_interval == 0 {
            return Err(SketchError::validation(
                "notebook.blink_interval must be > 0",
            ));
        }
        if !(n.line_height.is_finite() && n.line_height > 0.0) {
            return Err(SketchError::validation("notebook.line_height must be > 0"));
        }
        check_non_negative("notebook.margin", n.margin)?;

        let b = &self.balance;
        if b.width == 0 || b.height == 0 {
            return Err(SketchError::validation(
                "balance.width/height must be > 0",
            ));
        }
        check_fps("balance", b.fps)?;
        check_non_negative("balance.threshold", b.threshold)?;
        Ok(())
    }
}

fn check_duration(field: &str, secs: u64) -> SketchResult<()> {
    if secs > MAX_DURATION_SECS {
        return Err(SketchError::validation(format!(
            "{field} must be <= {MAX_DURATION_SECS}"
        )));
    }
    Ok(())
}

fn check_canvas_max(section: &str, max: u32) -> SketchResult<()> {
    if max == 0 {
        return Err(SketchError::validation(format!(
            "{section}.canvas_max must be > 0"
        )));
    }
    Ok(())
}

fn check_fps(section: &str, fps: u32) -> SketchResult<()> {
    if fps == 0 {
        return Err(SketchError::validation(format!("{section}.fps must be > 0")));
    }
    Ok(())
}

fn check_non_negative(field: &str, v: f64) -> SketchResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(SketchError::validation(format!(
            "{field} must be a finite number >= 0"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
