use std::time::Instant;

use chrono::{NaiveTime, Timelike};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{SketchError, SketchResult};

const SECS_PER_DAY: u64 = 24 * 60 * 60;

/// What a sketch may know about "now" when it draws a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct ClockReading {
    /// Milliseconds since the sketch was set up.
    pub elapsed_ms: u64,
    /// Local hour, `0..24`.
    pub hour: u32,
    /// Local minute, `0..60`.
    pub minute: u32,
    /// Local second, `0..60`.
    pub second: u32,
}

impl ClockReading {
    /// Build a reading from a seconds-of-day value (wrapped at midnight).
    pub fn from_seconds_of_day(elapsed_ms: u64, secs: u64) -> Self {
        let secs = secs % SECS_PER_DAY;
        Self {
            elapsed_ms,
            hour: (secs / 3600) as u32,
            minute: ((secs / 60) % 60) as u32,
            second: (secs % 60) as u32,
        }
    }

    /// `HH:MM:SS`, zero padded.
    pub fn hh_mm_ss(&self) -> String {
        format!("{:02}:{:02}:{:02}", self.hour, self.minute, self.second)
    }
}

/// Source of [`ClockReading`]s for the frame being drawn.
pub trait TimeSource: Send + Sync {
    /// Reading for `frame` of a sketch running at `fps`.
    fn reading(&self, frame: FrameIndex, fps: Fps) -> ClockReading;
}

/// Live wall clock: local calendar time and real elapsed time.
#[derive(Debug)]
pub struct SystemClock {
    started: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemClock {
    fn reading(&self, _frame: FrameIndex, _fps: Fps) -> ClockReading {
        let now = chrono::Local::now();
        let elapsed_ms = u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX);
        ClockReading {
            elapsed_ms,
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }
}

/// Deterministic clock: frame `n` at `fps` happens `n / fps` seconds after `start`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulatedClock {
    start: NaiveTime,
}

impl SimulatedClock {
    pub fn new(start: NaiveTime) -> Self {
        Self { start }
    }

    pub fn at_hms(hour: u32, minute: u32, second: u32) -> SketchResult<Self> {
        let start = NaiveTime::from_hms_opt(hour, minute, second).ok_or_else(|| {
            SketchError::validation(format!(
                "invalid start time {hour:02}:{minute:02}:{second:02}"
            ))
        })?;
        Ok(Self { start })
    }

    /// Parses `HH:MM:SS` (24-hour).
    pub fn parse(s: &str) -> SketchResult<Self> {
        let start = NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
            .map_err(|e| SketchError::validation(format!("invalid start time '{s}': {e}")))?;
        Ok(Self { start })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }
}

impl TimeSource for SimulatedClock {
    fn reading(&self, frame: FrameIndex, fps: Fps) -> ClockReading {
        let elapsed_ms = fps.frames_to_millis(frame.0);
        let secs = u64::from(self.start.num_seconds_from_midnight()) + elapsed_ms / 1000;
        ClockReading::from_seconds_of_day(elapsed_ms, secs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/time/clock.rs"]
mod tests;
