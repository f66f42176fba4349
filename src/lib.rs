//! Sketchbook hosts small time-driven drawings and renders them to pixels.
//!
//! Four sketches are registered: a countdown ring, a tree-growth clock, a typewriter notebook,
//! and a static diet-balance chart. Each one records drawing primitives through a [`Painter`]
//! every frame; a [`RenderBackend`] turns the resulting [`DisplayList`] into RGBA pixels, which
//! can be written as PNG or streamed to `ffmpeg` as MP4.
//!
//! - Pick a [`SketchKind`] and build it from a [`SketchbookConfig`]
//! - Host it in a [`Runner`] and feed it [`ClockReading`]s from a [`TimeSource`]
//! - Render with [`render_frame`], [`render_frames`], [`render_to_mp4`] or [`render_gallery`]
#![forbid(unsafe_code)]

mod foundation;

pub(crate) mod config;
pub(crate) mod data;
pub(crate) mod draw;
pub(crate) mod encode;
pub(crate) mod harness;
pub(crate) mod render;
pub(crate) mod sketches;
pub(crate) mod time;

pub use crate::foundation::core::{
    Affine, Canvas, Fps, FrameIndex, FrameRange, Point, Rect, Vec2, Viewport,
};
pub use crate::foundation::error::{SketchError, SketchResult};
pub use crate::foundation::math::{lerp, map_range, ratio_or};

pub use crate::config::SketchbookConfig;
pub use crate::data::diet::{
    Classification, DEFAULT_BALANCE_THRESHOLD, DataState, DietColumns, DietRecord, DietSummary,
    classify, load_diet_csv, max_abs_balance, parse_diet_csv, summarize,
};
pub use crate::draw::color::{Hsba, Rgba8, lerp_rgba8};
pub use crate::draw::display::{
    AlignX, AlignY, ArcMode, DisplayList, DrawOp, Paint, StrokeCap, StrokeStyle, TextStyle,
};
pub use crate::draw::painter::{DEFAULT_FONT_FAMILY, Painter};
pub use crate::encode::ffmpeg::{EncodeConfig, FfmpegEncoder, ensure_parent_dir, is_ffmpeg_on_path};
pub use crate::encode::png::save_png;
pub use crate::harness::registry::SketchKind;
pub use crate::harness::runner::Runner;
pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::cpu::CpuBackend;
pub use crate::render::pipeline::{
    GalleryFrame, RenderToMp4Opts, render_frame, render_frames, render_gallery, render_to_mp4,
};
pub use crate::render::text::{FontBook, TextLayoutEngine};
pub use crate::sketches::balance::{
    Balance, BalanceConfig, PlateGeometry, classification_color,
};
pub use crate::sketches::countdown::{
    Countdown, CountdownConfig, RingGeometry, TimerState, TimerStatus, format_mm_ss,
    hue_for_ratio, status_for,
};
pub use crate::sketches::growth::{
    Growth, GrowthConfig, Leaf, LeafRollover, TreeState, leaf_target, trunk_height_for,
};
pub use crate::sketches::notebook::{Notebook, NotebookConfig, NotebookState, phrase_for};
pub use crate::sketches::{FrameContext, Sketch, SketchSetup};
pub use crate::time::clock::{ClockReading, SimulatedClock, SystemClock, TimeSource};
