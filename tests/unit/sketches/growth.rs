use super::*;
use crate::draw::display::DrawOp;

fn reading(hour: u32, minute: u32, second: u32) -> ClockReading {
    ClockReading {
        elapsed_ms: 0,
        hour,
        minute,
        second,
    }
}

fn rng() -> StdRng {
    StdRng::seed_from_u64(7)
}

#[test]
fn trunk_grows_linearly_with_hour() {
    assert_eq!(trunk_height_for(0, 100.0, 0.5), 100.0);
    assert_eq!(trunk_height_for(3, 100.0, 0.5), 115.0);
    assert_eq!(trunk_height_for(3, 100.0, 1.0), 130.0);
    assert_eq!(trunk_height_for(23, 100.0, 0.5), 215.0);
}

#[test]
fn leaf_target_follows_minute_and_caps() {
    assert_eq!(leaf_target(42, 1.0, 100), 42);
    assert_eq!(leaf_target(0, 1.0, 100), 0);
    assert_eq!(leaf_target(59, 2.0, 100), 100);
    assert_eq!(leaf_target(59, 0.5, 100), 29);
}

#[test]
fn advance_places_leaves_in_band_above_trunk() {
    let cfg = GrowthConfig::default();
    let canvas = Canvas::new(800, 600);
    let mut tree = TreeState::new(cfg.base_height);
    let mut rng = rng();

    let added = tree.advance(&reading(3, 42, 1), canvas, &cfg, &mut rng);
    assert_eq!(added, 42);
    assert_eq!(tree.leaves.len(), 42);
    assert_eq!(tree.trunk_height, 115.0);
    for leaf in &tree.leaves {
        assert!((370.0..430.0).contains(&leaf.x), "x = {}", leaf.x);
        let above_top = 600.0 - 115.0 - leaf.y;
        assert!((10.0..30.0).contains(&above_top), "y = {}", leaf.y);
    }

    // Same minute again adds nothing.
    assert_eq!(tree.advance(&reading(3, 42, 2), canvas, &cfg, &mut rng), 0);
    assert_eq!(tree.advance(&reading(3, 43, 0), canvas, &cfg, &mut rng), 1);
}

#[test]
fn leaves_survive_minute_wrap_by_default() {
    let cfg = GrowthConfig::default();
    let canvas = Canvas::new(400, 400);
    let mut tree = TreeState::new(cfg.base_height);
    let mut rng = rng();

    tree.advance(&reading(9, 59, 0), canvas, &cfg, &mut rng);
    let before = tree.leaves.clone();
    tree.advance(&reading(10, 0, 0), canvas, &cfg, &mut rng);
    assert_eq!(tree.leaves, before);
}

#[test]
fn reset_on_hour_clears_leaves_when_hour_changes() {
    let cfg = GrowthConfig {
        leaf_rollover: LeafRollover::ResetOnHour,
        ..GrowthConfig::default()
    };
    let canvas = Canvas::new(400, 400);
    let mut tree = TreeState::new(cfg.base_height);
    let mut rng = rng();

    tree.advance(&reading(9, 59, 0), canvas, &cfg, &mut rng);
    assert_eq!(tree.leaves.len(), 59);
    tree.advance(&reading(10, 0, 0), canvas, &cfg, &mut rng);
    assert!(tree.leaves.is_empty());
    tree.advance(&reading(10, 2, 0), canvas, &cfg, &mut rng);
    assert_eq!(tree.leaves.len(), 2);
}

#[test]
fn reset_on_hour_notices_hour_change_without_minute_drop() {
    let cfg = GrowthConfig {
        leaf_rollover: LeafRollover::ResetOnHour,
        ..GrowthConfig::default()
    };
    let canvas = Canvas::new(400, 400);
    let mut tree = TreeState::new(cfg.base_height);
    let mut rng = rng();

    tree.advance(&reading(10, 30, 0), canvas, &cfg, &mut rng);
    tree.advance(&reading(10, 30, 30), canvas, &cfg, &mut rng);
    let old_leaves = tree.leaves.clone();
    assert_eq!(old_leaves.len(), 30);

    tree.advance(&reading(11, 45, 0), canvas, &cfg, &mut rng);
    assert_eq!(tree.leaves.len(), 45);
    assert!(old_leaves.iter().all(|leaf| !tree.leaves.contains(leaf)));
    assert_eq!(tree.last_hour, Some(11));
}

#[test]
fn hour_rollover_through_runner_and_simulated_clock() {
    use crate::{
        foundation::core::{FrameIndex, Viewport},
        harness::runner::Runner,
        time::clock::{SimulatedClock, TimeSource},
    };

    let leaf_count = |rollover: LeafRollover| {
        let cfg = GrowthConfig {
            leaf_rollover: rollover,
            ..GrowthConfig::default()
        };
        let clock = SimulatedClock::at_hms(10, 59, 59).unwrap();
        let mut r = Runner::start(Box::new(Growth::new(cfg)), Viewport::new(400, 400)).unwrap();
        let mut counts = Vec::new();
        for f in 0..=60 {
            let list = r.step(clock.reading(FrameIndex(f), r.fps())).unwrap();
            counts.push(list.count_where(|op| matches!(op, DrawOp::Ellipse { .. })));
        }
        counts
    };

    // 60 fps: frame 60 is 11:00:00.
    let reset = leaf_count(LeafRollover::ResetOnHour);
    assert_eq!(reset[0], 59);
    assert_eq!(reset[59], 59);
    assert_eq!(reset[60], 0);

    let keep = leaf_count(LeafRollover::Keep);
    assert_eq!(keep[60], 59);
}

#[test]
fn sparkle_only_moves_on_even_seconds_and_stays_small() {
    let cfg = GrowthConfig::default();
    let mut tree = TreeState::new(cfg.base_height);
    let mut rng = rng();
    tree.advance(&reading(0, 10, 0), Canvas::new(400, 400), &cfg, &mut rng);
    let before = tree.leaves.clone();

    tree.sparkle(3, &mut rng);
    assert_eq!(tree.leaves, before);

    tree.sparkle(4, &mut rng);
    for (a, b) in before.iter().zip(&tree.leaves) {
        assert_eq!(a.x, b.x);
        assert!((b.y - a.y).abs() < 1.0);
    }
}

fn frame(sketch: &mut Growth, canvas: Canvas, r: ClockReading) -> crate::DisplayList {
    let mut p = Painter::new(canvas);
    let ctx = FrameContext {
        frame_count: 1,
        reading: r,
        canvas,
    };
    sketch.draw(&ctx, &mut p).unwrap();
    p.finish()
}

#[test]
fn draw_emits_tree_grass_and_labels() {
    let mut s = Growth::new(GrowthConfig::default());
    let canvas = s.setup(Viewport::new(1024, 768)).unwrap().canvas;
    assert_eq!(canvas, Canvas::new(800, 768));

    let list = frame(&mut s, canvas, reading(3, 5, 7));
    assert_eq!(list.texts(), vec![CAPTION, "03:05:07"]);
    // One ellipse per leaf.
    assert_eq!(list.count_where(|op| matches!(op, DrawOp::Ellipse { .. })), 5);
    // Trunk and grass.
    assert_eq!(list.count_where(|op| matches!(op, DrawOp::Rect { .. })), 2);
    assert!(matches!(list.ops.first(), Some(DrawOp::Background(_))));
}

#[test]
fn same_seed_renders_identically() {
    let run = || {
        let mut s = Growth::new(GrowthConfig::default());
        let canvas = s.setup(Viewport::new(600, 600)).unwrap().canvas;
        let _ = frame(&mut s, canvas, reading(1, 20, 0));
        frame(&mut s, canvas, reading(1, 21, 2))
    };
    assert_eq!(run(), run());
}

#[test]
fn setup_resets_state() {
    let mut s = Growth::new(GrowthConfig::default());
    let canvas = s.setup(Viewport::new(300, 300)).unwrap().canvas;
    let _ = frame(&mut s, canvas, reading(1, 30, 1));
    assert_eq!(s.tree().leaves.len(), 30);
    s.setup(Viewport::new(300, 300)).unwrap();
    assert!(s.tree().leaves.is_empty());
}
