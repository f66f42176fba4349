use super::*;
use crate::{draw::display::DrawOp, time::clock::ClockReading};

const MIN: u64 = 60_000;

fn ctx(frame_count: u64, elapsed_ms: u64, canvas: Canvas) -> FrameContext {
    FrameContext {
        frame_count,
        reading: ClockReading::from_seconds_of_day(elapsed_ms, 12 * 3600),
        canvas,
    }
}

fn draw_at(sketch: &mut Countdown, canvas: Canvas, elapsed_ms: u64) -> crate::DisplayList {
    let mut p = Painter::new(canvas);
    sketch.draw(&ctx(1, elapsed_ms, canvas), &mut p).unwrap();
    p.finish()
}

#[test]
fn twenty_of_twenty_five_minutes_leaves_five_and_warns() {
    let t = TimerState::new(25 * MIN, 0);
    assert_eq!(t.remaining_ms(20 * MIN), 5 * MIN);
    assert_eq!(status_for(t.remaining_ms(20 * MIN), 5 * MIN), TimerStatus::Warning);
    assert_eq!(status_for(t.remaining_ms(20 * MIN - 1), 5 * MIN), TimerStatus::Running);
}

#[test]
fn finished_at_and_after_total() {
    let t = TimerState::new(25 * MIN, 0);
    for now in [25 * MIN, 25 * MIN + 1, 90 * MIN] {
        assert_eq!(t.remaining_ms(now), 0);
        assert_eq!(t.remaining_ratio(now), 0.0);
        assert_eq!(status_for(t.remaining_ms(now), 5 * MIN), TimerStatus::Finished);
    }
}

#[test]
fn remaining_is_clamped_to_total_and_ratio_is_monotone() {
    let t = TimerState::new(10 * MIN, 5_000);
    assert_eq!(t.remaining_ms(0), 10 * MIN);
    assert_eq!(t.remaining_ratio(0), 1.0);

    let mut prev = f64::INFINITY;
    for now in (0..12 * MIN).step_by(7_919) {
        let r = t.remaining_ratio(now);
        assert!((0.0..=1.0).contains(&r));
        assert!(r <= prev, "ratio increased at {now}");
        prev = r;
    }
}

#[test]
fn zero_total_is_immediately_finished() {
    let t = TimerState::new(0, 0);
    assert_eq!(t.remaining_ratio(0), 0.0);
    assert_eq!(status_for(t.remaining_ms(0), 0), TimerStatus::Finished);
}

#[test]
fn pause_freezes_and_resume_continues() {
    let mut t = TimerState::new(25 * MIN, 0);
    t.pause(3 * MIN);
    assert_eq!(t.elapsed_ms(10 * MIN), 3 * MIN);
    t.pause(11 * MIN);
    assert_eq!(t.elapsed_ms(12 * MIN), 3 * MIN);

    t.resume(20 * MIN);
    assert_eq!(t.elapsed_ms(21 * MIN), 4 * MIN);
    assert_eq!(t.remaining_ms(21 * MIN), 21 * MIN);
}

#[test]
fn mm_ss_truncates_to_whole_seconds() {
    assert_eq!(format_mm_ss(25 * MIN), "25:00");
    assert_eq!(format_mm_ss(61_999), "01:01");
    assert_eq!(format_mm_ss(999), "00:00");
    assert_eq!(format_mm_ss(0), "00:00");
}

#[test]
fn hue_runs_green_to_red() {
    assert_eq!(hue_for_ratio(1.0), 120.0);
    assert_eq!(hue_for_ratio(0.5), 60.0);
    assert_eq!(hue_for_ratio(0.0), 0.0);
    assert_eq!(hue_for_ratio(7.0), 120.0);
}

#[test]
fn ring_geometry_scales_with_short_side() {
    let g = RingGeometry::for_canvas(Canvas::new(800, 600));
    assert!((g.outer_radius - 228.0).abs() < 1e-9);
    assert!((g.thickness - 31.92).abs() < 1e-9);
    assert!((g.inner_radius - (228.0 - 31.92 * 0.6)).abs() < 1e-9);
    assert_eq!(g.center, Point::new(400.0, 300.0));

    let small = RingGeometry::for_canvas(Canvas::new(100, 100));
    assert_eq!(small.thickness, 10.0);
    assert_eq!(small.time_size, 20.0);
    assert_eq!(small.message_size, 12.0);
}

#[test]
fn setup_caps_canvas_and_applies_offset() {
    let mut s = Countdown::new(CountdownConfig {
        start_offset_secs: 20 * 60,
        ..CountdownConfig::default()
    });
    let setup = s.setup(Viewport::new(1920, 700)).unwrap();
    assert_eq!(setup.canvas, Canvas::new(800, 700));
    assert_eq!(setup.fps, Fps::whole(60).unwrap());
    assert_eq!(s.timer().remaining_ms(0), 5 * MIN);

    assert_eq!(s.window_resized(Viewport::new(300, 2000)), Canvas::new(300, 800));
}

#[test]
fn draw_shows_time_and_status() {
    let mut s = Countdown::new(CountdownConfig::default());
    let canvas = s.setup(Viewport::new(800, 800)).unwrap().canvas;

    let list = draw_at(&mut s, canvas, 20 * MIN);
    assert_eq!(list.texts(), vec!["05:00", "Hang on, you're almost there"]);
    assert_eq!(list.count_where(|op| matches!(op, DrawOp::Arc { .. })), 2);

    let list = draw_at(&mut s, canvas, 0);
    assert_eq!(list.texts(), vec!["25:00", "Stay in the zone ✨"]);

    let list = draw_at(&mut s, canvas, 30 * MIN);
    assert_eq!(list.texts(), vec!["00:00", "You did it!"]);
    // Only the track remains once the progress arc is empty.
    assert_eq!(list.count_where(|op| matches!(op, DrawOp::Arc { .. })), 1);
}

#[test]
fn progress_arc_starts_at_top_and_sweeps_remaining_fraction() {
    let mut s = Countdown::new(CountdownConfig::default());
    let canvas = s.setup(Viewport::new(400, 400)).unwrap().canvas;
    let list = draw_at(&mut s, canvas, 25 * MIN / 4);

    let arcs: Vec<_> = list
        .ops
        .iter()
        .filter_map(|op| match op {
            DrawOp::Arc {
                start_angle,
                sweep_angle,
                ..
            } => Some((*start_angle, *sweep_angle)),
            _ => None,
        })
        .collect();
    assert_eq!(arcs.len(), 2);
    assert_eq!(arcs[0], (0.0, TAU));
    assert!((arcs[1].0 + FRAC_PI_2).abs() < 1e-12);
    assert!((arcs[1].1 - TAU * 0.75).abs() < 1e-9);
}

#[test]
fn pause_after_freezes_display() {
    let mut s = Countdown::new(CountdownConfig {
        pause_after_secs: Some(60),
        ..CountdownConfig::default()
    });
    let canvas = s.setup(Viewport::new(400, 400)).unwrap().canvas;

    let _ = draw_at(&mut s, canvas, 90_000);
    assert!(s.timer().paused);
    let list = draw_at(&mut s, canvas, 10 * MIN);
    assert_eq!(list.texts()[0], "24:00");

    s.timer_mut().resume(10 * MIN);
    assert_eq!(s.timer().remaining_ms(11 * MIN), 23 * MIN);
}
