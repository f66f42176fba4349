use super::*;
use crate::sketches::{
    countdown::{Countdown, CountdownConfig},
    notebook::{Notebook, NotebookConfig},
};

fn reading(elapsed_ms: u64, secs_of_day: u64) -> ClockReading {
    ClockReading::from_seconds_of_day(elapsed_ms, secs_of_day)
}

#[test]
fn start_runs_setup_and_caps_canvas() {
    let r = Runner::start(
        Box::new(Countdown::new(CountdownConfig::default())),
        Viewport::new(1200, 500),
    )
    .unwrap();
    assert_eq!(r.name(), "countdown");
    assert_eq!(r.canvas(), Canvas::new(800, 500));
    assert_eq!(r.fps(), Fps::whole(60).unwrap());
    assert_eq!(r.frame_count(), 0);
}

#[test]
fn step_counts_frames_and_uses_current_canvas() {
    let mut r = Runner::start(
        Box::new(Countdown::new(CountdownConfig::default())),
        Viewport::new(640, 480),
    )
    .unwrap();
    let list = r.step(reading(0, 0)).unwrap();
    assert_eq!(list.canvas, Canvas::new(640, 480));
    assert_eq!(r.frame_count(), 1);

    assert_eq!(r.resize(Viewport::new(2000, 300)).unwrap(), Canvas::new(800, 300));
    let list = r.step(reading(16, 0)).unwrap();
    assert_eq!(list.canvas, Canvas::new(800, 300));
    assert_eq!(r.frame_count(), 2);
}

#[test]
fn frame_count_seen_by_sketch_is_one_based() {
    let mut r = Runner::start(
        Box::new(Notebook::new(NotebookConfig::default())),
        Viewport::new(400, 400),
    )
    .unwrap();
    // 12:00:03, so the active line reads "Foc" and is still typing.
    let secs = 12 * 3600 + 3;
    for _ in 0..29 {
        let list = r.step(reading(0, secs)).unwrap();
        assert!(list.texts().contains(&"Foc|"));
    }
    // The 30th frame still shows the cursor; it hides from the 31st.
    assert!(r.step(reading(0, secs)).unwrap().texts().contains(&"Foc|"));
    assert!(r.step(reading(0, secs)).unwrap().texts().contains(&"Foc"));
}
