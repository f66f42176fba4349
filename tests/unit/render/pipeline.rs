use super::*;
use crate::{
    encode::ffmpeg::is_ffmpeg_on_path,
    sketches::countdown::{Countdown, CountdownConfig},
    time::clock::SimulatedClock,
};

fn countdown_runner(viewport: Viewport) -> Runner {
    Runner::start(
        Box::new(Countdown::new(CountdownConfig::default())),
        viewport,
    )
    .unwrap()
}

fn noon() -> SimulatedClock {
    SimulatedClock::at_hms(12, 0, 0).unwrap()
}

#[test]
fn render_frame_fast_forwards_sketch_state() {
    let mut runner = countdown_runner(Viewport::new(64, 64));
    let mut backend = CpuBackend::new(RenderSettings::default());
    let frame = render_frame(&mut runner, &noon(), FrameIndex(90), &mut backend).unwrap();
    assert_eq!((frame.width, frame.height), (64, 64));
    assert_eq!(runner.frame_count(), 91);
}

#[test]
fn render_frame_rejects_frames_already_drawn() {
    let mut runner = countdown_runner(Viewport::new(32, 32));
    let mut backend = CpuBackend::new(RenderSettings::default());
    render_frame(&mut runner, &noon(), FrameIndex(5), &mut backend).unwrap();
    let err = render_frame(&mut runner, &noon(), FrameIndex(2), &mut backend).unwrap_err();
    assert!(matches!(err, SketchError::Validation(_)));
}

#[test]
fn countdown_frame_has_background_and_inner_disc() {
    let mut runner = countdown_runner(Viewport::new(400, 400));
    let mut backend = CpuBackend::new(RenderSettings::default());
    let frame = render_frame(&mut runner, &noon(), FrameIndex(0), &mut backend).unwrap();

    // HSB(0, 0, 98) background, HSB(0, 0, 100) disc well above the text.
    assert_eq!(frame.pixel(2, 2), Some([250, 250, 250, 255]));
    assert_eq!(frame.pixel(200, 90), Some([255, 255, 255, 255]));
}

#[test]
fn render_frames_returns_one_frame_per_index() {
    let mut runner = countdown_runner(Viewport::new(48, 32));
    let mut backend = CpuBackend::new(RenderSettings::default());
    let range = FrameRange::new(FrameIndex(3), FrameIndex(7)).unwrap();
    let frames = render_frames(&mut runner, &noon(), range, &mut backend).unwrap();
    assert_eq!(frames.len(), 4);
    assert!(frames.iter().all(|f| f.width == 48 && f.height == 32));
    assert_eq!(runner.frame_count(), 7);

    let empty = FrameRange::new(FrameIndex(9), FrameIndex(9)).unwrap();
    assert!(render_frames(&mut runner, &noon(), empty, &mut backend).is_err());
}

#[test]
fn gallery_renders_every_kind_in_order() {
    let mut cfg = SketchbookConfig::default();
    cfg.balance.data_path = "definitely/missing.csv".into();
    let frames = render_gallery(
        &cfg,
        &SketchKind::ALL,
        Viewport::new(200, 120),
        &noon(),
        FrameIndex(1),
        &RenderSettings::default(),
    )
    .unwrap();

    let kinds: Vec<_> = frames.iter().map(|g| g.kind).collect();
    assert_eq!(kinds, SketchKind::ALL.to_vec());
    for g in &frames {
        let expected = match g.kind {
            SketchKind::Balance => (1000, 750),
            _ => (200, 120),
        };
        assert_eq!((g.frame.width, g.frame.height), expected, "{}", g.kind);
    }
}

#[test]
fn mp4_rejects_odd_canvas() {
    let mut runner = countdown_runner(Viewport::new(33, 32));
    let mut backend = CpuBackend::new(RenderSettings::default());
    let out = std::env::temp_dir().join("sketchbook_odd_canvas.mp4");
    let err = render_to_mp4(
        &mut runner,
        &noon(),
        &out,
        RenderToMp4Opts::default(),
        &mut backend,
    )
    .unwrap_err();
    assert!(matches!(err, SketchError::Validation(_)));
}

#[test]
fn mp4_smoke_when_ffmpeg_available() {
    if !is_ffmpeg_on_path() {
        return;
    }
    let mut runner = countdown_runner(Viewport::new(64, 64));
    let mut backend = CpuBackend::new(RenderSettings::default());
    let out = std::env::temp_dir().join(format!("sketchbook_smoke_{}.mp4", std::process::id()));
    let opts = RenderToMp4Opts {
        range: FrameRange::new(FrameIndex(0), FrameIndex(6)).unwrap(),
        ..RenderToMp4Opts::default()
    };
    render_to_mp4(&mut runner, &noon(), &out, opts, &mut backend).unwrap();
    assert!(std::fs::metadata(&out).map(|m| m.len() > 0).unwrap_or(false));
    let _ = std::fs::remove_file(&out);
}

#[test]
fn render_frames_matches_frames_rendered_from_scratch() {
    let clock = SimulatedClock::at_hms(9, 0, 0).unwrap();
    let mut backend = CpuBackend::new(RenderSettings::default());

    let mut runner = countdown_runner(Viewport::new(64, 64));
    let range = FrameRange::new(FrameIndex(118), FrameIndex(122)).unwrap();
    let frames = render_frames(&mut runner, &clock, range, &mut backend).unwrap();

    for (offset, frame) in frames.iter().enumerate() {
        let mut fresh = countdown_runner(Viewport::new(64, 64));
        let single = render_frame(
            &mut fresh,
            &clock,
            FrameIndex(118 + offset as u64),
            &mut backend,
        )
        .unwrap();
        assert_eq!(frame.data, single.data, "frame {}", 118 + offset);
    }
}
