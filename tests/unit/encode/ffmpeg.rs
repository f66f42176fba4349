use super::*;

fn fps(n: u32, d: u32) -> Fps {
    Fps::new(n, d).unwrap()
}

#[test]
fn config_follows_sketch_canvas() {
    let cfg = EncodeConfig::for_canvas(Canvas::new(800, 600), fps(60, 1), "out/a.mp4", false)
        .unwrap();
    assert_eq!((cfg.width, cfg.height, cfg.fps), (800, 600, 60));
    assert_eq!(cfg.out_path, PathBuf::from("out/a.mp4"));
    assert!(!cfg.overwrite);
}

#[test]
fn config_rejects_odd_canvas_and_fractional_fps() {
    let odd = EncodeConfig::for_canvas(Canvas::new(801, 600), fps(60, 1), "a.mp4", true);
    assert!(matches!(odd, Err(SketchError::Validation(_))));

    let ntsc = EncodeConfig::for_canvas(Canvas::new(800, 600), fps(30000, 1001), "a.mp4", true);
    assert!(matches!(ntsc, Err(SketchError::Validation(_))));

    let zero_fps = EncodeConfig {
        width: 10,
        height: 10,
        fps: 0,
        out_path: PathBuf::from("a.mp4"),
        overwrite: true,
    };
    assert!(zero_fps.validate().is_err());
}

#[test]
fn ffmpeg_args_describe_rawvideo_to_h264() {
    let cfg =
        EncodeConfig::for_canvas(Canvas::new(64, 48), fps(30, 1), "clip.mp4", true).unwrap();
    let args = cfg.ffmpeg_args();
    assert_eq!(args.first().map(String::as_str), Some("-y"));
    assert_eq!(args.last().map(String::as_str), Some("clip.mp4"));
    let joined = args.join(" ");
    assert!(joined.contains("-s 64x48"));
    assert!(joined.contains("-r 30"));
    assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p"));

    let keep = EncodeConfig {
        overwrite: false,
        ..cfg
    };
    assert_eq!(keep.ffmpeg_args()[0], "-n");
}

#[test]
fn flatten_premul_over_black_keeps_color() {
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &[128, 0, 0, 128], true, [0, 0, 0, 255]).unwrap();
    assert_eq!(dst, vec![128, 0, 0, 255]);
}

#[test]
fn flatten_straight_over_white_blends() {
    let mut dst = vec![0u8; 4];
    flatten_to_opaque_rgba8(&mut dst, &[255, 0, 0, 128], false, [255, 255, 255, 255]).unwrap();
    assert_eq!(dst, vec![255, 127, 127, 255]);
}

#[test]
fn flatten_rejects_mismatched_buffers() {
    let mut dst = vec![0u8; 8];
    assert!(flatten_to_opaque_rgba8(&mut dst, &[0u8; 4], true, [0, 0, 0, 255]).is_err());
}

#[test]
fn encoder_refuses_existing_file_without_overwrite() {
    let out = std::env::temp_dir().join(format!("sketchbook_exists_{}.mp4", std::process::id()));
    std::fs::write(&out, b"x").unwrap();
    let cfg = EncodeConfig::for_canvas(Canvas::new(16, 16), fps(30, 1), &out, false).unwrap();
    assert!(matches!(
        FfmpegEncoder::new(cfg, [255, 255, 255, 255]),
        Err(SketchError::Validation(_))
    ));
    let _ = std::fs::remove_file(&out);
}
