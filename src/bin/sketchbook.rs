use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use sketchbook::{
    BackendKind, FrameIndex, FrameRange, RenderToMp4Opts, Runner, SimulatedClock, SketchKind,
    SketchbookConfig, Viewport, create_backend, render_frame, render_gallery, render_to_mp4,
    save_png,
};

#[derive(Parser, Debug)]
#[command(name = "sketchbook", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List registered sketches.
    List,
    /// Render a single frame of one sketch as a PNG.
    Frame(FrameArgs),
    /// Render an MP4 video of one sketch (requires `ffmpeg` on PATH).
    Render(RenderArgs),
    /// Render the same frame of every sketch as PNGs, in parallel.
    Gallery(GalleryArgs),
}

#[derive(Args, Debug)]
struct SharedArgs {
    /// JSON config file; defaults apply to anything it leaves out.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Dataset CSV for the balance chart.
    #[arg(long)]
    data: Option<PathBuf>,

    /// Wall-clock time of frame 0 as HH:MM:SS (defaults to the current local time).
    #[arg(long, value_parser = SimulatedClock::parse)]
    at: Option<SimulatedClock>,

    /// Window size the sketches are hosted in.
    #[arg(long, default_value = "800x800")]
    viewport: Viewport,

    /// Extra font directory (repeatable).
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[arg(long, value_enum)]
    sketch: SketchKind,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[arg(long, value_enum)]
    sketch: SketchKind,

    /// First frame to encode.
    #[arg(long, default_value_t = 0)]
    start: u64,

    /// Number of frames to encode.
    #[arg(long)]
    frames: u64,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,

    /// Fail instead of overwriting an existing output file.
    #[arg(long)]
    no_overwrite: bool,

    #[command(flatten)]
    shared: SharedArgs,
}

#[derive(Parser, Debug)]
struct GalleryArgs {
    /// Directory receiving one `<sketch>.png` per sketch.
    #[arg(long)]
    out_dir: PathBuf,

    /// Frame index (0-based).
    #[arg(long, default_value_t = 0)]
    frame: u64,

    #[command(flatten)]
    shared: SharedArgs,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::List => cmd_list(),
        Command::Frame(args) => cmd_frame(args),
        Command::Render(args) => cmd_render(args),
        Command::Gallery(args) => cmd_gallery(args),
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(shared: &SharedArgs) -> anyhow::Result<SketchbookConfig> {
    let mut cfg = match &shared.config {
        Some(path) => SketchbookConfig::from_path(path)?,
        None => SketchbookConfig::default(),
    };
    if let Some(data) = &shared.data {
        cfg.balance.data_path = data.clone();
    }
    cfg.render.font_dirs.extend(shared.font_dirs.iter().cloned());
    Ok(cfg)
}

fn clock(shared: &SharedArgs) -> SimulatedClock {
    shared
        .at
        .unwrap_or_else(|| SimulatedClock::new(chrono::Local::now().time()))
}

fn cmd_list() -> anyhow::Result<()> {
    for kind in SketchKind::ALL {
        println!("{:<10} {}", kind.name(), kind.description());
    }
    Ok(())
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.shared)?;
    let mut runner = Runner::start(args.sketch.build(&cfg), args.shared.viewport)?;
    let mut backend = create_backend(BackendKind::Cpu, &cfg.render)?;

    let frame = render_frame(
        &mut runner,
        &clock(&args.shared),
        FrameIndex(args.frame),
        backend.as_mut(),
    )?;
    save_png(&frame, &args.out).with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.shared)?;
    let mut runner = Runner::start(args.sketch.build(&cfg), args.shared.viewport)?;
    let mut backend = create_backend(BackendKind::Cpu, &cfg.render)?;

    let end = args
        .start
        .checked_add(args.frames)
        .context("frame range overflows")?;
    let opts = RenderToMp4Opts {
        range: FrameRange::new(FrameIndex(args.start), FrameIndex(end))?,
        bg_rgba: cfg.render.clear_rgba.unwrap_or([255, 255, 255, 255]),
        overwrite: !args.no_overwrite,
    };
    render_to_mp4(
        &mut runner,
        &clock(&args.shared),
        args.out.clone(),
        opts,
        backend.as_mut(),
    )?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_gallery(args: GalleryArgs) -> anyhow::Result<()> {
    let cfg = load_config(&args.shared)?;
    let frames = render_gallery(
        &cfg,
        &SketchKind::ALL,
        args.shared.viewport,
        &clock(&args.shared),
        FrameIndex(args.frame),
        &cfg.render,
    )?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("create output dir '{}'", args.out_dir.display()))?;
    for g in frames {
        let path = args.out_dir.join(format!("{}.png", g.kind.name()));
        save_png(&g.frame, &path).with_context(|| format!("write png '{}'", path.display()))?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}
