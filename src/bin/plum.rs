use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "plum", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render the backdrop after a number of refreshes as a PNG.
    Frame(FrameArgs),
    /// Record the growth as an MP4 video (requires `ffmpeg` on PATH).
    Record(RecordArgs),
    /// Print growth counters as JSON without rasterizing.
    Stats(StatsArgs),
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Viewport width in pixels.
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Document height in pixels.
    #[arg(long, default_value_t = 720)]
    height: u32,

    /// Seed override for the random source.
    #[arg(long)]
    seed: Option<u64>,

    /// Configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct FrameArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Display refreshes to simulate before capturing.
    #[arg(long, default_value_t = 600)]
    refreshes: u64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RecordArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Display refreshes to simulate.
    #[arg(long, default_value_t = 600)]
    refreshes: u64,

    /// Capture a frame after every N-th refresh.
    #[arg(long, default_value_t = 1)]
    every: u64,

    /// Output frames per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Output MP4 path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct StatsArgs {
    #[command(flatten)]
    common: CommonArgs,

    /// Display refreshes to simulate.
    #[arg(long, default_value_t = 600)]
    refreshes: u64,
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Frame(args) => cmd_frame(args),
        Command::Record(args) => cmd_record(args),
        Command::Stats(args) => cmd_stats(args),
    }
}

fn make_recorder(common: &CommonArgs) -> anyhow::Result<plum::Recorder> {
    let mut config = match &common.config {
        Some(path) => plum::PlumConfig::from_path(path)?,
        None => plum::PlumConfig::default(),
    };
    if let Some(seed) = common.seed {
        config.seed = seed;
    }
    let viewport = plum::Viewport {
        inner_width: common.width,
        document_height: common.height,
    };
    Ok(plum::Recorder::new(config, viewport)?)
}

fn cmd_frame(args: FrameArgs) -> anyhow::Result<()> {
    let recorder = make_recorder(&args.common)?;
    let (frame, stats) = recorder.render_frame(args.refreshes)?;
    frame
        .save_png(&args.out, recorder.config().background)
        .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} segments)",
        args.out.display(),
        stats.segments_drawn
    );
    Ok(())
}

fn cmd_record(args: RecordArgs) -> anyhow::Result<()> {
    let recorder = make_recorder(&args.common)?;
    let mut sink_opts = plum::FfmpegSinkOpts::new(&args.out);
    sink_opts.background = recorder.config().background;
    let mut sink = plum::FfmpegSink::new(sink_opts);

    let opts = plum::RecordOpts {
        refreshes: args.refreshes,
        capture_every: args.every,
        fps: plum::Fps::new(args.fps, 1)?,
    };
    let stats = recorder.record(opts, &mut sink)?;

    eprintln!(
        "wrote {} ({} frames)",
        args.out.display(),
        stats.frames_captured
    );
    Ok(())
}

fn cmd_stats(args: StatsArgs) -> anyhow::Result<()> {
    let recorder = make_recorder(&args.common)?;
    let stats = recorder.stats(args.refreshes)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&stats).context("serialize stats")?
    );
    Ok(())
}
