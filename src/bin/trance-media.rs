use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "trance-media", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode a file and print its kind, frame count and size as JSON.
    Probe(ProbeArgs),
    /// Re-encode an animation or still as VP8 WebM.
    Transcode(TranscodeArgs),
    /// Write every frame of an animation as a numbered still.
    Frames(FramesArgs),
}

#[derive(Parser, Debug)]
struct ProbeArgs {
    /// Input GIF, WebM or still image.
    path: PathBuf,
}

#[derive(Parser, Debug)]
struct TranscodeArgs {
    /// Input GIF, WebM or still image.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output `.webm` path.
    #[arg(long)]
    out: PathBuf,

    /// Output frames per second.
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Target bitrate in kbit/s.
    #[arg(long, default_value_t = 1000)]
    bitrate: u32,

    /// Encoder deadline.
    #[arg(long, value_enum, default_value_t = DeadlineArg::Good)]
    deadline: DeadlineArg,
}

#[derive(Parser, Debug)]
struct FramesArgs {
    /// Input GIF or WebM.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Output path template, e.g. `out/frame.png` for `out/frame_000.png`, ...
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DeadlineArg {
    Realtime,
    Good,
    Best,
}

impl From<DeadlineArg> for trance_media::Deadline {
    fn from(d: DeadlineArg) -> Self {
        match d {
            DeadlineArg::Realtime => Self::Realtime,
            DeadlineArg::Good => Self::GoodQuality,
            DeadlineArg::Best => Self::BestQuality,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::builder().from_env_lossy())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Probe(args) => cmd_probe(args),
        Command::Transcode(args) => cmd_transcode(args),
        Command::Frames(args) => cmd_frames(args),
    }
}

fn load_frames(path: &std::path::Path) -> anyhow::Result<Vec<trance_media::Image>> {
    let frames = if trance_media::MediaKind::from_path(path).is_animation() {
        trance_media::try_load_animation(path)?
    } else {
        vec![trance_media::try_load_image(path)?]
    };
    if frames.is_empty() {
        anyhow::bail!("'{}' has no frames", path.display());
    }
    Ok(frames)
}

fn cmd_probe(args: ProbeArgs) -> anyhow::Result<()> {
    let summary = trance_media::summarize(&args.path)
        .with_context(|| format!("probe '{}'", args.path.display()))?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn cmd_transcode(args: TranscodeArgs) -> anyhow::Result<()> {
    let frames = load_frames(&args.in_path)?;
    let (width, height) = (frames[0].width(), frames[0].height());

    let mut opts = trance_media::WebmExporterOpts::new(
        &args.out,
        width,
        height,
        trance_media::Fps::whole(args.fps)?,
        args.bitrate,
    );
    opts.deadline = args.deadline.into();
    let mut exporter = trance_media::WebmExporter::try_new(opts)
        .with_context(|| format!("open '{}'", args.out.display()))?;
    let n = trance_media::export_images(&frames, &mut exporter)?;

    eprintln!("wrote {} ({n} frames)", args.out.display());
    Ok(())
}

fn cmd_frames(args: FramesArgs) -> anyhow::Result<()> {
    let frames = load_frames(&args.in_path)?;
    let (width, height) = (frames[0].width(), frames[0].height());

    let mut exporter =
        trance_media::FrameExporter::new(&args.out, width, height, frames.len() as u64);
    let n = trance_media::export_images(&frames, &mut exporter)?;

    eprintln!("wrote {n} frames next to {}", args.out.display());
    Ok(())
}
