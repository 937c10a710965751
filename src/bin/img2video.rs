use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "img2video", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a directory of images into a video (requires `ffmpeg` and `ffprobe` on PATH).
    Render(RenderArgs),
    /// Print the images a render would use, in order.
    List(ListArgs),
    /// Print metadata of an existing video (requires `ffprobe` on PATH).
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// JSON config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input directory.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Output directory.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Output base file name, without extension.
    #[arg(long)]
    name: Option<String>,

    /// Output frame rate (`30`, `2.5`, or `30000/1001`).
    #[arg(long)]
    fps: Option<img2video::Fps>,

    /// Output width in pixels; height follows the first image's aspect ratio.
    #[arg(long)]
    width: Option<u32>,

    /// Seconds each image stays on screen.
    #[arg(long)]
    interval: Option<f64>,

    /// Source image extension.
    #[arg(long)]
    ext: Option<String>,

    /// Keep the raw container as the final output instead of transcoding it.
    #[arg(long)]
    no_transcode: bool,

    /// Fail instead of stretching images whose aspect ratio differs from the first one.
    #[arg(long)]
    strict_aspect: bool,
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Input directory.
    #[arg(long)]
    input_dir: PathBuf,

    /// Source image extension.
    #[arg(long, default_value = "png")]
    ext: String,
}

#[derive(Args, Debug)]
struct InspectArgs {
    /// Video file to inspect.
    path: PathBuf,

    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
}

const SEPARATOR: &str = "----------------------------------------";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::List(args) => cmd_list(args),
        Command::Inspect(args) => cmd_inspect(args),
    }
}

fn build_config(args: RenderArgs) -> anyhow::Result<img2video::VideoConfig> {
    let mut cfg = match &args.config {
        Some(path) => img2video::VideoConfig::from_path(path)?,
        None => img2video::VideoConfig::default(),
    };

    if let Some(v) = args.input_dir {
        cfg.input_dir = v;
    }
    if let Some(v) = args.output_dir {
        cfg.output_dir = v;
    }
    if let Some(v) = args.name {
        cfg.name = v;
    }
    if let Some(v) = args.fps {
        cfg.fps = v;
    }
    if let Some(v) = args.width {
        cfg.width = v;
    }
    if let Some(v) = args.interval {
        cfg.interval_secs = v;
    }
    if let Some(v) = args.ext {
        cfg.extension = v;
    }
    if args.no_transcode {
        cfg.transcode = false;
    }
    if args.strict_aspect {
        cfg.aspect_policy = img2video::AspectPolicy::Strict;
    }

    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = build_config(args)?;
    log_config(&cfg);

    let report = img2video::run(&cfg)?;

    log_video_info("raw video", &report.raw_info);
    if let Some(info) = &report.final_info {
        log_video_info("final video", info);
    }
    let out = report.final_info.as_ref().unwrap_or(&report.raw_info);
    eprintln!("wrote {}", out.path.display());
    Ok(())
}

fn cmd_list(args: ListArgs) -> anyhow::Result<()> {
    let images = img2video::resolve_images(&args.input_dir, &args.ext)?;
    for path in images.paths() {
        println!("{}", path.display());
    }
    Ok(())
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let info = img2video::inspect(&args.path)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        println!("path   : {}", info.path.display());
        println!("width  : {}", info.width);
        println!("height : {}", info.height);
        println!("fps    : {}", info.fps);
        println!("frames : {}", info.frame_count);
        println!("length : {:.3} [s]", info.duration_secs);
    }
    Ok(())
}

fn log_config(cfg: &img2video::VideoConfig) {
    tracing::info!("config");
    tracing::info!("{SEPARATOR}");
    tracing::info!("    input_dir  : {}", cfg.input_dir.display());
    tracing::info!("    output_dir : {}", cfg.output_dir.display());
    tracing::info!("    name       : {}", cfg.name);
    tracing::info!("    fps        : {}", cfg.fps);
    tracing::info!("    width      : {}", cfg.width);
    tracing::info!("    interval   : {} [s]", cfg.interval_secs);
    tracing::info!("    extension  : {}", cfg.extension);
    tracing::info!("    transcode  : {}", cfg.transcode);
    tracing::info!("    aspect     : {:?}", cfg.aspect_policy);
    tracing::info!("{SEPARATOR}");
}

fn log_video_info(label: &str, info: &img2video::VideoInfo) {
    tracing::info!("{label}");
    tracing::info!("{SEPARATOR}");
    tracing::info!("    path   : {}", info.path.display());
    tracing::info!("    width  : {}", info.width);
    tracing::info!("    height : {}", info.height);
    tracing::info!("    fps    : {}", info.fps);
    tracing::info!("    frames : {}", info.frame_count);
    tracing::info!("    length : {:.3} [s]", info.duration_secs);
    tracing::info!("{SEPARATOR}");
}
