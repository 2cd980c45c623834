use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lightfield", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Summarize a pose document.
    Inspect(InspectArgs),
    /// Write the keyframe table and smoothed path as JSON.
    Keyframes(KeyframesArgs),
    /// Blend one focal window of source images into a PNG.
    Composite(CompositeArgs),
}

#[derive(Parser, Debug)]
struct InspectArgs {
    /// Pose document (JSON with an `images` or `frames` array).
    #[arg(long)]
    poses: PathBuf,

    /// Keep every n-th complete record.
    #[arg(long, default_value_t = 1)]
    stride: usize,
}

#[derive(Parser, Debug)]
struct KeyframesArgs {
    /// Pose document.
    #[arg(long)]
    poses: PathBuf,

    /// Output JSON path.
    #[arg(long)]
    out: PathBuf,

    /// Keep every n-th complete record.
    #[arg(long, default_value_t = 1)]
    stride: usize,

    /// Fraction of path points kept by decimation.
    #[arg(long)]
    keep_fraction: Option<f64>,
}

#[derive(Parser, Debug)]
struct CompositeArgs {
    /// Pose document.
    #[arg(long)]
    poses: PathBuf,

    /// Directory holding the source images named by the pose records.
    #[arg(long)]
    images: PathBuf,

    /// Timeline position (0-based sample index).
    #[arg(long)]
    position: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,

    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width.
    #[arg(long)]
    width: Option<usize>,

    /// Focus offset.
    #[arg(long, allow_hyphen_values = true)]
    focus: Option<f64>,

    /// Window start policy.
    #[arg(long, value_enum)]
    profile: Option<ProfileChoice>,

    /// Use the pixel-shift focus model with this factor.
    #[arg(long, allow_hyphen_values = true)]
    pixel_shift_factor: Option<f64>,

    /// Mask image whose luminance scales every source's alpha.
    #[arg(long)]
    mask: Option<PathBuf>,

    /// Keep every n-th complete record.
    #[arg(long)]
    stride: Option<usize>,

    /// Output opacity scalar.
    #[arg(long)]
    target_alpha: Option<f32>,

    /// Blend rows on the rayon pool.
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ProfileChoice {
    FromNext,
    FromCurrent,
}

impl From<ProfileChoice> for lightfield::WindowProfile {
    fn from(p: ProfileChoice) -> Self {
        match p {
            ProfileChoice::FromNext => Self::FromNext,
            ProfileChoice::FromCurrent => Self::FromCurrent,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Inspect(args) => cmd_inspect(args),
        Command::Keyframes(args) => cmd_keyframes(args),
        Command::Composite(args) => cmd_composite(args),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_poses(path: &Path, stride: usize) -> anyhow::Result<lightfield::CameraSequence> {
    lightfield::parse_file(path, stride)
        .with_context(|| format!("parse pose document '{}'", path.display()))
}

fn cmd_inspect(args: InspectArgs) -> anyhow::Result<()> {
    let seq = load_poses(&args.poses, args.stride)?;
    println!("samples: {}", seq.len());
    if let Some(span) = seq.time_span() {
        println!("time span: {:.3}s", span.num_milliseconds() as f64 / 1000.0);
    }
    let last = seq.len().checked_sub(1).and_then(|i| seq.get(i));
    for (label, sample) in [("first", seq.get(0)), ("last", last)] {
        if let Some(s) = sample {
            println!(
                "{label}: {} at ({:.3}, {:.3}, {:.3}) fovy {:.2} @ {}",
                s.image_file,
                s.position.x,
                s.position.y,
                s.position.z,
                s.fovy_deg,
                s.timestamp.to_rfc3339()
            );
        }
    }
    Ok(())
}

fn cmd_keyframes(args: KeyframesArgs) -> anyhow::Result<()> {
    let seq = load_poses(&args.poses, args.stride)?;
    let mut settings = lightfield::TrajectorySettings::default();
    if let Some(f) = args.keep_fraction {
        settings.keep_fraction = f;
    }
    let trajectory = lightfield::Trajectory::build_with(&seq, &settings)?;

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&args.out, trajectory.to_json()?)
        .with_context(|| format!("write keyframes '{}'", args.out.display()))?;

    eprintln!(
        "wrote {} ({} keyframes)",
        args.out.display(),
        trajectory.keyframes().len()
    );
    Ok(())
}

fn cmd_composite(args: CompositeArgs) -> anyhow::Result<()> {
    let mut cfg = match &args.config {
        Some(p) => lightfield::LightFieldConfig::from_json_file(p)?,
        None => lightfield::LightFieldConfig::default(),
    };
    if let Some(v) = args.stride {
        cfg.stride = v;
    }
    if let Some(v) = args.width {
        cfg.window.width = v;
    }
    if let Some(v) = args.focus {
        cfg.window.focus = v;
    }
    if let Some(v) = args.profile {
        cfg.window.profile = v.into();
    }
    if let Some(factor) = args.pixel_shift_factor {
        cfg.window.model = lightfield::FocusModel::PixelShift { factor };
    }
    if let Some(v) = args.target_alpha {
        cfg.composite.target_mean_alpha = v;
    }
    if args.parallel {
        cfg.composite.parallel_rows = true;
    }
    if cfg.window.model == lightfield::FocusModel::UniformShift && cfg.window.focus != 0.0 {
        tracing::warn!("source images cannot be displaced; use --pixel-shift-factor to refocus");
    }

    let mut session = lightfield::LightFieldSession::new(cfg)?;
    session.load_file(&args.poses)?;

    let mut renderer = lightfield::SourceImageRenderer::new(&args.images);
    if let Some(mask_path) = &args.mask {
        let mask = lightfield::read_pixel_buffer(mask_path)
            .with_context(|| format!("read mask '{}'", mask_path.display()))?;
        renderer = renderer.with_mask(mask);
    }

    let result = session.render_at(args.position, &mut renderer)?;
    lightfield::write_png(&args.out, &result.buffer)?;

    eprintln!(
        "wrote {} ({} contributing images)",
        args.out.display(),
        result.non_transparent_count
    );
    Ok(())
}
