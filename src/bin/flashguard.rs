use std::{
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use flashguard::{
    ANALYSIS_HEIGHT, ANALYSIS_WIDTH, PixelBuffer, SafetySession, SessionOpts, ThresholdConfig,
};

#[derive(Parser, Debug)]
#[command(name = "flashguard", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze a directory of PNG frames for photosensitive-flash hazards.
    Analyze(AnalyzeArgs),
    /// Print the default threshold configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct AnalyzeArgs {
    /// Directory containing `*.png` frames (analyzed in lexical file-name order).
    #[arg(long)]
    frames: PathBuf,

    /// Frame rate used to derive frame timestamps.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Threshold configuration JSON (partial documents override defaults).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Downsample frames to 480x270 and use viewport-normalized thresholds.
    #[arg(long)]
    normalize: bool,

    /// Stop at the first critical violation.
    #[arg(long)]
    stop_on_violation: bool,

    /// Stop after this many milliseconds of frame time.
    #[arg(long)]
    max_duration_ms: Option<i64>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Analyze(args) => cmd_analyze(args),
        Command::Config => cmd_config(),
    }
}

fn cmd_config() -> anyhow::Result<ExitCode> {
    println!("{}", ThresholdConfig::default().to_json_pretty()?);
    Ok(ExitCode::SUCCESS)
}

fn cmd_analyze(args: AnalyzeArgs) -> anyhow::Result<ExitCode> {
    if !args.fps.is_finite() || args.fps <= 0.0 {
        anyhow::bail!("--fps must be > 0");
    }

    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => ThresholdConfig::default(),
    };
    if args.normalize {
        config = config.with_viewport_normalization(ANALYSIS_WIDTH, ANALYSIS_HEIGHT);
    }
    let opts = SessionOpts {
        stop_on_first_violation: args.stop_on_violation,
        max_duration_ms: args.max_duration_ms,
    };
    let mut session = SafetySession::with_opts(config, opts)?;

    let paths = list_frames(&args.frames)?;
    if paths.is_empty() {
        anyhow::bail!("no png frames found in '{}'", args.frames.display());
    }

    let mut prev: Option<PixelBuffer> = None;
    for (i, path) in paths.iter().enumerate() {
        let curr = match load_frame(path, args.normalize) {
            Ok(buf) => buf,
            Err(e) => {
                eprintln!("skipping frame '{}': {e:#}", path.display());
                continue;
            }
        };
        let timestamp_ms = (i as f64 * 1000.0 / args.fps).round() as i64;
        session
            .analyze(prev.as_ref(), &curr, timestamp_ms)
            .with_context(|| format!("analyze frame '{}'", path.display()))?;
        prev = Some(curr);
        if session.state().is_terminal() {
            break;
        }
    }
    session.finish();

    let report = session.run_report();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{report}");
    }

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(2)
    })
}

fn read_config(path: &Path) -> anyhow::Result<ThresholdConfig> {
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("read config '{}'", path.display()))?;
    ThresholdConfig::from_json_str(&s).with_context(|| format!("parse config '{}'", path.display()))
}

fn list_frames(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in
        std::fs::read_dir(dir).with_context(|| format!("read frames dir '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_png = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("png"));
        if is_png && path.is_file() {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

fn load_frame(path: &Path, normalize: bool) -> anyhow::Result<PixelBuffer> {
    let mut img = image::open(path)
        .with_context(|| format!("decode '{}'", path.display()))?
        .to_rgba8();
    if normalize && (img.width(), img.height()) != (ANALYSIS_WIDTH, ANALYSIS_HEIGHT) {
        img = image::imageops::resize(
            &img,
            ANALYSIS_WIDTH,
            ANALYSIS_HEIGHT,
            image::imageops::FilterType::Triangle,
        );
    }
    let (width, height) = img.dimensions();
    Ok(PixelBuffer::new(width, height, img.into_raw())?)
}
