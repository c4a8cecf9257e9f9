use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;

use reelsmith::foundation::core::{Canvas, Fps};
use reelsmith::job::orchestrator::{Job, JobOpts, JobRequest, run_job};
use reelsmith::publish::manifest::{Destination, write_bundles};
use reelsmith::render::driver::DriverThreading;

#[derive(Parser, Debug)]
#[command(name = "reelsmith", version, about = "Render a promo video from a script")]
struct Cli {
    /// Video title, shown as the frame headline (3..=120 characters).
    #[arg(long)]
    title: String,

    /// Script text to animate (at least 10 characters).
    #[arg(long, conflicts_with = "script_file")]
    script: Option<String>,

    /// Read the script from a file instead of the command line.
    #[arg(long)]
    script_file: Option<PathBuf>,

    /// Style label carried through the metadata bundles (3..=40 characters).
    #[arg(long, default_value = "energetic")]
    style: String,

    /// Brand palette hex colors (1..=8 entries; invalid entries are repaired or
    /// replaced by the built-in fallback palette).
    #[arg(long = "palette", value_delimiter = ',')]
    palette: Vec<String>,

    /// Directory for the encoded MP4 and metadata bundles.
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Scratch directory for intermediate frames (cleaned up afterwards).
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Output frame rate.
    #[arg(long, default_value_t = 24)]
    fps: u32,

    /// Frames rendered per scene.
    #[arg(long, default_value_t = 72)]
    frames_per_scene: u64,

    /// Render frames on a rayon thread pool instead of sequentially.
    #[arg(long)]
    parallel: bool,

    /// Worker threads when --parallel is set (defaults to all cores).
    #[arg(long)]
    threads: Option<usize>,

    /// Destinations to emit metadata bundles for.
    #[arg(long = "dest", value_delimiter = ',', default_values = ["feed"])]
    destinations: Vec<Destination>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let req = build_request(&cli)?;

    let opts = JobOpts {
        work_dir: cli
            .work_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir),
        out_dir: cli.out_dir.clone(),
        canvas: Canvas::HD,
        fps: Fps::new(cli.fps).context("invalid --fps")?,
        frames_per_scene: cli.frames_per_scene,
        threading: DriverThreading {
            parallel: cli.parallel,
            threads: cli.threads,
            ..DriverThreading::default()
        },
    };

    let font_bytes = reelsmith::compose::text::load_font_bytes()
        .context("no usable font found (set REELSMITH_FONT to a .ttf/.ttc path)")?;

    let mut job = Job::new();
    let artifact = run_job(&mut job, &req, &opts, font_bytes)?;

    let palette = reelsmith::Palette::from_input(&req.palette);
    let bundles = write_bundles(&job, &req, palette.as_slice(), &cli.destinations, &cli.out_dir)?;

    println!("video: {}", artifact.display());
    for b in bundles {
        println!("bundle: {}", b.display());
    }
    Ok(())
}

/// Request boundary: bounds are enforced here, before a job exists. The pipeline
/// itself repairs content problems (empty scripts, broken palettes) instead.
fn build_request(cli: &Cli) -> anyhow::Result<JobRequest> {
    let title = cli.title.trim().to_string();
    let n = title.chars().count();
    if !(3..=120).contains(&n) {
        anyhow::bail!("--title must be 3..=120 characters (got {n})");
    }

    let script = match (&cli.script, &cli.script_file) {
        (Some(s), _) => s.clone(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("read script file '{}'", path.display()))?,
        (None, None) => anyhow::bail!("one of --script or --script-file is required"),
    };
    let n = script.trim().chars().count();
    if n < 10 {
        anyhow::bail!("script must be at least 10 characters (got {n})");
    }

    let style = cli.style.trim().to_string();
    let n = style.chars().count();
    if !(3..=40).contains(&n) {
        anyhow::bail!("--style must be 3..=40 characters (got {n})");
    }

    if !cli.palette.is_empty() && cli.palette.len() > 8 {
        anyhow::bail!("--palette accepts at most 8 colors (got {})", cli.palette.len());
    }

    Ok(JobRequest {
        title,
        script,
        style,
        palette: cli.palette.clone(),
    })
}
