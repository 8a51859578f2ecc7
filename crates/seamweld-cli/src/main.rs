//! seamweld - seam-hiding gradient-domain texture atlas blender
//!
//! Drives the coherent-index builder, luminance conditioner, discrete
//! multigrid solver, adjustment propagator, and panorama tiler from the
//! command line.

// Allow Option<Option<T>> for CLI log argument:
// - None = no logging
// - Some(None) = log to default path
// - Some(Some(path)) = log to custom path
#![allow(clippy::option_option)]

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

// =============================================================================
// Logging infrastructure
// =============================================================================

/// Global logger instance for file logging.
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

/// File logger that writes messages to a log file.
struct Logger {
    file: File,
}

impl Logger {
    /// Creates a new logger writing to the specified path (append mode).
    fn new(path: &PathBuf) -> std::io::Result<Self> {
        let file = File::options().append(true).create(true).open(path)?;
        Ok(Self { file })
    }

    /// Writes a message to the log file.
    fn log(&mut self, msg: &str) {
        let _ = writeln!(self.file, "{msg}");
    }
}

/// Logs a message to stderr and optionally to the log file.
pub fn log(msg: &str) {
    eprintln!("{msg}");
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(msg);
        }
    }
}

/// Returns the default log file path (next to the binary).
fn get_default_log_path() -> PathBuf {
    if let Ok(exe_path) = std::env::current_exe() {
        let mut log_path = exe_path;
        log_path.set_extension("log");
        log_path
    } else {
        PathBuf::from("seamweld.log")
    }
}

/// Initialize tracing based on verbosity level.
fn init_tracing(verbose: u8, log_path: Option<&PathBuf>) {
    let filter = match verbose {
        0 => "warn",
        1 => "seamweld=info",
        2 => "seamweld=debug",
        _ => "seamweld=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if let Some(path) = log_path {
        let log_dir = path.parent().unwrap_or(Path::new("."));
        let log_filename = path.file_name().unwrap_or(std::ffi::OsStr::new("seamweld.log"));
        let file_appender = tracing_appender::rolling::never(log_dir, log_filename);

        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .with_ansi(false)
            .with_writer(file_appender)
            .init();
    } else if verbose > 0 {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_timer(fmt::time::uptime())
            .init();
    }
}

#[derive(Parser)]
#[command(name = "seamweld")]
#[command(author, version, about = "Seam-hiding gradient-domain texture atlas blender")]
#[command(long_about = "
Builds a coherent scene index from rover observations, conditions their
luminance/chroma, blends away cross-observation seams with a discrete
multigrid solver, propagates the solved adjustment back onto each
observation, and (for sky textures) drives the whole pipeline tile-wise
over a wrap-aware panorama grid.

Examples:
  seamweld info obs_a.png obs_b.png
  seamweld condition obs_a.png obs_b.png --strength 0.6 --out-dir conditioned/
  seamweld blend --composite composite.png --region region.png -o blended.png
  seamweld propagate --index index.png --blurred blurred.png --blended blended.png \\
      --observations obs.yaml --out-dir corrections/
  seamweld shrinkwrap --grid-resolution 32 --mode nearest-point
  seamweld panorama --rows 2 --cols 8 --tile-resolution 64 --out-dir sky/
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write log to file (-l default, -l path.log custom)
    #[arg(short = 'l', long = "log", global = true)]
    log: Option<Option<PathBuf>>,

    /// Number of worker threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Display image dimensions, band count, and valid-pixel coverage
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Nudge a batch of observations' luminance toward their median, and
    /// optionally colorize mono observations with the batch's median hue
    #[command(visible_alias = "c")]
    Condition(ConditionArgs),

    /// Run the discrete multigrid solver over a composite and region index
    #[command(visible_alias = "b")]
    Blend(BlendArgs),

    /// Scatter composite-level adjustments back onto observations
    #[command(visible_alias = "p")]
    Propagate(PropagateArgs),

    /// Shrinkwrap a proxy grid onto a synthetic reference mesh and report
    /// coverage statistics
    Shrinkwrap(ShrinkwrapArgs),

    /// Drive the tile-wise panorama pipeline (index, blend, propagate) over
    /// a synthetic backproject
    Panorama(PanoramaArgs),
}

#[derive(Args)]
pub struct InfoArgs {
    /// Input image(s)
    #[arg(required = true)]
    pub input: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ConditionArgs {
    /// Input observation images
    #[arg(required = true)]
    pub input: Vec<PathBuf>,

    /// Directory to write adjusted observations into
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Luminance pre-adjust strength in [0, 1]
    #[arg(long, default_value_t = 1.0)]
    pub strength: f32,

    /// Paint 1-band observations with the batch's median hue at this
    /// saturation (omit to leave mono observations untouched)
    #[arg(long)]
    pub colorize_saturation: Option<f32>,
}

#[derive(Args)]
pub struct BlendArgs {
    /// Coherent composite texture to blend
    #[arg(long)]
    pub composite: PathBuf,

    /// Per-texel region (observation id) image; band 0 is used
    #[arg(long)]
    pub region: PathBuf,

    /// Output blended image
    #[arg(short, long)]
    pub out: PathBuf,

    /// Seam-gradient weight
    #[arg(long, default_value_t = 0.5)]
    pub lambda: f32,

    /// Relaxation sweeps per V-cycle visit
    #[arg(long, default_value_t = 3)]
    pub relax_steps: u32,

    /// Maximum V-cycles before giving up
    #[arg(long, default_value_t = 50)]
    pub max_vcycles: u32,

    /// Residual L2 norm convergence threshold
    #[arg(long, default_value_t = 1e-4)]
    pub residual_epsilon: f32,

    /// Domain edge behavior: clamp, wrap-cylinder, wrap-sphere, wrap-torus
    #[arg(long, default_value = "clamp")]
    pub edge: String,

    /// Relax in CIE Lab instead of raw RGB (3-band composites only)
    #[arg(long)]
    pub lab: bool,

    /// Load solver tunables from a YAML side-file, overriding the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
pub struct PropagateArgs {
    /// Coherent index image (obs, row, col) bands
    #[arg(long)]
    pub index: PathBuf,

    /// Coherent scene texture before blending
    #[arg(long)]
    pub blurred: PathBuf,

    /// Blended composite returned by `blend`
    #[arg(long)]
    pub blended: PathBuf,

    /// YAML map of observation id to `{width, height}`
    #[arg(long)]
    pub observations: PathBuf,

    /// Directory to write each observation's correction field into
    #[arg(short, long)]
    pub out_dir: PathBuf,

    /// Scatter strategy: auto, none, barycentric, inpaint, barycentric-winners-only
    #[arg(long, default_value = "auto")]
    pub strategy: String,

    /// Whether the index was built via shrinkwrap+backproject (Path C);
    /// only consulted when `--strategy auto`
    #[arg(long)]
    pub index_from_shrinkwrap: bool,

    /// Gaussian blur radius applied to each scattered correction field
    #[arg(long, default_value_t = 7)]
    pub blur_radius: u32,

    /// Observations with fewer samples than this get a uniform mean-Δ fill
    #[arg(long, default_value_t = 4)]
    pub min_samples_for_local_fill: usize,
}

#[derive(Args)]
pub struct ShrinkwrapArgs {
    /// Grid resolution along each axis
    #[arg(long, default_value_t = 32)]
    pub grid_resolution: u32,

    /// Wrap strategy: project, nearest-point
    #[arg(long, default_value = "project")]
    pub mode: String,

    /// Miss handling (project mode only): none, delaunay, inpaint
    #[arg(long, default_value = "none")]
    pub miss: String,

    /// In-plane jitter applied to interior grid vertices, world units
    #[arg(long, default_value_t = 0.0)]
    pub jitter: f32,
}

#[derive(Args)]
pub struct PanoramaArgs {
    /// Tile grid rows
    #[arg(long, default_value_t = 1)]
    pub rows: u32,

    /// Tile grid columns (must be divisible by 4 in box mode)
    #[arg(long, default_value_t = 4)]
    pub cols: u32,

    /// Tile mesh mode: box, sphere, topo-sphere
    #[arg(long, default_value = "box")]
    pub mode: String,

    /// Pixel resolution of each tile
    #[arg(long, default_value_t = 64)]
    pub tile_resolution: u32,

    /// Directory to write the blended composite and per-tile textures into
    #[arg(short, long)]
    pub out_dir: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = match &cli.log {
        Some(Some(path)) => Some(path.clone()),
        Some(None) => Some(get_default_log_path()),
        None => None,
    };

    init_tracing(cli.verbose, log_path.as_ref());

    if let Some(ref path) = log_path {
        if let Ok(logger) = Logger::new(path) {
            if let Ok(mut guard) = LOGGER.lock() {
                *guard = Some(logger);
            }
            if cli.verbose > 0 {
                log(&format!("Logging to: {}", path.display()));
            }
        }
    }

    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args),
        Commands::Condition(args) => commands::condition::run(args),
        Commands::Blend(args) => commands::blend::run(args),
        Commands::Propagate(args) => commands::propagate::run(args),
        Commands::Shrinkwrap(args) => commands::shrinkwrap::run(args),
        Commands::Panorama(args) => commands::panorama::run(args),
    }
}
