//! Focal-plane mosaic tool
//!
//! Scans a directory of per-detector stats tables, computes each
//! channel's clipped-mean variability past the warm-up exposures, and
//! renders the result as a color-coded focal-plane mosaic.
//!
//! Usage:
//! ```
//! cargo run --bin amp-metric-mosaic -- stats_dir --label "cp_bias run 5"
//! ```
//!
//! See --help for detailed options.

use ampstats::aggregate::extract_amp_metric;
use ampstats::camera::Camera;
use ampstats::plot::mosaic::{plot_amp_metric, MosaicConfig};
use anyhow::Result;
use clap::Parser;
use log::info;
use std::path::PathBuf;

/// Command line arguments for the mosaic tool
#[derive(Parser, Debug)]
#[command(
    name = "amp-metric-mosaic",
    about = "Focal-plane mosaic of per-channel clipped-mean variability",
    long_about = None
)]
struct Args {
    /// Directory holding one stats table per detector, named
    /// {detector}_*{suffix}
    stats_dir: PathBuf,

    /// Stats table file suffix
    #[arg(long, default_value = ".csv")]
    suffix: String,

    /// Metric label for the title and default output name
    #[arg(long, default_value = "cp_bias")]
    label: String,

    /// Lower bound of the color scale
    #[arg(long, default_value_t = 0.0)]
    zmin: f64,

    /// Upper bound of the color scale
    #[arg(long, default_value_t = 1.3)]
    zmax: f64,

    /// Output image width in pixels
    #[arg(long, default_value_t = 900)]
    width: u32,

    /// Output image height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    /// Output path; defaults to a name derived from the label
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();
    let camera = Camera::science_array();

    info!(
        "Aggregating {} detectors from {}",
        camera.detectors().len(),
        args.stats_dir.display()
    );
    let metrics = extract_amp_metric(&args.stats_dir, &camera, &args.suffix)?;

    let config = MosaicConfig {
        z_range: (args.zmin, args.zmax),
        width: args.width,
        height: args.height,
        label: args.label.clone(),
    };
    let written = plot_amp_metric(&metrics, &camera, &config, args.out.as_deref())
        .map_err(|e| anyhow::anyhow!("mosaic rendering failed: {e}"))?;

    info!("Mosaic written to: {}", written.display());
    Ok(())
}
