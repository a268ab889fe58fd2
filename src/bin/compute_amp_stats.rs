//! Per-amplifier statistics extraction tool
//!
//! Computes mean, stdev, and sigma-clipped mean/stdev for every amplifier
//! region of each input FITS exposure, writes the accumulated table as
//! CSV, and optionally renders the 2x2 time-series scatter grid.
//!
//! Usage:
//! ```
//! cargo run --bin compute-amp-stats -- bias_*.fits --output R11_S00_bias.csv
//! ```
//!
//! See --help for detailed options.

use ampstats::extract::{accumulate_exposure, ExtractConfig, WindowPolicy};
use ampstats::fits;
use ampstats::plot::timeseries::{plot_amp_stats, TimeSeriesConfig};
use ampstats::stats::ClipConfig;
use ampstats::table::AmpStatsTable;
use anyhow::Result;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::path::PathBuf;

/// Command line arguments for amplifier statistics extraction
#[derive(Parser, Debug)]
#[command(
    name = "compute-amp-stats",
    about = "Per-amplifier statistics over calibration exposures",
    long_about = None
)]
struct Args {
    /// FITS sensor image files, in exposure order
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Output CSV path for the stats table
    #[arg(long)]
    output: Option<PathBuf>,

    /// Measure a fixed window at each amplifier's readout corner instead
    /// of the full bounding box
    #[arg(long, default_value_t = false)]
    corner_window: bool,

    /// Side length of the readout-corner window, in pixels
    #[arg(long, default_value_t = 200)]
    corner_size: usize,

    /// Sigma threshold for the clipped statistics
    #[arg(long, default_value_t = 3.0)]
    clip_sigma: f64,

    /// Maximum sigma-clipping iterations
    #[arg(long, default_value_t = 3)]
    clip_iters: usize,

    /// Render the time-series scatter grid to this path
    #[arg(long)]
    plot: Option<PathBuf>,

    /// Plot super-title
    #[arg(long)]
    title: Option<String>,
}

fn main() -> Result<()> {
    // Initialize logging from environment variables
    env_logger::init();

    let args = Args::parse();

    let cfg = ExtractConfig {
        window: if args.corner_window {
            WindowPolicy::Corner {
                dy: args.corner_size,
                dx: args.corner_size,
            }
        } else {
            WindowPolicy::FullAmp
        },
        clip: ClipConfig {
            sigma: args.clip_sigma,
            max_iters: args.clip_iters,
        },
        output: None,
    };

    let pb = ProgressBar::new(args.files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}) ETA: {eta}")?
            .progress_chars("█▉▊▋▌▍▎▏ "),
    );
    pb.set_message(format!("Processing {} exposures", args.files.len()));

    let mut table = AmpStatsTable::new();
    for path in &args.files {
        let exposure = fits::read_exposure(path)?;
        accumulate_exposure(&mut table, &exposure, &cfg)?;
        pb.inc(1);
    }
    pb.finish_with_message(format!("Processed {} exposures", args.files.len()));

    info!(
        "{} rows across {} amplifiers",
        table.len(),
        table.amps().len()
    );

    if let Some(output) = &args.output {
        table.write_csv(output)?;
        info!("Stats table written to: {}", output.display());
    }

    if let Some(plot_path) = &args.plot {
        let plot_cfg = TimeSeriesConfig {
            title: args.title.clone(),
            ..Default::default()
        };
        let written = plot_amp_stats(&table, &plot_cfg, Some(plot_path))
            .map_err(|e| anyhow::anyhow!("plot rendering failed: {e}"))?;
        info!("Time-series plot written to: {}", written.display());
    }

    Ok(())
}
