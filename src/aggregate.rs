//! Cross-detector aggregation
//!
//! Scans a directory holding one persisted stats table per detector,
//! drops warm-up rows, and reduces each amplifier's clipped-mean series
//! to a single variability scalar keyed by detector name and channel
//! label. The result feeds the focal-plane mosaic plotter directly.

use crate::camera::Camera;
use crate::channels::{channel_label, ChannelError};
use crate::table::{AmpStatsTable, TableError};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows with a sequence number at or below this value are excluded from
/// the variability computation (warm-up exposures).
pub const WARMUP_TSEQNUM: i64 = 19;

/// Detector name -> channel label -> variability scalar.
pub type AmpMetricMap = BTreeMap<String, BTreeMap<String, f64>>;

/// Errors from the aggregation pass.
#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("no stats table matching {pattern} in {}", dir.display())]
    MissingTable { dir: PathBuf, pattern: String },
    #[error("{count} stats tables match {pattern} in {}", dir.display())]
    AmbiguousTable {
        dir: PathBuf,
        pattern: String,
        count: usize,
    },
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Locate the single table file for a detector: name prefix followed by
/// an underscore, any middle part, and the given suffix. Zero or multiple
/// matches are configuration errors, never silently skipped.
fn find_table(dir: &Path, det_name: &str, suffix: &str) -> Result<PathBuf, AggregateError> {
    let prefix = format!("{det_name}_");
    let mut matches = Vec::new();

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if file_name.starts_with(&prefix) && file_name.ends_with(suffix) {
            matches.push(entry.path());
        }
    }

    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(AggregateError::MissingTable {
            dir: dir.to_path_buf(),
            pattern: format!("{prefix}*{suffix}"),
        }),
        count => Err(AggregateError::AmbiguousTable {
            dir: dir.to_path_buf(),
            pattern: format!("{prefix}*{suffix}"),
            count,
        }),
    }
}

/// Population (N-denominator) standard deviation.
fn population_stdev(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt()
}

/// Per-amplifier variability of the clipped mean for every detector.
///
/// For each detector of the camera, loads its table from `stat_data_dir`,
/// keeps rows with `tseqnum > WARMUP_TSEQNUM`, groups by amplifier, and
/// records the population standard deviation of `meanclip` under the
/// amplifier's channel label.
pub fn extract_amp_metric(
    stat_data_dir: &Path,
    camera: &Camera,
    suffix: &str,
) -> Result<AmpMetricMap, AggregateError> {
    let mut amp_data = AmpMetricMap::new();

    for det in camera.detectors() {
        let path = find_table(stat_data_dir, &det.name, suffix)?;
        let table = AmpStatsTable::read_csv(&path)?;
        debug!("{}: {} rows from {}", det.name, table.len(), path.display());

        let channels = amp_data.entry(det.name.clone()).or_default();
        for amp in table.amps() {
            let values: Vec<f64> = table
                .rows_for_amp(amp)
                .filter(|r| r.tseqnum.is_some_and(|t| t > WARMUP_TSEQNUM))
                .map(|r| r.meanclip)
                .collect();
            let label = channel_label(amp)?;
            if values.is_empty() {
                warn!(
                    "{} {}: no rows past tseqnum {}, channel left out of the metric map",
                    det.name, label, WARMUP_TSEQNUM
                );
                continue;
            }
            channels.insert(label.to_string(), population_stdev(&values));
        }
    }

    Ok(amp_data)
}
