//! Per-amplifier statistics extraction
//!
//! Walks a set of exposures, selects the configured pixel window for each
//! amplifier, computes the four summary statistics over a read-only
//! sub-view, and appends one row per (exposure, amplifier) pair to an
//! [`AmpStatsTable`]. Exposures come either from an [`ExposureStore`]
//! handle or directly from FITS files on disk.

use crate::exposure::{DatasetRef, Exposure, ExposureError, ExposureStore};
use crate::fits::{self, FitsError};
use crate::geometry::PixelWindow;
use crate::stats::{ClipConfig, PixelStats};
use crate::table::{AmpStatsRow, AmpStatsTable, TableError};
use log::{debug, info};
use ndarray::s;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default side length of the readout-corner window, in pixels.
pub const DEFAULT_CORNER_SIZE: usize = 200;

/// Errors from statistics extraction.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error(transparent)]
    Exposure(#[from] ExposureError),
    #[error(transparent)]
    Fits(#[from] FitsError),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(
        "amp {amp} window ({window:?}) exceeds {height}x{width} image on detector {detector}"
    )]
    WindowOutOfBounds {
        detector: String,
        amp: u32,
        window: PixelWindow,
        height: usize,
        width: usize,
    },
}

/// Which pixel window to measure per amplifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WindowPolicy {
    /// Full amplifier bounding box
    #[default]
    FullAmp,
    /// Fixed-size window anchored at the amplifier's readout corner
    Corner { dy: usize, dx: usize },
}

impl WindowPolicy {
    /// Corner window of the default size.
    pub fn default_corner() -> Self {
        Self::Corner {
            dy: DEFAULT_CORNER_SIZE,
            dx: DEFAULT_CORNER_SIZE,
        }
    }
}

/// Extraction configuration: window policy, clipping parameters, and an
/// optional path to persist the resulting table.
#[derive(Debug, Clone, Default)]
pub struct ExtractConfig {
    pub window: WindowPolicy,
    pub clip: ClipConfig,
    pub output: Option<PathBuf>,
}

/// Append one row per amplifier of a single exposure to the table.
///
/// A window falling outside the image bounds is fatal for the exposure;
/// the statistic over a truncated region would be meaningless.
pub fn accumulate_exposure(
    table: &mut AmpStatsTable,
    exposure: &Exposure,
    cfg: &ExtractConfig,
) -> Result<(), ExtractError> {
    let (height, width) = exposure.image.dim();

    for amp in &exposure.detector.amps {
        let window = match cfg.window {
            WindowPolicy::FullAmp => amp.window,
            WindowPolicy::Corner { dy, dx } => amp.window.corner_anchored(amp.corner, dy, dx),
        };

        if !window.fits_within(height, width) {
            return Err(ExtractError::WindowOutOfBounds {
                detector: exposure.detector.name.clone(),
                amp: amp.id,
                window,
                height,
                width,
            });
        }

        let view = exposure.image.slice(s![
            window.min_row..=window.max_row,
            window.min_col..=window.max_col
        ]);
        let stats = PixelStats::compute(view, &cfg.clip);

        table.push(AmpStatsRow {
            amp: amp.id,
            tseqnum: exposure.tseqnum,
            mean: stats.mean,
            stdev: stats.stdev,
            meanclip: stats.meanclip,
            stdevclip: stats.stdevclip,
        });
    }

    debug!(
        "accumulated {} amps for detector {} (tseqnum {:?})",
        exposure.detector.amps.len(),
        exposure.detector.name,
        exposure.tseqnum
    );
    Ok(())
}

/// Compute a stats table for dataset references resolved through a store.
pub fn compute_store_stats<S: ExposureStore>(
    store: &S,
    dsrefs: &[DatasetRef],
    cfg: &ExtractConfig,
) -> Result<AmpStatsTable, ExtractError> {
    let mut table = AmpStatsTable::new();
    for dsref in dsrefs {
        let exposure = store.get(dsref)?;
        accumulate_exposure(&mut table, &exposure, cfg)?;
    }
    finish(table, cfg)
}

/// Compute a stats table for a list of FITS sensor image files.
pub fn compute_file_stats<P: AsRef<Path>>(
    paths: &[P],
    cfg: &ExtractConfig,
) -> Result<AmpStatsTable, ExtractError> {
    let mut table = AmpStatsTable::new();
    for path in paths {
        let exposure = fits::read_exposure(path)?;
        accumulate_exposure(&mut table, &exposure, cfg)?;
    }
    finish(table, cfg)
}

fn finish(table: AmpStatsTable, cfg: &ExtractConfig) -> Result<AmpStatsTable, ExtractError> {
    if let Some(path) = &cfg.output {
        table.write_csv(path)?;
        info!("wrote {} rows to {}", table.len(), path.display());
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Detector;
    use approx::assert_relative_eq;
    use ndarray::Array2;

    /// Synthetic exposure with each amplifier window filled with a constant
    /// equal to its amp id.
    fn synthetic_exposure(name: &str, tseqnum: Option<i64>) -> Exposure {
        let (height, width) = (40, 80);
        let detector = Detector::standard_16(name, height, width).unwrap();
        let mut image = Array2::zeros((height, width));
        for amp in &detector.amps {
            for row in amp.window.min_row..=amp.window.max_row {
                for col in amp.window.min_col..=amp.window.max_col {
                    image[[row, col]] = amp.id as f64;
                }
            }
        }
        Exposure {
            image,
            tseqnum,
            detector,
        }
    }

    #[test]
    fn test_constant_amp_values() {
        let exposure = synthetic_exposure("S00", Some(5));
        let mut table = AmpStatsTable::new();
        accumulate_exposure(&mut table, &exposure, &ExtractConfig::default()).unwrap();

        assert_eq!(table.len(), 16);
        for (i, row) in table.rows().iter().enumerate() {
            assert_eq!(row.amp, (i + 1) as u32);
            assert_eq!(row.tseqnum, Some(5));
            assert_relative_eq!(row.mean, row.amp as f64, epsilon = 1e-12);
            assert_relative_eq!(row.stdev, 0.0, epsilon = 1e-12);
            assert_relative_eq!(row.meanclip, row.amp as f64, epsilon = 1e-12);
            assert_relative_eq!(row.stdevclip, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_missing_tseqnum_is_null_not_fatal() {
        let exposure = synthetic_exposure("S00", None);
        let mut table = AmpStatsTable::new();
        accumulate_exposure(&mut table, &exposure, &ExtractConfig::default()).unwrap();
        assert_eq!(table.len(), 16);
        assert!(table.rows().iter().all(|r| r.tseqnum.is_none()));
    }

    #[test]
    fn test_corner_window_out_of_bounds_is_fatal() {
        // 40-row image: a 200-pixel corner window cannot fit
        let exposure = synthetic_exposure("S00", Some(1));
        let cfg = ExtractConfig {
            window: WindowPolicy::default_corner(),
            ..Default::default()
        };
        let mut table = AmpStatsTable::new();
        let err = accumulate_exposure(&mut table, &exposure, &cfg).unwrap_err();
        assert!(matches!(err, ExtractError::WindowOutOfBounds { amp: 1, .. }));
    }

    #[test]
    fn test_corner_window_stats() {
        let exposure = synthetic_exposure("S00", Some(2));
        let cfg = ExtractConfig {
            window: WindowPolicy::Corner { dy: 5, dx: 5 },
            ..Default::default()
        };
        let mut table = AmpStatsTable::new();
        accumulate_exposure(&mut table, &exposure, &cfg).unwrap();

        // Corner windows stay inside their amp, so constants still hold
        assert_eq!(table.len(), 16);
        for row in table.rows() {
            assert_relative_eq!(row.mean, row.amp as f64, epsilon = 1e-12);
        }
    }

    struct MapStore(std::collections::HashMap<String, Exposure>);

    impl ExposureStore for MapStore {
        fn get(&self, dsref: &DatasetRef) -> Result<Exposure, ExposureError> {
            self.0
                .get(&dsref.0)
                .cloned()
                .ok_or_else(|| ExposureError::NotFound(dsref.0.clone()))
        }
    }

    #[test]
    fn test_store_stats_rows_in_traversal_order() {
        let mut map = std::collections::HashMap::new();
        map.insert("bias/1".to_string(), synthetic_exposure("S00", Some(1)));
        map.insert("bias/2".to_string(), synthetic_exposure("S00", Some(2)));
        let store = MapStore(map);

        let refs = [DatasetRef::from("bias/1"), DatasetRef::from("bias/2")];
        let table = compute_store_stats(&store, &refs, &ExtractConfig::default()).unwrap();

        assert_eq!(table.len(), 32);
        assert_eq!(table.rows()[0].tseqnum, Some(1));
        assert_eq!(table.rows()[16].tseqnum, Some(2));
    }

    #[test]
    fn test_store_missing_ref_is_fatal() {
        let store = MapStore(std::collections::HashMap::new());
        let refs = [DatasetRef::from("bias/42")];
        let err = compute_store_stats(&store, &refs, &ExtractConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Exposure(ExposureError::NotFound(_))
        ));
    }
}
