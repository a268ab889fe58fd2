//! Per-amplifier statistics for detector stability monitoring
//!
//! This crate computes summary statistics (mean, standard deviation, and
//! their sigma-clipped variants) over the amplifier regions of calibration
//! exposures, accumulates them into a persistable table, and renders
//! diagnostic plots: per-detector time-series grids and a focal-plane
//! mosaic of a derived per-channel variability metric.

pub mod aggregate;
pub mod camera;
pub mod channels;
pub mod exposure;
pub mod extract;
pub mod fits;
pub mod geometry;
pub mod plot;
pub mod stats;
pub mod table;

// Re-exports for easier access
pub use aggregate::{extract_amp_metric, AmpMetricMap};
pub use exposure::{DatasetRef, Exposure, ExposureStore};
pub use extract::{compute_file_stats, compute_store_stats, ExtractConfig, WindowPolicy};
pub use geometry::{AmpRegion, Detector, GeometryError, PixelWindow, ReadoutCorner};
pub use stats::{ClipConfig, PixelStats};
pub use table::{AmpStatsRow, AmpStatsTable};
