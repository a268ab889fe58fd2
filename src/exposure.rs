//! Exposure records and the exposure-store seam
//!
//! An [`Exposure`] bundles the pixel image, the sequence-number metadata
//! field, and the detector geometry needed for per-amplifier windowing.
//! The [`ExposureStore`] trait abstracts the data-access handle through
//! which opaque dataset references are resolved; the FITS reader in
//! [`crate::fits`] covers the direct-file path.

use crate::fits::FitsError;
use crate::geometry::Detector;
use ndarray::Array2;
use thiserror::Error;

/// Errors resolving or opening exposures.
#[derive(Error, Debug)]
pub enum ExposureError {
    #[error("dataset not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Fits(#[from] FitsError),
    #[error("exposure access failed: {0}")]
    Access(String),
}

/// Opaque reference to a dataset resolvable through an [`ExposureStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetRef(pub String);

impl std::fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for DatasetRef {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A resolved exposure: pixel image, metadata, and detector geometry.
#[derive(Debug, Clone)]
pub struct Exposure {
    /// Pixel values in (row, col) order
    pub image: Array2<f64>,
    /// Sequence number from exposure metadata, if present
    pub tseqnum: Option<i64>,
    /// Detector geometry for the sensor that produced the image
    pub detector: Detector,
}

/// Data-access handle resolving dataset references to exposures.
pub trait ExposureStore {
    fn get(&self, dsref: &DatasetRef) -> Result<Exposure, ExposureError>;
}
