//! FITS exposure reading
//!
//! Opens a sensor image file, reads the primary image HDU into an
//! `Array2<f64>`, and picks up the `TSEQNUM` sequence-number key from the
//! header. Files carry no geometry of their own, so the standard
//! 16-amplifier layout is derived from the image dimensions.

use crate::exposure::Exposure;
use crate::geometry::{Detector, GeometryError};
use fitsio::hdu::HduInfo;
use fitsio::FitsFile;
use ndarray::Array2;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during FITS file operations
#[derive(Error, Debug)]
pub enum FitsError {
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),
    #[error("primary HDU of {0} is not a 2D image")]
    NotAnImage(String),
    #[error("cannot reshape image data from {0}")]
    BadShape(String),
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Header key holding the exposure sequence number.
pub const TSEQNUM_KEY: &str = "TSEQNUM";

/// Read one exposure from a FITS file.
///
/// The detector name is taken from the file stem. A missing `TSEQNUM`
/// key degrades to `None` rather than failing the read.
pub fn read_exposure<P: AsRef<Path>>(path: P) -> Result<Exposure, FitsError> {
    let path = path.as_ref();
    let label = path.display().to_string();

    let mut fptr = FitsFile::open(path)?;
    let hdu = fptr.primary_hdu()?;

    let (height, width) = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } if shape.len() == 2 => (shape[0], shape[1]),
        _ => return Err(FitsError::NotAnImage(label)),
    };

    let data: Vec<f64> = hdu.read_image(&mut fptr)?;
    let image = Array2::from_shape_vec((height, width), data)
        .map_err(|_| FitsError::BadShape(label))?;

    let tseqnum = hdu.read_key::<i64>(&mut fptr, TSEQNUM_KEY).ok();

    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string());

    Ok(Exposure {
        image,
        tseqnum,
        detector: Detector::standard_16(&name, height, width)?,
    })
}
