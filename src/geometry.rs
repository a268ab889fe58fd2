//! Amplifier and detector geometry
//!
//! This module provides the pixel-window and amplifier-region types used to
//! select sub-regions of an exposure image, plus a standard 16-amplifier
//! detector layout for sensor files that do not carry their own geometry.

use thiserror::Error;

/// Image too small to tile with the standard amplifier layout.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("{height}x{width} image too small for the 16-amp layout")]
pub struct GeometryError {
    pub height: usize,
    pub width: usize,
}

/// Corner of an amplifier region where readout begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadoutCorner {
    /// Lower left
    LL,
    /// Lower right
    LR,
    /// Upper left
    UL,
    /// Upper right
    UR,
}

/// Axis-aligned rectangular pixel window with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelWindow {
    /// Minimum row (y) coordinate
    pub min_row: usize,
    /// Minimum column (x) coordinate
    pub min_col: usize,
    /// Maximum row (y) coordinate, inclusive
    pub max_row: usize,
    /// Maximum column (x) coordinate, inclusive
    pub max_col: usize,
}

impl PixelWindow {
    /// Create a window from inclusive coordinates.
    pub fn from_coords(min_row: usize, min_col: usize, max_row: usize, max_col: usize) -> Self {
        Self {
            min_row,
            min_col,
            max_row,
            max_col,
        }
    }

    /// Number of columns covered by the window.
    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }

    /// Number of rows covered by the window.
    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    /// Total pixel count.
    pub fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Check that the window lies entirely within an image of the given
    /// dimensions.
    pub fn fits_within(&self, height: usize, width: usize) -> bool {
        self.max_row < height && self.max_col < width
    }

    /// A `dy`+1 by `dx`+1 sub-window anchored at the given readout corner.
    ///
    /// The anchored window keeps both bounds inclusive, so a 200-pixel
    /// offset yields a 201x201 region, matching the bounding-box convention
    /// used throughout this crate.
    pub fn corner_anchored(&self, corner: ReadoutCorner, dy: usize, dx: usize) -> Self {
        let (min_row, max_row) = match corner {
            ReadoutCorner::LL | ReadoutCorner::LR => (self.min_row, self.min_row + dy),
            ReadoutCorner::UL | ReadoutCorner::UR => (self.max_row.saturating_sub(dy), self.max_row),
        };
        let (min_col, max_col) = match corner {
            ReadoutCorner::LL | ReadoutCorner::UL => (self.min_col, self.min_col + dx),
            ReadoutCorner::LR | ReadoutCorner::UR => (self.max_col.saturating_sub(dx), self.max_col),
        };
        Self {
            min_row,
            min_col,
            max_row,
            max_col,
        }
    }
}

/// One readout segment of a detector: a 1-based id, its bounding box, and
/// the corner where readout begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmpRegion {
    /// 1-based amplifier id, in traversal order
    pub id: u32,
    /// Full bounding box of the segment
    pub window: PixelWindow,
    /// Readout corner for corner-anchored windowing
    pub corner: ReadoutCorner,
}

/// A detector: a name plus its ordered amplifier list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detector {
    pub name: String,
    pub amps: Vec<AmpRegion>,
}

impl Detector {
    /// Standard 16-amplifier layout for a sensor of the given dimensions:
    /// two rows of eight segments. Amps 1-8 run left to right along the
    /// bottom row reading out at the lower-left corner; amps 9-16 run
    /// right to left along the top row reading out at the upper-right
    /// corner. The last segment in each row absorbs any remainder columns.
    ///
    /// Images smaller than two rows of eight segments cannot be tiled and
    /// are a geometry error, propagated rather than panicking.
    pub fn standard_16(name: &str, height: usize, width: usize) -> Result<Self, GeometryError> {
        if height < 2 || width < 8 {
            return Err(GeometryError { height, width });
        }

        let half = height / 2;
        let seg = width / 8;
        let mut amps = Vec::with_capacity(16);

        for i in 0..8usize {
            let min_col = i * seg;
            let max_col = if i == 7 { width - 1 } else { (i + 1) * seg - 1 };
            amps.push(AmpRegion {
                id: (i + 1) as u32,
                window: PixelWindow::from_coords(0, min_col, half - 1, max_col),
                corner: ReadoutCorner::LL,
            });
        }

        for i in 0..8usize {
            let col_idx = 7 - i;
            let min_col = col_idx * seg;
            let max_col = if col_idx == 7 {
                width - 1
            } else {
                (col_idx + 1) * seg - 1
            };
            amps.push(AmpRegion {
                id: (i + 9) as u32,
                window: PixelWindow::from_coords(half, min_col, height - 1, max_col),
                corner: ReadoutCorner::UR,
            });
        }

        Ok(Self {
            name: name.to_string(),
            amps,
        })
    }
}
