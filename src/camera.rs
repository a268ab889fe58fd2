//! Static focal-plane layout
//!
//! A compact description of the camera used only for aggregation and
//! mosaic rendering: which detectors exist, where each detector cell sits
//! in focal-plane coordinates, and where each channel sub-cell sits inside
//! its detector. The science array is a 5x5 raft grid with the four
//! corner rafts absent, three-by-three detectors per raft.

/// Side length of one detector cell in focal-plane units.
pub const DETECTOR_SIZE: f64 = 1.0;

/// Spacing between raft origins, leaving a visible gap between rafts.
const RAFT_PITCH: f64 = 3.2;

/// One detector's slot in the focal plane.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorSlot {
    /// Detector name, e.g. `R22_S11`
    pub name: String,
    /// Lower-left corner of the detector cell
    pub x0: f64,
    pub y0: f64,
}

impl DetectorSlot {
    /// Cell bounds as (x0, y0, x1, y1).
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        (
            self.x0,
            self.y0,
            self.x0 + DETECTOR_SIZE,
            self.y0 + DETECTOR_SIZE,
        )
    }

    /// Bounds of one channel sub-cell, addressed by vendor code.
    ///
    /// Channel codes are `C` followed by a row digit (0 = bottom, 1 = top)
    /// and a column digit 0..=7. Returns None for malformed codes.
    pub fn channel_cell(&self, label: &str) -> Option<(f64, f64, f64, f64)> {
        let bytes = label.as_bytes();
        if bytes.len() != 3 || bytes[0] != b'C' {
            return None;
        }
        let row = (bytes[1] as char).to_digit(10)? as f64;
        let col = (bytes[2] as char).to_digit(10)? as f64;
        if row > 1.0 || col > 7.0 {
            return None;
        }

        let cell_w = DETECTOR_SIZE / 8.0;
        let cell_h = DETECTOR_SIZE / 2.0;
        let x0 = self.x0 + col * cell_w;
        let y0 = self.y0 + row * cell_h;
        Some((x0, y0, x0 + cell_w, y0 + cell_h))
    }
}

/// The full set of detector slots in their physical layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    detectors: Vec<DetectorSlot>,
}

impl Camera {
    /// Build a camera from an explicit detector list.
    pub fn from_detectors(detectors: Vec<DetectorSlot>) -> Self {
        Self { detectors }
    }

    /// The science array: 21 rafts (5x5 grid minus corners) of 3x3
    /// detectors each, named `R{row}{col}_S{srow}{scol}`.
    pub fn science_array() -> Self {
        let mut detectors = Vec::new();
        for raft_row in 0..5u32 {
            for raft_col in 0..5u32 {
                let corner = (raft_row == 0 || raft_row == 4) && (raft_col == 0 || raft_col == 4);
                if corner {
                    continue;
                }
                for srow in 0..3u32 {
                    for scol in 0..3u32 {
                        detectors.push(DetectorSlot {
                            name: format!("R{raft_row}{raft_col}_S{srow}{scol}"),
                            x0: raft_col as f64 * RAFT_PITCH + scol as f64 * DETECTOR_SIZE,
                            y0: raft_row as f64 * RAFT_PITCH + srow as f64 * DETECTOR_SIZE,
                        });
                    }
                }
            }
        }
        Self { detectors }
    }

    pub fn detectors(&self) -> &[DetectorSlot] {
        &self.detectors
    }

    /// Upper-right extent of the layout, for plot axis ranges.
    pub fn extent(&self) -> (f64, f64) {
        let mut x_max = 0.0f64;
        let mut y_max = 0.0f64;
        for det in &self.detectors {
            let (_, _, x1, y1) = det.bounds();
            x_max = x_max.max(x1);
            y_max = y_max.max(y1);
        }
        (x_max, y_max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_science_array_count() {
        let camera = Camera::science_array();
        // 21 rafts x 9 detectors
        assert_eq!(camera.detectors().len(), 189);
        assert!(camera.detectors().iter().any(|d| d.name == "R22_S11"));
        assert!(!camera.detectors().iter().any(|d| d.name.starts_with("R00")));
        assert!(!camera.detectors().iter().any(|d| d.name.starts_with("R44")));
    }

    #[test]
    fn test_detector_names_unique() {
        let camera = Camera::science_array();
        let names: std::collections::BTreeSet<&str> =
            camera.detectors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), camera.detectors().len());
    }

    #[test]
    fn test_channel_cells_tile_detector() {
        let det = DetectorSlot {
            name: "R11_S00".to_string(),
            x0: 2.0,
            y0: 3.0,
        };

        // C00 is the bottom-left sub-cell, C17 the top-right
        let (x0, y0, x1, y1) = det.channel_cell("C00").unwrap();
        assert_relative_eq!(x0, 2.0);
        assert_relative_eq!(y0, 3.0);
        assert_relative_eq!(x1, 2.125);
        assert_relative_eq!(y1, 3.5);

        let (x0, y0, x1, y1) = det.channel_cell("C17").unwrap();
        assert_relative_eq!(x0, 2.875);
        assert_relative_eq!(y0, 3.5);
        assert_relative_eq!(x1, 3.0);
        assert_relative_eq!(y1, 4.0);
    }

    #[test]
    fn test_malformed_channel_codes() {
        let det = DetectorSlot {
            name: "R11_S00".to_string(),
            x0: 0.0,
            y0: 0.0,
        };
        assert!(det.channel_cell("C20").is_none());
        assert!(det.channel_cell("C08").is_none());
        assert!(det.channel_cell("X00").is_none());
        assert!(det.channel_cell("C0").is_none());
    }
}
