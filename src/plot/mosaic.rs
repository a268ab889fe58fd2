//! Focal-plane mosaic rendering
//!
//! Draws one colored sub-cell per channel per detector, positioned by the
//! static camera layout, with a linear blue-to-red color ramp over a
//! caller-supplied value range and a colorbar along the right edge.

use crate::aggregate::AmpMetricMap;
use crate::camera::Camera;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// Width in pixels reserved for the colorbar strip.
const COLORBAR_WIDTH: i32 = 110;

/// Mosaic plot configuration.
pub struct MosaicConfig {
    /// Value range mapped onto the color ramp
    pub z_range: (f64, f64),
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
    /// Metric label used in the title and the default output name
    pub label: String,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            z_range: (0.0, 1.3),
            width: 900,
            height: 800,
            label: "stat".to_string(),
        }
    }
}

/// Default output path for a metric label, spaces normalized.
pub fn default_outfile(label: &str) -> PathBuf {
    PathBuf::from(format!("{}_stdev_meanclip.png", label.replace(' ', "_")))
}

/// Map a normalized value in [0, 1] onto the blue-white-red ramp.
fn ramp_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8, f: f64| (a as f64 + (b as f64 - a as f64) * f).round() as u8;
    let (low, mid, high) = ((59, 76, 192), (221, 221, 221), (180, 4, 38));
    if t < 0.5 {
        let f = t * 2.0;
        RGBColor(
            lerp(low.0, mid.0, f),
            lerp(low.1, mid.1, f),
            lerp(low.2, mid.2, f),
        )
    } else {
        let f = (t - 0.5) * 2.0;
        RGBColor(
            lerp(mid.0, high.0, f),
            lerp(mid.1, high.1, f),
            lerp(mid.2, high.2, f),
        )
    }
}

/// Render the per-channel metric map onto the focal-plane layout.
///
/// When `outfile` is None the output path is derived from the label via
/// [`default_outfile`]. Returns the path actually written.
pub fn plot_amp_metric(
    metrics: &AmpMetricMap,
    camera: &Camera,
    config: &MosaicConfig,
    outfile: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = outfile
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_outfile(&config.label));

    let root =
        BitMapBackend::new(&path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let title = format!("{}, stdev(meanclip)", config.label);
    let root = root.titled(&title, ("sans-serif", 26))?;

    let (main, bar) = root.split_horizontally(config.width as i32 - COLORBAR_WIDTH);
    draw_focal_plane(&main, metrics, camera, config)?;
    draw_colorbar(&bar, config)?;

    root.present()?;
    Ok(path.clone())
}

fn draw_focal_plane(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    metrics: &AmpMetricMap,
    camera: &Camera,
    config: &MosaicConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (x_extent, y_extent) = camera.extent();
    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .build_cartesian_2d(0.0..x_extent, 0.0..y_extent)?;
    chart.configure_mesh().disable_mesh().draw()?;

    let (z_min, z_max) = config.z_range;
    let span = (z_max - z_min).max(f64::EPSILON);

    for det in camera.detectors() {
        if let Some(channels) = metrics.get(&det.name) {
            for (label, &value) in channels {
                if let Some((x0, y0, x1, y1)) = det.channel_cell(label) {
                    let color = ramp_color((value - z_min) / span);
                    chart.draw_series(std::iter::once(Rectangle::new(
                        [(x0, y0), (x1, y1)],
                        color.filled(),
                    )))?;
                }
            }
        }

        // Detector outline on top of the channel fills
        let (x0, y0, x1, y1) = det.bounds();
        chart.draw_series(std::iter::once(Rectangle::new(
            [(x0, y0), (x1, y1)],
            BLACK.stroke_width(1),
        )))?;
    }

    Ok(())
}

fn draw_colorbar(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    config: &MosaicConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let (z_min, z_max) = config.z_range;
    let mut chart = ChartBuilder::on(area)
        .margin(15)
        .y_label_area_size(45)
        .build_cartesian_2d(0.0..1.0, z_min..z_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(0)
        .y_labels(6)
        .y_label_formatter(&|y| format!("{y:.2}"))
        .draw()?;

    let steps = 64;
    let span = z_max - z_min;
    for i in 0..steps {
        let t0 = i as f64 / steps as f64;
        let t1 = (i + 1) as f64 / steps as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(0.0, z_min + t0 * span), (1.0, z_min + t1 * span)],
            ramp_color(t0).filled(),
        )))?;
    }

    Ok(())
}
