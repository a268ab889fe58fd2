//! Per-detector time-series scatter grid
//!
//! Renders a 2x2 grid of subplots, one per statistic, each a scatter of
//! sequence number vs. statistic value with one colored series per
//! amplifier and a legend of amplifier ids sorted ascending. Rows with no
//! sequence number have nothing to place on the x axis and are skipped.

use crate::table::{AmpStatsRow, AmpStatsTable};
use plotters::prelude::*;
use std::path::{Path, PathBuf};

/// The four plotted statistics, in subplot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Mean,
    Stdev,
    MeanClip,
    StdevClip,
}

impl Stat {
    pub const ALL: [Stat; 4] = [Stat::Mean, Stat::Stdev, Stat::MeanClip, Stat::StdevClip];

    /// Column label used for the subplot y axis.
    pub fn label(&self) -> &'static str {
        match self {
            Stat::Mean => "mean",
            Stat::Stdev => "stdev",
            Stat::MeanClip => "meanclip",
            Stat::StdevClip => "stdevclip",
        }
    }

    /// Statistic value from one table row.
    pub fn value(&self, row: &AmpStatsRow) -> f64 {
        match self {
            Stat::Mean => row.mean,
            Stat::Stdev => row.stdev,
            Stat::MeanClip => row.meanclip,
            Stat::StdevClip => row.stdevclip,
        }
    }
}

/// Time-series plot configuration.
pub struct TimeSeriesConfig {
    /// Optional super-title above the grid
    pub title: Option<String>,
    /// Output image width in pixels
    pub width: u32,
    /// Output image height in pixels
    pub height: u32,
}

impl Default for TimeSeriesConfig {
    fn default() -> Self {
        Self {
            title: None,
            width: 1024,
            height: 1024,
        }
    }
}

/// Default output path for a grid title, spaces normalized. A missing
/// title falls back to a bare stats filename.
pub fn default_outfile(title: Option<&str>) -> PathBuf {
    match title {
        Some(title) => PathBuf::from(format!("{}_amp_stats.png", title.replace(' ', "_"))),
        None => PathBuf::from("amp_stats.png"),
    }
}

/// Distinct series colors, indexed by amplifier position in the legend.
const SERIES_COLORS: [RGBColor; 16] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
    RGBColor(174, 199, 232),
    RGBColor(255, 187, 120),
    RGBColor(152, 223, 138),
    RGBColor(255, 152, 150),
    RGBColor(197, 176, 213),
    RGBColor(196, 156, 148),
];

/// One (tseqnum, value) series per amplifier, amps sorted ascending.
///
/// Rows with a null sequence number are omitted.
pub fn amp_series(table: &AmpStatsTable, stat: Stat) -> Vec<(u32, Vec<(f64, f64)>)> {
    table
        .amps()
        .into_iter()
        .map(|amp| {
            let points: Vec<(f64, f64)> = table
                .rows_for_amp(amp)
                .filter_map(|row| row.tseqnum.map(|t| (t as f64, stat.value(row))))
                .collect();
            (amp, points)
        })
        .collect()
}

/// Render the 2x2 statistics grid to a raster image file.
///
/// When `outfile` is None the output path is derived from the configured
/// title via [`default_outfile`]. Returns the path actually written.
pub fn plot_amp_stats(
    table: &AmpStatsTable,
    config: &TimeSeriesConfig,
    outfile: Option<&Path>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let path = outfile
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_outfile(config.title.as_deref()));

    let root =
        BitMapBackend::new(&path, (config.width, config.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let root = match &config.title {
        Some(title) => root.titled(title, ("sans-serif", 28))?,
        None => root,
    };

    let areas = root.split_evenly((2, 2));
    for (area, stat) in areas.iter().zip(Stat::ALL) {
        draw_stat_panel(area, table, stat)?;
    }

    root.present()?;
    Ok(path.clone())
}

/// Draw one statistic's scatter subplot with a per-amplifier legend.
fn draw_stat_panel(
    area: &DrawingArea<BitMapBackend, plotters::coord::Shift>,
    table: &AmpStatsTable,
    stat: Stat,
) -> Result<(), Box<dyn std::error::Error>> {
    let series = amp_series(table, stat);

    // Data bounds over all series, with a small margin
    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, points) in &series {
        for &(x, y) in points {
            x_min = x_min.min(x);
            x_max = x_max.max(x);
            y_min = y_min.min(y);
            y_max = y_max.max(y);
        }
    }
    if !x_min.is_finite() {
        // No plottable rows; draw an empty frame so the grid stays 2x2
        x_min = 0.0;
        x_max = 1.0;
        y_min = 0.0;
        y_max = 1.0;
    }
    let x_pad = ((x_max - x_min) * 0.05).max(0.5);
    let y_pad = ((y_max - y_min) * 0.05).max(1e-3);

    let mut chart = ChartBuilder::on(area)
        .caption(stat.label(), ("sans-serif", 22))
        .margin(8)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min - x_pad..x_max + x_pad, y_min - y_pad..y_max + y_pad)?;

    chart
        .configure_mesh()
        .x_desc("TSEQNUM")
        .y_desc(stat.label())
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.3}"))
        .draw()?;

    for (idx, (amp, points)) in series.iter().enumerate() {
        let color = SERIES_COLORS[idx % SERIES_COLORS.len()];
        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 2, color.filled())),
            )?
            .label(amp.to_string())
            .legend(move |(x, y)| Circle::new((x + 5, y), 3, color.filled()));
    }

    if !series.is_empty() {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font(("sans-serif", 12))
            .draw()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::AmpStatsRow;

    fn row(amp: u32, tseqnum: Option<i64>, value: f64) -> AmpStatsRow {
        AmpStatsRow {
            amp,
            tseqnum,
            mean: value,
            stdev: value + 1.0,
            meanclip: value + 2.0,
            stdevclip: value + 3.0,
        }
    }

    #[test]
    fn test_one_series_per_amp_sorted() {
        let table: AmpStatsTable = [
            row(7, Some(1), 10.0),
            row(2, Some(1), 11.0),
            row(7, Some(2), 12.0),
            row(5, Some(2), 13.0),
        ]
        .into_iter()
        .collect();

        for stat in Stat::ALL {
            let series = amp_series(&table, stat);
            let amps: Vec<u32> = series.iter().map(|(a, _)| *a).collect();
            assert_eq!(amps, vec![2, 5, 7]);
        }
        let series = amp_series(&table, Stat::Mean);
        assert_eq!(series[2].1, vec![(1.0, 10.0), (2.0, 12.0)]);
    }

    #[test]
    fn test_null_tseqnum_rows_skipped() {
        let table: AmpStatsTable = [row(1, Some(3), 5.0), row(1, None, 6.0)]
            .into_iter()
            .collect();
        let series = amp_series(&table, Stat::Mean);
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].1.len(), 1);
    }

    #[test]
    fn test_default_outfile_from_title() {
        assert_eq!(
            default_outfile(Some("R11_S00 cp bias")),
            PathBuf::from("R11_S00_cp_bias_amp_stats.png")
        );
        assert_eq!(default_outfile(None), PathBuf::from("amp_stats.png"));
    }

    #[test]
    fn test_stat_accessors() {
        let r = row(1, Some(1), 10.0);
        assert_eq!(Stat::Mean.value(&r), 10.0);
        assert_eq!(Stat::Stdev.value(&r), 11.0);
        assert_eq!(Stat::MeanClip.value(&r), 12.0);
        assert_eq!(Stat::StdevClip.value(&r), 13.0);
    }

    #[test]
    fn test_render_writes_file() {
        let table: AmpStatsTable = (1..=4)
            .flat_map(|amp| (20..25).map(move |t| row(amp, Some(t), amp as f64 + t as f64)))
            .collect();

        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("stats.png");
        let config = TimeSeriesConfig {
            title: Some("R11_S00 cp_bias".to_string()),
            ..Default::default()
        };
        let written = plot_amp_stats(&table, &config, Some(&path)).unwrap();
        assert_eq!(written, path);
        assert!(path.exists());
    }

    #[test]
    fn test_render_empty_table() {
        let table = AmpStatsTable::new();
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("empty.png");
        plot_amp_stats(&table, &TimeSeriesConfig::default(), Some(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_render_without_outfile_uses_title_default() {
        let table: AmpStatsTable = [row(1, Some(20), 1.0), row(1, Some(21), 2.0)]
            .into_iter()
            .collect();

        let dir = tempfile::TempDir::new().unwrap();
        let title = dir.path().join("fallback").display().to_string();
        let config = TimeSeriesConfig {
            title: Some(title.clone()),
            ..Default::default()
        };
        let written = plot_amp_stats(&table, &config, None).unwrap();
        assert_eq!(written, default_outfile(Some(&title)));
        assert!(written.exists());
    }
}
