//! Pixel statistics kernel
//!
//! Computes the four summary statistics reported per amplifier region:
//! arithmetic mean, sample standard deviation, and their sigma-clipped
//! variants. Clipping iteratively discards pixels beyond a configurable
//! sigma threshold from the current mean and recomputes until the pixel
//! set stabilizes or the iteration limit is reached.

use ndarray::ArrayView2;

/// Sigma-clipping parameters for the clipped statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipConfig {
    /// Clip threshold in units of the current standard deviation
    pub sigma: f64,
    /// Maximum number of clipping iterations
    pub max_iters: usize,
}

impl Default for ClipConfig {
    fn default() -> Self {
        Self {
            sigma: 3.0,
            max_iters: 3,
        }
    }
}

/// The four summary statistics computed over one amplifier window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelStats {
    pub mean: f64,
    pub stdev: f64,
    pub meanclip: f64,
    pub stdevclip: f64,
}

impl PixelStats {
    /// Compute all four statistics over a read-only pixel view.
    ///
    /// An empty view yields NaN for every statistic; a single-pixel view
    /// yields that value with zero spread.
    pub fn compute(pixels: ArrayView2<f64>, clip: &ClipConfig) -> Self {
        let values: Vec<f64> = pixels.iter().copied().collect();
        let (mean, stdev) = mean_stdev(&values);
        let (meanclip, stdevclip) = clipped_mean_stdev(values, clip);
        Self {
            mean,
            stdev,
            meanclip,
            stdevclip,
        }
    }
}

/// Mean and sample (N-1) standard deviation of a value slice.
fn mean_stdev(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, 0.0);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, variance.sqrt())
}

/// Iteratively sigma-clipped mean and standard deviation.
fn clipped_mean_stdev(mut values: Vec<f64>, clip: &ClipConfig) -> (f64, f64) {
    let (mut mean, mut stdev) = mean_stdev(&values);

    for _ in 0..clip.max_iters {
        if stdev == 0.0 || values.len() < 2 {
            break;
        }
        let threshold = clip.sigma * stdev;
        let before = values.len();
        values.retain(|v| (v - mean).abs() <= threshold);
        if values.len() == before {
            break;
        }
        let (m, s) = mean_stdev(&values);
        mean = m;
        stdev = s;
    }

    (mean, stdev)
}
