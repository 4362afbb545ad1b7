//! Numeric helpers backing the density, box, and violin charts.
//!
//! Kernel density estimation uses a Gaussian kernel with Scott's-rule
//! bandwidth; histograms pick their bin count the numpy "auto" way
//! (larger of Sturges and Freedman-Diaconis); box summaries use linearly
//! interpolated quartiles and 1.5 IQR whiskers.

use std::f64::consts::PI;

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (n - 1 denominator). Zero below two samples.
pub fn std_dev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let var = xs.iter().map(|x| (x - m) * (x - m)).sum::<f64>() / (xs.len() - 1) as f64;
    var.sqrt()
}

/// Scott's-rule KDE bandwidth: sigma * n^(-1/5).
///
/// Falls back to a small constant when the sample is degenerate (fewer
/// than two points or zero variance), where the rule is undefined.
pub fn scott_bandwidth(xs: &[f64]) -> f64 {
    let sigma = std_dev(xs);
    if xs.is_empty() || sigma <= f64::EPSILON {
        return 0.5;
    }
    sigma * (xs.len() as f64).powf(-0.2)
}

/// Evenly spaced evaluation grid over [lo, hi], inclusive of both ends.
pub fn grid(lo: f64, hi: f64, points: usize) -> Vec<f64> {
    if points < 2 {
        return vec![lo];
    }
    let step = (hi - lo) / (points - 1) as f64;
    (0..points).map(|i| lo + step * i as f64).collect()
}

/// Gaussian kernel density estimate of `samples`, evaluated at each grid
/// point. An empty sample yields all zeros. `bandwidth` defaults to
/// Scott's rule.
pub fn gaussian_kde(samples: &[f64], eval: &[f64], bandwidth: Option<f64>) -> Vec<f64> {
    if samples.is_empty() {
        return vec![0.0; eval.len()];
    }
    let h = bandwidth.unwrap_or_else(|| scott_bandwidth(samples));
    let norm = 1.0 / (samples.len() as f64 * h * (2.0 * PI).sqrt());
    eval.iter()
        .map(|&g| {
            let sum: f64 = samples
                .iter()
                .map(|&x| {
                    let z = (g - x) / h;
                    (-0.5 * z * z).exp()
                })
                .sum();
            sum * norm
        })
        .collect()
}

/// Linearly interpolated quantile of a sorted slice, numpy-style.
fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = p * (n - 1) as f64;
    let lo = h.floor() as usize;
    let frac = h - lo as f64;
    if lo + 1 >= n {
        return sorted[n - 1];
    }
    sorted[lo] + frac * (sorted[lo + 1] - sorted[lo])
}

/// Box-plot summary: quartiles, 1.5 IQR whiskers, and outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct FiveNumber {
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Lowest sample within 1.5 IQR below q1.
    pub whisker_low: f64,
    /// Highest sample within 1.5 IQR above q3.
    pub whisker_high: f64,
    /// Samples beyond the whiskers.
    pub outliers: Vec<f64>,
}

/// Compute the box-plot summary of a sample. None for an empty sample.
pub fn five_number(xs: &[f64]) -> Option<FiveNumber> {
    if xs.is_empty() {
        return None;
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let fence_low = q1 - 1.5 * iqr;
    let fence_high = q3 + 1.5 * iqr;

    let whisker_low = sorted
        .iter()
        .copied()
        .find(|&x| x >= fence_low)
        .unwrap_or(q1);
    let whisker_high = sorted
        .iter()
        .rev()
        .copied()
        .find(|&x| x <= fence_high)
        .unwrap_or(q3);
    let outliers = sorted
        .iter()
        .copied()
        .filter(|&x| x < whisker_low || x > whisker_high)
        .collect();

    Some(FiveNumber {
        q1,
        median,
        q3,
        whisker_low,
        whisker_high,
        outliers,
    })
}

/// Histogram bin count, numpy "auto": max of Sturges and Freedman-Diaconis.
pub fn auto_bins(xs: &[f64]) -> usize {
    if xs.len() < 2 {
        return 1;
    }
    let n = xs.len() as f64;
    let sturges = n.log2().ceil() as usize + 1;

    let Some(summary) = five_number(xs) else {
        return sturges.max(1);
    };
    let iqr = summary.q3 - summary.q1;
    let (lo, hi) = min_max(xs);
    let range = hi - lo;
    if iqr <= f64::EPSILON || range <= f64::EPSILON {
        return sturges.max(1);
    }
    let fd_width = 2.0 * iqr * n.powf(-1.0 / 3.0);
    let fd = (range / fd_width).ceil() as usize;
    sturges.max(fd).max(1)
}

/// One histogram bar: [start, end) interval and its height.
pub type Bin = (f64, f64, f64);

/// Histogram of raw counts. Bin count defaults to [`auto_bins`].
pub fn count_histogram(xs: &[f64], bins: Option<usize>) -> Vec<Bin> {
    histogram_impl(xs, bins, false)
}

/// Histogram normalized so the bar areas sum to one.
pub fn density_histogram(xs: &[f64], bins: Option<usize>) -> Vec<Bin> {
    histogram_impl(xs, bins, true)
}

fn histogram_impl(xs: &[f64], bins: Option<usize>, density: bool) -> Vec<Bin> {
    if xs.is_empty() {
        return Vec::new();
    }
    let (lo, hi) = min_max(xs);
    if hi - lo <= f64::EPSILON {
        let height = if density { 1.0 } else { xs.len() as f64 };
        return vec![(lo - 0.5, lo + 0.5, height)];
    }

    let bins = bins.unwrap_or_else(|| auto_bins(xs)).max(1);
    let width = (hi - lo) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &x in xs {
        let mut idx = ((x - lo) / width) as usize;
        if idx >= bins {
            idx = bins - 1;
        }
        counts[idx] += 1;
    }

    let scale = if density {
        1.0 / (xs.len() as f64 * width)
    } else {
        1.0
    };
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let start = lo + width * i as f64;
            (start, start + width, c as f64 * scale)
        })
        .collect()
}

/// Minimum and maximum of a non-empty slice.
pub fn min_max(xs: &[f64]) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &x in xs {
        if x < lo {
            lo = x;
        }
        if x > hi {
            hi = x;
        }
    }
    (lo, hi)
}
