// stats_utils.rs

/// Descriptive statistics for the non-missing values of one numeric column
/// within one partition. Recomputed on every render, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); 0.0 when `count < 2`.
    pub std_dev: f64,
    pub median: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    /// Number of values outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
    pub outlier_count: usize,
    pub min: f64,
    pub max: f64,
}

impl ColumnStats {
    /// Computes the full statistics block over `values`, or `None` when the
    /// slice is empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std_dev = if count > 1 {
            (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (count - 1) as f64).sqrt()
        } else {
            0.0
        };
        let median = quantile(&sorted, 0.5);
        let q1 = quantile(&sorted, 0.25);
        let q3 = quantile(&sorted, 0.75);
        let iqr = q3 - q1;
        let lower_fence = q1 - 1.5 * iqr;
        let upper_fence = q3 + 1.5 * iqr;
        let outlier_count = sorted
            .iter()
            .filter(|&&v| v < lower_fence || v > upper_fence)
            .count();

        Some(Self {
            count,
            mean,
            std_dev,
            median,
            q1,
            q3,
            iqr,
            outlier_count,
            min: sorted[0],
            max: sorted[count - 1],
        })
    }
}

/// Linearly interpolated quantile over an ascending, non-empty slice.
/// `q` is clamped to `[0, 1]`.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}
