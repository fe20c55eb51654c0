//! Descriptive statistics over sample vectors.
//!
//! NaN entries are ignored, matching how missing samples are treated
//! everywhere else. Infinite values take part in every statistic.

/// Linear-interpolation percentile of an ascending slice, `q` in `[0, 1]`.
///
/// Position `q * (n - 1)` is interpolated between its neighbouring ranks.
/// Returns NaN for an empty slice.
pub fn percentile_sorted(sorted: &[f64], q: f64) -> f64 {
    match sorted.len() {
        0 => f64::NAN,
        1 => sorted[0],
        n => {
            let position = q.clamp(0.0, 1.0) * (n - 1) as f64;
            let lower = position.floor() as usize;
            let upper = position.ceil() as usize;
            let fraction = position - lower as f64;
            if lower == upper {
                sorted[lower]
            } else {
                sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
            }
        }
    }
}

pub fn mean(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.is_empty() {
        return f64::NAN;
    }
    present.iter().sum::<f64>() / present.len() as f64
}

/// Sample standard deviation (n - 1 denominator). NaN below two samples.
pub fn sample_std(values: &[f64]) -> f64 {
    let present: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if present.len() < 2 {
        return f64::NAN;
    }
    let avg = present.iter().sum::<f64>() / present.len() as f64;
    let squares: f64 = present.iter().map(|v| (v - avg).powi(2)).sum();
    (squares / (present.len() - 1) as f64).sqrt()
}

/// Summary of one error or measurement series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub p50: f64,
    pub p95: f64,
    pub max: f64,
}

impl Distribution {
    pub fn from_values(values: &[f64]) -> Self {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
        sorted.sort_by(f64::total_cmp);
        let count = sorted.len();
        Self {
            count,
            mean: if count == 0 {
                f64::NAN
            } else {
                sorted.iter().sum::<f64>() / count as f64
            },
            min: sorted.first().copied().unwrap_or(f64::NAN),
            p50: percentile_sorted(&sorted, 0.50),
            p95: percentile_sorted(&sorted, 0.95),
            max: sorted.last().copied().unwrap_or(f64::NAN),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_interpolates_between_ranks() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(percentile_sorted(&sorted, 0.5), 3.0);
        assert!((percentile_sorted(&sorted, 0.95) - 4.8).abs() < 1e-12);
        assert_eq!(percentile_sorted(&sorted, 0.0), 1.0);
        assert_eq!(percentile_sorted(&sorted, 1.0), 5.0);
        assert_eq!(percentile_sorted(&[7.0], 0.95), 7.0);
        assert!(percentile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn sample_std_uses_n_minus_one() {
        let std = sample_std(&[49.9, 50.0, 50.1]);
        assert!((std - 0.1).abs() < 1e-9);
        assert!(sample_std(&[50.0]).is_nan());
    }

    #[test]
    fn distribution_ignores_nan() {
        let d = Distribution::from_values(&[3.0, f64::NAN, 1.0, 2.0]);
        assert_eq!(d.count, 3);
        assert_eq!(d.mean, 2.0);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.p50, 2.0);
        assert_eq!(d.max, 3.0);
    }

    #[test]
    fn empty_distribution_is_nan() {
        let d = Distribution::from_values(&[]);
        assert_eq!(d.count, 0);
        assert!(d.mean.is_nan() && d.p95.is_nan() && d.max.is_nan());
    }
}
