//! Sampling-interval characterization.

use std::collections::HashMap;

use pq_model::MetricResult;
use serde::Serialize;
use tracing::{info, warn};

use crate::frame::{SampledFrame, TimestampedFrame, micros};

/// Interval assumed when fewer than two rows exist.
pub const FALLBACK_INTERVAL_S: f64 = 60.0;
/// Number of most frequent intervals kept in the profile.
const TOP_INTERVALS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntervalShare {
    pub seconds: f64,
    pub count: usize,
    /// Share of all intervals, in percent.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SamplingProfile {
    /// Most frequent interval in seconds.
    pub dt_mode_s: f64,
    /// Share of intervals equal to the mode.
    pub dominant_ratio: f64,
    pub mixed_sampling: bool,
    pub top_intervals: Vec<IntervalShare>,
    /// Number of intervals (rows minus one).
    pub intervals: usize,
    /// True when the profile was not measured but assumed.
    pub fallback: bool,
}

impl SamplingProfile {
    fn fallback() -> Self {
        Self {
            dt_mode_s: FALLBACK_INTERVAL_S,
            dominant_ratio: 1.0,
            mixed_sampling: false,
            top_intervals: Vec::new(),
            intervals: 0,
            fallback: true,
        }
    }

    pub fn dt_mode_hours(&self) -> f64 {
        self.dt_mode_s / 3600.0
    }

    pub fn to_result(&self) -> MetricResult {
        let mut result = MetricResult::available()
            .with("dt_mode_s", self.dt_mode_s)
            .with("dt_mode_min", self.dt_mode_s / 60.0)
            .with("dominant_ratio", self.dominant_ratio)
            .with("mixed_sampling", self.mixed_sampling)
            .with("intervals", self.intervals);
        if self.fallback {
            result.insert("fallback", true);
        }
        for (i, share) in self.top_intervals.iter().enumerate() {
            let rank = i + 1;
            result.insert(&format!("interval_{rank}_s"), share.seconds);
            result.insert(&format!("interval_{rank}_count"), share.count);
            result.insert(&format!("interval_{rank}_percent"), share.percent);
        }
        result
    }
}

/// Profiles intervals in microseconds, histogram in first-encounter order.
pub fn profile_intervals(intervals_us: &[i64], mixed_threshold: f64) -> SamplingProfile {
    if intervals_us.is_empty() {
        return SamplingProfile::fallback();
    }

    let mut histogram: Vec<(i64, usize)> = Vec::new();
    let mut positions: HashMap<i64, usize> = HashMap::new();
    for &interval in intervals_us {
        match positions.get(&interval) {
            Some(&pos) => histogram[pos].1 += 1,
            None => {
                positions.insert(interval, histogram.len());
                histogram.push((interval, 1));
            }
        }
    }
    // Stable sort keeps first-encounter order among equal counts.
    histogram.sort_by(|a, b| b.1.cmp(&a.1));

    let total = intervals_us.len();
    let share = |count: usize| count as f64 / total as f64;
    let (mode_us, mode_count) = histogram[0];
    let dominant_ratio = share(mode_count);

    SamplingProfile {
        dt_mode_s: mode_us as f64 / 1_000_000.0,
        dominant_ratio,
        mixed_sampling: dominant_ratio < mixed_threshold,
        top_intervals: histogram
            .iter()
            .take(TOP_INTERVALS)
            .map(|&(interval, count)| IntervalShare {
                seconds: interval as f64 / 1_000_000.0,
                count,
                percent: share(count) * 100.0,
            })
            .collect(),
        intervals: total,
        fallback: false,
    }
}

/// Computes `dt` per row and the sampling profile.
pub fn analyze_sampling(frame: TimestampedFrame, mixed_threshold: f64) -> SampledFrame {
    let intervals_us: Vec<i64> = frame
        .timestamps
        .windows(2)
        .map(|pair| micros(pair[1] - pair[0]))
        .collect();

    let mut dt = Vec::with_capacity(frame.height());
    if frame.height() > 0 {
        dt.push(None);
    }
    dt.extend(intervals_us.iter().map(|&us| Some(us as f64 / 1_000_000.0)));

    let profile = profile_intervals(&intervals_us, mixed_threshold);
    if profile.fallback {
        warn!(
            rows = frame.height(),
            dt_s = FALLBACK_INTERVAL_S,
            "too few rows to measure sampling, assuming default interval"
        );
    } else if profile.mixed_sampling {
        warn!(
            dominant_ratio = profile.dominant_ratio,
            dt_mode_s = profile.dt_mode_s,
            "mixed sampling detected"
        );
    } else {
        info!(dt_mode_s = profile.dt_mode_s, "stable sampling");
    }

    SampledFrame {
        timestamped: frame,
        dt,
        profile,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECOND: i64 = 1_000_000;

    #[test]
    fn mode_ratio_uses_interval_count() {
        let profile = profile_intervals(
            &[60 * SECOND, 60 * SECOND, 60 * SECOND, 60 * SECOND, 120 * SECOND],
            0.95,
        );
        assert_eq!(profile.dt_mode_s, 60.0);
        assert!((profile.dominant_ratio - 0.8).abs() < 1e-12);
        assert!(profile.mixed_sampling);
        assert_eq!(profile.top_intervals.len(), 2);
        assert_eq!(profile.top_intervals[1].count, 1);
        assert!((profile.top_intervals[1].percent - 20.0).abs() < 1e-9);
    }

    #[test]
    fn ties_go_to_first_encountered_interval() {
        let profile = profile_intervals(&[30 * SECOND, 60 * SECOND, 60 * SECOND, 30 * SECOND], 0.95);
        assert_eq!(profile.dt_mode_s, 30.0);
        assert_eq!(profile.top_intervals[1].seconds, 60.0);
    }

    #[test]
    fn top_intervals_are_capped_at_three() {
        let profile = profile_intervals(
            &[SECOND, 2 * SECOND, 3 * SECOND, 4 * SECOND, SECOND],
            0.95,
        );
        assert_eq!(profile.top_intervals.len(), 3);
        assert_eq!(profile.dt_mode_s, 1.0);
    }

    #[test]
    fn uniform_sampling_is_not_mixed() {
        let profile = profile_intervals(&[SECOND; 10], 0.95);
        assert_eq!(profile.dominant_ratio, 1.0);
        assert!(!profile.mixed_sampling);
    }

    #[test]
    fn empty_intervals_fall_back() {
        let profile = profile_intervals(&[], 0.95);
        assert!(profile.fallback);
        assert_eq!(profile.dt_mode_s, 60.0);
        assert_eq!(profile.dominant_ratio, 1.0);
        assert!(!profile.mixed_sampling);
    }

    #[test]
    fn result_lists_ranked_intervals() {
        let result = profile_intervals(&[60 * SECOND, 60 * SECOND, 120 * SECOND], 0.95).to_result();
        assert_eq!(result.number("interval_1_s"), Some(60.0));
        assert_eq!(result.number("interval_2_count"), Some(1.0));
        assert_eq!(result.number("dt_mode_min"), Some(1.0));
        assert_eq!(result.flag("mixed_sampling"), Some(true));
        assert!(result.get("interval_3_s").is_none());
    }
}
