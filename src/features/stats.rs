/// Replace NaN and infinities with 0.
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `numerator / denominator`, or 0 when the denominator is zero or the
/// result is not finite.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    finite_or_zero(numerator / denominator)
}

/// Summary of the gaps between consecutive transactions, in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntervalStats {
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

/// Consecutive differences of an ascending timestamp sequence.
pub fn intervals(sorted_timestamps: &[i64]) -> Vec<f64> {
    sorted_timestamps
        .windows(2)
        .map(|pair| pair[1].saturating_sub(pair[0]) as f64)
        .collect()
}

/// Interval statistics. All zero for an empty list; `std` is the sample
/// standard deviation and is zero when fewer than two intervals exist.
pub fn interval_stats(intervals: &[f64]) -> IntervalStats {
    if intervals.is_empty() {
        return IntervalStats::default();
    }

    let min = intervals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = intervals.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    IntervalStats {
        std: finite_or_zero(sample_std(intervals)),
        min: finite_or_zero(min),
        max: finite_or_zero(max),
    }
}

fn sample_std(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(1.5), 1.5);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_safe_ratio_zero_denominator() {
        assert_eq!(safe_ratio(3.0, 0.0), 0.0);
        assert_eq!(safe_ratio(0.0, 0.0), 0.0);
        assert_eq!(safe_ratio(3.0, 2.0), 1.5);
    }

    #[test]
    fn test_intervals() {
        assert!(intervals(&[]).is_empty());
        assert!(intervals(&[100]).is_empty());
        assert_eq!(intervals(&[100, 160, 400]), vec![60.0, 240.0]);
    }

    #[test]
    fn test_interval_stats_empty_and_single() {
        assert_eq!(interval_stats(&[]), IntervalStats::default());

        let single = interval_stats(&[60.0]);
        assert_eq!(single.std, 0.0);
        assert_eq!(single.min, 60.0);
        assert_eq!(single.max, 60.0);
    }

    #[test]
    fn test_interval_stats_sample_std() {
        let stats = interval_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        // Sample variance of this set is 32 / 7.
        assert!((stats.std - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
        assert_eq!(stats.min, 2.0);
        assert_eq!(stats.max, 9.0);
    }

    #[test]
    fn test_interval_stats_zero_variance() {
        let stats = interval_stats(&[86400.0, 86400.0, 86400.0]);
        assert_eq!(stats.std, 0.0);
    }
}
