pub struct StatsHelper;

impl StatsHelper {
    pub fn mean(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        samples.iter().sum::<f64>() / samples.len() as f64
    }

    /// Middle value, or the mean of the two middle values for even counts.
    pub fn median(samples: &[f64]) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        }
    }

    /// Nearest-rank lookup `sorted[floor(len * fraction)]` on ascending data.
    pub fn rank_percentile(sorted: &[f64], fraction: f64) -> Option<f64> {
        if sorted.is_empty() {
            return None;
        }
        let index = (sorted.len() as f64 * fraction).floor() as usize;
        sorted.get(index.min(sorted.len() - 1)).copied()
    }

    /// Share of `samples` matching `predicate`, in percent.
    pub fn percent_where(samples: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
        if samples.is_empty() {
            return 0.0;
        }
        let hits = samples.iter().filter(|&&v| predicate(v)).count();
        hits as f64 / samples.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequences_yield_zero() {
        assert_eq!(StatsHelper::mean(&[]), 0.0);
        assert_eq!(StatsHelper::median(&[]), 0.0);
        assert_eq!(StatsHelper::percent_where(&[], |v| v > 0.0), 0.0);
        assert_eq!(StatsHelper::rank_percentile(&[], 0.9), None);
    }

    #[test]
    fn median_averages_middle_pair() {
        assert_eq!(StatsHelper::median(&[4.0, 1.0, 3.0]), 3.0);
        assert_eq!(StatsHelper::median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn rank_percentile_uses_floor_index() {
        let sorted: Vec<f64> = (0..10).map(f64::from).collect();
        assert_eq!(StatsHelper::rank_percentile(&sorted, 0.9), Some(9.0));
        assert_eq!(StatsHelper::rank_percentile(&sorted[..5], 0.9), Some(4.0));
        assert_eq!(StatsHelper::rank_percentile(&[3.0], 0.9), Some(3.0));
    }

    #[test]
    fn percent_where_counts_matches() {
        let pct = StatsHelper::percent_where(&[0.0, 17.0, 16.0, 40.0], |v| v > 16.0);
        assert_eq!(pct, 50.0);
    }
}
