use std::sync::atomic::{AtomicU64, Ordering};

pub mod errors;
pub mod manager;
pub mod mempool;
pub mod model;

#[cfg(test)]
pub mod testutils;

#[derive(Default)]
pub struct MempoolCounters {
    pub packages_accepted_counts: AtomicU64,
    pub packages_rejected_counts: AtomicU64,
    pub tx_accepted_counts: AtomicU64,
    pub tx_replaced_counts: AtomicU64,
    pub input_counts: AtomicU64,
    pub output_counts: AtomicU64,
}

impl MempoolCounters {
    pub fn snapshot(&self) -> MempoolCountersSnapshot {
        MempoolCountersSnapshot {
            packages_accepted_counts: self.packages_accepted_counts.load(Ordering::Relaxed),
            packages_rejected_counts: self.packages_rejected_counts.load(Ordering::Relaxed),
            tx_accepted_counts: self.tx_accepted_counts.load(Ordering::Relaxed),
            tx_replaced_counts: self.tx_replaced_counts.load(Ordering::Relaxed),
            input_counts: self.input_counts.load(Ordering::Relaxed),
            output_counts: self.output_counts.load(Ordering::Relaxed),
        }
    }

    pub fn increase_package_counts(&self, accepted: bool) {
        match accepted {
            true => self.packages_accepted_counts.fetch_add(1, Ordering::Relaxed),
            false => self.packages_rejected_counts.fetch_add(1, Ordering::Relaxed),
        };
    }
}

#[derive(Debug, PartialEq, Eq, Default)]
pub struct MempoolCountersSnapshot {
    pub packages_accepted_counts: u64,
    pub packages_rejected_counts: u64,
    pub tx_accepted_counts: u64,
    pub tx_replaced_counts: u64,
    pub input_counts: u64,
    pub output_counts: u64,
}

impl MempoolCountersSnapshot {
    pub fn in_package_counts(&self) -> u64 {
        self.packages_accepted_counts + self.packages_rejected_counts
    }

    /// Ratio of accepted packages over all committing submissions
    pub fn acceptance_rate(&self) -> f64 {
        let total = self.in_package_counts();
        if total > 0 { self.packages_accepted_counts as f64 / total as f64 } else { 0f64 }
    }
}

impl core::ops::Sub for &MempoolCountersSnapshot {
    type Output = MempoolCountersSnapshot;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::Output {
            packages_accepted_counts: self.packages_accepted_counts.checked_sub(rhs.packages_accepted_counts).unwrap_or_default(),
            packages_rejected_counts: self.packages_rejected_counts.checked_sub(rhs.packages_rejected_counts).unwrap_or_default(),
            tx_accepted_counts: self.tx_accepted_counts.checked_sub(rhs.tx_accepted_counts).unwrap_or_default(),
            tx_replaced_counts: self.tx_replaced_counts.checked_sub(rhs.tx_replaced_counts).unwrap_or_default(),
            input_counts: self.input_counts.checked_sub(rhs.input_counts).unwrap_or_default(),
            output_counts: self.output_counts.checked_sub(rhs.output_counts).unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_snapshot_delta() {
        let counters = MempoolCounters::default();
        counters.increase_package_counts(true);
        let first = counters.snapshot();
        counters.increase_package_counts(true);
        counters.increase_package_counts(false);
        counters.tx_accepted_counts.fetch_add(3, Ordering::Relaxed);
        let second = counters.snapshot();

        let delta = &second - &first;
        assert_eq!(delta.packages_accepted_counts, 1);
        assert_eq!(delta.packages_rejected_counts, 1);
        assert_eq!(delta.tx_accepted_counts, 3);
        assert_eq!(delta.acceptance_rate(), 0.5);
        assert_eq!((&first - &second).packages_accepted_counts, 0, "deltas saturate at zero");
        assert_eq!(MempoolCountersSnapshot::default().acceptance_rate(), 0.0);
    }
}
