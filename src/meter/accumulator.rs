use serde::{Serialize, Deserialize};

use crate::error::MeterError;

/// Tracks one scalar metric: its running within-epoch mean and the finalized
/// per-epoch history.
///
/// # Weighting contract
/// Every `add_value` call contributes weight 1, regardless of how many
/// underlying samples the value was averaged over upstream. The epoch summary
/// is the unweighted mean of per-call values, so a short final batch does not
/// skew the epoch mean.
///
/// # Lifecycle
/// `begin_epoch` exactly once, then any number of `add_value` calls (at least
/// one), then `end_epoch` exactly once. `end_epoch` appends the epoch mean to
/// `history`; the accumulator refuses to finalize an epoch that saw no values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricAccumulator {
    /// Display label for error messages, e.g. `"train/loss"`.
    label: String,
    running_sum: f64,
    running_count: usize,
    history: Vec<f64>,
}

impl MetricAccumulator {
    pub fn new(label: impl Into<String>) -> Self {
        MetricAccumulator {
            label: label.into(),
            running_sum: 0.0,
            running_count: 0,
            history: Vec::new(),
        }
    }

    /// Records one value with weight 1.
    pub fn add_value(&mut self, value: f64) {
        self.running_sum += value;
        self.running_count += 1;
    }

    /// Resets the running sum and count for a new epoch.
    pub fn begin_epoch(&mut self) {
        self.running_sum = 0.0;
        self.running_count = 0;
    }

    /// Finalizes the current epoch: appends the epoch mean to the history.
    ///
    /// Fails with `NoSamplesInEpoch` if no value was recorded since the last
    /// `begin_epoch` — the mean would be NaN, and silently reporting it would
    /// mask a driver integration bug.
    pub fn end_epoch(&mut self) -> Result<f64, MeterError> {
        if self.running_count == 0 {
            return Err(MeterError::NoSamplesInEpoch(self.label.clone()));
        }
        let mean = self.running_sum / self.running_count as f64;
        self.history.push(mean);
        Ok(mean)
    }

    /// In-progress mean of the current epoch, `None` before the first
    /// `add_value` of the epoch. Not part of the finalized history.
    pub fn running_mean(&self) -> Option<f64> {
        if self.running_count == 0 {
            None
        } else {
            Some(self.running_sum / self.running_count as f64)
        }
    }

    /// Mean of the most recently completed epoch.
    pub fn last_value(&self) -> Result<f64, MeterError> {
        self.history
            .last()
            .copied()
            .ok_or_else(|| MeterError::EmptyHistory(self.label.clone()))
    }

    /// Finalized per-epoch means, oldest first.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Best finalized epoch mean: minimum if `minimize`, maximum otherwise.
    pub fn best_value(&self, minimize: bool) -> Result<f64, MeterError> {
        if self.history.is_empty() {
            return Err(MeterError::EmptyHistory(self.label.clone()));
        }
        let best = self
            .history
            .iter()
            .copied()
            .fold(if minimize { f64::INFINITY } else { f64::NEG_INFINITY }, |acc, v| {
                if minimize { acc.min(v) } else { acc.max(v) }
            });
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_mean_is_unweighted() {
        let mut acc = MetricAccumulator::new("loss");
        acc.begin_epoch();
        // 1.5 is itself a batch mean over many samples; it still counts once.
        acc.add_value(1.5);
        acc.add_value(0.5);
        acc.add_value(1.0);
        assert_eq!(acc.end_epoch().unwrap(), 1.0);
        assert_eq!(acc.last_value().unwrap(), 1.0);
    }

    #[test]
    fn end_epoch_without_values_fails() {
        let mut acc = MetricAccumulator::new("loss");
        acc.begin_epoch();
        assert_eq!(
            acc.end_epoch(),
            Err(MeterError::NoSamplesInEpoch("loss".into()))
        );
        // The failed finalize must not grow the history.
        assert!(acc.history().is_empty());
    }

    #[test]
    fn history_grows_one_entry_per_epoch() {
        let mut acc = MetricAccumulator::new("acc");
        for epoch in 0..4 {
            acc.begin_epoch();
            acc.add_value(epoch as f64);
            acc.end_epoch().unwrap();
        }
        assert_eq!(acc.history(), &[0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn best_value_minimize_and_maximize() {
        let mut acc = MetricAccumulator::new("loss");
        for v in [3.0, 1.0, 2.0] {
            acc.begin_epoch();
            acc.add_value(v);
            acc.end_epoch().unwrap();
        }
        assert_eq!(acc.best_value(true).unwrap(), 1.0);
        assert_eq!(acc.best_value(false).unwrap(), 3.0);
    }

    #[test]
    fn queries_on_empty_history_fail() {
        let acc = MetricAccumulator::new("loss");
        assert_eq!(acc.last_value(), Err(MeterError::EmptyHistory("loss".into())));
        assert_eq!(
            acc.best_value(true),
            Err(MeterError::EmptyHistory("loss".into()))
        );
    }

    #[test]
    fn running_mean_tracks_the_open_epoch() {
        let mut acc = MetricAccumulator::new("loss");
        acc.begin_epoch();
        assert_eq!(acc.running_mean(), None);
        acc.add_value(2.0);
        acc.add_value(4.0);
        assert_eq!(acc.running_mean(), Some(3.0));
        acc.end_epoch().unwrap();
        acc.begin_epoch();
        assert_eq!(acc.running_mean(), None);
    }
}
