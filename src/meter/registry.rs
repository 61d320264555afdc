use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::error::MeterError;
use crate::meter::phase::PhaseRegistry;

/// Phase-keyed facade over `PhaseRegistry`: the single metrics store for a
/// whole run.
///
/// Created once at run start and discarded with the run; the driver owns it
/// and observers only borrow it through the shared loop state. Phases are
/// created lazily on the write path (`add_value`, `begin_phase`, `end_phase`);
/// reads against a phase or metric that was never written fail with
/// `UnknownSeries`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsRegistry {
    phases: BTreeMap<String, PhaseRegistry>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_or_create(&mut self, phase: &str) -> &mut PhaseRegistry {
        self.phases
            .entry(phase.to_string())
            .or_insert_with(|| {
                log::debug!("creating phase registry '{phase}'");
                PhaseRegistry::new(phase)
            })
    }

    fn get(&self, phase: &str) -> Result<&PhaseRegistry, MeterError> {
        self.phases
            .get(phase)
            .ok_or_else(|| MeterError::UnknownSeries(phase.to_string()))
    }

    /// Records one value for `(phase, metric)`, creating both levels on first
    /// reference.
    pub fn add_value(&mut self, phase: &str, metric: &str, value: f64) {
        self.get_or_create(phase).add_value(metric, value);
    }

    /// Resets every accumulator under `phase` for a new epoch.
    ///
    /// Driver-only: must be called exactly once per (phase, epoch), before
    /// any `add_value` for that pair. Observers never call this.
    pub fn begin_phase(&mut self, phase: &str) {
        self.get_or_create(phase).begin_epoch();
    }

    /// Finalizes the epoch for every accumulator under `phase`.
    ///
    /// Driver-only, exactly once per (phase, epoch), after the last
    /// `add_value`. Fails with `NoSamplesInEpoch` if any registered metric
    /// received no values this epoch.
    pub fn end_phase(&mut self, phase: &str) -> Result<(), MeterError> {
        self.get_or_create(phase).end_epoch()
    }

    pub fn last_value(&self, phase: &str, metric: &str) -> Result<f64, MeterError> {
        self.get(phase)?.last_value(metric)
    }

    /// Finalized per-epoch means for `(phase, metric)`, oldest first.
    pub fn history(&self, phase: &str, metric: &str) -> Result<&[f64], MeterError> {
        self.get(phase)?.history(metric)
    }

    pub fn best_value(
        &self,
        phase: &str,
        metric: &str,
        minimize: bool,
    ) -> Result<f64, MeterError> {
        self.get(phase)?.best_value(metric, minimize)
    }

    /// True iff the most recent epoch mean equals the best one on record.
    ///
    /// Ties count as best: the first completed epoch is always the best so
    /// far, and a later epoch matching the record is treated as (re)achieving
    /// it rather than missing it.
    pub fn is_current_best(
        &self,
        phase: &str,
        metric: &str,
        minimize: bool,
    ) -> Result<bool, MeterError> {
        let last = self.last_value(phase, metric)?;
        let best = self.best_value(phase, metric, minimize)?;
        Ok(last == best)
    }

    /// Names of every metric registered under `phase`.
    pub fn metric_names(&self, phase: &str) -> Result<Vec<&str>, MeterError> {
        Ok(self.get(phase)?.metric_names())
    }

    /// In-progress running means for `phase`, for live display. Metrics with
    /// no values yet this epoch are omitted.
    pub fn running_values(&self, phase: &str) -> Result<Vec<(&str, f64)>, MeterError> {
        Ok(self.get(phase)?.running_values())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_epoch(meter: &mut MetricsRegistry, phase: &str, values: &[f64]) {
        meter.begin_phase(phase);
        for &v in values {
            meter.add_value(phase, "loss", v);
        }
        meter.end_phase(phase).unwrap();
    }

    #[test]
    fn phases_are_created_on_write_only() {
        let meter = MetricsRegistry::new();
        assert_eq!(
            meter.last_value("train", "loss"),
            Err(MeterError::UnknownSeries("train".into()))
        );
    }

    #[test]
    fn unknown_metric_is_distinct_from_empty_history() {
        let mut meter = MetricsRegistry::new();
        meter.begin_phase("train");
        meter.add_value("train", "loss", 1.0);

        // "loss" exists but no epoch has completed yet.
        assert_eq!(
            meter.last_value("train", "loss"),
            Err(MeterError::EmptyHistory("train/loss".into()))
        );
        // "acc" was never written at all.
        assert_eq!(
            meter.last_value("train", "acc"),
            Err(MeterError::UnknownSeries("train/acc".into()))
        );
    }

    #[test]
    fn phases_share_no_epoch_state() {
        let mut meter = MetricsRegistry::new();
        run_epoch(&mut meter, "train", &[1.0, 3.0]);
        run_epoch(&mut meter, "valid", &[5.0]);
        assert_eq!(meter.last_value("train", "loss").unwrap(), 2.0);
        assert_eq!(meter.last_value("valid", "loss").unwrap(), 5.0);
        assert_eq!(meter.history("train", "loss").unwrap().len(), 1);
    }

    #[test]
    fn is_current_best_ties_count_as_best() {
        let mut meter = MetricsRegistry::new();
        run_epoch(&mut meter, "train", &[1.0, 3.0]); // mean 2.0
        assert!(meter.is_current_best("train", "loss", true).unwrap());

        run_epoch(&mut meter, "train", &[2.0, 2.0]); // mean 2.0 again
        assert!(meter.is_current_best("train", "loss", true).unwrap());

        run_epoch(&mut meter, "train", &[3.0, 3.0]); // mean 3.0, worse
        assert!(!meter.is_current_best("train", "loss", true).unwrap());
        assert!(meter.is_current_best("train", "loss", false).unwrap());
    }

    #[test]
    fn best_value_matches_history_extremes() {
        let mut meter = MetricsRegistry::new();
        for v in [4.0, 2.0, 3.0] {
            run_epoch(&mut meter, "valid", &[v]);
        }
        let hist = meter.history("valid", "loss").unwrap().to_vec();
        let min = hist.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = hist.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(meter.best_value("valid", "loss", true).unwrap(), min);
        assert_eq!(meter.best_value("valid", "loss", false).unwrap(), max);
    }
}
