use std::collections::BTreeMap;

use serde::{Serialize, Deserialize};

use crate::error::MeterError;
use crate::meter::accumulator::MetricAccumulator;

/// One `MetricAccumulator` per metric name, for a single phase.
///
/// Accumulators are created lazily on the **write** path (`add_value`); read
/// operations never create anything and fail with `UnknownSeries` for a
/// metric that was never written.
///
/// `begin_epoch`/`end_epoch` broadcast to every contained accumulator,
/// including ones not touched this epoch — a registered metric that received
/// no values makes `end_epoch` fail with `NoSamplesInEpoch`. Guaranteeing at
/// least one value per registered metric per epoch is the caller's job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseRegistry {
    /// Phase name, used only to label accumulators and errors.
    phase: String,
    accumulators: BTreeMap<String, MetricAccumulator>,
}

impl PhaseRegistry {
    pub fn new(phase: impl Into<String>) -> Self {
        PhaseRegistry {
            phase: phase.into(),
            accumulators: BTreeMap::new(),
        }
    }

    fn series(&self, metric: &str) -> String {
        format!("{}/{}", self.phase, metric)
    }

    /// Write-path accessor: creates the accumulator on first reference.
    fn get_or_create(&mut self, metric: &str) -> &mut MetricAccumulator {
        let label = self.series(metric);
        self.accumulators
            .entry(metric.to_string())
            .or_insert_with(|| {
                log::debug!("creating accumulator for series {label}");
                MetricAccumulator::new(label)
            })
    }

    /// Read-path accessor: never creates.
    fn get(&self, metric: &str) -> Result<&MetricAccumulator, MeterError> {
        self.accumulators
            .get(metric)
            .ok_or_else(|| MeterError::UnknownSeries(self.series(metric)))
    }

    pub fn add_value(&mut self, metric: &str, value: f64) {
        self.get_or_create(metric).add_value(value);
    }

    /// Broadcasts an epoch reset to every registered accumulator.
    pub fn begin_epoch(&mut self) {
        for acc in self.accumulators.values_mut() {
            acc.begin_epoch();
        }
    }

    /// Broadcasts an epoch finalize to every registered accumulator.
    ///
    /// Fails on the first accumulator that saw no values this epoch.
    pub fn end_epoch(&mut self) -> Result<(), MeterError> {
        for acc in self.accumulators.values_mut() {
            acc.end_epoch()?;
        }
        Ok(())
    }

    pub fn last_value(&self, metric: &str) -> Result<f64, MeterError> {
        self.get(metric)?.last_value()
    }

    pub fn history(&self, metric: &str) -> Result<&[f64], MeterError> {
        Ok(self.get(metric)?.history())
    }

    pub fn best_value(&self, metric: &str, minimize: bool) -> Result<f64, MeterError> {
        self.get(metric)?.best_value(minimize)
    }

    /// Names of every metric registered under this phase.
    pub fn metric_names(&self) -> Vec<&str> {
        self.accumulators.keys().map(String::as_str).collect()
    }

    /// In-progress running means of the current epoch, for live display.
    /// Metrics with no values yet this epoch are omitted.
    pub fn running_values(&self) -> Vec<(&str, f64)> {
        self.accumulators
            .iter()
            .filter_map(|(name, acc)| acc.running_mean().map(|m| (name.as_str(), m)))
            .collect()
    }
}
