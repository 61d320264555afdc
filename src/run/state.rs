use std::time::Duration;

use crate::meter::MetricsRegistry;

/// Per-sample outputs of one batch, as handed to `on_batch_end`.
///
/// `rows` and `sample_ids` are parallel: `rows[i]` is the output vector for
/// the sample identified by `sample_ids[i]`.
#[derive(Debug, Clone, Default)]
pub struct BatchOutput {
    pub rows: Vec<Vec<f64>>,
    pub sample_ids: Vec<String>,
}

/// The shared loop state passed to every callback hook.
///
/// Built fresh by the driver for each hook invocation; callbacks hold it only
/// for the duration of one call. The meter reference is read-only — all
/// registry mutation goes through the driver.
#[derive(Debug)]
pub struct RunState<'a> {
    /// 0-based index of the current epoch.
    pub epoch: usize,
    /// Total epochs requested for this run.
    pub num_epochs: usize,
    /// Active phase name; `None` for epoch-level hooks.
    pub phase: Option<&'a str>,
    /// Declared batch count of the active phase (0 for epoch-level hooks).
    pub num_batches: usize,
    /// 0-based index of the current batch within the phase, where applicable.
    pub batch_index: Option<usize>,
    /// Output of the batch that just finished; set only for `on_batch_end`.
    pub output: Option<&'a BatchOutput>,
    /// Wall-clock duration of the epoch; set only for `on_epoch_end`.
    pub epoch_elapsed: Option<Duration>,
    /// The run's metrics registry.
    pub meter: &'a MetricsRegistry,
}
