use indicatif::{ProgressBar, ProgressStyle};

use crate::callbacks::Callback;
use crate::error::RunError;
use crate::run::state::RunState;

/// Console progress and per-phase metric summary.
///
/// On `phase_begin` a progress bar sized to the phase's declared batch count
/// appears, labeled with the epoch and phase. Each `batch_end` advances it
/// and shows the in-progress running means for the active phase — the live
/// values, not the finalized ones. At `phase_end` the bar closes and one
/// `"{phase}_{metric}: {value}"` line is printed per registered metric.
///
/// The active phase is always taken from the hook's state argument.
#[derive(Default)]
pub struct LoggingCallback {
    bar: Option<ProgressBar>,
}

impl LoggingCallback {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Callback for LoggingCallback {
    fn on_phase_begin(&mut self, state: &RunState) -> Result<(), RunError> {
        let Some(phase) = state.phase else { return Ok(()) };

        let bar = ProgressBar::new(state.num_batches as u64);
        bar.set_style(
            ProgressStyle::with_template("{prefix} [{bar:40}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_prefix(format!(
            "Epoch {}/{} {}",
            state.epoch + 1,
            state.num_epochs,
            phase
        ));
        self.bar = Some(bar);
        Ok(())
    }

    fn on_batch_end(&mut self, state: &RunState) -> Result<(), RunError> {
        let Some(phase) = state.phase else { return Ok(()) };

        if let Some(ref bar) = self.bar {
            let values = state.meter.running_values(phase)?;
            let msg = values
                .iter()
                .map(|(name, v)| format!("{name}: {v:.6}"))
                .collect::<Vec<_>>()
                .join(" | ");
            bar.set_message(msg);
            bar.inc(1);
        }
        Ok(())
    }

    fn on_phase_end(&mut self, state: &RunState) -> Result<(), RunError> {
        let Some(phase) = state.phase else { return Ok(()) };

        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }

        for name in state.meter.metric_names(phase)? {
            let value = state.meter.last_value(phase, name)?;
            println!("{phase}_{name}: {value}");
        }
        Ok(())
    }
}
