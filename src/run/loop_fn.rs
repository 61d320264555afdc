use std::sync::atomic::Ordering;
use std::time::Instant;

use crate::callbacks::Callback;
use crate::error::RunError;
use crate::meter::MetricsRegistry;
use crate::run::config::RunConfig;
use crate::run::state::{BatchOutput, RunState};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// One phase of an epoch, as declared to the driver.
#[derive(Debug, Clone)]
pub struct PhasePlan {
    pub name: String,
    pub num_batches: usize,
}

impl PhasePlan {
    pub fn new(name: impl Into<String>, num_batches: usize) -> Self {
        PhasePlan {
            name: name.into(),
            num_batches,
        }
    }
}

/// What one step-closure invocation hands back to the driver: the scalar
/// metric values for this batch plus the per-sample outputs.
#[derive(Debug, Clone, Default)]
pub struct StepOutput {
    pub metrics: Vec<(String, f64)>,
    pub output: BatchOutput,
}

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Drives `config.epochs` epochs over the declared phases, invoking `step`
/// once per batch and dispatching callback hooks in the fixed order:
///
/// `on_epoch_begin` → { per phase: `on_phase_begin` → { per batch:
/// `on_batch_begin` → step → registry writes → `on_batch_end` } →
/// phase finalize → `on_phase_end` } → `on_epoch_end`.
///
/// The driver alone calls `begin_phase`/`end_phase` on the registry:
/// `begin_phase` after `on_phase_begin` (so no value can land before the
/// epoch reset) and `end_phase` before `on_phase_end` (so phase-end hooks
/// read finalized epoch summaries, never stale ones).
///
/// The step closure receives `(phase, batch_index)` and performs whatever
/// computation the batch requires; the driver only routes its scalar metric
/// values into the registry and its per-sample outputs into `on_batch_end`.
///
/// # Early termination
/// A set `config.stop_flag` ends the run before the next epoch begins;
/// already-finalized phases remain retrievable from the registry.
pub fn run_loop<F>(
    config: &RunConfig,
    phases: &[PhasePlan],
    meter: &mut MetricsRegistry,
    callbacks: &mut [Box<dyn Callback>],
    mut step: F,
) -> Result<(), RunError>
where
    F: FnMut(&str, usize) -> StepOutput,
{
    for epoch in 0..config.epochs {
        if let Some(ref flag) = config.stop_flag {
            if flag.load(Ordering::Relaxed) {
                log::info!("stop flag set, ending run after {epoch} epochs");
                break;
            }
        }

        let t_start = Instant::now();

        let state = epoch_state(epoch, config.epochs, meter, None);
        for cb in callbacks.iter_mut() {
            cb.on_epoch_begin(&state)?;
        }

        for plan in phases {
            dispatch_phase(epoch, config.epochs, plan, meter, callbacks, &mut step)?;
        }

        let elapsed = t_start.elapsed();
        log::debug!(
            "epoch {}/{} finished in {} ms",
            epoch + 1,
            config.epochs,
            elapsed.as_millis()
        );

        let state = epoch_state(epoch, config.epochs, meter, Some(elapsed));
        for cb in callbacks.iter_mut() {
            cb.on_epoch_end(&state)?;
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

/// Runs one phase of one epoch: phase hooks, batch loop, epoch finalize.
fn dispatch_phase<F>(
    epoch: usize,
    num_epochs: usize,
    plan: &PhasePlan,
    meter: &mut MetricsRegistry,
    callbacks: &mut [Box<dyn Callback>],
    step: &mut F,
) -> Result<(), RunError>
where
    F: FnMut(&str, usize) -> StepOutput,
{
    let phase = plan.name.as_str();

    let state = phase_state(epoch, num_epochs, plan, meter, None, None);
    for cb in callbacks.iter_mut() {
        cb.on_phase_begin(&state)?;
    }

    meter.begin_phase(phase);

    for batch_index in 0..plan.num_batches {
        let state = phase_state(epoch, num_epochs, plan, meter, Some(batch_index), None);
        for cb in callbacks.iter_mut() {
            cb.on_batch_begin(&state)?;
        }

        let out = step(phase, batch_index);
        for (metric, value) in &out.metrics {
            meter.add_value(phase, metric, *value);
        }

        let state = phase_state(
            epoch,
            num_epochs,
            plan,
            meter,
            Some(batch_index),
            Some(&out.output),
        );
        for cb in callbacks.iter_mut() {
            cb.on_batch_end(&state)?;
        }
    }

    // Finalize before the phase-end hooks so they read this epoch's means.
    meter.end_phase(phase)?;

    let state = phase_state(epoch, num_epochs, plan, meter, None, None);
    for cb in callbacks.iter_mut() {
        cb.on_phase_end(&state)?;
    }

    Ok(())
}

fn epoch_state<'a>(
    epoch: usize,
    num_epochs: usize,
    meter: &'a MetricsRegistry,
    elapsed: Option<std::time::Duration>,
) -> RunState<'a> {
    RunState {
        epoch,
        num_epochs,
        phase: None,
        num_batches: 0,
        batch_index: None,
        output: None,
        epoch_elapsed: elapsed,
        meter,
    }
}

fn phase_state<'a>(
    epoch: usize,
    num_epochs: usize,
    plan: &'a PhasePlan,
    meter: &'a MetricsRegistry,
    batch_index: Option<usize>,
    output: Option<&'a BatchOutput>,
) -> RunState<'a> {
    RunState {
        epoch,
        num_epochs,
        phase: Some(plan.name.as_str()),
        num_batches: plan.num_batches,
        batch_index,
        output,
        epoch_elapsed: None,
        meter,
    }
}
