use crate::error::RunError;
use crate::run::state::RunState;

/// Lifecycle hooks invoked by the loop driver.
///
/// Every hook defaults to a no-op, so implementations override only the
/// subset they care about. Hooks may read the registry through
/// `state.meter` and write derived artifacts, but must never call
/// `begin_phase`/`end_phase` — epoch boundaries are the driver's alone.
///
/// Dispatch order per epoch: `on_epoch_begin`, then for each phase
/// `on_phase_begin`, then for each batch `on_batch_begin`/`on_batch_end`
/// (registry writes happen in between), then `on_phase_end` (after the
/// phase's epoch is finalized), then `on_epoch_end`.
pub trait Callback {
    fn on_epoch_begin(&mut self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }

    fn on_epoch_end(&mut self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }

    fn on_phase_begin(&mut self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }

    fn on_phase_end(&mut self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }

    fn on_batch_begin(&mut self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }

    fn on_batch_end(&mut self, _state: &RunState) -> Result<(), RunError> {
        Ok(())
    }
}
