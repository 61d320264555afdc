use std::sync::{Arc, atomic::AtomicBool};

/// Configuration for a `run_loop` run.
///
/// # Fields
/// - `epochs`    — total number of epochs to drive
/// - `stop_flag` — optional atomic flag; when set to `true` from another
///                 thread the loop terminates cleanly before the next epoch.
///                 Already-completed phases stay retrievable in the registry.
pub struct RunConfig {
    pub epochs: usize,
    pub stop_flag: Option<Arc<AtomicBool>>,
}

impl RunConfig {
    /// Creates a minimal `RunConfig` with no stop flag.
    pub fn new(epochs: usize) -> Self {
        RunConfig {
            epochs,
            stop_flag: None,
        }
    }
}
