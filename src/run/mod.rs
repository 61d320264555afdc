pub mod state;
pub mod config;
pub mod loop_fn;

pub use state::{BatchOutput, RunState};
pub use config::RunConfig;
pub use loop_fn::{run_loop, PhasePlan, StepOutput};
