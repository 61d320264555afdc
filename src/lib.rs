pub mod error;
pub mod meter;
pub mod callbacks;
pub mod run;

// Convenience re-exports
pub use error::{MeterError, RunError};
pub use meter::{MetricAccumulator, PhaseRegistry, MetricsRegistry, Monitor};
pub use callbacks::{Callback, LoggingCallback, InferCallback, FilesInferCallback, TableInferCallback};
pub use run::{run_loop, BatchOutput, PhasePlan, RunConfig, RunState, StepOutput};
