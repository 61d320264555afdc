pub mod accumulator;
pub mod phase;
pub mod registry;
pub mod monitor;

pub use accumulator::MetricAccumulator;
pub use phase::PhaseRegistry;
pub use registry::MetricsRegistry;
pub use monitor::Monitor;
