// Minimal demo binary: drives a synthetic two-phase run through the library
// with a logging callback attached. All real logic lives in src/lib.rs and
// its modules.
use loopmeter::{
    run_loop, Callback, LoggingCallback, MetricsRegistry, PhasePlan, RunConfig, StepOutput,
};

fn main() {
    let config = RunConfig::new(3);
    let phases = vec![PhasePlan::new("train", 8), PhasePlan::new("valid", 2)];
    let mut meter = MetricsRegistry::new();
    let mut callbacks: Vec<Box<dyn Callback>> = vec![Box::new(LoggingCallback::new())];

    let mut calls = 0u32;
    let result = run_loop(&config, &phases, &mut meter, &mut callbacks, |_phase, _b| {
        calls += 1;
        // Synthetic loss that decays over the run.
        let loss = 1.0 / f64::from(calls);
        StepOutput {
            metrics: vec![("loss".into(), loss), ("accuracy".into(), 1.0 - loss)],
            output: Default::default(),
        }
    });

    if let Err(err) = result {
        eprintln!("run failed: {err}");
        std::process::exit(1);
    }
}
