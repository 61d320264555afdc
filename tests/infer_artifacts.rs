use loopmeter::{
    run_loop, BatchOutput, Callback, FilesInferCallback, InferCallback, MetricsRegistry,
    PhasePlan, RunConfig, StepOutput, TableInferCallback,
};

fn infer_run(callbacks: &mut Vec<Box<dyn Callback>>) {
    let config = RunConfig::new(1);
    let phases = vec![PhasePlan::new("infer", 2)];
    let mut meter = MetricsRegistry::new();

    run_loop(&config, &phases, &mut meter, callbacks, |_phase, b| {
        let base = (b * 2) as f64;
        StepOutput {
            metrics: vec![("dummy".into(), 0.0)],
            output: BatchOutput {
                rows: vec![vec![base, base + 0.5], vec![base + 1.0, base + 1.5]],
                sample_ids: vec![format!("s{}", b * 2), format!("s{}", b * 2 + 1)],
            },
        }
    })
    .unwrap();
}

#[test]
fn aggregate_artifact_holds_all_rows() {
    let dir = tempfile::tempdir().unwrap();
    let mut callbacks: Vec<Box<dyn Callback>> =
        vec![Box::new(InferCallback::new(dir.path()).unwrap())];
    infer_run(&mut callbacks);

    let raw = std::fs::read_to_string(dir.path().join("infer.json")).unwrap();
    let rows: Vec<Vec<f64>> = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        rows,
        vec![
            vec![0.0, 0.5],
            vec![1.0, 1.5],
            vec![2.0, 2.5],
            vec![3.0, 3.5],
        ]
    );
}

#[test]
fn per_sample_artifacts_are_named_by_id() {
    let dir = tempfile::tempdir().unwrap();
    let mut callbacks: Vec<Box<dyn Callback>> =
        vec![Box::new(FilesInferCallback::new(dir.path()).unwrap())];
    infer_run(&mut callbacks);

    for id in ["s0", "s1", "s2", "s3"] {
        assert!(dir.path().join(format!("{id}.json")).exists());
    }
    let raw = std::fs::read_to_string(dir.path().join("s2.json")).unwrap();
    let row: Vec<f64> = serde_json::from_str(&raw).unwrap();
    assert_eq!(row, vec![2.0, 2.5]);
}

#[test]
fn table_artifact_has_positional_header() {
    let dir = tempfile::tempdir().unwrap();
    let mut callbacks: Vec<Box<dyn Callback>> =
        vec![Box::new(TableInferCallback::new(dir.path(), None).unwrap())];
    infer_run(&mut callbacks);

    let raw = std::fs::read_to_string(dir.path().join("infer.csv")).unwrap();
    let lines: Vec<&str> = raw.lines().collect();
    assert_eq!(lines[0], "id,o_0,o_1");
    assert_eq!(lines[1], "s0,0,0.5");
    assert_eq!(lines.len(), 5);
}

#[test]
fn table_artifact_honors_explicit_columns() {
    let dir = tempfile::tempdir().unwrap();
    let columns = Some(vec!["sample".into(), "p0".into(), "p1".into()]);
    let mut callbacks: Vec<Box<dyn Callback>> =
        vec![Box::new(TableInferCallback::new(dir.path(), columns).unwrap())];
    infer_run(&mut callbacks);

    let raw = std::fs::read_to_string(dir.path().join("infer.csv")).unwrap();
    assert_eq!(raw.lines().next().unwrap(), "sample,p0,p1");
}

#[test]
fn output_dir_creation_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    // Constructing twice over the same path must not fail.
    InferCallback::new(&nested).unwrap();
    InferCallback::new(&nested).unwrap();
    assert!(nested.is_dir());
}
