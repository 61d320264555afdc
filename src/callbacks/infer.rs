use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use crate::callbacks::Callback;
use crate::error::RunError;
use crate::run::state::RunState;

/// Buffers every per-sample output row and writes one aggregate JSON array
/// (`infer.json`) at phase end.
pub struct InferCallback {
    out_dir: PathBuf,
    predictions: Vec<Vec<f64>>,
}

impl InferCallback {
    /// Creates the output directory (recursively, idempotently) up front so
    /// the run fails at construction rather than at the first flush.
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self, RunError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(InferCallback {
            out_dir,
            predictions: Vec::new(),
        })
    }
}

impl Callback for InferCallback {
    fn on_batch_end(&mut self, state: &RunState) -> Result<(), RunError> {
        if let Some(output) = state.output {
            self.predictions.extend(output.rows.iter().cloned());
        }
        Ok(())
    }

    fn on_phase_end(&mut self, _state: &RunState) -> Result<(), RunError> {
        let path = self.out_dir.join("infer.json");
        log::debug!("writing {} predictions to {}", self.predictions.len(), path.display());
        let file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(file, &self.predictions)?;
        self.predictions.clear();
        Ok(())
    }
}

/// Writes one JSON file per sample, named by the sample's identifier from
/// the batch payload.
pub struct FilesInferCallback {
    out_dir: PathBuf,
}

impl FilesInferCallback {
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self, RunError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(FilesInferCallback { out_dir })
    }
}

impl Callback for FilesInferCallback {
    fn on_batch_end(&mut self, state: &RunState) -> Result<(), RunError> {
        let Some(output) = state.output else { return Ok(()) };

        for (id, row) in output.sample_ids.iter().zip(output.rows.iter()) {
            let path = self.out_dir.join(format!("{id}.json"));
            let file = BufWriter::new(File::create(path)?);
            serde_json::to_writer(file, row)?;
        }
        Ok(())
    }
}

/// Accumulates one row per sample (identifier plus indexed output
/// components) and writes a single delimited table (`infer.csv`) at phase
/// end.
///
/// Column names default to `id, o_0, o_1, ...` from the width of the first
/// row; an explicit list overrides them.
pub struct TableInferCallback {
    out_dir: PathBuf,
    columns: Option<Vec<String>>,
    rows: Vec<(String, Vec<f64>)>,
}

impl TableInferCallback {
    pub fn new(
        out_dir: impl Into<PathBuf>,
        columns: Option<Vec<String>>,
    ) -> Result<Self, RunError> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir)?;
        Ok(TableInferCallback {
            out_dir,
            columns,
            rows: Vec::new(),
        })
    }

    fn header(&self) -> Vec<String> {
        match &self.columns {
            Some(cols) => cols.clone(),
            None => {
                let width = self.rows.first().map_or(0, |(_, row)| row.len());
                let mut cols = vec!["id".to_string()];
                cols.extend((0..width).map(|i| format!("o_{i}")));
                cols
            }
        }
    }
}

impl Callback for TableInferCallback {
    fn on_batch_end(&mut self, state: &RunState) -> Result<(), RunError> {
        let Some(output) = state.output else { return Ok(()) };

        for (id, row) in output.sample_ids.iter().zip(output.rows.iter()) {
            self.rows.push((id.clone(), row.clone()));
        }
        Ok(())
    }

    fn on_phase_end(&mut self, _state: &RunState) -> Result<(), RunError> {
        let path = self.out_dir.join("infer.csv");
        let mut file = BufWriter::new(File::create(path)?);

        writeln!(file, "{}", self.header().join(","))?;
        for (id, row) in &self.rows {
            let cells = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(file, "{id},{cells}")?;
        }

        self.rows.clear();
        Ok(())
    }
}
