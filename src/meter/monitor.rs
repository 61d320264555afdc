use serde::{Serialize, Deserialize};

use crate::error::MeterError;

/// A parsed `"<phase>_<metric>"` identifier.
///
/// Used to configure which series a consumer (checkpointing, early stopping)
/// watches. The split is on the **first** underscore only, so metric names
/// may themselves contain underscores: `"valid_loss_total"` has phase
/// `"valid"` and metric `"loss_total"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Monitor {
    pub raw: String,
    pub phase: String,
    pub metric: String,
}

impl Monitor {
    pub fn parse(raw: &str) -> Result<Self, MeterError> {
        let (phase, metric) = raw
            .split_once('_')
            .ok_or_else(|| MeterError::MalformedIdentifier(raw.to_string()))?;
        Ok(Monitor {
            raw: raw.to_string(),
            phase: phase.to_string(),
            metric: metric.to_string(),
        })
    }
}

impl std::fmt::Display for Monitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
