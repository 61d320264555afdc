use thiserror::Error;

/// Errors raised by the metric registry itself.
///
/// All four variants are caller-ordering or caller-integration errors: the
/// registry never retries, masks, or zero-fills — a bad call sequence is
/// surfaced at the call site.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MeterError {
    /// An epoch was finalized with zero recorded values for a metric.
    /// Reporting a mean here would be NaN; abort instead.
    #[error("metric '{0}' received no values in the current epoch")]
    NoSamplesInEpoch(String),

    /// A value/best query was made before any epoch completed for the series.
    #[error("metric '{0}' has no completed epochs")]
    EmptyHistory(String),

    /// A read against a phase/metric that was never written.
    #[error("unknown series '{0}'")]
    UnknownSeries(String),

    /// A monitor string without a `<phase>_<metric>` separator.
    #[error("malformed monitor '{0}': expected \"<phase>_<metric>\"")]
    MalformedIdentifier(String),
}

/// Errors raised while driving a run: registry misuse plus callback I/O.
#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Meter(#[from] MeterError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
