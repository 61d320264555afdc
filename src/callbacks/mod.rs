pub mod callback;
pub mod logging;
pub mod infer;

pub use callback::Callback;
pub use logging::LoggingCallback;
pub use infer::{InferCallback, FilesInferCallback, TableInferCallback};
