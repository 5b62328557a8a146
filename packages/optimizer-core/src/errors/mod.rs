pub mod types;

pub use types::{ConfigError, PipelineError, StorageError, TransformError};
