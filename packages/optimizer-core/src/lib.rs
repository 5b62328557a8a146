pub mod config;
pub mod constants;
pub mod errors;
pub mod event;
pub mod key;
pub mod pipeline;
pub mod staging;
pub mod storage;
pub mod transform;
pub mod validation;

// 公開API
pub use config::{OptimizerConfig, UnsupportedTypePolicy};
pub use constants::{DEADLINE_SAFETY_MARGIN, MAX_KEY_LENGTH};
pub use errors::{ConfigError, PipelineError, StorageError, TransformError};
pub use event::ObjectCreated;
pub use key::{KeyMarker, derive_destination_key};
pub use pipeline::{Action, Cleanup, Deadline, Outcome, Pipeline};
pub use staging::StagingArea;
pub use storage::{
    MemoryObjectStore, ObjectLocation, ObjectStore, S3Config, S3ObjectStore, StoreOperation,
    create_s3_client,
};
pub use transform::{
    Classification, Codec, EncodeSettings, FormatRegistry, JpegQuality, PngCompression,
    Transcoded, decode_image, encode_image, extension_of, transcode,
};
pub use validation::{decode_notification_key, validate_key};
