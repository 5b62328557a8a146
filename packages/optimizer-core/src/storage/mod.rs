pub mod memory;
pub mod s3;
pub mod store;

pub use crate::errors::StorageError;
pub use memory::{MemoryObjectStore, StoreCall, StoreOperation};
pub use s3::{S3Config, S3ObjectStore, create_s3_client};
pub use store::{ObjectLocation, ObjectStore};
