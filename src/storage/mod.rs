//! Storage module for uploaded image bytes
//!
//! Images are stored under their internal filename inside a configured
//! data directory. Filenames are opaque keys; anything that could walk
//! out of the directory is rejected.

mod local;

pub use local::ImageStore;

use thiserror::Error;

/// Storage-specific errors
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
