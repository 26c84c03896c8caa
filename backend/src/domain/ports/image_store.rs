//! Driven port for uploaded dish images.
//!
//! The upload transport writes files; the core only removes them once a dish
//! deletion has committed.

use async_trait::async_trait;

use crate::domain::ImagePath;

use super::define_port_error;

define_port_error! {
    /// Failures raised by image store adapters.
    pub enum ImageStoreError {
        /// No file exists at the path.
        Missing { path: String } => "image not found: {path}",
        /// The filesystem rejected the operation.
        Io { path: String, message: String } => "image operation failed for {path}: {message}",
    }
}

/// Port for removing stored images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Delete the image at `path`.
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError>;
}

/// Image store that keeps every file; used when no uploads directory is set.
#[derive(Debug, Default, Clone, Copy)]
pub struct RetainingImageStore;

#[async_trait]
impl ImageStore for RetainingImageStore {
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        tracing::debug!(path = %path, "image retained; no uploads directory configured");
        Ok(())
    }
}
