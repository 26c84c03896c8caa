//! Capability-scoped filesystem image store.
//!
//! The uploads directory is opened once as a `cap_std` [`Dir`]; every path is
//! resolved inside it, so removals cannot reach files outside the directory
//! even if a stored path were tampered with.

use std::io;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};

use crate::domain::ImagePath;
use crate::domain::ports::{ImageStore, ImageStoreError};

/// Image store rooted at an uploads directory.
#[derive(Clone)]
pub struct FsImageStore {
    root: Arc<Dir>,
}

impl FsImageStore {
    /// Open `uploads_dir`, which must already exist.
    ///
    /// # Errors
    ///
    /// Returns the I/O error when the directory cannot be opened.
    pub fn open(uploads_dir: &Path) -> io::Result<Self> {
        let root = Dir::open_ambient_dir(uploads_dir, ambient_authority())?;
        Ok(Self::from_dir(root))
    }

    pub fn from_dir(root: Dir) -> Self {
        Self {
            root: Arc::new(root),
        }
    }
}

fn map_io_error(path: &ImagePath, error: &io::Error) -> ImageStoreError {
    match error.kind() {
        io::ErrorKind::NotFound => ImageStoreError::missing(path.to_string()),
        _ => ImageStoreError::io(path.to_string(), error.to_string()),
    }
}

#[async_trait]
impl ImageStore for FsImageStore {
    async fn remove(&self, path: &ImagePath) -> Result<(), ImageStoreError> {
        let root = Arc::clone(&self.root);
        let target = path.clone();
        tokio::task::spawn_blocking(move || {
            root.remove_file(target.as_path())
                .map_err(|err| map_io_error(&target, &err))
        })
        .await
        .map_err(|err| ImageStoreError::io(path.to_string(), err.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn uploads() -> TempDir {
        tempfile::tempdir().expect("temp dir")
    }

    fn store_with_file(uploads: &TempDir, relative: &str) -> FsImageStore {
        let root = Dir::open_ambient_dir(uploads.path(), ambient_authority()).expect("open");
        root.create_dir_all("images").expect("mkdir");
        root.write(relative, b"png").expect("write");
        FsImageStore::from_dir(root)
    }

    #[rstest]
    #[tokio::test]
    async fn removes_existing_image(uploads: TempDir) {
        let store = store_with_file(&uploads, "images/a.png");
        let path = ImagePath::new("images/a.png").expect("path");

        store.remove(&path).await.expect("removed");

        assert!(!store.root.exists("images/a.png"));
    }

    #[rstest]
    #[tokio::test]
    async fn missing_image_is_reported(uploads: TempDir) {
        let store = store_with_file(&uploads, "images/a.png");
        let path = ImagePath::new("images/b.png").expect("path");

        let error = store.remove(&path).await.expect_err("missing");

        assert!(matches!(error, ImageStoreError::Missing { .. }));
        assert!(store.root.exists("images/a.png"));
    }

    #[rstest]
    fn open_fails_for_absent_directory(uploads: TempDir) {
        let absent = uploads.path().join("nope");
        assert!(FsImageStore::open(&absent).is_err());
    }
}
