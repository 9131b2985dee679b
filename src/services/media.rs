//! Event image storage
//!
//! Uploaded images live on disk under the configured media root; the
//! events table stores only the generated file name.

use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::models::ImageUpload;
use crate::utils::errors::Result;

#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Persist an uploaded image and return the stored file name
    pub async fn store(&self, upload: &ImageUpload) -> Result<String> {
        tokio::fs::create_dir_all(&self.root).await?;

        let name = stored_name(&upload.file_name);
        let path = self.root.join(&name);
        tokio::fs::write(&path, &upload.bytes).await?;

        debug!(file = %name, size = upload.bytes.len(), "Image stored");
        Ok(name)
    }

    /// Remove a stored image. A file that is already gone is not an error.
    pub async fn remove(&self, name: &str) -> Result<()> {
        let path = self.root.join(name);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(file = %name, "Image removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

/// Unique stored name keeping the (sanitized) original extension
fn stored_name(original: &str) -> String {
    let extension = Path::new(original)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(sanitize)
        .filter(|ext| !ext.is_empty());

    match extension {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

fn sanitize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(8)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_name_keeps_extension() {
        let name = stored_name("poster.PNG");
        assert!(name.ends_with(".png"));
    }

    #[test]
    fn test_stored_name_drops_hostile_extension() {
        let name = stored_name("x.p/../ng");
        assert!(!name.contains('/'));
        assert!(!name.contains(".."));
    }

    #[test]
    fn test_stored_names_are_unique() {
        assert_ne!(stored_name("a.jpg"), stored_name("a.jpg"));
    }

    #[tokio::test]
    async fn test_store_and_remove_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = MediaStore::new(dir.path());

        let upload = ImageUpload {
            file_name: "poster.png".to_string(),
            bytes: vec![0x89, 0x50, 0x4e, 0x47],
        };

        let name = store.store(&upload).await.unwrap();
        assert!(store.path_of(&name).exists());

        store.remove(&name).await.unwrap();
        assert!(!store.path_of(&name).exists());

        // Removing again is fine
        store.remove(&name).await.unwrap();
    }
}
