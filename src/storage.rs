//! Attachment storage in the upload directory.

use std::path::{Path, PathBuf};

use tracing::debug;

/// Upload directory holding photos and documents.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the directory if it does not exist yet.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Store bytes under a fresh unique name, keeping the original extension.
    ///
    /// Returns the stored file name (not the full path).
    pub async fn save(&self, original_name: &str, bytes: &[u8]) -> std::io::Result<String> {
        let name = match extension_of(original_name) {
            Some(ext) => format!("{}.{ext}", uuid::Uuid::new_v4()),
            None => uuid::Uuid::new_v4().to_string(),
        };
        self.ensure_dir().await?;
        tokio::fs::write(self.dir.join(&name), bytes).await?;
        debug!("Stored upload {original_name} as {name} ({} bytes)", bytes.len());
        Ok(name)
    }

    /// Resolve a stored name to a path. Names that could escape the directory are refused.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        if !is_safe_name(name) {
            return None;
        }
        Some(self.dir.join(name))
    }

    /// Delete a stored file. Missing files are not an error.
    pub async fn remove(&self, name: &str) -> std::io::Result<()> {
        let Some(path) = self.resolve(name) else {
            return Ok(());
        };
        match tokio::fs::remove_file(path).await {
            Ok(()) => {
                debug!("Removed upload {name}");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Read a stored file. `Ok(None)` when it does not exist.
    pub async fn read(&self, name: &str) -> std::io::Result<Option<Vec<u8>>> {
        let Some(path) = self.resolve(name) else {
            return Ok(None);
        };
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// A stored name is a single path component without traversal.
pub fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && !name.contains('/')
        && !name.contains('\\')
        && !name.contains("..")
        && !name.starts_with('.')
}

/// Lowercased alphanumeric extension, if any.
fn extension_of(name: &str) -> Option<String> {
    let ext = Path::new(name).extension()?.to_str()?;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Content type for a stored file, by extension.
pub fn content_type(name: &str) -> &'static str {
    match extension_of(name).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safe_names() {
        assert!(is_safe_name("3f2a.png"));
        assert!(!is_safe_name("../config.toml"));
        assert!(!is_safe_name("a/b.png"));
        assert!(!is_safe_name("a\\b.png"));
        assert!(!is_safe_name(".hidden"));
        assert!(!is_safe_name(""));
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type("foto.JPG"), "image/jpeg");
        assert_eq!(content_type("laudo.pdf"), "application/pdf");
        assert_eq!(content_type("sem-extensao"), "application/octet-stream");
    }

    #[tokio::test]
    async fn test_save_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = UploadStore::new(dir.path().join("uploads"));

        let name = store.save("Foto Perfil.PNG", b"png-bytes").await.unwrap();
        assert!(name.ends_with(".png"));
        assert_eq!(store.read(&name).await.unwrap().as_deref(), Some(&b"png-bytes"[..]));
        assert_eq!(store.read("missing.png").await.unwrap(), None);
        assert_eq!(store.read("../escape").await.unwrap(), None);

        store.remove(&name).await.unwrap();
        assert_eq!(store.read(&name).await.unwrap(), None);
        store.remove(&name).await.unwrap();
    }
}
