use std::path::{Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob store i/o: {0}")]
    Io(#[from] std::io::Error),
}

/// Fetches raw bytes by an opaque identifier. `Ok(None)` means the id does
/// not resolve; only infrastructure failures are errors.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn fetch(&self, id: &str) -> Result<Option<Vec<u8>>, BlobError>;
}

/// One file per blob under `<data_dir>/blobs`, named by the opaque id.
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn open(data_dir: &Path) -> Result<Self, BlobError> {
        let root = data_dir.join("blobs");
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }
}

// The id format belongs to whoever wrote the blob; the only check here is
// that it stays a single path component. A malformed id resolves as
// not-found, the same way an unparseable ObjectId would.
fn well_formed(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn fetch(&self, id: &str) -> Result<Option<Vec<u8>>, BlobError> {
        if !well_formed(id) {
            return Ok(None);
        }
        match tokio::fs::read(self.root.join(id)).await {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fetches_stored_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join("blobs").join("abc123"), b"jpeg bytes").unwrap();

        let fetched = store.fetch("abc123").await.unwrap();
        assert_eq!(fetched.as_deref(), Some(b"jpeg bytes".as_slice()));
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();
        assert!(store.fetch("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn malformed_ids_do_not_escape_the_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("outside"), b"secret").unwrap();
        let store = FsBlobStore::open(dir.path()).unwrap();

        for id in ["../outside", "a/b", "", ".hidden", "..", "/etc/passwd"] {
            assert!(store.fetch(id).await.unwrap().is_none(), "id {id:?}");
        }
    }
}
