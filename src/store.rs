use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::Utc;
use lastseen_match::{Descriptor, EnrollmentRecord};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("enrollment store i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("enrollment store codec: {0}")]
    Codec(#[from] postcard::Error),
}

/// Durable, append-only home of enrollment records. `insert` assigns the id
/// and timestamp; records are never updated in place.
pub trait EnrollmentStore: Send + Sync {
    fn insert(&self, user_id: &str, embedding: Descriptor) -> Result<Uuid, StoreError>;

    /// Every persisted record, in no guaranteed order. An empty store is an
    /// empty vec, not an error.
    fn load_all(&self) -> Result<Vec<EnrollmentRecord>, StoreError>;
}

/// File-backed store: one postcard-encoded record list per data directory.
/// Readers and writers share a mutex, and the file is replaced by rename,
/// never truncated in place, so a reader always sees a complete snapshot.
pub struct FileStore {
    file: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn open(data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(data_dir)?;
        Ok(Self {
            file: data_dir.join("enrollments.bin"),
            lock: Mutex::new(()),
        })
    }

    fn read_records(&self) -> Result<Vec<EnrollmentRecord>, StoreError> {
        if !self.file.exists() {
            return Ok(Vec::new());
        }
        let data = std::fs::read(&self.file)?;
        Ok(postcard::from_bytes(&data)?)
    }
}

impl EnrollmentStore for FileStore {
    fn insert(&self, user_id: &str, embedding: Descriptor) -> Result<Uuid, StoreError> {
        let record = EnrollmentRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            embedding,
            created_at: Utc::now(),
        };
        let id = record.id;

        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut records = self.read_records()?;
        records.push(record);
        let data = postcard::to_allocvec(&records)?;
        // Write to a sibling temp file and rename over the old snapshot;
        // a crash mid-write leaves the previous records intact.
        let tmp = self.file.with_extension("bin.tmp");
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.file)?;
        Ok(id)
    }

    fn load_all(&self) -> Result<Vec<EnrollmentRecord>, StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.read_records()
    }
}
