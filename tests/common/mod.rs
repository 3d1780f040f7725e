#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use lastseen_face::blob::{BlobError, BlobStore};
use lastseen_face::extract::{ExtractError, Extractor};
use lastseen_face::service::FaceService;
use lastseen_face::store::{EnrollmentStore, StoreError};
use lastseen_face::{Descriptor, DetectedFace, EnrollmentRecord};
use lastseen_match::BoundingBox;

pub fn descriptor(values: &[f32]) -> Descriptor {
    Descriptor::new(values.to_vec())
}

pub fn face(values: &[f32]) -> DetectedFace {
    DetectedFace {
        region: BoundingBox {
            x: 0.0,
            y: 0.0,
            w: 32.0,
            h: 32.0,
        },
        descriptor: descriptor(values),
    }
}

#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<EnrollmentRecord>>,
}

impl MemoryStore {
    pub fn with_enrollments(pairs: &[(&str, &[f32])]) -> Self {
        let records = pairs
            .iter()
            .map(|(user, values)| EnrollmentRecord {
                id: Uuid::new_v4(),
                user_id: user.to_string(),
                embedding: descriptor(values),
                created_at: Utc::now(),
            })
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn count(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

impl EnrollmentStore for MemoryStore {
    fn insert(&self, user_id: &str, embedding: Descriptor) -> Result<Uuid, StoreError> {
        let record = EnrollmentRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_owned(),
            embedding,
            created_at: Utc::now(),
        };
        let id = record.id;
        self.records.lock().unwrap().push(record);
        Ok(id)
    }

    fn load_all(&self) -> Result<Vec<EnrollmentRecord>, StoreError> {
        Ok(self.records.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MapBlobStore {
    blobs: HashMap<String, Vec<u8>>,
}

impl MapBlobStore {
    pub fn with_blob(id: &str, data: &[u8]) -> Self {
        let mut blobs = HashMap::new();
        blobs.insert(id.to_string(), data.to_vec());
        Self { blobs }
    }
}

#[async_trait]
impl BlobStore for MapBlobStore {
    async fn fetch(&self, id: &str) -> Result<Option<Vec<u8>>, BlobError> {
        Ok(self.blobs.get(id).cloned())
    }
}

/// Returns the same face list for any input image.
pub struct FakeExtractor {
    pub faces: Vec<DetectedFace>,
}

impl FakeExtractor {
    pub fn detecting(faces: Vec<DetectedFace>) -> Self {
        Self { faces }
    }

    pub fn blind() -> Self {
        Self { faces: Vec::new() }
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<DetectedFace>, ExtractError> {
        Ok(self.faces.clone())
    }
}

/// Never answers within any sane deadline.
pub struct StalledExtractor;

#[async_trait]
impl Extractor for StalledExtractor {
    async fn extract(&self, _image: &[u8]) -> Result<Vec<DetectedFace>, ExtractError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(Vec::new())
    }
}

pub fn service(
    store: Arc<MemoryStore>,
    blobs: MapBlobStore,
    extractor: impl Extractor + 'static,
    threshold: f32,
) -> FaceService {
    FaceService::new(
        store,
        Arc::new(blobs),
        Arc::new(extractor),
        threshold,
        Duration::from_secs(5),
    )
}
