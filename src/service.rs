use std::sync::Arc;
use std::time::Duration;

use lastseen_match::{best_match, DetectedFace, Gallery};
use log::info;
use serde::Serialize;
use tokio::time::timeout;
use uuid::Uuid;

use crate::blob::BlobStore;
use crate::error::ServiceError;
use crate::extract::Extractor;
use crate::store::EnrollmentStore;

/// Request input: either the image bytes themselves or a reference into the
/// blob store.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Bytes(Vec<u8>),
    Blob(String),
}

#[derive(Debug, Serialize)]
pub struct FaceMatch {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub confidence: f32,
}

/// Outcome of one recognition request. `faces` counts every detection;
/// `matches` holds only the accepted ones, in extractor order. The two are
/// independent: faces with no acceptable match simply do not appear.
#[derive(Debug, Serialize)]
pub struct Recognition {
    pub faces: usize,
    pub matches: Vec<FaceMatch>,
}

/// The orchestrators. All collaborators are injected once at startup; the
/// service itself holds no mutable state, so one instance serves every
/// request concurrently.
pub struct FaceService {
    store: Arc<dyn EnrollmentStore>,
    blobs: Arc<dyn BlobStore>,
    extractor: Arc<dyn Extractor>,
    threshold: f32,
    op_timeout: Duration,
}

impl FaceService {
    pub fn new(
        store: Arc<dyn EnrollmentStore>,
        blobs: Arc<dyn BlobStore>,
        extractor: Arc<dyn Extractor>,
        threshold: f32,
        op_timeout: Duration,
    ) -> Self {
        Self {
            store,
            blobs,
            extractor,
            threshold,
            op_timeout,
        }
    }

    async fn resolve(&self, source: ImageSource) -> Result<Vec<u8>, ServiceError> {
        match source {
            ImageSource::Bytes(data) => {
                if data.is_empty() {
                    return Err(ServiceError::Validation("empty image payload".into()));
                }
                Ok(data)
            }
            ImageSource::Blob(id) => {
                let fetched = timeout(self.op_timeout, self.blobs.fetch(&id))
                    .await
                    .map_err(|_| ServiceError::Timeout("blob fetch"))??;
                fetched.ok_or(ServiceError::BlobNotFound(id))
            }
        }
    }

    async fn detect(&self, image: &[u8]) -> Result<Vec<DetectedFace>, ServiceError> {
        Ok(timeout(self.op_timeout, self.extractor.extract(image))
            .await
            .map_err(|_| ServiceError::Timeout("descriptor extraction"))??)
    }

    /// Identifies every face in the input against the enrolled gallery.
    pub async fn recognize(&self, source: ImageSource) -> Result<Recognition, ServiceError> {
        let image = self.resolve(source).await?;
        let faces = self.detect(&image).await?;
        if faces.is_empty() {
            return Ok(Recognition {
                faces: 0,
                matches: Vec::new(),
            });
        }

        // One gallery snapshot per request, shared by every detected face.
        let gallery = Gallery::from_records(self.store.load_all()?);

        let mut matches = Vec::new();
        for face in &faces {
            if let Some(found) = best_match(&gallery, &face.descriptor, self.threshold)? {
                matches.push(FaceMatch {
                    user_id: found.user_id,
                    confidence: found.confidence,
                });
            }
        }
        info!(
            "recognized {} face(s), {} match(es)",
            faces.len(),
            matches.len()
        );
        Ok(Recognition {
            faces: faces.len(),
            matches,
        })
    }

    /// Enrolls one descriptor under `user_id` and returns the record id.
    /// Nothing is written unless extraction produced a usable face.
    pub async fn enroll(&self, user_id: &str, source: ImageSource) -> Result<Uuid, ServiceError> {
        if user_id.trim().is_empty() {
            return Err(ServiceError::Validation("userId required".into()));
        }
        let image = self.resolve(source).await?;
        let faces = self.detect(&image).await?;
        // When several faces are present the extractor's first one wins.
        let Some(face) = faces.into_iter().next() else {
            return Err(ServiceError::NoFaceDetected);
        };
        let id = self.store.insert(user_id, face.descriptor)?;
        info!("enrolled user {user_id} as {id}");
        Ok(id)
    }
}
