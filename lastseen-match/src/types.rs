use chrono::{DateTime, Utc};
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed-length face descriptor produced by an extractor.
///
/// The dimensionality is fixed by whichever extractor a deployment runs
/// (typically 128); all descriptors compared against each other must share
/// it. On the wire and on disk this is a plain float array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct Descriptor(Array1<f32>);

impl Descriptor {
    pub fn new(values: Vec<f32>) -> Self {
        Self(Array1::from(values))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn vector(&self) -> &Array1<f32> {
        &self.0
    }
}

impl From<Vec<f32>> for Descriptor {
    fn from(values: Vec<f32>) -> Self {
        Self::new(values)
    }
}

impl From<Descriptor> for Vec<f32> {
    fn from(descriptor: Descriptor) -> Self {
        descriptor.0.to_vec()
    }
}

/// Face bounding region reported by the extractor, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One detected face: where it is and what it looks like.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedFace {
    pub region: BoundingBox,
    pub descriptor: Descriptor,
}

/// A persisted enrollment. `id` and `created_at` are assigned by the store
/// at insert time and never change; records are append-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: Uuid,
    pub user_id: String,
    pub embedding: Descriptor,
    pub created_at: DateTime<Utc>,
}
