use lastseen_match::MatchError;
use thiserror::Error;

use crate::blob::BlobError;
use crate::extract::ExtractError;
use crate::store::StoreError;

/// Everything an orchestrator call can fail with. Resolved to a response at
/// the transport boundary; nothing here aborts the process.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Request rejected before any extraction or storage work.
    #[error("{0}")]
    Validation(String),

    #[error("blob {0} not found")]
    BlobNotFound(String),

    #[error("no face found in image")]
    NoFaceDetected,

    /// A stored descriptor is incompatible with the query. Fails the one
    /// request; the store itself is left alone.
    #[error(transparent)]
    Dimension(#[from] MatchError),

    #[error("enrollment store failure: {0}")]
    Storage(#[from] StoreError),

    #[error("blob store failure: {0}")]
    Blob(#[from] BlobError),

    #[error("descriptor extractor failure: {0}")]
    Extractor(#[from] ExtractError),

    #[error("{0} timed out")]
    Timeout(&'static str),
}
