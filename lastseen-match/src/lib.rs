pub mod gallery;
pub mod matcher;
pub mod types;

pub use gallery::Gallery;
pub use matcher::{best_match, score_from_distance, MatchError, MatchResult};
pub use types::{BoundingBox, Descriptor, DetectedFace, EnrollmentRecord};
