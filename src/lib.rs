pub mod blob;
pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod service;
pub mod store;

// Re-export matching core types for convenience
pub use lastseen_match::{
    best_match, Descriptor, DetectedFace, EnrollmentRecord, Gallery, MatchResult,
};
