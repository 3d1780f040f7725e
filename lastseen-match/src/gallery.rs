use crate::types::{Descriptor, EnrollmentRecord};

/// In-memory snapshot of every enrolled (userId, embedding) pair, as two
/// aligned parallel arrays. Built from a point-in-time read of the store
/// and discarded after the matching pass; index `i` in one array refers to
/// the same record as index `i` in the other.
#[derive(Debug, Clone, Default)]
pub struct Gallery {
    user_ids: Vec<String>,
    embeddings: Vec<Descriptor>,
}

impl Gallery {
    /// Splits records into the aligned arrays, preserving input order so a
    /// best-match index maps back to the record it came from.
    pub fn from_records(records: Vec<EnrollmentRecord>) -> Self {
        let mut user_ids = Vec::with_capacity(records.len());
        let mut embeddings = Vec::with_capacity(records.len());
        for record in records {
            user_ids.push(record.user_id);
            embeddings.push(record.embedding);
        }
        Self {
            user_ids,
            embeddings,
        }
    }

    /// Builds a gallery directly from pairs; mostly useful in tests.
    pub fn from_pairs(pairs: Vec<(String, Descriptor)>) -> Self {
        let mut user_ids = Vec::with_capacity(pairs.len());
        let mut embeddings = Vec::with_capacity(pairs.len());
        for (user_id, embedding) in pairs {
            user_ids.push(user_id);
            embeddings.push(embedding);
        }
        Self {
            user_ids,
            embeddings,
        }
    }

    pub fn len(&self) -> usize {
        self.user_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.user_ids.is_empty()
    }

    pub fn user_ids(&self) -> &[String] {
        &self.user_ids
    }

    pub fn embeddings(&self) -> &[Descriptor] {
        &self.embeddings
    }
}
