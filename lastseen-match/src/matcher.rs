use thiserror::Error;

use crate::gallery::Gallery;
use crate::types::Descriptor;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(
        "descriptor length mismatch at gallery index {index}: expected {expected}, found {found}"
    )]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },
}

/// Accepted match for one query descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult {
    pub user_id: String,
    pub confidence: f32,
    pub distance: f32,
}

/// Euclidean distance between two descriptors. Callers check lengths first;
/// ndarray panics on a shape mismatch, which is why this stays internal.
fn euclidean_distance(a: &Descriptor, b: &Descriptor) -> f32 {
    let diff = a.vector() - b.vector();
    diff.dot(&diff).sqrt()
}

/// Finds the gallery entry closest to `query`.
///
/// Returns `Ok(None)` when the gallery is empty or the closest entry is
/// farther than `threshold`. Ties go to the earliest gallery index, so a
/// fixed gallery always yields the same winner. A gallery descriptor whose
/// length differs from the query's is a data-integrity failure, never
/// silently truncated.
pub fn best_match(
    gallery: &Gallery,
    query: &Descriptor,
    threshold: f32,
) -> Result<Option<MatchResult>, MatchError> {
    if gallery.is_empty() {
        return Ok(None);
    }

    let mut best: Option<(usize, f32)> = None;
    for (index, candidate) in gallery.embeddings().iter().enumerate() {
        if candidate.len() != query.len() {
            return Err(MatchError::DimensionMismatch {
                index,
                expected: query.len(),
                found: candidate.len(),
            });
        }
        let dist = euclidean_distance(candidate, query);
        match best {
            Some((_, best_dist)) if dist < best_dist => best = Some((index, dist)),
            None => best = Some((index, dist)),
            _ => {}
        }
    }

    let Some((index, dist)) = best else {
        return Ok(None);
    };
    if dist > threshold {
        return Ok(None);
    }
    Ok(Some(MatchResult {
        user_id: gallery.user_ids()[index].clone(),
        confidence: score_from_distance(dist, threshold),
        distance: dist,
    }))
}

/// Maps a raw distance to a confidence in [0, 1], monotonically decreasing
/// in distance within each branch.
///
/// Note the branch boundary: at `dist == threshold` the `>=` arm yields
/// exactly 1.0 while the other arm approaches 0.5 from below. That is the
/// original scoring curve, kept as-is.
pub fn score_from_distance(dist: f32, threshold: f32) -> f32 {
    if dist >= threshold {
        (1.0 - (dist - threshold)).max(0.0)
    } else {
        1.0 - (dist / threshold) * 0.5
    }
}
