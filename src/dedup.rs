// 🔍 Identity & Dedup Resolver - Same real-world business?
// Pure functions over (existing-set, candidate); no I/O. First-seen
// wins: a later duplicate is dropped, never merged.

use crate::business::Business;

// ============================================================================
// MATCH KEY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKey {
    /// Case-insensitive name equality
    Name,

    /// Both phones non-empty and equal
    Phone,

    /// Both gateway identity tokens non-empty and equal
    ExternalId,
}

// ============================================================================
// DUPLICATE MATCH RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateMatch {
    /// Store id of the record the candidate collided with
    pub existing_id: u32,

    /// Name of the surviving record
    pub existing_name: String,

    /// Which key detected the collision
    pub key: MatchKey,
}

/// Find the first record in `pool` that the candidate duplicates.
///
/// A candidate is a duplicate if ANY key matches. The caller checks the
/// persistent store and the in-run accumulator separately, so
/// within-run duplicates across different queries are also caught.
pub fn find_duplicate(pool: &[Business], candidate: &Business) -> Option<DuplicateMatch> {
    let name_key = candidate.name_key();

    for existing in pool {
        let key = if existing.name_key() == name_key {
            Some(MatchKey::Name)
        } else if matches_key(existing.phone_key(), candidate.phone_key()) {
            Some(MatchKey::Phone)
        } else if matches_key(existing.external_key(), candidate.external_key()) {
            Some(MatchKey::ExternalId)
        } else {
            None
        };

        if let Some(key) = key {
            return Some(DuplicateMatch {
                existing_id: existing.id,
                existing_name: existing.name.clone(),
                key,
            });
        }
    }

    None
}

/// True when the candidate duplicates any record in either pool
pub fn is_duplicate(store: &[Business], pending: &[Business], candidate: &Business) -> bool {
    find_duplicate(store, candidate).is_some() || find_duplicate(pending, candidate).is_some()
}

fn matches_key(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================
