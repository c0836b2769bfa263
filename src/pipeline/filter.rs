//! Classifies a raw match record as real vs. synthetic/test data.

use crate::models::MatchSnapshot;

/// Substrings in a match id that mark synthetic data
const ID_DENYLIST: &[&str] = &["mock", "test", "fake", "dummy", "sample"];

/// Provenance tags that mark a record as simulated
const SIMULATED_TAGS: &[&str] = &["mock", "simulated", "test", "sample"];

/// Real upstream ids are large; small sequential ids are synthetic
const MIN_REAL_NUMERIC_ID: i64 = 10_000;

/// Pure predicate: does this snapshot describe a real match?
///
/// Rejects denylisted ids, simulated source tags, and unknown leagues.
/// Numeric ids must additionally be large: real providers assign big ids,
/// test fixtures count from 1. Ambiguous records are rejected conservatively.
pub fn is_real(snapshot: &MatchSnapshot) -> bool {
    let id_lower = snapshot.match_id.to_lowercase();

    if ID_DENYLIST.iter().any(|marker| id_lower.contains(marker)) {
        return false;
    }

    let tag_lower = snapshot.raw_source_tag.to_lowercase();
    if SIMULATED_TAGS.iter().any(|tag| tag_lower == *tag) {
        return false;
    }

    if snapshot.league_name.trim().is_empty() {
        return false;
    }

    // Numeric ids below the floor are sequential test data
    if let Ok(numeric) = snapshot.match_id.trim().parse::<i64>() {
        return numeric > MIN_REAL_NUMERIC_ID;
    }

    // Opaque non-numeric id with a known league and clean provenance
    true
}
