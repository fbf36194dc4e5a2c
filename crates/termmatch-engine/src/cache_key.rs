//! Deterministic cache key derivation over the resolution parameter set.
//!
//! The full parameter set is canonicalized into a fixed named-field
//! structure, serialized with stable field order, and hashed with
//! SHA-256. The search term itself is deliberately kept out of the hash:
//! it is stored as a separate lookup column so the cache table can be
//! indexed by `(search_term, params_hash)`.

use serde::Serialize;
use sha2::{Digest, Sha256};

use termmatch_core::MatchOptions;

/// Canonical, order-stable projection of [`MatchOptions`] for hashing.
///
/// Field order is fixed by the struct definition; the relationship type
/// filter is cleaned of blanks and sorted so that set order never
/// changes the key.
#[derive(Debug, Serialize)]
struct CacheKeyParams<'a> {
    vocabulary_id: Option<&'a str>,
    concept_ancestor: bool,
    max_separation_descendant: i32,
    max_separation_ancestor: i32,
    concept_synonym: bool,
    synonym_language_concept_id: Option<i64>,
    concept_relationship: bool,
    relationship_types: Vec<&'a str>,
    search_threshold: f64,
}

impl<'a> CacheKeyParams<'a> {
    fn from_options(opts: &'a MatchOptions) -> Self {
        let mut relationship_types: Vec<&str> = opts
            .relationship_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        relationship_types.sort_unstable();
        relationship_types.dedup();

        Self {
            vocabulary_id: opts.vocabulary_id.as_deref(),
            concept_ancestor: opts.concept_ancestor,
            max_separation_descendant: opts.max_separation_descendant,
            max_separation_ancestor: opts.max_separation_ancestor,
            concept_synonym: opts.concept_synonym,
            synonym_language_concept_id: opts.synonym_language_concept_id,
            concept_relationship: opts.concept_relationship,
            relationship_types,
            search_threshold: opts.search_threshold,
        }
    }
}

/// Compute the hex-encoded SHA-256 hash of the canonicalized options.
pub fn params_hash(opts: &MatchOptions) -> String {
    let canonical = serde_json::to_string(&CacheKeyParams::from_options(opts))
        .expect("cache key params always serialize");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
