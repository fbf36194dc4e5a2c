//! Repository traits for the terminology store boundary.
//!
//! These traits define the interfaces that concrete store implementations
//! must satisfy, enabling pluggable backends and testability. All blocking
//! I/O in the engine happens behind these seams.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::Result;
use crate::models::*;

/// Options controlling a single-term concept match and its expansion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Restrict candidates to this vocabulary (None = all vocabularies).
    pub vocabulary_id: Option<String>,
    /// Similarity threshold; a concept is kept iff its name score or any
    /// synonym score is strictly greater than this.
    pub search_threshold: f64,
    /// Also retrieve synonym candidates.
    pub concept_synonym: bool,
    /// Restrict synonym candidates to this language concept id.
    pub synonym_language_concept_id: Option<i64>,
    /// Expand the ancestor/descendant neighborhood of each match.
    pub concept_ancestor: bool,
    /// Upper bound on descendant separation.
    pub max_separation_descendant: i32,
    /// Upper bound on ancestor separation.
    pub max_separation_ancestor: i32,
    /// Expand active typed relationships of each match.
    pub concept_relationship: bool,
    /// Restrict relationship expansion to these types (empty = all).
    pub relationship_types: Vec<String>,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            vocabulary_id: None,
            search_threshold: defaults::SEARCH_THRESHOLD,
            concept_synonym: false,
            synonym_language_concept_id: None,
            concept_ancestor: false,
            max_separation_descendant: defaults::MAX_SEPARATION,
            max_separation_ancestor: defaults::MAX_SEPARATION,
            concept_relationship: false,
            relationship_types: Vec::new(),
        }
    }
}

/// A batch resolution request: the terms to resolve plus the shared
/// matching and expansion options.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub search_terms: Vec<String>,
    pub options: MatchOptions,
}

/// Read access to the terminology reference tables.
#[async_trait]
pub trait ConceptStore: Send + Sync {
    /// Full-text search over standard concept names, optionally
    /// restricted to one vocabulary.
    async fn search_concepts(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
    ) -> Result<Vec<ConceptHit>>;

    /// Full-text search over synonym names joined to their standard
    /// concepts, optionally restricted by vocabulary and language.
    async fn search_synonyms(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
        language_concept_id: Option<i64>,
    ) -> Result<Vec<SynonymHit>>;

    /// Bidirectional ancestor-closure lookup bounded by separation.
    ///
    /// Ancestors and descendants with `min_levels_of_separation >= 1`
    /// and `max_levels_of_separation` within the respective bound,
    /// excluding the concept itself. Duplicate neighbor rows are
    /// collapsed.
    async fn fetch_ancestors(
        &self,
        concept_id: i64,
        max_separation_descendant: i32,
        max_separation_ancestor: i32,
    ) -> Result<Vec<AncestorRow>>;

    /// Active outgoing relationships from a concept, optionally filtered
    /// to a set of relationship types (OR semantics; blank entries
    /// ignored). Self-loops are excluded.
    async fn fetch_relationships(
        &self,
        concept_id: i64,
        relationship_types: &[String],
    ) -> Result<Vec<RelationshipRow>>;

    /// Distinct vocabularies present in the concept table, with counts.
    async fn list_vocabularies(&self) -> Result<Vec<VocabularySummary>>;
}

/// Store-backed memoization of computed match results.
///
/// Entries are insert-only: concurrent identical misses may both insert,
/// so lookups must tolerate duplicate rows for the same key.
#[async_trait]
pub trait ResultCacheRepository: Send + Sync {
    /// Exact lookup by `(search_term, params_hash)`. Returns the stored
    /// result list, or None if the key has not been computed.
    async fn lookup(&self, term: &str, params_hash: &str) -> Result<Option<Vec<ConceptMatch>>>;

    /// Persist a computed result list. Plain insert, no upsert.
    async fn store(&self, term: &str, params_hash: &str, results: &[ConceptMatch]) -> Result<()>;

    /// Delete every cache entry, returning the number of rows removed.
    async fn clear_all(&self) -> Result<u64>;
}
