//! In-memory store and cache doubles for engine tests.
//!
//! The mock store honors the same contracts as the PostgreSQL
//! implementation: recall-oriented word-overlap retrieval, active-edge
//! filtering, self-loop exclusion, and the min/max separation bounds.

use std::sync::Mutex;

use async_trait::async_trait;
use termmatch_core::{
    AncestorRow, Concept, ConceptHit, ConceptMatch, ConceptStore, Error, NeighborKind,
    RelationshipRow, Result, ResultCacheRepository, SynonymHit, VocabularySummary,
};

// Edges carry the year their validity ends, compared against a fixed
// "today" so the active-edge filter stays deterministic.
const CURRENT_YEAR: i32 = 2026;

struct SynonymFixture {
    concept_id: i64,
    name: &'static str,
    language_concept_id: i64,
}

struct AncestorFixture {
    ancestor_id: i64,
    descendant_id: i64,
    min_separation: i32,
    max_separation: i32,
}

struct RelationshipFixture {
    concept_id_1: i64,
    concept_id_2: i64,
    relationship_id: &'static str,
    valid_end_year: i32,
}

/// Fixture-backed [`ConceptStore`] implementation.
pub struct MockStore {
    concepts: Vec<Concept>,
    synonyms: Vec<SynonymFixture>,
    ancestors: Vec<AncestorFixture>,
    relationships: Vec<RelationshipFixture>,
}

pub const ASTHMA_ID: i64 = 317009;
pub const CHILDHOOD_ASTHMA_ID: i64 = 4051466;
pub const RESPIRATORY_DISEASE_ID: i64 = 4274025;
pub const MAPS_TO_TARGET_ID: i64 = 45876123;

fn concept(concept_id: i64, name: &str, vocabulary_id: &str, code: &str) -> Concept {
    Concept {
        concept_id,
        concept_name: name.to_string(),
        vocabulary_id: vocabulary_id.to_string(),
        concept_code: code.to_string(),
    }
}

impl MockStore {
    pub fn with_fixtures() -> Self {
        Self {
            concepts: vec![
                concept(ASTHMA_ID, "Asthma", "SNOMED", "195967001"),
                concept(CHILDHOOD_ASTHMA_ID, "Childhood asthma", "SNOMED", "233678006"),
                concept(
                    RESPIRATORY_DISEASE_ID,
                    "Disease of respiratory system",
                    "SNOMED",
                    "275498002",
                ),
                concept(MAPS_TO_TARGET_ID, "Asthma (ICD mapping)", "ICD10CM", "J45"),
            ],
            synonyms: vec![
                SynonymFixture {
                    concept_id: ASTHMA_ID,
                    name: "Bronchial asthma",
                    language_concept_id: 4180186,
                },
                SynonymFixture {
                    concept_id: ASTHMA_ID,
                    name: "Bronchial asthma (disorder)",
                    language_concept_id: 4180186,
                },
                SynonymFixture {
                    concept_id: CHILDHOOD_ASTHMA_ID,
                    name: "Asthma in children",
                    language_concept_id: 4180186,
                },
                SynonymFixture {
                    concept_id: ASTHMA_ID,
                    name: "",
                    language_concept_id: 4180186,
                },
            ],
            ancestors: vec![
                // Closure exports include the zero-distance self row.
                AncestorFixture {
                    ancestor_id: ASTHMA_ID,
                    descendant_id: ASTHMA_ID,
                    min_separation: 0,
                    max_separation: 0,
                },
                AncestorFixture {
                    ancestor_id: RESPIRATORY_DISEASE_ID,
                    descendant_id: ASTHMA_ID,
                    min_separation: 1,
                    max_separation: 2,
                },
                AncestorFixture {
                    ancestor_id: ASTHMA_ID,
                    descendant_id: CHILDHOOD_ASTHMA_ID,
                    min_separation: 1,
                    max_separation: 1,
                },
            ],
            relationships: vec![
                RelationshipFixture {
                    concept_id_1: ASTHMA_ID,
                    concept_id_2: MAPS_TO_TARGET_ID,
                    relationship_id: "Maps to",
                    valid_end_year: 2099,
                },
                RelationshipFixture {
                    concept_id_1: ASTHMA_ID,
                    concept_id_2: RESPIRATORY_DISEASE_ID,
                    relationship_id: "Is a",
                    valid_end_year: 2099,
                },
                RelationshipFixture {
                    concept_id_1: ASTHMA_ID,
                    concept_id_2: CHILDHOOD_ASTHMA_ID,
                    relationship_id: "Subsumes",
                    valid_end_year: 2001,
                },
            ],
        }
    }

    fn concept_by_id(&self, id: i64) -> Concept {
        self.concepts
            .iter()
            .find(|c| c.concept_id == id)
            .cloned()
            .expect("fixture concept exists")
    }

    fn fail_if_poisoned(&self, term: &str) -> Result<()> {
        if term.contains("fail") {
            return Err(Error::Search("injected store failure".to_string()));
        }
        Ok(())
    }
}

/// Word-overlap approximation of full-text retrieval.
fn text_matches(term: &str, candidate: &str) -> bool {
    let candidate = candidate.to_lowercase();
    let candidate_words: Vec<&str> = candidate
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    term.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|w| candidate_words.contains(&w))
}

#[async_trait]
impl ConceptStore for MockStore {
    async fn search_concepts(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
    ) -> Result<Vec<ConceptHit>> {
        self.fail_if_poisoned(term)?;
        Ok(self
            .concepts
            .iter()
            .filter(|c| text_matches(term, &c.concept_name))
            .filter(|c| vocabulary_id.map_or(true, |v| c.vocabulary_id == v))
            .map(|c| ConceptHit { concept: c.clone() })
            .collect())
    }

    async fn search_synonyms(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
        language_concept_id: Option<i64>,
    ) -> Result<Vec<SynonymHit>> {
        self.fail_if_poisoned(term)?;
        Ok(self
            .synonyms
            .iter()
            .filter(|s| text_matches(term, s.name))
            .filter(|s| language_concept_id.map_or(true, |l| s.language_concept_id == l))
            .map(|s| SynonymHit {
                concept: self.concept_by_id(s.concept_id),
                synonym_name: s.name.to_string(),
                language_concept_id: s.language_concept_id,
            })
            .filter(|s| vocabulary_id.map_or(true, |v| s.concept.vocabulary_id == v))
            .collect())
    }

    async fn fetch_ancestors(
        &self,
        concept_id: i64,
        max_separation_descendant: i32,
        max_separation_ancestor: i32,
    ) -> Result<Vec<AncestorRow>> {
        let mut rows = Vec::new();
        for edge in &self.ancestors {
            if edge.min_separation < 1 {
                continue;
            }
            if edge.descendant_id == concept_id
                && edge.ancestor_id != concept_id
                && edge.max_separation <= max_separation_ancestor
            {
                rows.push(AncestorRow {
                    concept: self.concept_by_id(edge.ancestor_id),
                    kind: NeighborKind::Ancestor,
                    min_separation: edge.min_separation,
                    max_separation: edge.max_separation,
                });
            }
            if edge.ancestor_id == concept_id
                && edge.descendant_id != concept_id
                && edge.max_separation <= max_separation_descendant
            {
                rows.push(AncestorRow {
                    concept: self.concept_by_id(edge.descendant_id),
                    kind: NeighborKind::Descendant,
                    min_separation: edge.min_separation,
                    max_separation: edge.max_separation,
                });
            }
        }
        Ok(rows)
    }

    async fn fetch_relationships(
        &self,
        concept_id: i64,
        relationship_types: &[String],
    ) -> Result<Vec<RelationshipRow>> {
        let types: Vec<&str> = relationship_types
            .iter()
            .map(|t| t.trim())
            .filter(|t| !t.is_empty())
            .collect();
        Ok(self
            .relationships
            .iter()
            .filter(|r| r.concept_id_1 == concept_id && r.concept_id_2 != concept_id)
            .filter(|r| r.valid_end_year > CURRENT_YEAR)
            .filter(|r| types.is_empty() || types.contains(&r.relationship_id))
            .map(|r| RelationshipRow {
                concept: self.concept_by_id(r.concept_id_2),
                relationship_id: r.relationship_id.to_string(),
            })
            .collect())
    }

    async fn list_vocabularies(&self) -> Result<Vec<VocabularySummary>> {
        let mut summaries: Vec<VocabularySummary> = Vec::new();
        for c in &self.concepts {
            match summaries
                .iter_mut()
                .find(|s| s.vocabulary_id == c.vocabulary_id)
            {
                Some(s) => s.concept_count += 1,
                None => summaries.push(VocabularySummary {
                    vocabulary_id: c.vocabulary_id.clone(),
                    concept_count: 1,
                }),
            }
        }
        summaries.sort_by(|a, b| a.vocabulary_id.cmp(&b.vocabulary_id));
        Ok(summaries)
    }
}

struct CacheRow {
    term: String,
    params_hash: String,
    payload: serde_json::Value,
}

/// Insert-only in-memory [`ResultCacheRepository`].
#[derive(Default)]
pub struct MemoryCache {
    rows: Mutex<Vec<CacheRow>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl ResultCacheRepository for MemoryCache {
    async fn lookup(&self, term: &str, params_hash: &str) -> Result<Option<Vec<ConceptMatch>>> {
        let rows = self.rows.lock().unwrap();
        // First matching row wins, mirroring the oldest-row SQL lookup.
        let Some(row) = rows
            .iter()
            .find(|r| r.term == term && r.params_hash == params_hash)
        else {
            return Ok(None);
        };
        let results = serde_json::from_value(row.payload.clone())
            .map_err(|e| Error::Cache(e.to_string()))?;
        Ok(Some(results))
    }

    async fn store(&self, term: &str, params_hash: &str, results: &[ConceptMatch]) -> Result<()> {
        let payload = serde_json::to_value(results).map_err(|e| Error::Cache(e.to_string()))?;
        self.rows.lock().unwrap().push(CacheRow {
            term: term.to_string(),
            params_hash: params_hash.to_string(),
            payload,
        });
        Ok(())
    }

    async fn clear_all(&self) -> Result<u64> {
        let mut rows = self.rows.lock().unwrap();
        let deleted = rows.len() as u64;
        rows.clear();
        Ok(deleted)
    }
}

/// Cache double whose every operation fails.
pub struct FailingCache;

#[async_trait]
impl ResultCacheRepository for FailingCache {
    async fn lookup(&self, _term: &str, _params_hash: &str) -> Result<Option<Vec<ConceptMatch>>> {
        Err(Error::Cache("cache unavailable".to_string()))
    }

    async fn store(&self, _term: &str, _params_hash: &str, _results: &[ConceptMatch]) -> Result<()> {
        Err(Error::Cache("cache unavailable".to_string()))
    }

    async fn clear_all(&self) -> Result<u64> {
        Err(Error::Cache("cache unavailable".to_string()))
    }
}
