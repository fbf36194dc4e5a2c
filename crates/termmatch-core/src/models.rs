//! Data model for the concept resolution engine.
//!
//! Reference data (concepts, synonyms, ancestor closure, relationships) is
//! immutable and owned by the terminology store. Match results are derived
//! per resolution and only persisted inside the result cache.

use serde::{Deserialize, Serialize};

/// A canonical, coded clinical concept from the terminology graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    pub concept_id: i64,
    pub concept_name: String,
    pub vocabulary_id: String,
    pub concept_code: String,
}

/// A concept-name candidate returned by full-text retrieval,
/// before scoring.
#[derive(Debug, Clone)]
pub struct ConceptHit {
    pub concept: Concept,
}

/// A synonym candidate returned by full-text retrieval. Carries the
/// standard concept the synonym belongs to.
#[derive(Debug, Clone)]
pub struct SynonymHit {
    pub concept: Concept,
    pub synonym_name: String,
    pub language_concept_id: i64,
}

/// A row from the ancestor-closure lookup.
#[derive(Debug, Clone)]
pub struct AncestorRow {
    pub concept: Concept,
    pub kind: NeighborKind,
    pub min_separation: i32,
    pub max_separation: i32,
}

/// A row from the active-relationship lookup.
#[derive(Debug, Clone)]
pub struct RelationshipRow {
    pub concept: Concept,
    pub relationship_id: String,
}

/// Direction of an ancestor-closure neighbor relative to the
/// originating concept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeighborKind {
    Ancestor,
    Descendant,
}

impl NeighborKind {
    /// Stable label used in serialized results and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            NeighborKind::Ancestor => "Ancestor",
            NeighborKind::Descendant => "Descendant",
        }
    }
}

/// An expanded ancestor/descendant neighbor with its separation bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AncestorNeighbor {
    #[serde(flatten)]
    pub concept: Concept,
    pub relationship: NeighborKind,
    pub min_separation: i32,
    pub max_separation: i32,
}

/// An expanded relationship neighbor with its relationship type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipNeighbor {
    #[serde(flatten)]
    pub concept: Concept,
    pub relationship_id: String,
}

/// A synonym that also matched the query term, with its own score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynonymMatch {
    pub concept_synonym_name: String,
    pub concept_synonym_name_similarity_score: f64,
}

/// A matched concept with its similarity score and expanded
/// graph neighborhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConceptMatch {
    #[serde(flatten)]
    pub concept: Concept,
    pub concept_name_similarity_score: f64,
    #[serde(default)]
    pub synonyms: Vec<SynonymMatch>,
    #[serde(default)]
    pub ancestors: Vec<AncestorNeighbor>,
    #[serde(default)]
    pub relationships: Vec<RelationshipNeighbor>,
}

/// Per-term response envelope for a batch resolution.
///
/// A failed term carries its error message here instead of aborting
/// the rest of the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermResolution {
    pub search_term: String,
    #[serde(rename = "CONCEPT")]
    pub concepts: Vec<ConceptMatch>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

/// Summary row for the vocabulary listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VocabularySummary {
    pub vocabulary_id: String,
    pub concept_count: i64,
}
