//! Bounded graph-neighborhood expansion for matched concepts.
//!
//! Both expansions are pure reads. A failed neighborhood lookup degrades
//! to an empty list instead of voiding an otherwise valid top-level
//! match.

use std::sync::Arc;

use tracing::warn;

use termmatch_core::{AncestorNeighbor, ConceptStore, RelationshipNeighbor};

/// Expands a resolved concept into its ancestor/descendant and
/// relationship neighborhoods.
pub struct GraphExpander {
    store: Arc<dyn ConceptStore>,
}

impl GraphExpander {
    /// Create an expander over the given store.
    pub fn new(store: Arc<dyn ConceptStore>) -> Self {
        Self { store }
    }

    /// Ancestors and descendants within the separation bounds. The
    /// originating concept never appears in its own result set.
    pub async fn expand_ancestors(
        &self,
        concept_id: i64,
        max_separation_descendant: i32,
        max_separation_ancestor: i32,
    ) -> Vec<AncestorNeighbor> {
        match self
            .store
            .fetch_ancestors(concept_id, max_separation_descendant, max_separation_ancestor)
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .map(|row| AncestorNeighbor {
                    concept: row.concept,
                    relationship: row.kind,
                    min_separation: row.min_separation,
                    max_separation: row.max_separation,
                })
                .collect(),
            Err(e) => {
                warn!(
                    subsystem = "engine",
                    component = "expander",
                    op = "expand_ancestors",
                    concept_id = concept_id,
                    error = %e,
                    "Ancestor expansion failed, returning empty neighborhood"
                );
                Vec::new()
            }
        }
    }

    /// Active typed relationships outgoing from the concept, optionally
    /// restricted to a set of types (OR semantics).
    pub async fn expand_relationships(
        &self,
        concept_id: i64,
        relationship_types: &[String],
    ) -> Vec<RelationshipNeighbor> {
        match self
            .store
            .fetch_relationships(concept_id, relationship_types)
            .await
        {
            Ok(rows) => rows
                .into_iter()
                .map(|row| RelationshipNeighbor {
                    concept: row.concept,
                    relationship_id: row.relationship_id,
                })
                .collect(),
            Err(e) => {
                warn!(
                    subsystem = "engine",
                    component = "expander",
                    op = "expand_relationships",
                    concept_id = concept_id,
                    error = %e,
                    "Relationship expansion failed, returning empty neighborhood"
                );
                Vec::new()
            }
        }
    }
}
