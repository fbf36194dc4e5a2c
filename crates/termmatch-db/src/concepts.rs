//! Terminology store queries over the reference tables.
//!
//! Retrieval is recall-oriented: full-text match over names and synonyms
//! casts a wide net, and precision is enforced downstream by similarity
//! scoring in the engine. These queries never mutate reference data.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;

use termmatch_core::{
    AncestorRow, Concept, ConceptHit, ConceptStore, Error, NeighborKind, RelationshipRow, Result,
    SynonymHit, VocabularySummary,
};

fn concept_from_row(row: &sqlx::postgres::PgRow) -> Concept {
    Concept {
        concept_id: row.get("concept_id"),
        concept_name: row.get("concept_name"),
        vocabulary_id: row.get("vocabulary_id"),
        concept_code: row.get("concept_code"),
    }
}

/// PostgreSQL implementation of the terminology store.
pub struct PgConceptRepository {
    pool: Pool<Postgres>,
}

impl PgConceptRepository {
    /// Create a new PgConceptRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConceptStore for PgConceptRepository {
    async fn search_concepts(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
    ) -> Result<Vec<ConceptHit>> {
        let rows = sqlx::query(
            r#"
            SELECT concept_id, concept_name, vocabulary_id, concept_code
            FROM concept
            WHERE standard_concept = 'S'
              AND to_tsvector('english', concept_name) @@ plainto_tsquery('english', $1)
              AND ($2::text IS NULL OR vocabulary_id = $2)
            "#,
        )
        .bind(term)
        .bind(vocabulary_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "concepts",
            op = "search_concepts",
            search_term = term,
            result_count = rows.len(),
            "Concept name retrieval"
        );

        Ok(rows
            .iter()
            .map(|row| ConceptHit {
                concept: concept_from_row(row),
            })
            .collect())
    }

    async fn search_synonyms(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
        language_concept_id: Option<i64>,
    ) -> Result<Vec<SynonymHit>> {
        let rows = sqlx::query(
            r#"
            SELECT c.concept_id, c.concept_name, c.vocabulary_id, c.concept_code,
                   s.concept_synonym_name, s.language_concept_id
            FROM concept_synonym s
            JOIN concept c ON c.concept_id = s.concept_id
            WHERE c.standard_concept = 'S'
              AND to_tsvector('english', s.concept_synonym_name) @@ plainto_tsquery('english', $1)
              AND ($2::text IS NULL OR c.vocabulary_id = $2)
              AND ($3::bigint IS NULL OR s.language_concept_id = $3)
            "#,
        )
        .bind(term)
        .bind(vocabulary_id)
        .bind(language_concept_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "db",
            component = "concepts",
            op = "search_synonyms",
            search_term = term,
            result_count = rows.len(),
            "Synonym retrieval"
        );

        Ok(rows
            .iter()
            .map(|row| SynonymHit {
                concept: concept_from_row(row),
                synonym_name: row.get("concept_synonym_name"),
                language_concept_id: row.get("language_concept_id"),
            })
            .collect())
    }

    async fn fetch_ancestors(
        &self,
        concept_id: i64,
        max_separation_descendant: i32,
        max_separation_ancestor: i32,
    ) -> Result<Vec<AncestorRow>> {
        // The closure records min/max path lengths per pair; the lower
        // bound of 1 excludes the concept itself at distance 0, and the
        // inequality guards exclude self-loop rows. UNION collapses
        // duplicate neighbor rows.
        let rows = sqlx::query(
            r#"
            SELECT c.concept_id, c.concept_name, c.vocabulary_id, c.concept_code,
                   'Ancestor' AS relationship,
                   a.min_levels_of_separation, a.max_levels_of_separation
            FROM concept_ancestor a
            JOIN concept c ON c.concept_id = a.ancestor_concept_id
            WHERE a.descendant_concept_id = $1
              AND a.ancestor_concept_id <> $1
              AND a.min_levels_of_separation >= 1
              AND a.max_levels_of_separation <= $3
            UNION
            SELECT c.concept_id, c.concept_name, c.vocabulary_id, c.concept_code,
                   'Descendant' AS relationship,
                   a.min_levels_of_separation, a.max_levels_of_separation
            FROM concept_ancestor a
            JOIN concept c ON c.concept_id = a.descendant_concept_id
            WHERE a.ancestor_concept_id = $1
              AND a.descendant_concept_id <> $1
              AND a.min_levels_of_separation >= 1
              AND a.max_levels_of_separation <= $2
            "#,
        )
        .bind(concept_id)
        .bind(max_separation_descendant)
        .bind(max_separation_ancestor)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let neighbors = rows
            .iter()
            .map(|row| {
                let relationship: String = row.get("relationship");
                AncestorRow {
                    concept: concept_from_row(row),
                    kind: if relationship == "Ancestor" {
                        NeighborKind::Ancestor
                    } else {
                        NeighborKind::Descendant
                    },
                    min_separation: row.get("min_levels_of_separation"),
                    max_separation: row.get("max_levels_of_separation"),
                }
            })
            .collect::<Vec<_>>();

        debug!(
            subsystem = "db",
            component = "concepts",
            op = "fetch_ancestors",
            concept_id = concept_id,
            result_count = neighbors.len(),
            "Ancestor closure lookup"
        );
        Ok(neighbors)
    }

    async fn fetch_relationships(
        &self,
        concept_id: i64,
        relationship_types: &[String],
    ) -> Result<Vec<RelationshipRow>> {
        // Blank filter entries are dropped here; an empty filter after
        // cleanup means "all active relationship types".
        let types: Vec<String> = relationship_types
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect();

        let rows = sqlx::query(
            r#"
            SELECT c.concept_id, c.concept_name, c.vocabulary_id, c.concept_code,
                   r.relationship_id
            FROM concept_relationship r
            JOIN concept c ON c.concept_id = r.concept_id_2
            WHERE r.concept_id_1 = $1
              AND r.concept_id_2 <> $1
              AND r.valid_end_date > CURRENT_DATE
              AND (cardinality($2::text[]) = 0 OR r.relationship_id = ANY($2))
            "#,
        )
        .bind(concept_id)
        .bind(&types)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let neighbors = rows
            .iter()
            .map(|row| RelationshipRow {
                concept: concept_from_row(row),
                relationship_id: row.get("relationship_id"),
            })
            .collect::<Vec<_>>();

        debug!(
            subsystem = "db",
            component = "concepts",
            op = "fetch_relationships",
            concept_id = concept_id,
            result_count = neighbors.len(),
            "Active relationship lookup"
        );
        Ok(neighbors)
    }

    async fn list_vocabularies(&self) -> Result<Vec<VocabularySummary>> {
        let rows = sqlx::query(
            r#"
            SELECT vocabulary_id, COUNT(*) AS concept_count
            FROM concept
            GROUP BY vocabulary_id
            ORDER BY vocabulary_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|row| VocabularySummary {
                vocabulary_id: row.get("vocabulary_id"),
                concept_count: row.get("concept_count"),
            })
            .collect())
    }
}
