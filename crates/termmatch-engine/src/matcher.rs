//! Concept matching: retrieval, scoring, thresholding, and grouping.
//!
//! Retrieval over the store is recall-oriented full-text search; this
//! module turns the raw candidate rows into deduplicated, scored
//! matches. A concept is retained iff its name score or any of its
//! synonym scores is strictly greater than the caller's threshold.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use termmatch_core::scorer;
use termmatch_core::{Concept, ConceptMatch, ConceptStore, MatchOptions, Result, SynonymMatch};

/// Scored, partially grouped candidate for one concept id.
struct Candidate {
    concept: Concept,
    name_score: f64,
    synonyms: Vec<SynonymMatch>,
}

/// Matches a query term against the concept store.
pub struct ConceptMatcher {
    store: Arc<dyn ConceptStore>,
}

impl ConceptMatcher {
    /// Create a matcher over the given store.
    pub fn new(store: Arc<dyn ConceptStore>) -> Self {
        Self { store }
    }

    /// Find all concepts matching `term` under the given options.
    ///
    /// Empty retrieval is not an error and yields an empty list. A store
    /// failure propagates to the caller, which treats it as that term's
    /// failure rather than the whole batch's.
    pub async fn find_matches(&self, term: &str, opts: &MatchOptions) -> Result<Vec<ConceptMatch>> {
        let start = Instant::now();

        let name_hits = self
            .store
            .search_concepts(term, opts.vocabulary_id.as_deref())
            .await?;

        let synonym_hits = if opts.concept_synonym {
            self.store
                .search_synonyms(
                    term,
                    opts.vocabulary_id.as_deref(),
                    opts.synonym_language_concept_id,
                )
                .await?
        } else {
            Vec::new()
        };

        // Group by concept id: best name score wins, qualifying synonym
        // scores accumulate on the same record.
        let mut candidates: HashMap<i64, Candidate> = HashMap::new();

        for hit in name_hits {
            let name_score = scorer::score(term, &hit.concept.concept_name);
            candidates
                .entry(hit.concept.concept_id)
                .and_modify(|c| c.name_score = c.name_score.max(name_score))
                .or_insert(Candidate {
                    concept: hit.concept,
                    name_score,
                    synonyms: Vec::new(),
                });
        }

        for hit in synonym_hits {
            if hit.synonym_name.trim().is_empty() {
                continue;
            }
            let synonym_score = scorer::score(term, &hit.synonym_name);
            let entry = candidates
                .entry(hit.concept.concept_id)
                .or_insert_with(|| Candidate {
                    name_score: scorer::score(term, &hit.concept.concept_name),
                    concept: hit.concept.clone(),
                    synonyms: Vec::new(),
                });
            if synonym_score > opts.search_threshold
                && !entry
                    .synonyms
                    .iter()
                    .any(|s| s.concept_synonym_name == hit.synonym_name)
            {
                entry.synonyms.push(SynonymMatch {
                    concept_synonym_name: hit.synonym_name,
                    concept_synonym_name_similarity_score: synonym_score,
                });
            }
        }

        let mut matches: Vec<ConceptMatch> = candidates
            .into_values()
            .filter(|c| c.name_score > opts.search_threshold || !c.synonyms.is_empty())
            .map(|c| ConceptMatch {
                concept: c.concept,
                concept_name_similarity_score: c.name_score,
                synonyms: c.synonyms,
                ancestors: Vec::new(),
                relationships: Vec::new(),
            })
            .collect();

        // Score descending, concept id ascending as a deterministic
        // tiebreak for equal scores.
        matches.sort_by(|a, b| {
            b.concept_name_similarity_score
                .partial_cmp(&a.concept_name_similarity_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.concept.concept_id.cmp(&b.concept.concept_id))
        });

        debug!(
            subsystem = "engine",
            component = "matcher",
            op = "find_matches",
            search_term = term,
            result_count = matches.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Concept matching complete"
        );
        Ok(matches)
    }
}
