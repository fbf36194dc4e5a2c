//! # termmatch-remote
//!
//! Alternate simple-text matchers backed by remote terminology services.
//!
//! These adapters share the local engine's external contract shape
//! (terms in, ranked scored matches out) but perform no graph expansion
//! and no caching. Each service is a pluggable [`TermMatcher`]
//! implementation.

pub mod ols4;
pub mod umls;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use termmatch_core::Result;

pub use ols4::Ols4Matcher;
pub use umls::UmlsMatcher;

/// One ranked match from a remote terminology service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteMatch {
    pub search_term: String,
    pub closely_mapped_term: String,
    /// Provenance tag for the producing service ("UMLS_mapping",
    /// "OLS4_mapping").
    pub relationship_type: String,
    pub concept_id: String,
    pub vocabulary_id: Option<String>,
    pub vocabulary_concept_code: Option<String>,
    pub similarity_score: f64,
}

/// A pluggable simple-text terminology matcher.
#[async_trait]
pub trait TermMatcher: Send + Sync {
    /// Match a batch of terms, optionally restricted to one vocabulary,
    /// keeping results with similarity strictly greater than
    /// `search_threshold`. Results are ranked by score descending.
    async fn find_matches(
        &self,
        search_terms: &[String],
        vocabulary_id: Option<&str>,
        search_threshold: f64,
    ) -> Result<Vec<RemoteMatch>>;
}

/// Apply the shared post-processing: drop duplicate rows, filter by
/// strict threshold, rank by score descending.
pub(crate) fn finalize_matches(mut matches: Vec<RemoteMatch>, threshold: f64) -> Vec<RemoteMatch> {
    matches.retain(|m| m.similarity_score > threshold);

    let mut seen: Vec<(String, String, String)> = Vec::new();
    matches.retain(|m| {
        let key = (
            m.search_term.clone(),
            m.concept_id.clone(),
            m.closely_mapped_term.clone(),
        );
        if seen.contains(&key) {
            false
        } else {
            seen.push(key);
            true
        }
    });

    matches.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches
}
