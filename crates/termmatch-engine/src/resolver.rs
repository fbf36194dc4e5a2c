//! Batch resolution orchestration.
//!
//! Sequences cache lookup, concept matching, graph expansion, and cache
//! store for each term of a batch. Terms are independent: one term's
//! failure is recorded on its own envelope and never aborts the rest of
//! the batch.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};
use uuid::Uuid;

use termmatch_core::{
    ConceptMatch, ConceptStore, Error, MatchOptions, ResolveRequest, Result,
    ResultCacheRepository, TermResolution,
};

use crate::cache_key::params_hash;
use crate::expander::GraphExpander;
use crate::matcher::ConceptMatcher;

/// Cache hit/miss accounting across a resolver's lifetime.
#[derive(Debug, Default)]
pub struct CacheStats {
    hits: AtomicU64,
    misses: AtomicU64,
    errors: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub hits: u64,
    pub misses: u64,
    pub errors: u64,
}

impl CacheStats {
    fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            errors: self.errors.load(Ordering::Relaxed),
        }
    }
}

/// Resolves batches of free-text terms to scored, expanded concept
/// matches, memoized behind the store-backed result cache.
pub struct Resolver {
    matcher: ConceptMatcher,
    expander: GraphExpander,
    cache: Arc<dyn ResultCacheRepository>,
    stats: CacheStats,
}

impl Resolver {
    /// Create a resolver over a concept store and a result cache.
    pub fn new(store: Arc<dyn ConceptStore>, cache: Arc<dyn ResultCacheRepository>) -> Self {
        Self {
            matcher: ConceptMatcher::new(store.clone()),
            expander: GraphExpander::new(store),
            cache,
            stats: CacheStats::default(),
        }
    }

    /// Resolve a batch of search terms.
    ///
    /// Output order matches input term order. Returns
    /// [`Error::InvalidInput`] before any store access if the term list
    /// is empty or all blank.
    pub async fn resolve(&self, request: &ResolveRequest) -> Result<Vec<TermResolution>> {
        if request.search_terms.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::InvalidInput(
                "no valid search_term values provided".to_string(),
            ));
        }

        let opts = normalize_options(&request.options);
        let hash = params_hash(&opts);
        let batch_id = Uuid::now_v7();
        let start = Instant::now();

        let mut resolutions = Vec::with_capacity(request.search_terms.len());
        for term in &request.search_terms {
            let term = term.trim().to_lowercase();
            resolutions.push(self.resolve_term(&term, &opts, &hash, batch_id).await);
        }

        info!(
            subsystem = "engine",
            component = "resolver",
            op = "resolve",
            batch_id = %batch_id,
            term_count = request.search_terms.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Batch resolution complete"
        );
        Ok(resolutions)
    }

    async fn resolve_term(
        &self,
        term: &str,
        opts: &MatchOptions,
        params_hash: &str,
        batch_id: Uuid,
    ) -> TermResolution {
        // Cache failures degrade to a miss: a broken cache must never
        // take resolution down with it.
        match self.cache.lookup(term, params_hash).await {
            Ok(Some(concepts)) => {
                self.stats.hits.fetch_add(1, Ordering::Relaxed);
                debug!(
                    subsystem = "engine",
                    component = "resolver",
                    op = "resolve_term",
                    batch_id = %batch_id,
                    search_term = term,
                    cache_hit = true,
                    result_count = concepts.len(),
                    "Served from cache"
                );
                return TermResolution {
                    search_term: term.to_string(),
                    concepts,
                    error: None,
                };
            }
            Ok(None) => {
                self.stats.misses.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                self.stats.errors.fetch_add(1, Ordering::Relaxed);
                warn!(
                    subsystem = "engine",
                    component = "resolver",
                    search_term = term,
                    error = %e,
                    "Cache lookup failed, treating as miss"
                );
            }
        }

        let mut concepts = match self.matcher.find_matches(term, opts).await {
            Ok(matches) => matches,
            Err(e) => {
                warn!(
                    subsystem = "engine",
                    component = "resolver",
                    batch_id = %batch_id,
                    search_term = term,
                    error = %e,
                    "Candidate retrieval failed for term"
                );
                return TermResolution {
                    search_term: term.to_string(),
                    concepts: Vec::new(),
                    error: Some(e.to_string()),
                };
            }
        };

        for concept_match in &mut concepts {
            let id = concept_match.concept.concept_id;
            if opts.concept_ancestor {
                concept_match.ancestors = self
                    .expander
                    .expand_ancestors(
                        id,
                        opts.max_separation_descendant,
                        opts.max_separation_ancestor,
                    )
                    .await;
            }
            if opts.concept_relationship {
                concept_match.relationships = self
                    .expander
                    .expand_relationships(id, &opts.relationship_types)
                    .await;
            }
        }

        if let Err(e) = self.cache.store(term, params_hash, &concepts).await {
            warn!(
                subsystem = "engine",
                component = "resolver",
                search_term = term,
                error = %e,
                "Cache store failed, serving uncached result"
            );
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
        }

        debug!(
            subsystem = "engine",
            component = "resolver",
            op = "resolve_term",
            batch_id = %batch_id,
            search_term = term,
            cache_hit = false,
            result_count = concepts.len(),
            "Computed and cached"
        );
        TermResolution {
            search_term: term.to_string(),
            concepts,
            error: None,
        }
    }

    /// Resolve one term with the given options (convenience wrapper).
    pub async fn resolve_one(&self, term: &str, options: MatchOptions) -> Result<TermResolution> {
        let mut resolutions = self
            .resolve(&ResolveRequest {
                search_terms: vec![term.to_string()],
                options,
            })
            .await?;
        Ok(resolutions.remove(0))
    }

    /// Administrative bulk clear of the result cache. Returns the number
    /// of entries removed.
    pub async fn clear_cache(&self) -> Result<u64> {
        self.cache.clear_all().await
    }

    /// Current hit/miss accounting.
    pub fn cache_stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }
}

/// Apply the input normalization rules: a blank vocabulary filter means
/// no filter, and a non-finite or negative threshold falls back to 0.
fn normalize_options(opts: &MatchOptions) -> MatchOptions {
    let mut opts = opts.clone();

    if let Some(vocab) = &opts.vocabulary_id {
        if vocab.trim().is_empty() {
            opts.vocabulary_id = None;
        }
    }

    if !opts.search_threshold.is_finite() || opts.search_threshold < 0.0 {
        opts.search_threshold = 0.0;
    }

    opts
}
