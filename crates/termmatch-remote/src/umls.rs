//! UMLS terminology search adapter.
//!
//! Queries the UTS search endpoint and scores returned atom names
//! against the query term with the shared similarity scorer. Requires an
//! API key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use termmatch_core::{defaults, scorer, Error, Result};

use crate::{finalize_matches, RemoteMatch, TermMatcher};

#[derive(Debug, Deserialize)]
pub(crate) struct UmlsSearchResponse {
    pub result: UmlsSearchResult,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UmlsSearchResult {
    #[serde(default)]
    pub results: Vec<UmlsAtom>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UmlsAtom {
    pub name: Option<String>,
    pub ui: Option<String>,
    #[serde(rename = "rootSource")]
    pub root_source: Option<String>,
}

/// Matcher backed by the UMLS terminology search service.
pub struct UmlsMatcher {
    client: Client,
    base_url: String,
    api_key: String,
}

impl UmlsMatcher {
    /// Create a matcher with an explicit API key and the default
    /// service URL.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, defaults::UMLS_BASE_URL.to_string())
    }

    /// Create a matcher against a custom base URL (used in tests).
    pub fn with_base_url(api_key: impl Into<String>, base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::REMOTE_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Create a matcher from the `UMLS_API_KEY` (and optional
    /// `UMLS_BASE_URL`) environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("UMLS_BASE_URL").unwrap_or_else(|_| defaults::UMLS_BASE_URL.to_string());
        Self::from_parts(std::env::var("UMLS_API_KEY").ok(), base_url)
    }

    fn from_parts(api_key: Option<String>, base_url: String) -> Result<Self> {
        match api_key {
            Some(key) => Ok(Self::with_base_url(key, base_url)),
            None => Err(Error::Config("UMLS_API_KEY not set".to_string())),
        }
    }

    async fn search_term(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
    ) -> Result<UmlsSearchResponse> {
        let url = format!("{}/search/current", self.base_url);
        let page_size = defaults::REMOTE_PAGE_SIZE.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("apiKey", self.api_key.as_str()),
            ("pageSize", page_size.as_str()),
            ("string", term),
        ];
        if let Some(vocab) = vocabulary_id {
            query.push(("sabs", vocab));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "UMLS search returned {}",
                response.status()
            )));
        }
        Ok(response.json::<UmlsSearchResponse>().await?)
    }
}

/// Convert one term's search response into scored match rows.
pub(crate) fn matches_from_response(
    term: &str,
    response: &UmlsSearchResponse,
) -> Vec<RemoteMatch> {
    response
        .result
        .results
        .iter()
        .filter_map(|atom| {
            let name = atom.name.as_deref()?;
            Some(RemoteMatch {
                search_term: term.to_string(),
                closely_mapped_term: name.to_string(),
                relationship_type: "UMLS_mapping".to_string(),
                concept_id: atom.ui.clone().unwrap_or_default(),
                vocabulary_id: atom.root_source.clone(),
                vocabulary_concept_code: atom.ui.clone(),
                similarity_score: scorer::score(term, name),
            })
        })
        .collect()
}

#[async_trait]
impl TermMatcher for UmlsMatcher {
    async fn find_matches(
        &self,
        search_terms: &[String],
        vocabulary_id: Option<&str>,
        search_threshold: f64,
    ) -> Result<Vec<RemoteMatch>> {
        if search_terms.iter().all(|t| t.trim().is_empty()) {
            return Err(Error::InvalidInput(
                "no valid search_term values provided".to_string(),
            ));
        }

        let mut matches = Vec::new();
        for term in search_terms {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            // One term's service failure contributes no rows but never
            // takes the batch down.
            match self.search_term(term, vocabulary_id).await {
                Ok(response) => {
                    let rows = matches_from_response(term, &response);
                    debug!(
                        subsystem = "remote",
                        component = "umls",
                        op = "find_matches",
                        search_term = term,
                        result_count = rows.len(),
                        "UMLS search complete"
                    );
                    matches.extend(rows);
                }
                Err(e) => {
                    warn!(
                        subsystem = "remote",
                        component = "umls",
                        search_term = term,
                        error = %e,
                        "UMLS search failed for term"
                    );
                }
            }
        }

        Ok(finalize_matches(matches, search_threshold))
    }
}
