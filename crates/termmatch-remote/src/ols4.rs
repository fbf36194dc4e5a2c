//! OLS4 ontology search adapter.
//!
//! Queries the OLS4 search endpoint with a case-variant expansion of the
//! term (the service's label matching is case-sensitive) and scores
//! returned labels with the shared similarity scorer.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use termmatch_core::{defaults, scorer, Error, Result};

use crate::{finalize_matches, RemoteMatch, TermMatcher};

#[derive(Debug, Deserialize)]
pub(crate) struct Ols4SearchResponse {
    pub response: Ols4ResponseBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Ols4ResponseBody {
    #[serde(rename = "numFound", default)]
    pub num_found: i64,
    #[serde(default)]
    pub docs: Vec<Ols4Doc>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Ols4Doc {
    pub label: Option<String>,
    pub obo_id: Option<String>,
    pub ontology_prefix: Option<String>,
}

/// Matcher backed by the OLS4 ontology search service.
pub struct Ols4Matcher {
    client: Client,
    base_url: String,
}

impl Ols4Matcher {
    /// Create a matcher against the default service URL.
    pub fn new() -> Self {
        Self::with_base_url(defaults::OLS4_BASE_URL.to_string())
    }

    /// Create a matcher against a custom base URL (used in tests).
    pub fn with_base_url(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::REMOTE_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, base_url }
    }

    /// Create a matcher from the optional `OLS4_BASE_URL` environment
    /// variable.
    pub fn from_env() -> Self {
        match std::env::var("OLS4_BASE_URL") {
            Ok(url) => Self::with_base_url(url),
            Err(_) => Self::new(),
        }
    }

    async fn search_term(
        &self,
        term: &str,
        vocabulary_id: Option<&str>,
    ) -> Result<Ols4SearchResponse> {
        let url = format!("{}/api/search", self.base_url);
        let variants = case_variants(term);
        let rows = defaults::REMOTE_PAGE_SIZE.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("q", variants.as_str()),
            ("queryFields", "label"),
            ("rows", rows.as_str()),
        ];
        if let Some(vocab) = vocabulary_id {
            query.push(("ontology", vocab));
        }

        let response = self.client.get(&url).query(&query).send().await?;
        if !response.status().is_success() {
            return Err(Error::Request(format!(
                "OLS4 search returned {}",
                response.status()
            )));
        }
        Ok(response.json::<Ols4SearchResponse>().await?)
    }
}

impl Default for Ols4Matcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a term into upper/lower/capitalized variants for the
/// case-sensitive label index.
pub(crate) fn case_variants(term: &str) -> String {
    let lower = term.to_lowercase();
    let mut chars = lower.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    format!("{},{},{}", term.to_uppercase(), lower, capitalized)
}

/// The source-native code is the fragment of the OBO id after the colon.
pub(crate) fn concept_code_from_obo_id(obo_id: Option<&str>) -> Option<String> {
    let obo_id = obo_id?;
    match obo_id.split_once(':') {
        Some((_, code)) => Some(code.to_string()),
        None => Some(obo_id.to_string()),
    }
}

/// Convert one term's search response into scored match rows.
pub(crate) fn matches_from_response(term: &str, response: &Ols4SearchResponse) -> Vec<RemoteMatch> {
    if response.response.num_found <= 0 {
        return Vec::new();
    }
    response
        .response
        .docs
        .iter()
        .filter_map(|doc| {
            let label = doc.label.as_deref()?;
            Some(RemoteMatch {
                search_term: term.to_string(),
                closely_mapped_term: label.to_string(),
                relationship_type: "OLS4_mapping".to_string(),
                concept_id: doc.obo_id.clone().unwrap_or_default(),
                vocabulary_id: doc.ontology_prefix.clone(),
                vocabulary_concept_code: concept_code_from_obo_id(doc.obo_id.as_deref()),
                similarity_score: scorer::score(term, label),
            })
        })
        .collect()
}

#[async_trait]
impl TermMatcher for Ols4Matcher {
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
            match self.search_term(term, vocabulary_id).await {
                Ok(response) => {
                    let rows = matches_from_response(term, &response);
                    debug!(
                        subsystem = "remote",
                        component = "ols4",
                        op = "find_matches",
                        search_term = term,
                        result_count = rows.len(),
                        "OLS4 search complete"
                    );
                    matches.extend(rows);
                }
                Err(e) => {
                    warn!(
                        subsystem = "remote",
                        component = "ols4",
                        search_term = term,
                        error = %e,
                        "OLS4 search failed for term"
                    );
                }
            }
        }

        Ok(finalize_matches(matches, search_threshold))
    }
}
