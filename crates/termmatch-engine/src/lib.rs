//! # termmatch-engine
//!
//! Concept resolution engine for termmatch.
//!
//! This crate ties the terminology store to the response surface:
//! - Concept matching (retrieval, scoring, thresholding, grouping)
//! - Bounded ancestor/descendant and relationship expansion
//! - Deterministic parameter-hash result caching with hit/miss
//!   accounting
//! - Batch resolution orchestration
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use termmatch_core::{MatchOptions, ResolveRequest};
//! use termmatch_db::Database;
//! use termmatch_engine::Resolver;
//!
//! let db = Database::connect("postgres://localhost/termmatch").await?;
//! let resolver = Resolver::new(Arc::new(db.concepts), Arc::new(db.cache));
//! let results = resolver
//!     .resolve(&ResolveRequest {
//!         search_terms: vec!["Asthma".to_string()],
//!         options: MatchOptions::default(),
//!     })
//!     .await?;
//! ```

pub mod cache_key;
pub mod expander;
pub mod matcher;
pub mod resolver;

pub use cache_key::params_hash;
pub use expander::GraphExpander;
pub use matcher::ConceptMatcher;
pub use resolver::{CacheStats, CacheStatsSnapshot, Resolver};
