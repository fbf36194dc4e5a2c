//! # termmatch-core
//!
//! Core types, traits, and similarity scoring for termmatch.
//!
//! This crate provides the foundational data structures, the repository
//! traits the store adapter implements, and the string similarity scorer
//! shared by the local engine and the remote matchers.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod scorer;
pub mod traits;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use traits::{ConceptStore, MatchOptions, ResolveRequest, ResultCacheRepository};
