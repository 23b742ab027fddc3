//! # hirehub-core
//!
//! Core types, traits, and abstractions for the HireHub applicant-tracking
//! system.
//!
//! This crate provides the foundational data structures and trait
//! definitions that the other HireHub crates depend on: the position and
//! applicant models, the repository and inference-backend traits, the
//! shared error taxonomy, and the embedding-text templates.

pub mod defaults;
pub mod embedding_text;
pub mod error;
pub mod logging;
pub mod models;
pub mod traits;

// Re-export commonly used types at crate root
pub use embedding_text::{applicant_embedding_text, position_embedding_text};
pub use error::{Error, Result};
pub use models::*;
pub use traits::*;

/// Vector type shared with the pgvector column representation.
pub use pgvector::Vector;
