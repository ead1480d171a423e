//! sift-core: shared types, identifiers, and the unified error type.
//!
//! This crate is the foundational dependency for the other sift crates,
//! providing the IMDb identifier newtype, the per-file metadata records
//! produced by identity resolution, and a single error enum.

pub mod error;
pub mod ids;
pub mod media;
pub mod paths;

// Re-export the most commonly used items at the crate root.
pub use error::{Error, Result};
pub use ids::ImdbId;
pub use media::*;
