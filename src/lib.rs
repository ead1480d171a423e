//! subsift - filename-based media identity and subtitle matching
//!
//! This library crate exposes the hashing, matching, identity resolution and
//! scanning layers used by the `subsift` binary.

pub mod config;
pub mod hash;
pub mod identity;
pub mod matcher;
pub mod scanner;
