//! # Repositories
//!
//! Typed access to persisted records. One repository per concern; each is
//! a thin struct over the shared pool, cheap to clone.

pub mod stats;
