//! Sparse, mergeable item field storage.
//!
//! # Responsibility
//! - Hold the closed catalog of well-known item components.
//! - Hold open extension fields keyed by namespaced identifier.
//! - Convert to and from the flat export map consumed by pipelines.
//!
//! # Invariants
//! - Every field is absent, removed (tombstone) or a concrete value.
//! - Absent fields are never exported.
//! - Removed fields export as `!<key>: {}`.

pub mod component;
pub mod store;
