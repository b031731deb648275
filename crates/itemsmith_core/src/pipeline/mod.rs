//! Boundary to the build pipeline that persists generated artifacts.
//!
//! # Responsibility
//! - Define the artifact shape handed to pipelines.
//! - Define the sink contract and an in-memory reference sink.
//! - Track finalizations to warn about duplicate identities.
//!
//! # Invariants
//! - Finalization never fails on duplicates or format mismatches; it warns.
//! - The duplicate registry is owned by a caller-provided context.

pub mod artifact;
pub mod context;
pub mod sink;
