//! Declarative definition records and their execution.
//!
//! # Responsibility
//! - Parse records, resolve types, run the engine state machine.
//! - Discover definition files and build them in bulk.
//!
//! # See also
//! - `crate::item` for the operation surface the engine drives.

pub mod bulk;
pub mod engine;
pub mod error;
pub mod record;
pub mod registry;
pub mod source;
