//! Non-fatal diagnostics raised while building items.
//!
//! Advisories never abort processing. Each one is logged at `warn` where it
//! is raised and kept by its owner so callers can inspect it afterwards.

use std::fmt::{Display, Formatter};

/// One non-fatal diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advisory {
    /// `operation` ran after `conflicting`, which it is declared incompatible with.
    IncompatibleOperations {
        identity: String,
        operation: String,
        conflicting: String,
    },
    /// The same identity was finalized twice into the same destination.
    DuplicateFinalization {
        identity: String,
        destination: String,
    },
    /// The destination pack does not declare the supported pack format.
    PackFormatMismatch {
        destination: String,
        expected: u32,
        actual: u32,
    },
    /// A definition was skipped by a non-strict bulk build.
    SkippedDefinition { origin: String, reason: String },
}

impl Advisory {
    /// Stable event name used in log lines.
    pub fn event(&self) -> &'static str {
        match self {
            Self::IncompatibleOperations { .. } => "incompatible_operations",
            Self::DuplicateFinalization { .. } => "duplicate_finalization",
            Self::PackFormatMismatch { .. } => "pack_format_mismatch",
            Self::SkippedDefinition { .. } => "definition_skipped",
        }
    }
}

impl Display for Advisory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompatibleOperations {
                identity,
                operation,
                conflicting,
            } => write!(
                f,
                "`{identity}`: operations `{operation}` and `{conflicting}` may be incompatible"
            ),
            Self::DuplicateFinalization {
                identity,
                destination,
            } => write!(
                f,
                "`{identity}` was finalized more than once into `{destination}`"
            ),
            Self::PackFormatMismatch {
                destination,
                expected,
                actual,
            } => write!(
                f,
                "`{destination}` has pack format {actual}, expected {expected}; some content may not load"
            ),
            Self::SkippedDefinition { origin, reason } => {
                write!(f, "definition `{origin}` was skipped: {reason}")
            }
        }
    }
}
