//! Operation declarations, applied-operation log and invocation errors.
//!
//! # Responsibility
//! - Declare each operation's name and the names it conflicts with as data.
//! - Record applied operations and raise incompatibility advisories.
//!
//! # Invariants
//! - The log is append-only.
//! - An incompatibility never blocks an operation; both still take effect.

use crate::advisory::Advisory;
use crate::identifier::ValidationError;
use crate::item::arguments::ArgumentError;
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Declaration of one named operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: &'static str,
    pub incompatible_with: &'static [&'static str],
}

impl OperationSpec {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            incompatible_with: &[],
        }
    }

    pub const fn incompatible(name: &'static str, with: &'static [&'static str]) -> Self {
        Self {
            name,
            incompatible_with: with,
        }
    }
}

/// Finds a declaration by name.
pub fn find_operation(
    operations: &'static [OperationSpec],
    name: &str,
) -> Option<&'static OperationSpec> {
    operations.iter().find(|spec| spec.name == name)
}

/// Ordered log of applied operations plus the advisories they raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationLog {
    applied: Vec<String>,
    advisories: Vec<Advisory>,
}

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `spec` as applied to `identity`.
    ///
    /// Raises one advisory per already-applied incompatible operation.
    pub fn record(&mut self, identity: &str, spec: &OperationSpec) {
        for conflicting in spec.incompatible_with {
            if self.applied.iter().any(|name| name == conflicting) {
                let advisory = Advisory::IncompatibleOperations {
                    identity: identity.to_string(),
                    operation: spec.name.to_string(),
                    conflicting: conflicting.to_string(),
                };
                warn!(
                    "event={} module=item status=warn identity={} operation={} conflicting={}",
                    advisory.event(),
                    identity,
                    spec.name,
                    conflicting
                );
                self.advisories.push(advisory);
            }
        }
        self.applied.push(spec.name.to_string());
    }

    pub fn applied(&self) -> &[String] {
        &self.applied
    }

    pub fn contains(&self, name: &str) -> bool {
        self.applied.iter().any(|applied| applied == name)
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }
}

/// Failure raised by a constructor or an operation body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationError {
    Argument(ArgumentError),
    Validation(ValidationError),
    /// The instance exposes no operation with this name.
    UnknownOperation(String),
}

impl Display for InvocationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Argument(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::UnknownOperation(name) => write!(f, "unknown operation `{name}`"),
        }
    }
}

impl Error for InvocationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Argument(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::UnknownOperation(_) => None,
        }
    }
}

impl From<ArgumentError> for InvocationError {
    fn from(value: ArgumentError) -> Self {
        Self::Argument(value)
    }
}

impl From<ValidationError> for InvocationError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{find_operation, OperationLog, OperationSpec};
    use crate::advisory::Advisory;

    const EAT: OperationSpec = OperationSpec::incompatible("eat", &["use"]);
    const USE: OperationSpec = OperationSpec::incompatible("use", &["eat"]);
    const RENAME: OperationSpec = OperationSpec::new("rename");
    const ALL: &[OperationSpec] = &[EAT, USE, RENAME];

    #[test]
    fn records_in_order() {
        let mut log = OperationLog::new();
        log.record("custom:x", &RENAME);
        log.record("custom:x", &EAT);
        assert_eq!(log.applied(), ["rename", "eat"]);
        assert!(log.advisories().is_empty());
    }

    #[test]
    fn later_incompatible_operation_raises_one_advisory() {
        let mut log = OperationLog::new();
        log.record("custom:x", &EAT);
        log.record("custom:x", &USE);
        assert_eq!(
            log.advisories(),
            [Advisory::IncompatibleOperations {
                identity: "custom:x".to_string(),
                operation: "use".to_string(),
                conflicting: "eat".to_string(),
            }]
        );
        assert!(log.contains("eat") && log.contains("use"));
    }

    #[test]
    fn finds_declarations_by_name() {
        assert_eq!(find_operation(ALL, "use"), Some(&USE));
        assert_eq!(find_operation(ALL, "fly"), None);
    }
}
