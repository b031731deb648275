//! Structured definition failures.

use crate::identifier::ValidationError;
use crate::item::arguments::ArgumentError;
use crate::item::operation::InvocationError;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Engine stage, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DefinitionStage {
    Parse,
    ResolveType,
    Construct,
    ApplyOperations,
    ApplyOverrides,
}

impl DefinitionStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::ResolveType => "resolve_type",
            Self::Construct => "construct",
            Self::ApplyOperations => "apply_operations",
            Self::ApplyOverrides => "apply_overrides",
        }
    }
}

/// Terminal failure of one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// The record does not have the expected shape.
    MalformedRecord(String),
    /// `type` is missing (`None`) or not registered.
    UnknownType(Option<String>),
    MissingParameter {
        type_name: String,
        parameter: String,
    },
    /// Any other constructor failure, passed through.
    Construction {
        type_name: String,
        source: InvocationError,
    },
    UnknownOperation {
        type_name: String,
        operation: String,
    },
    /// Missing or unexpected keyword argument of one operation.
    BadOperationArgument {
        operation: String,
        parameter: String,
        reason: ArgumentError,
    },
    /// Any other operation failure, passed through.
    Operation {
        operation: String,
        source: InvocationError,
    },
    IncompatibleOverride {
        field: String,
        current: &'static str,
        replacement: &'static str,
    },
    /// An override key is not a valid field key.
    Validation(ValidationError),
}

impl DefinitionError {
    /// Stage in which the failure happened.
    pub fn stage(&self) -> DefinitionStage {
        match self {
            Self::MalformedRecord(_) => DefinitionStage::Parse,
            Self::UnknownType(_) => DefinitionStage::ResolveType,
            Self::MissingParameter { .. } | Self::Construction { .. } => DefinitionStage::Construct,
            Self::UnknownOperation { .. }
            | Self::BadOperationArgument { .. }
            | Self::Operation { .. } => DefinitionStage::ApplyOperations,
            Self::IncompatibleOverride { .. } | Self::Validation(_) => {
                DefinitionStage::ApplyOverrides
            }
        }
    }

    /// Stable machine-readable kind used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRecord(_) => "malformed_record",
            Self::UnknownType(_) => "unknown_type",
            Self::MissingParameter { .. } => "missing_parameter",
            Self::Construction { .. } => "construction",
            Self::UnknownOperation { .. } => "unknown_operation",
            Self::BadOperationArgument { .. } => "bad_operation_argument",
            Self::Operation { .. } => "operation",
            Self::IncompatibleOverride { .. } => "incompatible_override",
            Self::Validation(_) => "validation",
        }
    }
}

impl Display for DefinitionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedRecord(message) => write!(f, "malformed definition: {message}"),
            Self::UnknownType(None) => write!(f, "definition has no `type`"),
            Self::UnknownType(Some(name)) => write!(f, "unknown definition type `{name}`"),
            Self::MissingParameter {
                type_name,
                parameter,
            } => write!(f, "`{type_name}` is missing parameter `{parameter}`"),
            Self::Construction { type_name, source } => {
                write!(f, "cannot construct `{type_name}`: {source}")
            }
            Self::UnknownOperation {
                type_name,
                operation,
            } => write!(f, "unknown operation `{operation}` for `{type_name}`"),
            Self::BadOperationArgument {
                operation,
                parameter,
                reason,
            } => match reason {
                ArgumentError::Missing(_) => {
                    write!(f, "operation `{operation}` is missing parameter `{parameter}`")
                }
                _ => write!(
                    f,
                    "parameter `{parameter}` for operation `{operation}` was unexpected"
                ),
            },
            Self::Operation { operation, source } => {
                write!(f, "operation `{operation}` failed: {source}")
            }
            Self::IncompatibleOverride {
                field,
                current,
                replacement,
            } => write!(
                f,
                "cannot override `{field}` of type {current} with a value of type {replacement}"
            ),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for DefinitionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Construction { source, .. } | Self::Operation { source, .. } => Some(source),
            Self::BadOperationArgument { reason, .. } => Some(reason),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for DefinitionError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}
