//! Keyword arguments for constructors and operations.
//!
//! # Responsibility
//! - Hand out named arguments with typed decoding.
//! - Report missing, unexpected and malformed arguments as structured errors
//!   naming the offending parameter.
//!
//! # Invariants
//! - Each argument is consumed at most once.
//! - `finish()` fails on the first argument nobody consumed.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Keyword-argument bag decoded from a definition record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    values: Map<String, Value>,
}

impl Arguments {
    pub fn new(values: Map<String, Value>) -> Self {
        Self { values }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Adds one argument, replacing an existing one with the same name.
    pub fn with(mut self, name: &str, value: Value) -> Self {
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Takes a required argument; `null` counts as missing.
    pub fn required<T: DeserializeOwned>(&mut self, name: &str) -> Result<T, ArgumentError> {
        match self.optional(name)? {
            Some(value) => Ok(value),
            None => Err(ArgumentError::Missing(name.to_string())),
        }
    }

    /// Takes an optional argument; absent and `null` both yield `None`.
    pub fn optional<T: DeserializeOwned>(
        &mut self,
        name: &str,
    ) -> Result<Option<T>, ArgumentError> {
        match self.values.remove(name) {
            None | Some(Value::Null) => Ok(None),
            Some(raw) => decode(name, raw).map(Some),
        }
    }

    /// Takes an optional argument with a fallback value.
    pub fn optional_or<T: DeserializeOwned>(
        &mut self,
        name: &str,
        default: T,
    ) -> Result<T, ArgumentError> {
        Ok(self.optional(name)?.unwrap_or(default))
    }

    /// Takes an argument that may be spelled `name` or `alias`.
    ///
    /// Giving both spellings is an `InvalidValue` on `alias`.
    pub fn either<T: DeserializeOwned>(
        &mut self,
        name: &str,
        alias: &str,
    ) -> Result<Option<T>, ArgumentError> {
        let primary = self.optional(name)?;
        let alternate = self.optional(alias)?;
        match (primary, alternate) {
            (Some(_), Some(_)) => Err(ArgumentError::invalid(
                alias,
                format!("`{name}` is already given"),
            )),
            (primary, alternate) => Ok(primary.or(alternate)),
        }
    }

    /// Takes the raw value, keeping `null` distinct from absent.
    pub fn take_raw(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    /// Fails on the first argument that was never consumed.
    pub fn finish(self) -> Result<(), ArgumentError> {
        match self.values.into_iter().next() {
            Some((name, _)) => Err(ArgumentError::Unexpected(name)),
            None => Ok(()),
        }
    }
}

impl From<Map<String, Value>> for Arguments {
    fn from(values: Map<String, Value>) -> Self {
        Self::new(values)
    }
}

fn decode<T: DeserializeOwned>(name: &str, raw: Value) -> Result<T, ArgumentError> {
    serde_json::from_value(raw).map_err(|err| ArgumentError::InvalidValue {
        parameter: name.to_string(),
        message: err.to_string(),
    })
}

/// Argument mismatch attributable to one parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    Missing(String),
    Unexpected(String),
    InvalidValue { parameter: String, message: String },
}

impl ArgumentError {
    /// Creates an `InvalidValue` error for a domain check.
    pub fn invalid(parameter: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.to_string(),
            message: message.into(),
        }
    }

    /// Name of the offending parameter.
    pub fn parameter(&self) -> &str {
        match self {
            Self::Missing(name) | Self::Unexpected(name) => name,
            Self::InvalidValue { parameter, .. } => parameter,
        }
    }
}

impl Display for ArgumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(name) => write!(f, "missing required parameter `{name}`"),
            Self::Unexpected(name) => write!(f, "unexpected parameter `{name}`"),
            Self::InvalidValue { parameter, message } => {
                write!(f, "invalid value for parameter `{parameter}`: {message}")
            }
        }
    }
}

impl Error for ArgumentError {}

#[cfg(test)]
mod tests {
    use super::{ArgumentError, Arguments};
    use serde_json::{json, Value};

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => Arguments::new(map),
            _ => panic!("test arguments must be a map"),
        }
    }

    #[test]
    fn decodes_required_and_optional_values() {
        let mut args = args(json!({"damage": 7.5, "label": "x"}));
        let damage: f64 = args.required("damage").expect("damage");
        let label: Option<String> = args.optional("label").expect("label");
        let missing: Option<u32> = args.optional("count").expect("count");
        assert_eq!(damage, 7.5);
        assert_eq!(label.as_deref(), Some("x"));
        assert_eq!(missing, None);
        args.finish().expect("all arguments consumed");
    }

    #[test]
    fn null_counts_as_missing_for_required() {
        let mut args = args(json!({"damage": null}));
        let err = args.required::<f64>("damage").expect_err("null is missing");
        assert_eq!(err, ArgumentError::Missing("damage".to_string()));
    }

    #[test]
    fn take_raw_keeps_null_distinct_from_absent() {
        let mut args = args(json!({"group": null}));
        assert_eq!(args.take_raw("group"), Some(Value::Null));
        assert_eq!(args.take_raw("group"), None);
    }

    #[test]
    fn either_accepts_one_spelling_and_rejects_both() {
        let mut one = args(json!({"trimable": true}));
        let value: Option<bool> = one.either("trimable", "trimmable").expect("one spelling");
        assert_eq!(value, Some(true));
        one.finish().expect("consumed");

        let mut both = args(json!({"trimable": true, "trimmable": false}));
        let err = both
            .either::<bool>("trimable", "trimmable")
            .expect_err("both spellings");
        assert_eq!(err.parameter(), "trimmable");
    }

    #[test]
    fn finish_reports_leftover_argument() {
        let args = args(json!({"colour": 1}));
        let err = args.finish().expect_err("leftover must fail");
        assert_eq!(err, ArgumentError::Unexpected("colour".to_string()));
        assert_eq!(err.parameter(), "colour");
    }

    #[test]
    fn type_mismatch_is_invalid_value() {
        let mut args = args(json!({"durability": "lots"}));
        let err = args
            .required::<u32>("durability")
            .expect_err("text is not a number");
        assert!(matches!(err, ArgumentError::InvalidValue { ref parameter, .. } if parameter == "durability"));
    }
}
