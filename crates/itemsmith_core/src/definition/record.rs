//! Definition record shape and parsing.
//!
//! A record is a map with a `type`, an optional ordered operation list, an
//! optional flat override map and any number of constructor parameters.
//! Reserved keys never reach the constructor.

use crate::definition::error::DefinitionError;
use serde_json::{Map, Value};

pub const TYPE_KEY: &str = "type";
/// Accepted names of the operation list.
pub const OPERATION_KEYS: [&str; 4] = ["behavior", "operation", "behaviour", "operations"];
/// Accepted names of the override map.
pub const OVERRIDE_KEYS: [&str; 3] = ["components", "field-overrides", "overrides"];
/// Legacy nested constructor parameters.
pub const PARAMS_KEY: &str = "params";

/// One `{ operation_name: { argument: value } }` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationCall {
    pub name: String,
    pub arguments: Map<String, Value>,
}

/// Parsed definition record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DefinitionRecord {
    pub type_name: Option<String>,
    pub params: Map<String, Value>,
    pub operations: Vec<OperationCall>,
    pub overrides: Map<String, Value>,
}

impl DefinitionRecord {
    /// Splits a raw record into its phases.
    ///
    /// Nested `params` merge under top-level parameters; top-level wins.
    ///
    /// # Errors
    /// - `MalformedRecord` for any shape violation.
    pub fn parse(value: &Value) -> Result<Self, DefinitionError> {
        let map = value
            .as_object()
            .ok_or_else(|| malformed("a definition must be a map"))?;

        let mut record = Self::default();
        let mut operations_seen = None;
        let mut overrides_seen = None;
        let mut top_level = Map::new();

        for (key, value) in map {
            match key.as_str() {
                TYPE_KEY => match value {
                    Value::String(name) => record.type_name = Some(name.clone()),
                    _ => return Err(malformed("`type` must be text")),
                },
                PARAMS_KEY => match value {
                    Value::Object(params) => record.params.extend(params.clone()),
                    Value::Null => {}
                    _ => return Err(malformed("`params` must be a map")),
                },
                key if OPERATION_KEYS.contains(&key) => {
                    if let Some(previous) = operations_seen.replace(key) {
                        return Err(malformed(format!(
                            "both `{previous}` and `{key}` declare operations"
                        )));
                    }
                    record.operations = parse_operations(key, value)?;
                }
                key if OVERRIDE_KEYS.contains(&key) => {
                    if let Some(previous) = overrides_seen.replace(key) {
                        return Err(malformed(format!(
                            "both `{previous}` and `{key}` declare overrides"
                        )));
                    }
                    record.overrides = match value {
                        Value::Object(overrides) => overrides.clone(),
                        Value::Null => Map::new(),
                        _ => return Err(malformed(format!("`{key}` must be a map"))),
                    };
                }
                _ => {
                    top_level.insert(key.clone(), value.clone());
                }
            }
        }

        record.params.extend(top_level);
        Ok(record)
    }
}

fn parse_operations(key: &str, value: &Value) -> Result<Vec<OperationCall>, DefinitionError> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Null => return Ok(Vec::new()),
        _ => return Err(malformed(format!("`{key}` must be a list"))),
    };
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let single = entry
                .as_object()
                .filter(|map| map.len() == 1)
                .and_then(|map| map.iter().next())
                .ok_or_else(|| {
                    malformed(format!(
                        "`{key}` entry {index} must be a map with exactly one operation name"
                    ))
                })?;
            let (name, arguments) = single;
            let arguments = match arguments {
                Value::Object(arguments) => arguments.clone(),
                Value::Null => Map::new(),
                _ => {
                    return Err(malformed(format!(
                        "arguments of `{name}` must be given as a map"
                    )))
                }
            };
            Ok(OperationCall {
                name: name.clone(),
                arguments,
            })
        })
        .collect()
}

fn malformed(message: impl Into<String>) -> DefinitionError {
    DefinitionError::MalformedRecord(message.into())
}

#[cfg(test)]
mod tests {
    use super::DefinitionRecord;
    use crate::definition::error::DefinitionError;
    use serde_json::json;

    #[test]
    fn splits_reserved_keys_from_parameters() {
        let record = DefinitionRecord::parse(&json!({
            "type": "CustomItem",
            "id": "custom:x",
            "behavior": [{"rarity": {"rarity": "rare"}}, {"lore": {"textcomponent": "hi"}}],
            "components": {"max_stack_size": 16},
        }))
        .expect("parse");

        assert_eq!(record.type_name.as_deref(), Some("CustomItem"));
        assert_eq!(record.params.len(), 1);
        assert_eq!(record.params["id"], json!("custom:x"));
        let names: Vec<&str> = record.operations.iter().map(|call| call.name.as_str()).collect();
        assert_eq!(names, ["rarity", "lore"]);
        assert_eq!(record.overrides["max_stack_size"], json!(16));
    }

    #[test]
    fn accepts_aliases_and_nested_params() {
        let record = DefinitionRecord::parse(&json!({
            "type": "CustomItem",
            "params": {"id": "custom:old", "model": "custom:m"},
            "id": "custom:new",
            "operations": [{"lore": null}],
            "overrides": {},
        }))
        .expect("parse");
        assert_eq!(record.params["id"], json!("custom:new"));
        assert_eq!(record.params["model"], json!("custom:m"));
        assert!(record.operations[0].arguments.is_empty());
    }

    #[test]
    fn operation_key_is_reserved() {
        let record = DefinitionRecord::parse(&json!({
            "type": "CustomItem",
            "id": "custom:x",
            "operation": [{"rarity": {"rarity": "epic"}}],
        }))
        .expect("parse");
        assert!(!record.params.contains_key("operation"));
        assert_eq!(record.operations.len(), 1);
        assert_eq!(record.operations[0].name, "rarity");
    }

    #[test]
    fn field_overrides_key_is_reserved() {
        let record = DefinitionRecord::parse(&json!({
            "type": "CustomItem",
            "id": "custom:x",
            "field-overrides": {"rarity": "epic"},
        }))
        .expect("parse");
        assert!(!record.params.contains_key("field-overrides"));
        assert_eq!(record.overrides["rarity"], json!("epic"));
    }

    #[test]
    fn missing_type_is_kept_for_resolution() {
        let record = DefinitionRecord::parse(&json!({"id": "custom:x"})).expect("parse");
        assert_eq!(record.type_name, None);
    }

    #[test]
    fn rejects_malformed_shapes() {
        for value in [
            json!([]),
            json!({"type": 3}),
            json!({"type": "CustomItem", "behavior": {"rarity": {}}}),
            json!({"type": "CustomItem", "behavior": [{"a": {}, "b": {}}]}),
            json!({"type": "CustomItem", "behavior": [{"rarity": "rare"}]}),
            json!({"type": "CustomItem", "components": []}),
            json!({"type": "CustomItem", "behavior": [], "operations": []}),
            json!({"type": "CustomItem", "behavior": [], "operation": []}),
            json!({"type": "CustomItem", "components": {}, "field-overrides": {}}),
        ] {
            let err = DefinitionRecord::parse(&value).expect_err("malformed");
            assert!(matches!(err, DefinitionError::MalformedRecord(_)), "{value}");
        }
    }
}
