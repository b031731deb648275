//! Declarative definition execution.
//!
//! # Responsibility
//! - Drive one record through parse, type resolution, construction,
//!   operations and overrides.
//! - Translate attributable failures into [`DefinitionError`] variants.
//!
//! # Invariants
//! - Stages run in a fixed linear order; any failure is terminal for the
//!   record and leaves no state behind in the engine.
//! - Overrides merge maps one level deep only.

use crate::components::store::{value_kind, FieldKey, FieldStore, FieldValue};
use crate::definition::error::DefinitionError;
use crate::definition::record::{DefinitionRecord, OperationCall};
use crate::definition::registry::TypeRegistry;
use crate::item::arguments::{ArgumentError, Arguments};
use crate::item::operation::InvocationError;
use crate::item::ItemDefinition;
use log::{debug, warn};
use serde_json::Value;

/// Builds item instances from definition records.
#[derive(Debug, Clone)]
pub struct DefinitionEngine {
    registry: TypeRegistry,
}

impl Default for DefinitionEngine {
    fn default() -> Self {
        Self::new(TypeRegistry::with_builtin_types())
    }
}

impl DefinitionEngine {
    pub fn new(registry: TypeRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Parses and builds one raw record.
    pub fn build(&self, value: &Value) -> Result<Box<dyn ItemDefinition>, DefinitionError> {
        let record = DefinitionRecord::parse(value).map_err(|err| log_failure(None, err))?;
        self.build_record(record)
    }

    /// Builds one parsed record.
    pub fn build_record(
        &self,
        record: DefinitionRecord,
    ) -> Result<Box<dyn ItemDefinition>, DefinitionError> {
        let type_name = record.type_name.clone();
        self.run(record)
            .map_err(|err| log_failure(type_name.as_deref(), err))
    }

    fn run(&self, record: DefinitionRecord) -> Result<Box<dyn ItemDefinition>, DefinitionError> {
        let DefinitionRecord {
            type_name,
            params,
            operations,
            overrides,
        } = record;

        let type_name = type_name.ok_or(DefinitionError::UnknownType(None))?;
        let entry = self
            .registry
            .get(&type_name)
            .ok_or_else(|| DefinitionError::UnknownType(Some(type_name.clone())))?;
        debug!(
            "event=definition_type_resolved module=definition status=ok type={} params={}",
            entry.name,
            params.len()
        );

        let mut instance = (entry.constructor)(Arguments::new(params))
            .map_err(|err| construction_error(entry.name, err))?;
        debug!(
            "event=definition_constructed module=definition status=ok type={} identity={}",
            entry.name,
            instance.identity()
        );

        for call in operations {
            apply_call(instance.as_mut(), call)?;
        }

        for (key, replacement) in overrides {
            for store in instance.field_stores_mut() {
                apply_override(store, &key, &replacement)?;
            }
        }
        debug!(
            "event=definition_built module=definition status=ok type={} identity={} operations={}",
            entry.name,
            instance.identity(),
            instance.operation_log().applied().len()
        );
        Ok(instance)
    }
}

fn apply_call(instance: &mut dyn ItemDefinition, call: OperationCall) -> Result<(), DefinitionError> {
    let OperationCall { name, arguments } = call;
    if !instance.has_operation(&name) {
        return Err(DefinitionError::UnknownOperation {
            type_name: instance.type_name().to_string(),
            operation: name,
        });
    }
    instance
        .apply_operation(&name, Arguments::new(arguments))
        .map_err(|err| operation_error(instance.type_name(), name, err))
}

/// Applies one raw override to a field store.
///
/// Map over map merges top-level keys, text over text replaces, anything
/// over an absent field sets it. Every other combination is rejected.
pub fn apply_override(
    store: &mut FieldStore,
    key: &str,
    replacement: &Value,
) -> Result<(), DefinitionError> {
    let field = FieldKey::resolve(key)?;
    if store.slot(&field).is_none() {
        if !replacement.is_null() {
            store.set_slot(&field, Some(FieldValue::Value(replacement.clone())));
        }
        return Ok(());
    }
    match (store.slot_mut(&field), replacement) {
        (Some(FieldValue::Value(Value::Object(current))), Value::Object(entries)) => {
            for (entry_key, entry_value) in entries {
                current.insert(entry_key.clone(), entry_value.clone());
            }
        }
        (Some(FieldValue::Value(current @ Value::String(_))), Value::String(_)) => {
            *current = replacement.clone();
        }
        (current, _) => {
            return Err(DefinitionError::IncompatibleOverride {
                field: field.export_key(),
                current: current.map_or("absent", |value| value.kind()),
                replacement: value_kind(replacement),
            })
        }
    }
    Ok(())
}

fn construction_error(type_name: &str, err: InvocationError) -> DefinitionError {
    match err {
        InvocationError::Argument(ArgumentError::Missing(parameter)) => {
            DefinitionError::MissingParameter {
                type_name: type_name.to_string(),
                parameter,
            }
        }
        source => DefinitionError::Construction {
            type_name: type_name.to_string(),
            source,
        },
    }
}

fn operation_error(type_name: &str, operation: String, err: InvocationError) -> DefinitionError {
    match err {
        InvocationError::Argument(
            reason @ (ArgumentError::Missing(_) | ArgumentError::Unexpected(_)),
        ) => DefinitionError::BadOperationArgument {
            operation,
            parameter: reason.parameter().to_string(),
            reason,
        },
        InvocationError::UnknownOperation(operation) => DefinitionError::UnknownOperation {
            type_name: type_name.to_string(),
            operation,
        },
        source => DefinitionError::Operation { operation, source },
    }
}

fn log_failure(type_name: Option<&str>, err: DefinitionError) -> DefinitionError {
    warn!(
        "event=definition_failed module=definition status=error type={} stage={} kind={}",
        type_name.unwrap_or("-"),
        err.stage().as_str(),
        err.kind()
    );
    err
}

#[cfg(test)]
mod tests {
    use super::{apply_override, DefinitionEngine};
    use crate::components::store::{FieldStore, FieldValue, REMOVED};
    use crate::definition::error::{DefinitionError, DefinitionStage};
    use crate::item::arguments::ArgumentError;
    use serde_json::json;

    fn sword() -> serde_json::Value {
        json!({
            "type": "CustomItem",
            "id": "custom:hunter_sword",
            "name": "Hunter Sword",
            "model": "custom:hunter_sword",
        })
    }

    #[test]
    fn builds_item_with_operations_and_overrides() {
        let mut record = sword();
        record["behavior"] = json!([
            {"weapon": {"attack_damage": 7, "attack_speed": 1.6, "can_sweep": true}},
            {"rarity": {"rarity": "epic"}},
        ]);
        record["components"] = json!({
            "item_model": "custom:hunter_sword_v2",
            "custom:mana": {"max": 5},
        });

        let item = DefinitionEngine::default().build(&record).expect("build");
        assert_eq!(item.type_name(), "CustomItem");
        assert_eq!(item.operation_log().applied(), ["weapon", "rarity"]);
        let exported = item.field_stores()[0].export();
        assert_eq!(exported["minecraft:rarity"], json!("epic"));
        assert_eq!(exported["custom:mana"], json!({"max": 5}));
        assert_eq!(exported["minecraft:item_model"], json!("custom:hunter_sword_v2"));
    }

    #[test]
    fn unknown_type_and_missing_type() {
        let engine = DefinitionEngine::default();
        let err = engine
            .build(&json!({"type": "Wand", "id": "custom:x"}))
            .expect_err("unknown type");
        assert_eq!(err, DefinitionError::UnknownType(Some("Wand".to_string())));
        let err = engine.build(&json!({"id": "custom:x"})).expect_err("no type");
        assert_eq!(err, DefinitionError::UnknownType(None));
    }

    #[test]
    fn unexpected_constructor_key_is_construction_failure() {
        let mut record = sword();
        record["colour"] = json!("red");
        let err = DefinitionEngine::default()
            .build(&record)
            .expect_err("unexpected key");
        assert!(matches!(
            err,
            DefinitionError::Construction { ref source, .. }
                if source.to_string().contains("colour")
        ));
        assert_eq!(err.stage(), DefinitionStage::Construct);
    }

    #[test]
    fn operation_argument_mismatch_names_operation_and_parameter() {
        let mut record = sword();
        record["behavior"] = json!([{"weapon": {"attack_damage": 7, "can_sweep": true}}]);
        let err = DefinitionEngine::default()
            .build(&record)
            .expect_err("missing argument");
        assert_eq!(
            err,
            DefinitionError::BadOperationArgument {
                operation: "weapon".to_string(),
                parameter: "attack_speed".to_string(),
                reason: ArgumentError::Missing("attack_speed".to_string()),
            }
        );
    }

    #[test]
    fn other_operation_failures_pass_through() {
        let mut record = sword();
        record["behavior"] = json!([{"rarity": {"rarity": "mythic"}}]);
        let err = DefinitionEngine::default()
            .build(&record)
            .expect_err("invalid rarity");
        assert!(matches!(err, DefinitionError::Operation { ref operation, .. } if operation == "rarity"));
    }

    #[test]
    fn override_policy() {
        let mut store = FieldStore::new();
        store.insert("weapon", json!({"a": {"x": 1}, "b": 2})).expect("insert");
        store.insert("rarity", json!("rare")).expect("insert");
        store.insert("lore", json!([[{"text": "a"}]])).expect("insert");
        store.remove("unbreakable").expect("remove");

        apply_override(&mut store, "weapon", &json!({"a": {"y": 2}})).expect("map merge");
        assert_eq!(
            store.get("weapon").expect("get"),
            Some(&FieldValue::Value(json!({"a": {"y": 2}, "b": 2})))
        );

        apply_override(&mut store, "rarity", &json!("epic")).expect("text replace");
        apply_override(&mut store, "custom:new", &json!(3)).expect("absent set");
        apply_override(&mut store, "custom:other", &json!(null)).expect("null no-op");
        assert_eq!(store.get("custom:other").expect("get"), None);

        let err = apply_override(&mut store, "lore", &json!({"text": "b"}))
            .expect_err("list replaced by map");
        assert_eq!(
            err,
            DefinitionError::IncompatibleOverride {
                field: "minecraft:lore".to_string(),
                current: "list",
                replacement: "map",
            }
        );
        assert!(apply_override(&mut store, "unbreakable", &json!({})).is_err());
        assert_eq!(store.get("unbreakable").expect("get"), Some(&REMOVED));
        assert!(matches!(
            apply_override(&mut store, "Bad Key", &json!(1)),
            Err(DefinitionError::Validation(_))
        ));
    }

    #[test]
    fn armor_set_overrides_fan_out_to_members() {
        let record = json!({
            "type": "ArmorSet",
            "id_format": "custom:ruby_{noun}",
            "name_format": "Ruby {noun}",
            "behaviour": [{"protection": {"armor": [3, 8, 6, 3]}}],
            "components": {"rarity": "rare"},
        });
        let set = DefinitionEngine::default().build(&record).expect("build");
        let stores = set.field_stores();
        assert_eq!(stores.len(), 4);
        for store in stores {
            assert_eq!(store.export()["minecraft:rarity"], json!("rare"));
        }
    }
}
