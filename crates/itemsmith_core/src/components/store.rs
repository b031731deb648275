//! Field store with three-state values.
//!
//! # Responsibility
//! - Store well-known components in a fixed record and everything else in an
//!   ordered extension list.
//! - Validate every key through the marker-free identifier grammar.
//! - Export/import the flat `key -> value` map and overlay stores.
//!
//! # Invariants
//! - `None` means absent: the field is not part of the store at all.
//! - `FieldValue::Removed` means the field is deleted from the base object.
//! - Merge is a right-biased shallow overlay; map values are replaced whole.

use crate::components::component::Component;
use crate::identifier::{IdentifierValidator, ValidationError, NEGATION_MARKER};
use serde_json::{Map, Value};

/// Value of one present field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Tombstone: delete this field from the base object.
    Removed,
    /// Concrete JSON-like value.
    Value(Value),
}

/// Tombstone shorthand.
pub const REMOVED: FieldValue = FieldValue::Removed;

impl FieldValue {
    pub fn is_removed(&self) -> bool {
        matches!(self, Self::Removed)
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Self::Removed => None,
            Self::Value(value) => Some(value),
        }
    }

    pub fn as_value_mut(&mut self) -> Option<&mut Value> {
        match self {
            Self::Removed => None,
            Self::Value(value) => Some(value),
        }
    }

    /// Short type name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Removed => "removed",
            Self::Value(value) => value_kind(value),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Short type name of a JSON value used in diagnostics.
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "list",
        Value::Object(_) => "map",
    }
}

/// Resolved storage slot for one field key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKey {
    Known(Component),
    Extension(String),
}

impl FieldKey {
    /// Validates `key` and resolves it to a well-known or extension slot.
    ///
    /// Bare names such as `damage` resolve to `minecraft:damage`.
    pub fn resolve(key: &str) -> Result<Self, ValidationError> {
        let normalized = IdentifierValidator::PLAIN_PATH.validate(key)?;
        Ok(match Component::from_key(&normalized) {
            Some(component) => Self::Known(component),
            None => Self::Extension(normalized),
        })
    }

    /// Plain namespaced key used in exports.
    pub fn export_key(&self) -> String {
        match self {
            Self::Known(component) => component.key(),
            Self::Extension(key) => key.clone(),
        }
    }
}

/// Sparse holder of an item's declarative fields.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldStore {
    known: [Option<FieldValue>; Component::COUNT],
    extensions: Vec<(String, FieldValue)>,
}

impl Default for FieldStore {
    fn default() -> Self {
        Self {
            known: std::array::from_fn(|_| None),
            extensions: Vec::new(),
        }
    }
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets one field by key; `None` makes the field absent.
    pub fn set(&mut self, key: &str, value: Option<FieldValue>) -> Result<(), ValidationError> {
        let key = FieldKey::resolve(key)?;
        self.set_slot(&key, value);
        Ok(())
    }

    /// Returns one field by key, or `None` when absent.
    pub fn get(&self, key: &str) -> Result<Option<&FieldValue>, ValidationError> {
        let key = FieldKey::resolve(key)?;
        Ok(self.slot(&key))
    }

    /// Sets a concrete value by key.
    pub fn insert(&mut self, key: &str, value: Value) -> Result<(), ValidationError> {
        self.set(key, Some(FieldValue::Value(value)))
    }

    /// Tombstones a field by key.
    pub fn remove(&mut self, key: &str) -> Result<(), ValidationError> {
        self.set(key, Some(FieldValue::Removed))
    }

    /// Makes a field absent by key.
    pub fn clear(&mut self, key: &str) -> Result<(), ValidationError> {
        self.set(key, None)
    }

    pub fn component(&self, component: Component) -> Option<&FieldValue> {
        self.known[component.index()].as_ref()
    }

    pub fn component_mut(&mut self, component: Component) -> Option<&mut FieldValue> {
        self.known[component.index()].as_mut()
    }

    /// Returns the concrete value of a component, ignoring tombstones.
    pub fn component_value(&self, component: Component) -> Option<&Value> {
        self.component(component).and_then(FieldValue::as_value)
    }

    pub fn set_component(&mut self, component: Component, value: Option<FieldValue>) {
        self.known[component.index()] = value;
    }

    /// Sets a concrete value on a component.
    pub fn put(&mut self, component: Component, value: Value) {
        self.set_component(component, Some(FieldValue::Value(value)));
    }

    pub fn slot(&self, key: &FieldKey) -> Option<&FieldValue> {
        match key {
            FieldKey::Known(component) => self.component(*component),
            FieldKey::Extension(name) => self
                .extensions
                .iter()
                .find(|(existing, _)| existing == name)
                .map(|(_, value)| value),
        }
    }

    pub fn slot_mut(&mut self, key: &FieldKey) -> Option<&mut FieldValue> {
        match key {
            FieldKey::Known(component) => self.component_mut(*component),
            FieldKey::Extension(name) => self
                .extensions
                .iter_mut()
                .find(|(existing, _)| existing == name)
                .map(|(_, value)| value),
        }
    }

    pub fn set_slot(&mut self, key: &FieldKey, value: Option<FieldValue>) {
        match key {
            FieldKey::Known(component) => self.set_component(*component, value),
            FieldKey::Extension(name) => {
                let position = self
                    .extensions
                    .iter()
                    .position(|(existing, _)| existing == name);
                match (position, value) {
                    (Some(index), Some(value)) => self.extensions[index].1 = value,
                    (Some(index), None) => {
                        self.extensions.remove(index);
                    }
                    (None, Some(value)) => self.extensions.push((name.clone(), value)),
                    (None, None) => {}
                }
            }
        }
    }

    /// Number of present (non-absent) fields.
    pub fn len(&self) -> usize {
        self.known.iter().filter(|slot| slot.is_some()).count() + self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Present fields in export order: well-known first, then extensions.
    pub fn entries(&self) -> impl Iterator<Item = (FieldKey, &FieldValue)> + '_ {
        let known = Component::ALL.into_iter().filter_map(|component| {
            self.component(component)
                .map(|value| (FieldKey::Known(component), value))
        });
        let extensions = self
            .extensions
            .iter()
            .map(|(key, value)| (FieldKey::Extension(key.clone()), value));
        known.chain(extensions)
    }

    /// Flat export map; tombstones appear as `!<key>: {}`.
    pub fn export(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for (key, value) in self.entries() {
            match value {
                FieldValue::Value(value) => {
                    out.insert(key.export_key(), value.clone());
                }
                FieldValue::Removed => {
                    out.insert(
                        format!("{NEGATION_MARKER}{}", key.export_key()),
                        Value::Object(Map::new()),
                    );
                }
            }
        }
        out
    }

    /// Inverse of [`FieldStore::export`].
    ///
    /// A key with a leading `!` becomes a tombstone for the un-prefixed key;
    /// the value paired with it is ignored.
    pub fn import(data: &Map<String, Value>) -> Result<Self, ValidationError> {
        let mut store = Self::new();
        for (key, value) in data {
            match key.strip_prefix(NEGATION_MARKER) {
                Some(stripped) => store.set(stripped, Some(FieldValue::Removed))?,
                None => store.set(key, Some(FieldValue::Value(value.clone())))?,
            }
        }
        Ok(store)
    }

    /// Overlays every present field of `other` onto this store.
    pub fn merge(&mut self, other: &FieldStore) {
        for (key, value) in other.entries() {
            self.set_slot(&key, Some(value.clone()));
        }
    }

    /// Returns a new store with `other` overlaid on a copy of this one.
    pub fn merged(&self, other: &FieldStore) -> FieldStore {
        let mut out = self.clone();
        out.merge(other);
        out
    }
}
