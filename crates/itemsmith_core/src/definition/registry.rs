//! Registry of constructible definition types.

use crate::item::arguments::Arguments;
use crate::item::operation::{InvocationError, OperationSpec};
use crate::item::{armor_set, custom_item, ItemDefinition};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Keyword constructor of one type.
pub type Constructor = fn(Arguments) -> Result<Box<dyn ItemDefinition>, InvocationError>;

/// One registered type.
#[derive(Debug, Clone, Copy)]
pub struct TypeEntry {
    pub name: &'static str,
    /// Constructor parameter names, in declaration order.
    pub parameters: &'static [&'static str],
    pub operations: &'static [OperationSpec],
    pub constructor: Constructor,
}

/// Type registration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    InvalidTypeName(String),
    DuplicateType(String),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTypeName(value) => write!(f, "type name is invalid: {value}"),
            Self::DuplicateType(value) => write!(f, "type already registered: {value}"),
        }
    }
}

impl Error for RegistryError {}

/// Finite, exact-name registry of definition types.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: BTreeMap<&'static str, TypeEntry>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding `CustomItem` and `ArmorSet`.
    pub fn with_builtin_types() -> Self {
        let mut registry = Self::new();
        for entry in builtin_types() {
            let registered = registry.register(entry);
            debug_assert!(registered.is_ok(), "built-in type names are distinct");
        }
        registry
    }

    /// Registers one type.
    pub fn register(&mut self, entry: TypeEntry) -> Result<(), RegistryError> {
        if entry.name.is_empty() || entry.name.chars().any(char::is_whitespace) {
            return Err(RegistryError::InvalidTypeName(entry.name.to_string()));
        }
        if self.types.contains_key(entry.name) {
            return Err(RegistryError::DuplicateType(entry.name.to_string()));
        }
        self.types.insert(entry.name, entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TypeEntry> {
        self.types.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Returns sorted type names.
    pub fn type_names(&self) -> Vec<&'static str> {
        self.types.keys().copied().collect()
    }

    pub fn entries(&self) -> impl Iterator<Item = &TypeEntry> {
        self.types.values()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

fn builtin_types() -> [TypeEntry; 2] {
    [
        TypeEntry {
            name: custom_item::TYPE_NAME,
            parameters: custom_item::PARAMETERS,
            operations: custom_item::OPERATIONS,
            constructor: construct_custom_item,
        },
        TypeEntry {
            name: armor_set::TYPE_NAME,
            parameters: armor_set::PARAMETERS,
            operations: armor_set::OPERATIONS,
            constructor: construct_armor_set,
        },
    ]
}

fn construct_custom_item(args: Arguments) -> Result<Box<dyn ItemDefinition>, InvocationError> {
    Ok(Box::new(custom_item::CustomItem::from_arguments(args)?))
}

fn construct_armor_set(args: Arguments) -> Result<Box<dyn ItemDefinition>, InvocationError> {
    Ok(Box::new(armor_set::ArmorSet::from_arguments(args)?))
}
