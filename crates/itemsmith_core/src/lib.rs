//! Core domain logic for itemsmith.
//! This crate is the single source of truth for identifier, field and
//! definition invariants.

pub mod advisory;
pub mod components;
pub mod config;
pub mod definition;
pub mod identifier;
pub mod item;
pub mod logging;
pub mod pipeline;

pub use advisory::Advisory;
pub use components::component::Component;
pub use components::store::{FieldKey, FieldStore, FieldValue, REMOVED};
pub use config::{load_config, BuildConfig, ConfigError};
pub use definition::bulk::{bulk_implement, BulkError, BulkOutcome};
pub use definition::engine::DefinitionEngine;
pub use definition::error::{DefinitionError, DefinitionStage};
pub use definition::registry::{TypeEntry, TypeRegistry};
pub use definition::source::{collect_definitions, DefinitionSource, SourceError};
pub use identifier::{IdentifierValidator, ValidationError, ValidationRule};
pub use item::armor_set::ArmorSet;
pub use item::custom_item::CustomItem;
pub use item::ItemDefinition;
pub use logging::{default_log_level, init_logging, logging_status};
pub use pipeline::artifact::{Artifact, ArtifactKind};
pub use pipeline::context::{FinalizeContext, SUPPORTED_PACK_FORMAT};
pub use pipeline::sink::{MemoryPack, PipelineSink};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
