//! Item model and its named-operation surface.
//!
//! # Responsibility
//! - Define the capability the definition engine drives: construction from
//!   keyword arguments, operation dispatch by name, finalization.
//! - Provide the single-item and four-piece-group variants.
//!
//! # Invariants
//! - Every successful operation is recorded in the instance's operation log
//!   after its body ran; a failed operation is never recorded.
//! - Finalization only reads the instance.
//!
//! # See also
//! - `crate::definition::engine` for record-driven dispatch.

pub mod armor_set;
pub mod arguments;
pub mod custom_item;
pub mod operation;
pub mod text;
pub mod vocabulary;

use crate::advisory::Advisory;
use crate::components::store::FieldStore;
use crate::identifier::split_identifier;
use crate::item::arguments::Arguments;
use crate::item::operation::{find_operation, InvocationError, OperationLog, OperationSpec};
use crate::pipeline::artifact::Artifact;
use crate::pipeline::context::{finalize_artifacts, FinalizeContext};
use crate::pipeline::sink::PipelineSink;
use std::fmt::Debug;

/// Namespace owning generated helper resources.
pub const TECHNICAL_NAMESPACE: &str = "itemsmith";

/// Builds `itemsmith:<namespace>/<thing>/<path>` for an item identity.
pub fn generated_identifier(identity: &str, thing: &str) -> String {
    let (namespace, path) = split_identifier(identity);
    format!("{TECHNICAL_NAMESPACE}:{namespace}/{thing}/{path}")
}

/// Capability shared by every constructible item type.
pub trait ItemDefinition: Debug {
    /// Namespaced identity used for duplicate detection and diagnostics.
    fn identity(&self) -> &str;

    /// Registered type name.
    fn type_name(&self) -> &'static str;

    /// Human-readable name for summaries; the identity unless overridden.
    fn display_name(&self) -> String {
        self.identity().to_string()
    }

    /// Declared operations, including their incompatibility sets.
    fn operations(&self) -> &'static [OperationSpec];

    fn has_operation(&self, name: &str) -> bool {
        find_operation(self.operations(), name).is_some()
    }

    /// Runs one operation body without logging it.
    fn invoke(&mut self, name: &str, args: Arguments) -> Result<(), InvocationError>;

    fn operation_log(&self) -> &OperationLog;

    fn operation_log_mut(&mut self) -> &mut OperationLog;

    /// Dispatches an operation by name and records it when it succeeds.
    fn apply_operation(&mut self, name: &str, args: Arguments) -> Result<(), InvocationError> {
        let spec = find_operation(self.operations(), name)
            .ok_or_else(|| InvocationError::UnknownOperation(name.to_string()))?;
        self.invoke(spec.name, args)?;
        let identity = self.identity().to_string();
        self.operation_log_mut().record(&identity, spec);
        Ok(())
    }

    /// Field stores an override applies to; one per member for groups.
    fn field_stores(&self) -> Vec<&FieldStore>;

    fn field_stores_mut(&mut self) -> Vec<&mut FieldStore>;

    /// Advisories raised by this instance's operations.
    fn advisories(&self) -> Vec<Advisory> {
        self.operation_log().advisories().to_vec()
    }

    /// Everything this instance hands to the pipeline, in write order.
    fn artifacts(&self) -> Vec<Artifact>;

    /// Writes [`ItemDefinition::artifacts`] into `sink`.
    ///
    /// Returns the number of artifacts written.
    fn finalize(&self, sink: &mut dyn PipelineSink, ctx: &mut FinalizeContext) -> usize {
        finalize_artifacts(self.identity(), self.artifacts(), sink, ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::generated_identifier;

    #[test]
    fn generated_identifier_nests_namespace_and_thing() {
        assert_eq!(
            generated_identifier("lategame:hunter_sword", "ability"),
            "itemsmith:lategame/ability/hunter_sword"
        );
    }
}
