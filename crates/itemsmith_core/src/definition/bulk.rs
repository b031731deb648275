//! Sequential build of many definitions into one sink.
//!
//! # Responsibility
//! - Decode, build and finalize every source in order.
//! - Apply the strict/lenient failure policy per definition.
//!
//! # Invariants
//! - Definitions are independent; only the finalize context is shared.
//! - Lenient mode never stops early; strict mode stops at the first failure
//!   and keeps whatever was already written to the sink.

use crate::advisory::Advisory;
use crate::definition::engine::DefinitionEngine;
use crate::definition::error::DefinitionError;
use crate::definition::source::{DefinitionSource, SourceError};
use crate::pipeline::context::FinalizeContext;
use crate::pipeline::sink::PipelineSink;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure of one definition inside a bulk build.
#[derive(Debug)]
pub enum BulkError {
    Source(SourceError),
    Definition {
        origin: String,
        source: DefinitionError,
    },
}

impl BulkError {
    pub fn origin(&self) -> Option<&str> {
        match self {
            Self::Source(SourceError::Decode { origin, .. }) => Some(origin),
            Self::Source(_) => None,
            Self::Definition { origin, .. } => Some(origin),
        }
    }
}

impl Display for BulkError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Source(err) => write!(f, "{err}"),
            Self::Definition { origin, source } => write!(f, "{origin}: {source}"),
        }
    }
}

impl Error for BulkError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Source(err) => Some(err),
            Self::Definition { source, .. } => Some(source),
        }
    }
}

impl From<SourceError> for BulkError {
    fn from(value: SourceError) -> Self {
        Self::Source(value)
    }
}

/// One built definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltDefinition {
    pub origin: String,
    pub identity: String,
    pub display_name: String,
    pub type_name: String,
    pub artifacts: usize,
}

/// One skipped definition in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDefinition {
    pub origin: String,
    pub reason: String,
}

/// Result of a bulk build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkOutcome {
    pub built: Vec<BuiltDefinition>,
    pub skipped: Vec<SkippedDefinition>,
}

impl BulkOutcome {
    pub fn artifact_count(&self) -> usize {
        self.built.iter().map(|built| built.artifacts).sum()
    }
}

/// Builds and finalizes every source into `sink`.
///
/// With `strict`, the first failing definition is returned as an error.
/// Otherwise each failure is logged, recorded as a
/// [`Advisory::SkippedDefinition`] in `ctx` and skipped.
pub fn bulk_implement(
    engine: &DefinitionEngine,
    sources: &[DefinitionSource],
    sink: &mut dyn PipelineSink,
    ctx: &mut FinalizeContext,
    strict: bool,
) -> Result<BulkOutcome, BulkError> {
    info!(
        "event=bulk_build module=definition status=start sources={} strict={} destination={}",
        sources.len(),
        strict,
        sink.pack_id()
    );

    let mut outcome = BulkOutcome::default();
    for source in sources {
        match implement_one(engine, source, sink, ctx) {
            Ok(built) => outcome.built.push(built),
            Err(err) if strict => {
                warn!(
                    "event=bulk_build module=definition status=error origin={} strict=true",
                    source.origin
                );
                return Err(err);
            }
            Err(err) => {
                let advisory = Advisory::SkippedDefinition {
                    origin: source.origin.clone(),
                    reason: err.to_string(),
                };
                warn!(
                    "event={} module=definition status=warn origin={}",
                    advisory.event(),
                    source.origin
                );
                ctx.extend_advisories([advisory]);
                outcome.skipped.push(SkippedDefinition {
                    origin: source.origin.clone(),
                    reason: err.to_string(),
                });
            }
        }
    }

    info!(
        "event=bulk_build module=definition status=ok built={} skipped={} artifacts={}",
        outcome.built.len(),
        outcome.skipped.len(),
        outcome.artifact_count()
    );
    Ok(outcome)
}

fn implement_one(
    engine: &DefinitionEngine,
    source: &DefinitionSource,
    sink: &mut dyn PipelineSink,
    ctx: &mut FinalizeContext,
) -> Result<BuiltDefinition, BulkError> {
    let value = source.decode()?;
    let item = engine
        .build(&value)
        .map_err(|err| BulkError::Definition {
            origin: source.origin.clone(),
            source: err,
        })?;
    ctx.extend_advisories(item.advisories());
    let artifacts = item.finalize(sink, ctx);
    Ok(BuiltDefinition {
        origin: source.origin.clone(),
        identity: item.identity().to_string(),
        display_name: item.display_name(),
        type_name: item.type_name().to_string(),
        artifacts,
    })
}
