//! Finalization context shared across one build.
//!
//! # Responsibility
//! - Remember which `(identity, destination)` pairs were already finalized.
//! - Check the destination's pack format against the supported one.
//! - Hand artifacts to the sink.
//!
//! # Invariants
//! - The registry is append-only.
//! - Duplicate finalization and pack format mismatch are advisories; the
//!   artifacts are written in both cases.

use crate::advisory::Advisory;
use crate::pipeline::artifact::Artifact;
use crate::pipeline::sink::PipelineSink;
use log::{debug, warn};
use std::collections::BTreeSet;

/// Pack format the generated content targets.
pub const SUPPORTED_PACK_FORMAT: u32 = 88;

/// Injectable duplicate-finalization registry plus collected advisories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeContext {
    expected_pack_format: u32,
    finalized: BTreeSet<(String, String)>,
    checked_packs: BTreeSet<String>,
    advisories: Vec<Advisory>,
}

impl Default for FinalizeContext {
    fn default() -> Self {
        Self::new(SUPPORTED_PACK_FORMAT)
    }
}

impl FinalizeContext {
    pub fn new(expected_pack_format: u32) -> Self {
        Self {
            expected_pack_format,
            finalized: BTreeSet::new(),
            checked_packs: BTreeSet::new(),
            advisories: Vec::new(),
        }
    }

    pub fn expected_pack_format(&self) -> u32 {
        self.expected_pack_format
    }

    pub fn advisories(&self) -> &[Advisory] {
        &self.advisories
    }

    /// Returns `true` if `(identity, destination)` was already finalized.
    pub fn was_finalized(&self, identity: &str, destination: &str) -> bool {
        self.finalized
            .contains(&(identity.to_string(), destination.to_string()))
    }

    /// Registers one finalization; raises an advisory for a repeated pair.
    ///
    /// Returns `false` when the pair was already registered.
    pub fn register(&mut self, identity: &str, destination: &str) -> bool {
        let inserted = self
            .finalized
            .insert((identity.to_string(), destination.to_string()));
        if !inserted {
            let advisory = Advisory::DuplicateFinalization {
                identity: identity.to_string(),
                destination: destination.to_string(),
            };
            warn!(
                "event={} module=pipeline status=warn identity={} destination={}",
                advisory.event(),
                identity,
                destination
            );
            self.advisories.push(advisory);
        }
        inserted
    }

    /// Checks the pack format of `sink` once per destination.
    pub fn check_pack_format(&mut self, sink: &dyn PipelineSink) {
        let destination = sink.pack_id().to_string();
        if !self.checked_packs.insert(destination.clone()) {
            return;
        }
        let actual = sink.pack_format();
        if actual == self.expected_pack_format {
            return;
        }
        let advisory = Advisory::PackFormatMismatch {
            destination: destination.clone(),
            expected: self.expected_pack_format,
            actual,
        };
        warn!(
            "event={} module=pipeline status=warn destination={} expected={} actual={}",
            advisory.event(),
            destination,
            self.expected_pack_format,
            actual
        );
        self.advisories.push(advisory);
    }

    /// Appends advisories raised elsewhere in the build.
    pub fn extend_advisories<I>(&mut self, advisories: I)
    where
        I: IntoIterator<Item = Advisory>,
    {
        self.advisories.extend(advisories);
    }
}

/// Registers `identity`, checks the pack format and writes every artifact.
///
/// Returns the number of artifacts written.
pub fn finalize_artifacts(
    identity: &str,
    artifacts: Vec<Artifact>,
    sink: &mut dyn PipelineSink,
    ctx: &mut FinalizeContext,
) -> usize {
    let destination = sink.pack_id().to_string();
    ctx.register(identity, &destination);
    ctx.check_pack_format(sink);

    let count = artifacts.len();
    for artifact in artifacts {
        sink.write(artifact);
    }
    debug!(
        "event=item_finalize module=pipeline status=ok identity={} destination={} artifacts={}",
        identity, destination, count
    );
    count
}
