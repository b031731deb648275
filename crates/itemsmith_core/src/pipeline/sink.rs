//! Pipeline sink contract and in-memory pack.

use crate::pipeline::artifact::{Artifact, ArtifactKind};
use serde_json::{json, Map, Value};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Receiver of finalized artifacts.
///
/// Implementations own merge-vs-replace policy for existing destinations.
pub trait PipelineSink {
    /// Stable identity of this destination, used for duplicate detection.
    fn pack_id(&self) -> &str;
    /// Pack format declared by the destination.
    fn pack_format(&self) -> u32;
    fn write(&mut self, artifact: Artifact);
}

/// In-memory pack that keeps artifacts grouped by kind.
///
/// Functions append to an existing destination, tags merge their `values`
/// without duplicates, everything else replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPack {
    name: String,
    pack_format: u32,
    files: BTreeMap<ArtifactKind, BTreeMap<String, Value>>,
}

impl MemoryPack {
    pub fn new(name: impl Into<String>, pack_format: u32) -> Self {
        Self {
            name: name.into(),
            pack_format,
            files: BTreeMap::new(),
        }
    }

    pub fn get(&self, kind: ArtifactKind, destination: &str) -> Option<&Value> {
        self.files.get(&kind)?.get(destination)
    }

    /// Destinations stored for one kind, sorted.
    pub fn destinations(&self, kind: ArtifactKind) -> Vec<&str> {
        self.files
            .get(&kind)
            .map(|files| files.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Total number of stored files.
    pub fn len(&self) -> usize {
        self.files.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// JSON view: `{ name, pack_format, files: { kind: { destination: content } } }`.
    pub fn to_json(&self) -> Value {
        let mut files = Map::new();
        for (kind, entries) in &self.files {
            let entries: Map<String, Value> = entries
                .iter()
                .map(|(destination, content)| (destination.clone(), content.clone()))
                .collect();
            files.insert(kind.as_str().to_string(), Value::Object(entries));
        }
        json!({
            "name": self.name,
            "pack_format": self.pack_format,
            "files": files,
        })
    }
}

impl PipelineSink for MemoryPack {
    fn pack_id(&self) -> &str {
        &self.name
    }

    fn pack_format(&self) -> u32 {
        self.pack_format
    }

    fn write(&mut self, artifact: Artifact) {
        let Artifact {
            kind,
            destination,
            content,
        } = artifact;
        match self.files.entry(kind).or_default().entry(destination) {
            Entry::Occupied(mut slot) if kind == ArtifactKind::Function => {
                append_lines(slot.get_mut(), content)
            }
            Entry::Occupied(mut slot) if kind.is_tag() => merge_tag_values(slot.get_mut(), content),
            Entry::Occupied(mut slot) => {
                slot.insert(content);
            }
            Entry::Vacant(slot) => {
                slot.insert(content);
            }
        }
    }
}

fn append_lines(existing: &mut Value, content: Value) {
    match (existing.as_array_mut(), content) {
        (Some(lines), Value::Array(more)) => lines.extend(more),
        (_, content) => *existing = content,
    }
}

fn merge_tag_values(existing: &mut Value, content: Value) {
    let incoming = content
        .get("values")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    match existing.get_mut("values").and_then(Value::as_array_mut) {
        Some(values) => {
            for value in incoming {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
        None => *existing = content,
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryPack, PipelineSink};
    use crate::pipeline::artifact::{Artifact, ArtifactKind};
    use serde_json::json;

    #[test]
    fn functions_append_at_same_destination() {
        let mut pack = MemoryPack::new("test", 88);
        pack.write(Artifact::function("custom:f", ["a"]));
        pack.write(Artifact::function("custom:f", ["b"]));
        assert_eq!(
            pack.get(ArtifactKind::Function, "custom:f"),
            Some(&json!(["a", "b"]))
        );
    }

    #[test]
    fn tags_merge_values_without_duplicates() {
        let mut pack = MemoryPack::new("test", 88);
        pack.write(Artifact::tag(ArtifactKind::ItemTag, "minecraft:swords", ["a", "b"]));
        pack.write(Artifact::tag(ArtifactKind::ItemTag, "minecraft:swords", ["b", "c"]));
        assert_eq!(
            pack.get(ArtifactKind::ItemTag, "minecraft:swords"),
            Some(&json!({"replace": false, "values": ["a", "b", "c"]}))
        );
    }

    #[test]
    fn other_kinds_replace() {
        let mut pack = MemoryPack::new("test", 88);
        pack.write(Artifact::new(ArtifactKind::LootTable, "custom:item/x", json!({"v": 1})));
        pack.write(Artifact::new(ArtifactKind::LootTable, "custom:item/x", json!({"v": 2})));
        assert_eq!(pack.len(), 1);
        assert_eq!(
            pack.get(ArtifactKind::LootTable, "custom:item/x"),
            Some(&json!({"v": 2}))
        );
    }

    #[test]
    fn json_view_groups_by_kind() {
        let mut pack = MemoryPack::new("test", 71);
        pack.write(Artifact::function("custom:f", ["a"]));
        let view = pack.to_json();
        assert_eq!(view["pack_format"], json!(71));
        assert_eq!(view["files"]["function"]["custom:f"], json!(["a"]));
        assert_eq!(pack.pack_id(), "test");
    }
}
