//! Generated artifact shapes.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Registry an artifact belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    LootTable,
    Advancement,
    Function,
    ItemTag,
    DamageTypeTag,
}

impl ArtifactKind {
    /// Registry directory name inside a pack.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LootTable => "loot_table",
            Self::Advancement => "advancement",
            Self::Function => "function",
            Self::ItemTag => "tags/item",
            Self::DamageTypeTag => "tags/damage_type",
        }
    }

    pub fn is_tag(self) -> bool {
        matches!(self, Self::ItemTag | Self::DamageTypeTag)
    }
}

/// One `(destination, content)` pair for the pipeline.
///
/// Function content is a list of command lines; everything else is the
/// JSON document of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub destination: String,
    pub content: Value,
}

impl Artifact {
    pub fn new(kind: ArtifactKind, destination: impl Into<String>, content: Value) -> Self {
        Self {
            kind,
            destination: destination.into(),
            content,
        }
    }

    /// Function artifact from command lines.
    pub fn function<I, S>(destination: impl Into<String>, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<Value> = lines
            .into_iter()
            .map(|line| Value::String(line.into()))
            .collect();
        Self::new(ArtifactKind::Function, destination, Value::Array(lines))
    }

    /// Non-replacing tag artifact listing `values`.
    pub fn tag<I, S>(kind: ArtifactKind, destination: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<Value> = values
            .into_iter()
            .map(|value| Value::String(value.into()))
            .collect();
        Self::new(
            kind,
            destination,
            json!({ "replace": false, "values": values }),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{Artifact, ArtifactKind};
    use serde_json::json;

    #[test]
    fn builds_tag_and_function_content() {
        let tag = Artifact::tag(ArtifactKind::ItemTag, "minecraft:swords", ["minecraft:stick"]);
        assert_eq!(
            tag.content,
            json!({"replace": false, "values": ["minecraft:stick"]})
        );

        let function = Artifact::function("custom:run", ["say hi", "say bye"]);
        assert_eq!(function.kind, ArtifactKind::Function);
        assert_eq!(function.content, json!(["say hi", "say bye"]));
    }

    #[test]
    fn tag_kinds_are_flagged() {
        assert!(ArtifactKind::DamageTypeTag.is_tag());
        assert!(!ArtifactKind::Advancement.is_tag());
        assert_eq!(ArtifactKind::ItemTag.as_str(), "tags/item");
    }
}
