//! Closed argument vocabularies decoded straight from definition values.

use serde::{Deserialize, Serialize};

/// Slot group an attribute modifier is active in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierSlot {
    Any,
    Hand,
    Armor,
    Mainhand,
    Offhand,
    Head,
    Chest,
    Legs,
    Feet,
    Body,
}

/// How an attribute modifier amount is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierOperation {
    AddValue,
    AddMultipliedBase,
    AddMultipliedTotal,
}

/// Animation played while consuming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsumeAnimation {
    None,
    Eat,
    Drink,
    Block,
    Bow,
    Spear,
    Crossbow,
    Spyglass,
    TootHorn,
    Brush,
}

/// Slot an equippable item goes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    Head,
    Chest,
    Legs,
    Feet,
    Body,
}

impl EquipmentSlot {
    /// Armor slots in group order.
    pub const ARMOR: [EquipmentSlot; 4] = [Self::Head, Self::Chest, Self::Legs, Self::Feet];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Head => "head",
            Self::Chest => "chest",
            Self::Legs => "legs",
            Self::Feet => "feet",
            Self::Body => "body",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

#[cfg(test)]
mod tests {
    use super::{ConsumeAnimation, EquipmentSlot, ModifierOperation, Rarity};
    use serde_json::json;

    #[test]
    fn decodes_snake_case_names() {
        let animation: ConsumeAnimation =
            serde_json::from_value(json!("toot_horn")).expect("animation");
        assert_eq!(animation, ConsumeAnimation::TootHorn);
        let operation: ModifierOperation =
            serde_json::from_value(json!("add_multiplied_base")).expect("operation");
        assert_eq!(operation, ModifierOperation::AddMultipliedBase);
        assert_eq!(json!(Rarity::Epic), json!("epic"));
    }

    #[test]
    fn rejects_unknown_rarity() {
        assert!(serde_json::from_value::<Rarity>(json!("legendary")).is_err());
        assert_eq!(EquipmentSlot::ARMOR[2].as_str(), "legs");
    }
}
