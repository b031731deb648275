//! Catalog of well-known item components.

use crate::identifier::DEFAULT_NAMESPACE;

/// Well-known vanilla item component.
///
/// Declaration order is the export order of well-known fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Component {
    AttributeModifiers,
    BlockAttacks,
    BreakSound,
    Consumable,
    CustomData,
    Damage,
    DamageResistant,
    DeathProtection,
    DyedColor,
    Enchantable,
    EnchantmentGlintOverride,
    Enchantments,
    Equippable,
    Food,
    Glider,
    Instrument,
    ItemModel,
    ItemName,
    JukeboxPlayable,
    Lore,
    MaxDamage,
    MaxStackSize,
    PotionContents,
    Profile,
    Rarity,
    RepairCost,
    Repairable,
    Tool,
    TooltipDisplay,
    Trim,
    Unbreakable,
    UseCooldown,
    UseEffects,
    UseRemainder,
    Weapon,
}

impl Component {
    pub const COUNT: usize = 35;

    pub const ALL: [Component; Component::COUNT] = [
        Self::AttributeModifiers,
        Self::BlockAttacks,
        Self::BreakSound,
        Self::Consumable,
        Self::CustomData,
        Self::Damage,
        Self::DamageResistant,
        Self::DeathProtection,
        Self::DyedColor,
        Self::Enchantable,
        Self::EnchantmentGlintOverride,
        Self::Enchantments,
        Self::Equippable,
        Self::Food,
        Self::Glider,
        Self::Instrument,
        Self::ItemModel,
        Self::ItemName,
        Self::JukeboxPlayable,
        Self::Lore,
        Self::MaxDamage,
        Self::MaxStackSize,
        Self::PotionContents,
        Self::Profile,
        Self::Rarity,
        Self::RepairCost,
        Self::Repairable,
        Self::Tool,
        Self::TooltipDisplay,
        Self::Trim,
        Self::Unbreakable,
        Self::UseCooldown,
        Self::UseEffects,
        Self::UseRemainder,
        Self::Weapon,
    ];

    /// Unqualified component name, e.g. `max_stack_size`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AttributeModifiers => "attribute_modifiers",
            Self::BlockAttacks => "block_attacks",
            Self::BreakSound => "break_sound",
            Self::Consumable => "consumable",
            Self::CustomData => "custom_data",
            Self::Damage => "damage",
            Self::DamageResistant => "damage_resistant",
            Self::DeathProtection => "death_protection",
            Self::DyedColor => "dyed_color",
            Self::Enchantable => "enchantable",
            Self::EnchantmentGlintOverride => "enchantment_glint_override",
            Self::Enchantments => "enchantments",
            Self::Equippable => "equippable",
            Self::Food => "food",
            Self::Glider => "glider",
            Self::Instrument => "instrument",
            Self::ItemModel => "item_model",
            Self::ItemName => "item_name",
            Self::JukeboxPlayable => "jukebox_playable",
            Self::Lore => "lore",
            Self::MaxDamage => "max_damage",
            Self::MaxStackSize => "max_stack_size",
            Self::PotionContents => "potion_contents",
            Self::Profile => "profile",
            Self::Rarity => "rarity",
            Self::RepairCost => "repair_cost",
            Self::Repairable => "repairable",
            Self::Tool => "tool",
            Self::TooltipDisplay => "tooltip_display",
            Self::Trim => "trim",
            Self::Unbreakable => "unbreakable",
            Self::UseCooldown => "use_cooldown",
            Self::UseEffects => "use_effects",
            Self::UseRemainder => "use_remainder",
            Self::Weapon => "weapon",
        }
    }

    /// Namespaced export key, e.g. `minecraft:max_stack_size`.
    pub fn key(self) -> String {
        format!("{DEFAULT_NAMESPACE}:{}", self.as_str())
    }

    /// Parses an unqualified component name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|component| component.as_str() == name)
    }

    /// Resolves a validated `namespace:path` key to a well-known component.
    pub fn from_key(key: &str) -> Option<Self> {
        let (namespace, path) = key.split_once(':')?;
        if namespace != DEFAULT_NAMESPACE {
            return None;
        }
        Self::from_name(path)
    }

    pub(crate) fn index(self) -> usize {
        self as usize
    }
}
