//! Four-piece armor set sharing one naming scheme.
//!
//! # Responsibility
//! - Build helmet, chestplate, leggings and boots from id/name templates.
//! - Fan group operations out to the members, splitting per-slot values.
//!
//! # Invariants
//! - There are always exactly four members, in head/chest/legs/feet order.
//! - The group identity is a valid identifier derived from `id_format`.
//! - A group operation is recorded in the group log; each member records the
//!   member operations it ran.

use crate::advisory::Advisory;
use crate::components::component::Component;
use crate::components::store::{FieldStore, FieldValue};
use crate::identifier::{split_identifier, IdentifierValidator, ValidationError};
use crate::item::arguments::{ArgumentError, Arguments};
use crate::item::custom_item::{player_head_profile, CustomItem};
use crate::item::operation::{InvocationError, OperationLog, OperationSpec};
use crate::item::vocabulary::EquipmentSlot;
use crate::item::ItemDefinition;
use crate::pipeline::artifact::Artifact;
use crate::pipeline::context::FinalizeContext;
use crate::pipeline::sink::PipelineSink;
use serde::Deserialize;
use serde_json::{json, Value};

pub const TYPE_NAME: &str = "ArmorSet";
/// Constructor parameters, in declaration order.
pub const PARAMETERS: &[&str] = &["id_format", "name_format", "nouns", "trimable"];
/// Placeholder replaced by each member's noun in the id and name templates.
pub const NOUN_PLACEHOLDER: &str = "{noun}";

pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new("damagable"),
    OperationSpec::new("enchantable"),
    OperationSpec::new("material"),
    OperationSpec::new("protection"),
];

const DEFAULT_NOUNS: [&str; 4] = ["Helmet", "Chestplate", "Leggings", "Boots"];
const CHAINMAIL_PIECES: [&str; 4] = [
    "minecraft:chainmail_helmet",
    "minecraft:chainmail_chestplate",
    "minecraft:chainmail_leggings",
    "minecraft:chainmail_boots",
];
const CHAINMAIL_ASSET: &str = "minecraft:chainmail";
// Vanilla durability of each piece relative to the chestplate.
const DURABILITY_FACTORS: [f64; 4] = [0.6875, 1.0, 0.9375, 0.8152];

/// One value for every slot, or one value per slot.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PerSlot<T> {
    Each([T; 4]),
    All(T),
}

/// Splits a chestplate durability across all four pieces.
pub fn armor_durability(chestplate: u32) -> [u32; 4] {
    DURABILITY_FACTORS.map(|factor| (f64::from(chestplate) * factor).round() as u32)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArmorSet {
    identity: String,
    members: Vec<CustomItem>,
    log: OperationLog,
}

impl ArmorSet {
    /// Creates the four members, each equippable in its slot.
    ///
    /// With `trimmable`, members are layered on the chainmail pieces so the
    /// game accepts armor trims on them.
    pub fn new(
        id_format: &str,
        name_format: &str,
        nouns: [&str; 4],
        trimmable: bool,
    ) -> Result<Self, InvocationError> {
        let identity = group_identity(id_format)?;
        let mut members = Vec::with_capacity(4);
        for (index, noun) in nouns.iter().enumerate() {
            let id = id_format.replace(NOUN_PLACEHOLDER, noun).to_lowercase();
            let name = Value::String(name_format.replace(NOUN_PLACEHOLDER, noun));
            let mut member = CustomItem::new(&id, &name, CHAINMAIL_PIECES[index], None)?;
            member.apply_operation(
                "equippable",
                Arguments::empty()
                    .with("slot", json!(EquipmentSlot::ARMOR[index]))
                    .with("asset", json!(CHAINMAIL_ASSET)),
            )?;
            if trimmable {
                member.set_base_item(CHAINMAIL_PIECES[index])?;
            }
            members.push(member);
        }
        Ok(Self {
            identity,
            members,
            log: OperationLog::new(),
        })
    }

    /// Keyword constructor used by the type registry.
    pub fn from_arguments(mut args: Arguments) -> Result<Self, InvocationError> {
        let id_format: String = args.required("id_format")?;
        let name_format: String = args.required("name_format")?;
        let nouns: Option<[String; 4]> = args.optional("nouns")?;
        let trimmable: bool = args.either("trimable", "trimmable")?.unwrap_or(false);
        args.finish()?;

        match &nouns {
            Some(nouns) => Self::new(
                &id_format,
                &name_format,
                [
                    nouns[0].as_str(),
                    nouns[1].as_str(),
                    nouns[2].as_str(),
                    nouns[3].as_str(),
                ],
                trimmable,
            ),
            None => Self::new(&id_format, &name_format, DEFAULT_NOUNS, trimmable),
        }
    }

    pub fn members(&self) -> &[CustomItem] {
        &self.members
    }

    pub fn helmet(&self) -> &CustomItem {
        &self.members[0]
    }

    pub fn chestplate(&self) -> &CustomItem {
        &self.members[1]
    }

    pub fn leggings(&self) -> &CustomItem {
        &self.members[2]
    }

    pub fn boots(&self) -> &CustomItem {
        &self.members[3]
    }

    fn fan_out(&mut self, operation: &str, args: &Arguments) -> Result<(), InvocationError> {
        for member in &mut self.members {
            member.apply_operation(operation, args.clone())?;
        }
        Ok(())
    }

    fn damagable(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let durability: PerSlot<u32> = args.required("durability")?;
        let durability = match durability {
            PerSlot::Each(values) => values,
            PerSlot::All(chestplate) => armor_durability(chestplate),
        };
        for (member, durability) in self.members.iter_mut().zip(durability) {
            member.apply_operation(
                "damagable",
                args.clone().with("durability", json!(durability)),
            )?;
        }
        Ok(())
    }

    fn material(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let model_asset: String = args.required("model_asset")?;
        let trim_pattern: Option<String> = args.optional("trim_pattern")?;
        let trim_material: Option<String> = args.optional("trim_material")?;
        let color: Option<u32> = args.optional("color")?;
        let helmet_texture: Option<String> = args.optional("helmet_texture")?;
        let equip_sound: String = args.optional_or(
            "equip_sound",
            "minecraft:item.armor.equip_generic".to_string(),
        )?;
        args.finish()?;

        let model_asset = IdentifierValidator::PLAIN.validate(&model_asset)?;
        let equip_sound = IdentifierValidator::PLAIN.validate(&equip_sound)?;
        let trim = match (trim_pattern, trim_material) {
            (Some(pattern), Some(material)) => Some((
                IdentifierValidator::PLAIN.validate(&pattern)?,
                IdentifierValidator::PLAIN.validate(&material)?,
            )),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ArgumentError::invalid(
                    "trim_material",
                    "required together with trim_pattern",
                )
                .into())
            }
            (None, Some(_)) => {
                return Err(ArgumentError::invalid(
                    "trim_pattern",
                    "required together with trim_material",
                )
                .into())
            }
        };

        for member in &mut self.members {
            if let Some(equippable) = member
                .components_mut()
                .component_mut(Component::Equippable)
                .and_then(FieldValue::as_value_mut)
                .and_then(Value::as_object_mut)
            {
                equippable.insert("asset_id".to_string(), json!(model_asset));
                equippable.insert("equip_sound".to_string(), json!(equip_sound));
            }
            if let Some((pattern, material)) = &trim {
                member.apply_operation(
                    "trim",
                    Arguments::empty()
                        .with("pattern", json!(pattern))
                        .with("material", json!(material)),
                )?;
            }
            if let Some(color) = color {
                member.components_mut().put(Component::DyedColor, json!(color));
            }
        }

        if let Some(texture) = helmet_texture {
            let helmet = self.members[0].components_mut();
            helmet.put(Component::Profile, player_head_profile(&texture));
            helmet.put(Component::ItemModel, json!("minecraft:player_head"));
        }
        Ok(())
    }

    fn protection(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let armor: [f64; 4] = args.required("armor")?;
        let toughness: Option<[f64; 4]> = args.optional("toughness")?;
        args.finish()?;

        for (index, member) in self.members.iter_mut().enumerate() {
            let slot = EquipmentSlot::ARMOR[index];
            member.apply_operation(
                "add_attribute_modifier",
                armor_modifier("minecraft:armor", slot, armor[index]),
            )?;
            if let Some(toughness) = toughness {
                member.apply_operation(
                    "add_attribute_modifier",
                    armor_modifier("minecraft:armor_toughness", slot, toughness[index]),
                )?;
            }
        }
        Ok(())
    }
}

/// Group identifier: `id_format` without the noun placeholder.
///
/// `custom:ruby_{noun}` becomes `custom:ruby`; a template that is only the
/// placeholder falls back to `<namespace>:armor_set`.
fn group_identity(id_format: &str) -> Result<String, ValidationError> {
    let stripped = id_format.replace(NOUN_PLACEHOLDER, "").to_lowercase();
    let (namespace, path) = split_identifier(&stripped);
    let path = path.trim_matches(|c| matches!(c, '_' | '-' | '.' | '/'));
    let path = if path.is_empty() { "armor_set" } else { path };
    IdentifierValidator::PLAIN_PATH.validate(&format!("{namespace}:{path}"))
}

fn armor_modifier(attribute: &str, slot: EquipmentSlot, value: f64) -> Arguments {
    Arguments::empty()
        .with("attribute", json!(attribute))
        .with("slot", json!(slot))
        .with("value", json!(value))
        .with("operation", json!("add_value"))
}

impl ItemDefinition for ArmorSet {
    fn identity(&self) -> &str {
        &self.identity
    }

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn display_name(&self) -> String {
        let pieces: Vec<String> = self.members.iter().map(CustomItem::display_name).collect();
        pieces.join(", ")
    }

    fn operations(&self) -> &'static [OperationSpec] {
        OPERATIONS
    }

    fn invoke(&mut self, name: &str, args: Arguments) -> Result<(), InvocationError> {
        match name {
            "damagable" => self.damagable(args),
            "enchantable" => self.fan_out("enchantable", &args),
            "material" => self.material(args),
            "protection" => self.protection(args),
            _ => Err(InvocationError::UnknownOperation(name.to_string())),
        }
    }

    fn operation_log(&self) -> &OperationLog {
        &self.log
    }

    fn operation_log_mut(&mut self) -> &mut OperationLog {
        &mut self.log
    }

    fn field_stores(&self) -> Vec<&FieldStore> {
        self.members.iter().map(CustomItem::components).collect()
    }

    fn field_stores_mut(&mut self) -> Vec<&mut FieldStore> {
        self.members
            .iter_mut()
            .map(CustomItem::components_mut)
            .collect()
    }

    fn advisories(&self) -> Vec<Advisory> {
        let mut advisories = self.log.advisories().to_vec();
        for member in &self.members {
            advisories.extend(member.advisories());
        }
        advisories
    }

    fn artifacts(&self) -> Vec<Artifact> {
        self.members
            .iter()
            .flat_map(ItemDefinition::artifacts)
            .collect()
    }

    /// Finalizes every member under its own identity.
    fn finalize(&self, sink: &mut dyn PipelineSink, ctx: &mut FinalizeContext) -> usize {
        self.members
            .iter()
            .map(|member| member.finalize(sink, ctx))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::{armor_durability, ArmorSet, DEFAULT_NOUNS};
    use crate::components::component::Component;
    use crate::item::arguments::{ArgumentError, Arguments};
    use crate::item::operation::InvocationError;
    use crate::item::ItemDefinition;
    use crate::pipeline::artifact::ArtifactKind;
    use crate::pipeline::context::FinalizeContext;
    use crate::pipeline::sink::MemoryPack;
    use serde_json::{json, Value};

    fn set() -> ArmorSet {
        ArmorSet::new("custom:ruby_{noun}", "Ruby {noun}", DEFAULT_NOUNS, false)
            .expect("valid armor set")
    }

    fn args(value: Value) -> Arguments {
        match value {
            Value::Object(map) => Arguments::new(map),
            _ => panic!("test arguments must be a map"),
        }
    }

    #[test]
    fn members_follow_templates_and_slots() {
        let set = set();
        let ids: Vec<&str> = set.members().iter().map(|member| member.id()).collect();
        assert_eq!(
            ids,
            [
                "custom:ruby_helmet",
                "custom:ruby_chestplate",
                "custom:ruby_leggings",
                "custom:ruby_boots"
            ]
        );
        assert_eq!(
            set.boots().components().component_value(Component::Equippable).map(|e| &e["slot"]),
            Some(&json!("feet"))
        );
        assert_eq!(
            set.helmet().components().component_value(Component::ItemName),
            Some(&json!([{"text": "Ruby Helmet"}]))
        );
        assert_eq!(set.helmet().base_item(), "minecraft:music_disc_11");
    }

    #[test]
    fn identity_is_the_template_without_placeholder() {
        assert_eq!(set().identity(), "custom:ruby");
        let bare = ArmorSet::new("{noun}", "{noun}", DEFAULT_NOUNS, false).expect("bare template");
        assert_eq!(bare.identity(), "minecraft:armor_set");
        assert_eq!(bare.boots().id(), "minecraft:boots");
    }

    #[test]
    fn display_name_lists_members() {
        assert_eq!(
            set().display_name(),
            "Ruby Helmet, Ruby Chestplate, Ruby Leggings, Ruby Boots"
        );
    }

    #[test]
    fn constructor_accepts_either_trim_spelling_but_not_both() {
        let set = ArmorSet::from_arguments(args(json!({
            "id_format": "custom:ruby_{noun}",
            "name_format": "Ruby {noun}",
            "trimable": true,
        })))
        .expect("trimable");
        assert_eq!(set.helmet().base_item(), "minecraft:chainmail_helmet");

        let set = ArmorSet::from_arguments(args(json!({
            "id_format": "custom:ruby_{noun}",
            "name_format": "Ruby {noun}",
            "trimmable": true,
        })))
        .expect("trimmable");
        assert_eq!(set.boots().base_item(), "minecraft:chainmail_boots");

        let err = ArmorSet::from_arguments(args(json!({
            "id_format": "custom:ruby_{noun}",
            "name_format": "Ruby {noun}",
            "trimable": true,
            "trimmable": false,
        })))
        .expect_err("both spellings");
        assert!(matches!(
            err,
            InvocationError::Argument(ArgumentError::InvalidValue { ref parameter, .. })
                if parameter == "trimmable"
        ));
    }

    #[test]
    fn trimmable_members_use_chainmail_base_items() {
        let set = ArmorSet::new("custom:ruby_{noun}", "Ruby {noun}", DEFAULT_NOUNS, true)
            .expect("valid armor set");
        assert_eq!(set.leggings().base_item(), "minecraft:chainmail_leggings");
    }

    #[test]
    fn durability_is_split_by_vanilla_ratios() {
        assert_eq!(armor_durability(528), [363, 528, 495, 430]);

        let mut set = set();
        set.apply_operation("damagable", args(json!({"durability": 528})))
            .expect("damagable");
        assert_eq!(
            set.helmet().components().component_value(Component::MaxDamage),
            Some(&json!(363))
        );
        assert_eq!(set.operation_log().applied(), ["damagable"]);
        assert_eq!(set.chestplate().operation_log().applied(), ["equippable", "damagable"]);
    }

    #[test]
    fn explicit_per_slot_durability_is_used_verbatim() {
        let mut set = set();
        set.apply_operation("damagable", args(json!({"durability": [1, 2, 3, 4]})))
            .expect("damagable");
        assert_eq!(
            set.boots().components().component_value(Component::MaxDamage),
            Some(&json!(4))
        );
    }

    #[test]
    fn protection_adds_one_modifier_per_value() {
        let mut set = set();
        set.apply_operation(
            "protection",
            args(json!({"armor": [3, 8, 6, 3], "toughness": [2, 2, 2, 2]})),
        )
        .expect("protection");
        let modifiers = set
            .chestplate()
            .components()
            .component_value(Component::AttributeModifiers)
            .and_then(Value::as_array)
            .expect("modifiers");
        assert_eq!(modifiers.len(), 2);
        assert_eq!(modifiers[0]["amount"], json!(8.0));
        assert_eq!(modifiers[0]["slot"], json!("chest"));
        assert_eq!(modifiers[1]["type"], json!("minecraft:armor_toughness"));
    }

    #[test]
    fn material_updates_every_member() {
        let mut set = set();
        set.apply_operation(
            "material",
            args(json!({
                "model_asset": "custom:ruby",
                "trim_pattern": "coast",
                "trim_material": "redstone",
                "helmet_texture": "abc",
            })),
        )
        .expect("material");
        for member in set.members() {
            let equippable = member
                .components()
                .component_value(Component::Equippable)
                .expect("equippable");
            assert_eq!(equippable["asset_id"], json!("custom:ruby"));
            assert!(member.components().component(Component::Trim).is_some());
        }
        assert_eq!(
            set.helmet().components().component_value(Component::ItemModel),
            Some(&json!("minecraft:player_head"))
        );
    }

    #[test]
    fn half_a_trim_is_rejected() {
        let mut set = set();
        let err = set
            .apply_operation(
                "material",
                args(json!({"model_asset": "custom:ruby", "trim_pattern": "coast"})),
            )
            .expect_err("trim needs both parts");
        assert!(matches!(err, InvocationError::Argument(ref inner) if inner.parameter() == "trim_material"));
    }

    #[test]
    fn finalize_writes_every_member() {
        let mut set = set();
        set.apply_operation(
            "enchantable",
            args(json!({"enchantability": 9, "enchantable_tags": ["enchantable/armor"]})),
        )
        .expect("enchantable");

        let mut ctx = FinalizeContext::default();
        let mut pack = MemoryPack::new("pack", ctx.expected_pack_format());
        assert_eq!(set.finalize(&mut pack, &mut ctx), 8);
        assert_eq!(pack.destinations(ArtifactKind::LootTable).len(), 4);
        assert_eq!(
            pack.get(ArtifactKind::ItemTag, "minecraft:enchantable/armor"),
            Some(&json!({"replace": false, "values": ["minecraft:music_disc_11"]}))
        );
        assert!(ctx.advisories().is_empty());
    }

    #[test]
    fn wrong_noun_count_is_invalid() {
        let err = ArmorSet::from_arguments(args(json!({
            "id_format": "custom:x_{noun}",
            "name_format": "X",
            "nouns": ["A", "B"],
        })))
        .expect_err("four nouns are required");
        assert!(matches!(err, InvocationError::Argument(ref inner) if inner.parameter() == "nouns"));
    }
}
