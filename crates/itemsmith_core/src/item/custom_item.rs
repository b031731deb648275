//! Single custom item.
//!
//! # Responsibility
//! - Seed the default component set for a new item.
//! - Implement the item operation catalog on top of the field store.
//! - Assemble the loot table, tag and operation artifacts on finalization.
//!
//! # Invariants
//! - Every operation decodes and validates all of its arguments before it
//!   touches the field store, so a failed operation leaves the item unchanged.
//! - `id` is always a validated, marker-free, path-free identifier.

use crate::components::component::Component;
use crate::components::store::{FieldStore, FieldValue, REMOVED};
use crate::identifier::{split_identifier, IdentifierValidator, ValidationError};
use crate::item::arguments::{ArgumentError, Arguments};
use crate::item::operation::{InvocationError, OperationLog, OperationSpec};
use crate::item::text::{first_line, normalize, plain_text};
use crate::item::vocabulary::{
    ConsumeAnimation, EquipmentSlot, ModifierOperation, ModifierSlot, Rarity,
};
use crate::item::{generated_identifier, ItemDefinition, TECHNICAL_NAMESPACE};
use crate::pipeline::artifact::{Artifact, ArtifactKind};
use serde_json::{json, Map, Value};
use uuid::Uuid;

pub const TYPE_NAME: &str = "CustomItem";
/// Constructor parameters, in declaration order.
pub const PARAMETERS: &[&str] = &["id", "name", "model", "texture"];
pub const DEFAULT_BASE_ITEM: &str = "minecraft:music_disc_11";
const ABILITY_BASE_ITEM: &str = "minecraft:goat_horn";

pub const OPERATIONS: &[OperationSpec] = &[
    OperationSpec::new("add_attribute_modifier"),
    OperationSpec::incompatible("consumable", &["right_click_ability"]),
    OperationSpec::new("damagable"),
    OperationSpec::new("damage_resistance"),
    OperationSpec::new("enchantable"),
    OperationSpec::new("equippable"),
    OperationSpec::new("lore"),
    OperationSpec::new("rarity"),
    OperationSpec::incompatible("right_click_ability", &["consumable"]),
    OperationSpec::new("trim"),
    OperationSpec::new("weapon"),
];

/// One entry of `minecraft:attribute_modifiers`.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModifier {
    pub id: String,
    pub attribute: String,
    pub slot: ModifierSlot,
    pub amount: f64,
    pub operation: ModifierOperation,
}

impl AttributeModifier {
    fn to_json(&self) -> Value {
        json!({
            "id": self.id,
            "amount": self.amount,
            "type": self.attribute,
            "operation": self.operation,
            "slot": self.slot,
        })
    }
}

/// A custom item layered on a vanilla base item.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomItem {
    id: String,
    base_item: String,
    components: FieldStore,
    required_tags: Vec<String>,
    artifacts: Vec<Artifact>,
    log: OperationLog,
}

impl CustomItem {
    /// Creates an item with the default component set.
    ///
    /// `name` is a text component; only its first line is used.
    pub fn new(
        id: &str,
        name: &Value,
        model: &str,
        texture: Option<&str>,
    ) -> Result<Self, InvocationError> {
        let id = IdentifierValidator::PLAIN.validate(id)?;
        let item_name = first_line("name", name)?;
        let model = IdentifierValidator::PLAIN.validate(model)?;

        let mut components = FieldStore::new();
        components.put(Component::CustomData, json!({ "id": id }));
        components.put(Component::ItemName, item_name);
        components.put(Component::ItemModel, Value::String(model));
        if let Some(texture) = texture {
            components.put(Component::Profile, player_head_profile(texture));
        }
        components.put(Component::Unbreakable, json!({}));
        components.put(Component::MaxStackSize, json!(64));
        components.set_component(Component::JukeboxPlayable, Some(REMOVED));

        Ok(Self {
            id,
            base_item: DEFAULT_BASE_ITEM.to_string(),
            components,
            required_tags: Vec::new(),
            artifacts: Vec::new(),
            log: OperationLog::new(),
        })
    }

    /// Keyword constructor used by the type registry.
    pub fn from_arguments(mut args: Arguments) -> Result<Self, InvocationError> {
        let id: String = args.required("id")?;
        let name: Value = args.required("name")?;
        let model: String = args.required("model")?;
        let texture: Option<String> = args.optional("texture")?;
        args.finish()?;
        Self::new(&id, &name, &model, texture.as_deref())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn namespace(&self) -> &str {
        split_identifier(&self.id).0
    }

    pub fn path(&self) -> &str {
        split_identifier(&self.id).1
    }

    /// Vanilla item the custom item is layered on.
    pub fn base_item(&self) -> &str {
        &self.base_item
    }

    pub fn set_base_item(&mut self, item: &str) -> Result<(), ValidationError> {
        self.base_item = IdentifierValidator::PLAIN.validate(item)?;
        Ok(())
    }

    pub fn components(&self) -> &FieldStore {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut FieldStore {
        &mut self.components
    }

    /// Item tags the base item must be part of.
    pub fn required_tags(&self) -> &[String] {
        &self.required_tags
    }

    /// Artifacts generated by operations, in generation order.
    pub fn operation_artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Loot table pool entry carrying the exported components.
    pub fn loot_table_entry(&self) -> Value {
        json!({
            "type": "minecraft:item",
            "name": self.base_item,
            "functions": [{
                "function": "minecraft:set_components",
                "components": self.components.export(),
            }],
        })
    }

    /// Value of `result` in a recipe definition.
    pub fn recipe_result(&self, amount: u32) -> Value {
        json!({
            "id": self.base_item,
            "components": self.components.export(),
            "count": amount,
        })
    }

    /// Primary artifact: a one-pool loot table at `<namespace>:item/<path>`.
    pub fn loot_table(&self) -> Artifact {
        Artifact::new(
            ArtifactKind::LootTable,
            format!("{}:item/{}", self.namespace(), self.path()),
            json!({
                "pools": [{
                    "rolls": 1,
                    "entries": [self.loot_table_entry()],
                }],
            }),
        )
    }

    /// Appends a modifier without going through the operation log.
    pub fn push_attribute_modifier(&mut self, modifier: &AttributeModifier) {
        let entry = modifier.to_json();
        match self
            .components
            .component_mut(Component::AttributeModifiers)
            .and_then(FieldValue::as_value_mut)
        {
            Some(Value::Array(modifiers)) => modifiers.push(entry),
            _ => self
                .components
                .put(Component::AttributeModifiers, Value::Array(vec![entry])),
        }
    }

    fn require_tag(&mut self, tag: String) {
        if !self.required_tags.contains(&tag) {
            self.required_tags.push(tag);
        }
    }

    fn ability_advancement(&self, ability: &str) -> Value {
        json!({
            "criteria": {
                "use_item": {
                    "trigger": "minecraft:using_item",
                    "conditions": {
                        "item": {
                            "predicates": {
                                "minecraft:custom_data": { "id": self.id },
                            },
                        },
                    },
                },
            },
            "rewards": { "function": ability },
        })
    }

    fn add_attribute_modifier(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let attribute: String = args.required("attribute")?;
        let slot: ModifierSlot = args.required("slot")?;
        let amount: f64 = args.required("value")?;
        let operation: ModifierOperation = args.required("operation")?;
        let id: Option<String> = args.optional("id")?;
        args.finish()?;

        let attribute = IdentifierValidator::PLAIN.validate(&attribute)?;
        let id = match id {
            Some(id) => IdentifierValidator::PLAIN_PATH.validate(&id)?,
            None => Uuid::new_v4().to_string(),
        };
        self.push_attribute_modifier(&AttributeModifier {
            id,
            attribute,
            slot,
            amount,
            operation,
        });
        Ok(())
    }

    fn consumable(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let time: f64 = args.required("time")?;
        let animation: ConsumeAnimation = args.required("animation")?;
        let nutrition: u32 = args.required("nutrition")?;
        let saturation: f64 = args.required("saturation")?;
        let consume_always: bool = args.required("consume_always")?;
        let particles: bool = args.required("particles")?;
        let effects: Vec<Value> = args.optional_or("effects", Vec::new())?;
        let sound: String =
            args.optional_or("sound", "minecraft:entity.generic.eat".to_string())?;
        let cooldown: Option<f64> = args.optional("cooldown")?;
        let cooldown_group: Option<String> = args.optional("cooldown_group")?;
        let function: Option<String> = args.optional("function")?;
        args.finish()?;

        let sound = IdentifierValidator::PLAIN.validate(&sound)?;
        let cooldown_group = cooldown_group
            .map(|group| IdentifierValidator::PLAIN_PATH.validate(&group))
            .transpose()?;
        let function = function
            .map(|function| IdentifierValidator::PLAIN_PATH.validate(&function))
            .transpose()?;

        self.components.put(
            Component::Consumable,
            json!({
                "consume_seconds": time,
                "animation": animation,
                "sound": sound,
                "has_consume_particles": particles,
                "on_consume_effects": effects,
            }),
        );
        self.components.put(
            Component::Food,
            json!({
                "nutrition": nutrition,
                "saturation": saturation,
                "can_always_eat": consume_always,
            }),
        );
        if let Some(seconds) = cooldown {
            self.components.put(
                Component::UseCooldown,
                use_cooldown(seconds, cooldown_group.as_deref()),
            );
        }
        if let Some(function) = function {
            let ability = generated_identifier(&self.id, "ability");
            let advancement = self.ability_advancement(&ability);
            self.artifacts
                .push(Artifact::new(ArtifactKind::Advancement, &ability, advancement));
            self.artifacts.push(Artifact::function(
                &ability,
                [
                    format!("function {function}"),
                    format!("advancement revoke @s only {ability}"),
                ],
            ));
        }
        Ok(())
    }

    fn damagable(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let durability: u32 = args.required("durability")?;
        let break_sound: String =
            args.optional_or("break_sound", "minecraft:entity.item.break".to_string())?;
        let repair_materials: Vec<String> = args.optional_or("repair_materials", Vec::new())?;
        let repair_cost: u32 = args.optional_or("additional_repair_cost", 0)?;
        args.finish()?;

        let break_sound = IdentifierValidator::PLAIN.validate(&break_sound)?;
        let repair_materials = repair_materials
            .iter()
            .map(|material| IdentifierValidator::TAG_LIKE.validate(material))
            .collect::<Result<Vec<_>, _>>()?;

        self.components
            .set_component(Component::Unbreakable, Some(REMOVED));
        self.components
            .put(Component::BreakSound, Value::String(break_sound));
        self.components.put(Component::Damage, json!(0));
        self.components.put(Component::MaxDamage, json!(durability));
        self.components
            .put(Component::Repairable, json!({ "items": repair_materials }));
        self.components.put(Component::RepairCost, json!(repair_cost));
        // Items without a weapon component do not lose durability on hit.
        if self.components.component(Component::Weapon).is_none() {
            self.components.put(Component::Weapon, json!({}));
        }
        self.components.put(Component::MaxStackSize, json!(1));
        Ok(())
    }

    fn damage_resistance(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let damage_types: Vec<String> = args.required("damage_types")?;
        args.finish()?;

        let damage_types = damage_types
            .iter()
            .map(|damage_type| IdentifierValidator::PLAIN_PATH.validate(damage_type))
            .collect::<Result<Vec<_>, _>>()?;
        let types = match damage_types.as_slice() {
            [] => {
                return Err(ArgumentError::invalid(
                    "damage_types",
                    "at least one damage type tag is required",
                )
                .into())
            }
            [single] => format!("#{single}"),
            many => {
                self.artifacts.push(Artifact::tag(
                    ArtifactKind::DamageTypeTag,
                    &self.id,
                    many.iter().map(|damage_type| format!("#{damage_type}")),
                ));
                format!("#{}", self.id)
            }
        };
        self.components
            .put(Component::DamageResistant, json!({ "types": types }));
        Ok(())
    }

    fn enchantable(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let enchantability: u32 = args.required("enchantability")?;
        let single: Option<String> = args.optional("enchantable_tag")?;
        let many: Option<Vec<String>> = args.optional("enchantable_tags")?;
        args.finish()?;

        let enchantable_tags = match (single, many) {
            (Some(tag), None) => vec![tag],
            (None, Some(tags)) => tags,
            (None, None) => {
                return Err(ArgumentError::Missing("enchantable_tag".to_string()).into())
            }
            (Some(_), Some(_)) => {
                return Err(ArgumentError::invalid(
                    "enchantable_tags",
                    "`enchantable_tag` is already given",
                )
                .into())
            }
        };

        let enchantable_tags = enchantable_tags
            .iter()
            .map(|tag| IdentifierValidator::PLAIN_PATH.validate(tag))
            .collect::<Result<Vec<_>, _>>()?;
        self.components
            .put(Component::Enchantable, json!({ "value": enchantability }));
        for tag in enchantable_tags {
            self.require_tag(tag);
        }
        Ok(())
    }

    fn equippable(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let slot: EquipmentSlot = args.required("slot")?;
        let asset: String = args.required("asset")?;
        let equip_sound: String = args.optional_or(
            "equip_sound",
            "minecraft:item.armor.equip_generic".to_string(),
        )?;
        let dispensable: bool = args.optional_or("dispensable", true)?;
        let swappable: bool = args.optional_or("swappable", true)?;
        let damage_on_hurt: bool = args.optional_or("damage_on_hurt", true)?;
        let equip_on_interaction: bool = args.optional_or("equip_on_interaction", false)?;
        let color: Option<u32> = args.optional("color")?;
        let glider: bool = args.optional_or("glider", false)?;
        args.finish()?;

        let asset = IdentifierValidator::PLAIN.validate(&asset)?;
        let equip_sound = IdentifierValidator::PLAIN.validate(&equip_sound)?;

        self.components.put(
            Component::Equippable,
            json!({
                "slot": slot,
                "equip_sound": equip_sound,
                "asset_id": asset,
                "allowed_entities": [],
                "dispensable": dispensable,
                "swappable": swappable,
                "damage_on_hurt": damage_on_hurt,
                "equip_on_interact": equip_on_interaction,
            }),
        );
        if glider {
            self.components.put(Component::Glider, json!({}));
        }
        if let Some(color) = color {
            self.components.put(Component::DyedColor, json!(color));
        }
        Ok(())
    }

    fn lore(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let text: Value = args.required("textcomponent")?;
        args.finish()?;

        let lines = normalize("textcomponent", &text)?;
        self.components.put(
            Component::Lore,
            Value::Array(lines.into_iter().map(Value::Array).collect()),
        );
        Ok(())
    }

    fn rarity(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let rarity: Rarity = args.required("rarity")?;
        args.finish()?;

        self.components.put(Component::Rarity, json!(rarity));
        Ok(())
    }

    fn right_click_ability(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let description: Value = args.required("description")?;
        let cooldown: f64 = args.required("cooldown")?;
        let function: String = args.required("function")?;
        // Absent shares the cooldown across this item type, null gives every
        // stack its own cooldown.
        let cooldown_group = match args.take_raw("cooldown_group") {
            None => Some(generated_identifier(&self.id, "cooldown")),
            Some(Value::Null) => None,
            Some(Value::String(group)) => Some(IdentifierValidator::PLAIN_PATH.validate(&group)?),
            Some(_) => {
                return Err(
                    ArgumentError::invalid("cooldown_group", "expected text or null").into(),
                )
            }
        };
        args.finish()?;

        let description = normalize("description", &description)?;
        let function = IdentifierValidator::PLAIN_PATH.validate(&function)?;
        let ability = generated_identifier(&self.id, "ability");

        self.base_item = ABILITY_BASE_ITEM.to_string();
        self.components.put(
            Component::UseCooldown,
            use_cooldown(cooldown, cooldown_group.as_deref()),
        );
        self.components.put(
            Component::UseEffects,
            json!({ "can_sprint": true, "speed_multiplier": 1.0 }),
        );
        self.components.put(
            Component::Instrument,
            json!({
                "range": 10,
                "description": description,
                "sound_event": "minecraft:intentionally_empty",
                "use_duration": 0.001,
            }),
        );

        let advancement = self.ability_advancement(&ability);
        self.artifacts
            .push(Artifact::new(ArtifactKind::Advancement, &ability, advancement));
        self.artifacts.push(Artifact::function(
            &ability,
            [
                format!(
                    "data modify storage {TECHNICAL_NAMESPACE}:temp HandItem set from entity @s Inventory[{{Slot:0b}}]"
                ),
                "item replace entity @s weapon.mainhand with air".to_string(),
                format!("function {function}"),
                format!("advancement revoke @s only {ability}"),
                format!(
                    "data modify entity @s Inventory[{{Slot:0b}}] set from storage {TECHNICAL_NAMESPACE}:temp HandItem"
                ),
            ],
        ));
        Ok(())
    }

    fn trim(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let pattern: String = args.required("pattern")?;
        let material: String = args.required("material")?;
        args.finish()?;

        let pattern = IdentifierValidator::PLAIN.validate(&pattern)?;
        let material = IdentifierValidator::PLAIN.validate(&material)?;
        self.components.put(
            Component::Trim,
            json!({ "pattern": pattern, "material": material }),
        );
        Ok(())
    }

    fn weapon(&mut self, mut args: Arguments) -> Result<(), InvocationError> {
        let attack_damage: f64 = args.required("attack_damage")?;
        let attack_speed: f64 = args.required("attack_speed")?;
        let can_sweep: bool = args.required("can_sweep")?;
        let disable_blocking: f64 = args.optional_or("disable_blocking", 0.0)?;
        let item_damage_per_attack: u32 = args.optional_or("item_damage_per_attack", 1)?;
        args.finish()?;

        // The player's base attack damage is 1 and base attack speed is 4.
        self.push_attribute_modifier(&AttributeModifier {
            id: "minecraft:base_attack_damage".to_string(),
            attribute: "minecraft:attack_damage".to_string(),
            slot: ModifierSlot::Mainhand,
            amount: attack_damage - 1.0,
            operation: ModifierOperation::AddValue,
        });
        self.push_attribute_modifier(&AttributeModifier {
            id: "minecraft:base_attack_speed".to_string(),
            attribute: "minecraft:attack_speed".to_string(),
            slot: ModifierSlot::Mainhand,
            amount: attack_speed - 4.0,
            operation: ModifierOperation::AddValue,
        });
        self.components.put(
            Component::Weapon,
            json!({
                "item_damage_per_attack": item_damage_per_attack,
                "disable_blocking_for_seconds": disable_blocking,
            }),
        );
        if can_sweep {
            self.components.put(
                Component::Tool,
                json!({ "rules": [], "can_destroy_blocks_in_creative": false }),
            );
            self.require_tag("minecraft:swords".to_string());
        }
        Ok(())
    }
}

impl ItemDefinition for CustomItem {
    fn identity(&self) -> &str {
        &self.id
    }

    fn display_name(&self) -> String {
        self.components
            .component_value(Component::ItemName)
            .and_then(|name| plain_text(name).ok())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| self.id.clone())
    }

    fn type_name(&self) -> &'static str {
        TYPE_NAME
    }

    fn operations(&self) -> &'static [OperationSpec] {
        OPERATIONS
    }

    fn invoke(&mut self, name: &str, args: Arguments) -> Result<(), InvocationError> {
        match name {
            "add_attribute_modifier" => self.add_attribute_modifier(args),
            "consumable" => self.consumable(args),
            "damagable" => self.damagable(args),
            "damage_resistance" => self.damage_resistance(args),
            "enchantable" => self.enchantable(args),
            "equippable" => self.equippable(args),
            "lore" => self.lore(args),
            "rarity" => self.rarity(args),
            "right_click_ability" => self.right_click_ability(args),
            "trim" => self.trim(args),
            "weapon" => self.weapon(args),
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
        vec![&self.components]
    }

    fn field_stores_mut(&mut self) -> Vec<&mut FieldStore> {
        vec![&mut self.components]
    }

    fn artifacts(&self) -> Vec<Artifact> {
        let mut artifacts = vec![self.loot_table()];
        artifacts.extend(self.required_tags.iter().map(|tag| {
            Artifact::tag(ArtifactKind::ItemTag, tag, [self.base_item.as_str()])
        }));
        artifacts.extend(self.artifacts.iter().cloned());
        artifacts
    }
}

pub(crate) fn player_head_profile(texture: &str) -> Value {
    json!({ "properties": [{ "name": "texture", "value": texture }] })
}

fn use_cooldown(seconds: f64, group: Option<&str>) -> Value {
    let mut cooldown = Map::new();
    cooldown.insert("seconds".to_string(), json!(seconds));
    if let Some(group) = group {
        cooldown.insert("cooldown_group".to_string(), json!(group));
    }
    Value::Object(cooldown)
}
