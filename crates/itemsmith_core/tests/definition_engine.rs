use itemsmith_core::{
    Advisory, DefinitionEngine, DefinitionError, DefinitionStage, ItemDefinition,
};
use serde_json::{json, Value};

fn hunter_sword() -> Value {
    json!({
        "type": "CustomItem",
        "id": "lategame:hunter_sword",
        "name": "Hunter Sword",
        "model": "lategame:hunter_sword",
    })
}

fn build(record: &Value) -> Result<Box<dyn ItemDefinition>, DefinitionError> {
    DefinitionEngine::default().build(record)
}

#[test]
fn operations_run_in_listed_order_and_later_writes_win() {
    let mut record = hunter_sword();
    record["behavior"] = json!([
        {"lore": {"textcomponent": "First"}},
        {"rarity": {"rarity": "rare"}},
        {"lore": {"textcomponent": "Second"}},
    ]);

    let item = build(&record).expect("build");
    assert_eq!(item.operation_log().applied(), ["lore", "rarity", "lore"]);
    let exported = item.field_stores()[0].export();
    assert_eq!(exported["minecraft:lore"], json!([[{"text": "Second"}]]));
}

#[test]
fn overrides_apply_after_operations() {
    let mut record = hunter_sword();
    record["behavior"] = json!([{"rarity": {"rarity": "rare"}}]);
    record["components"] = json!({"rarity": "epic"});

    let item = build(&record).expect("build");
    assert_eq!(
        item.field_stores()[0].export()["minecraft:rarity"],
        json!("epic")
    );
}

#[test]
fn unknown_operation_is_named() {
    let mut record = hunter_sword();
    record["behavior"] = json!([{"nonexistent_op": {}}]);

    let err = build(&record).expect_err("unknown operation");
    assert_eq!(
        err,
        DefinitionError::UnknownOperation {
            type_name: "CustomItem".to_string(),
            operation: "nonexistent_op".to_string(),
        }
    );
    assert_eq!(err.stage(), DefinitionStage::ApplyOperations);
}

#[test]
fn missing_constructor_parameter_is_named() {
    let record = json!({
        "type": "CustomItem",
        "id": "lategame:hunter_sword",
        "model": "lategame:hunter_sword",
    });

    let err = build(&record).expect_err("missing name");
    assert_eq!(
        err,
        DefinitionError::MissingParameter {
            type_name: "CustomItem".to_string(),
            parameter: "name".to_string(),
        }
    );
    assert!(err.to_string().contains("name"));
}

#[test]
fn list_field_cannot_be_overridden_by_map() {
    let mut record = hunter_sword();
    record["behavior"] = json!([{"lore": {"textcomponent": "Old"}}]);
    record["components"] = json!({"lore": {"text": "New"}});

    let err = build(&record).expect_err("incompatible override");
    assert!(matches!(
        err,
        DefinitionError::IncompatibleOverride { ref field, current: "list", replacement: "map" }
            if field == "minecraft:lore"
    ));
    assert_eq!(err.stage(), DefinitionStage::ApplyOverrides);
}

#[test]
fn map_override_merges_one_level_deep() {
    let mut record = hunter_sword();
    record["components"] = json!({"custom_data": {"level": 3}});

    let item = build(&record).expect("build");
    assert_eq!(
        item.field_stores()[0].export()["minecraft:custom_data"],
        json!({"id": "lategame:hunter_sword", "level": 3})
    );
}

#[test]
fn legacy_params_and_aliases_are_accepted() {
    let record = json!({
        "type": "CustomItem",
        "params": {"id": "lategame:old_sword", "name": "Old Sword", "model": "lategame:old"},
        "id": "lategame:new_sword",
        "operations": [{"rarity": {"rarity": "uncommon"}}],
        "overrides": {"max_stack_size": null},
    });

    let err = build(&record).expect_err("null over number");
    assert!(matches!(err, DefinitionError::IncompatibleOverride { .. }));

    let mut record = record;
    record["overrides"] = json!({});
    let item = build(&record).expect("build");
    assert_eq!(item.identity(), "lategame:new_sword");
    assert_eq!(item.operation_log().applied(), ["rarity"]);
}

#[test]
fn incompatible_operations_raise_advisory_not_failure() {
    let mut record = hunter_sword();
    record["behavior"] = json!([
        {"right_click_ability": {
            "description": "Dash forward",
            "cooldown": 2.5,
            "function": "lategame:dash",
        }},
        {"consumable": {
            "time": 1.6,
            "animation": "eat",
            "nutrition": 4,
            "saturation": 2.4,
            "consume_always": false,
            "particles": true,
        }},
    ]);

    let item = build(&record).expect("build");
    assert_eq!(
        item.advisories(),
        [Advisory::IncompatibleOperations {
            identity: "lategame:hunter_sword".to_string(),
            operation: "consumable".to_string(),
            conflicting: "right_click_ability".to_string(),
        }]
    );
}

#[test]
fn armor_set_group_operations_fan_out() {
    let record = json!({
        "type": "ArmorSet",
        "id_format": "lategame:ruby_{noun}",
        "name_format": "Ruby {noun}",
        "behavior": [
            {"damagable": {"durability": 400}},
            {"protection": {"armor": [3, 8, 6, 3], "toughness": [2, 2, 2, 2]}},
        ],
    });

    let set = build(&record).expect("build");
    assert_eq!(set.type_name(), "ArmorSet");
    assert_eq!(set.operation_log().applied(), ["damagable", "protection"]);
    let damage: Vec<Value> = set
        .field_stores()
        .iter()
        .map(|store| store.export()["minecraft:max_damage"].clone())
        .collect();
    assert_eq!(damage, [json!(275), json!(400), json!(375), json!(326)]);
}

#[test]
fn records_using_operation_and_field_overrides_keys_build() {
    let mut record = hunter_sword();
    record["operation"] = json!([
        {"enchantable": {"enchantability": 15, "enchantable_tag": "enchantable/sword"}},
        {"lore": {"textcomponent": ["Forged in ", {"text": "fire", "color": "red"}]}},
    ]);
    record["field-overrides"] = json!({"rarity": "epic"});

    let item = build(&record).expect("build");
    assert_eq!(item.operation_log().applied(), ["enchantable", "lore"]);
    let exported = item.field_stores()[0].export();
    assert_eq!(exported["minecraft:rarity"], json!("epic"));
    assert_eq!(exported["minecraft:enchantable"], json!({"value": 15}));
}

#[test]
fn armor_set_accepts_trimable() {
    let record = json!({
        "type": "ArmorSet",
        "id_format": "lategame:ruby_{noun}",
        "name_format": "Ruby {noun}",
        "trimable": true,
    });

    let set = build(&record).expect("build");
    assert_eq!(set.identity(), "lategame:ruby");
    assert_eq!(set.display_name(), "Ruby Helmet, Ruby Chestplate, Ruby Leggings, Ruby Boots");
}
