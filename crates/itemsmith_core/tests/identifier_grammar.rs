use itemsmith_core::{IdentifierValidator, ValidationRule};

#[test]
fn default_namespace_is_inserted() {
    let validator = IdentifierValidator::PLAIN;
    assert_eq!(
        validator.validate("diamond").expect("bare name"),
        "minecraft:diamond"
    );
    assert_eq!(
        validator.validate("custom:tree_3").expect("qualified"),
        "custom:tree_3"
    );
}

#[test]
fn uppercase_is_malformed() {
    let err = IdentifierValidator::PLAIN
        .validate("Custom:Tree")
        .expect_err("uppercase");
    assert_eq!(err.input, "Custom:Tree");
    assert_eq!(err.rule, ValidationRule::Malformed);
}

#[test]
fn paths_follow_the_paths_toggle() {
    let err = IdentifierValidator::PLAIN
        .validate("a/b")
        .expect_err("paths off");
    assert_eq!(err.rule, ValidationRule::PathsNotAllowed);
    assert_eq!(
        IdentifierValidator::PLAIN_PATH
            .validate("a/b")
            .expect("paths on"),
        "minecraft:a/b"
    );
}

#[test]
fn markers_are_kept_and_namespace_goes_after_them() {
    assert_eq!(
        IdentifierValidator::TAG_LIKE
            .validate("#swords")
            .expect("tag"),
        "#minecraft:swords"
    );
    assert_eq!(
        IdentifierValidator::NEGATABLE
            .validate("!custom:mana")
            .expect("negation"),
        "!custom:mana"
    );
    assert!(!IdentifierValidator::PLAIN.is_valid("#swords"));
    assert!(!IdentifierValidator::TAG_LIKE.is_valid("!swords"));
}

#[test]
fn marker_only_input_fails() {
    assert!(!IdentifierValidator::NEGATABLE.is_valid("!"));
    assert!(!IdentifierValidator::TAG_LIKE.is_valid("#"));
    assert!(!IdentifierValidator::new(true, true, true).is_valid("!#"));
}

#[test]
fn validation_is_idempotent() {
    let validator = IdentifierValidator::TAG_LIKE;
    for input in ["stone", "#logs", "custom:weapons/sword"] {
        let once = validator.validate(input).expect("first pass");
        let twice = validator.validate(&once).expect("second pass");
        assert_eq!(once, twice);
    }
}
