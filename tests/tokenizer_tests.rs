use std::fs;
use std::path::{Path, PathBuf};

use gml_miner::{CallInvocation, tokenize};
use pretty_assertions::assert_eq;

fn export_scripts() -> Vec<PathBuf> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join("export");

    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .expect("failed to read tests/fixtures/export directory")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "gml"))
        .collect();
    files.sort();
    files
}

#[test]
fn test_serialized_record_tokenizes_to_same_values() {
    for path in export_scripts() {
        let source = fs::read_to_string(&path)
            .unwrap_or_else(|_| panic!("failed to read script: {:?}", path));

        let record = tokenize(&source);
        let again = tokenize(&record.to_script());

        assert_eq!(
            again.values, record.values,
            "values changed after re-serializing {:?}",
            path
        );
    }
}

#[test]
fn test_serialized_value_keeps_its_own_semicolon() {
    let record = tokenize("a = x;;\nb = \"done\";\n");
    assert_eq!(record.get("a"), Some("x;"));

    let again = tokenize(&record.to_script());
    assert_eq!(again.values, record.values);
}

#[test]
fn test_crew_script_value_ending_in_semicolon() {
    let record = tokenize(include_str!("fixtures/export/oCrew.gml"));
    assert_eq!(record.get("motto"), Some("\"Hold fast\";"));
}

#[test]
fn test_weapon_script() {
    let record = tokenize(include_str!("fixtures/export/oWeapon.gml"));

    assert_eq!(record.get("name"), Some("\"Weapon\""));
    assert_eq!(record.get("cooldown"), Some("2 * room_speed"));
    assert_eq!(record.get("slotType:0"), Some("1"));
    assert_eq!(record.get("slotType:1"), Some("2"));
    assert_eq!(record.get("hidden"), None);
    assert_eq!(
        record.calls,
        vec![
            CallInvocation::new("event_inherited", vec![]),
            CallInvocation::new("effect_add", vec!["oEFFire".to_string(), "3".to_string()]),
        ]
    );
}

#[test]
fn test_laser_script_stops_at_return() {
    let record = tokenize(include_str!("fixtures/export/oWPLaser.gml"));

    assert_eq!(record.get("slotType:1"), Some("4"));
    assert_eq!(
        record.get("flavor"),
        Some("global.label_laser_flavor + \" Handle with care.\"")
    );
    assert_eq!(record.get("damage"), None);
    assert_eq!(record.calls.len(), 4);
    assert_eq!(record.calls[3].name, "sound_play");
}

#[test]
fn test_function_bodies_are_not_root_scope() {
    let record = tokenize(include_str!("fixtures/export/scrGlobalVars.gml"));

    assert!(record.values.is_empty());
    assert!(record.calls.is_empty());
}

#[test]
fn test_later_assignment_wins() {
    let record = tokenize("hp = 10\nhp = 20\n");
    assert_eq!(record.get("hp"), Some("20"));
}

#[test]
fn test_call_arguments_keep_nested_structure() {
    let record = tokenize("spawn(oEnemy, irandom_range(1, 3), \"a, b\")\n");

    assert_eq!(
        record.calls[0].args,
        vec!["oEnemy", "irandom_range(1, 3)", "\"a, b\""]
    );
}
