use chrono::{TimeZone, Utc};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use lootrun_core::{ImportError, ImportOutcome, Loadout, MoveDirection, SaveDocument, SelectionKind};

const BOONS: [&str; 6] = [
    "looter",
    "loot_bonus",
    "hp_regen",
    "serendipity",
    "dexterity",
    "mana_steal",
];
const STATS: [&str; 4] = ["poison", "walk_speed", "strength", "mystery"];

fn random_loadout(seed: u64) -> Loadout {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut loadout = Loadout::new();
    for _ in 0..rng.gen_range(5..30) {
        let kind = SelectionKind::ALL[rng.gen_range(0..SelectionKind::ALL.len())];
        let id = BOONS[rng.gen_range(0..BOONS.len())];
        loadout.selections.toggle(kind, id);
    }
    for _ in 0..rng.gen_range(0..6) {
        loadout.prefs.toggle_stat(STATS[rng.gen_range(0..STATS.len())]);
    }
    for n in 0..rng.gen_range(0..4) {
        let beacons: Vec<String> = BOONS[..rng.gen_range(1..BOONS.len())]
            .iter()
            .map(|id| (*id).to_string())
            .collect();
        loadout
            .prefs
            .create_combo_with_rng(&mut rng, &format!("combo {n}"), &beacons);
    }
    loadout
}

#[test]
fn import_of_export_restores_any_reachable_state() {
    for seed in 0..32 {
        let original = random_loadout(seed);
        let bytes = serde_json::to_vec(&original.export()).unwrap();
        let mut restored = Loadout::new();
        assert_eq!(restored.import(&bytes).unwrap(), ImportOutcome::Applied);
        assert_eq!(restored, original, "seed {seed}");
    }
}

#[test]
fn selections_never_hold_duplicates() {
    for seed in 0..32 {
        let loadout = random_loadout(seed);
        for kind in SelectionKind::ALL {
            let ids = loadout.selections.selected(kind);
            let mut unique = ids.to_vec();
            unique.sort();
            unique.dedup();
            assert_eq!(unique.len(), ids.len(), "seed {seed} {kind}");
            for (pos, id) in ids.iter().enumerate() {
                assert_eq!(loadout.selections.rank(kind, id), pos + 1);
            }
        }
    }
}

#[test]
fn renamed_combo_survives_export_and_fresh_import() {
    let mut loadout = Loadout::new();
    let beacons = vec!["grey".to_string(), "aqua".to_string()];
    let id = loadout
        .prefs
        .create_combo("Aqua Grey", &beacons)
        .map(|combo| combo.id.clone())
        .unwrap();
    assert!(loadout.prefs.rename_combo(&id, "Grey+Aqua"));

    let json = loadout.export().to_json_pretty().unwrap();
    let mut fresh = Loadout::new();
    fresh.import(json.as_bytes()).unwrap();

    let combos = fresh.prefs.combos();
    assert_eq!(combos.len(), 1);
    assert_eq!(combos[0].name, "Grey+Aqua");
    assert_eq!(combos[0].beacon_ids, beacons);
}

#[test]
fn other_version_is_ignored() {
    let mut loadout = Loadout::new();
    loadout.selections.toggle(SelectionKind::Boon, "looter");
    let before = loadout.clone();
    let outcome = loadout.import(br#"{"version": 2, "boons": ["x"]}"#).unwrap();
    assert_eq!(outcome, ImportOutcome::UnrecognizedVersion);
    assert_eq!(loadout, before);
}

#[test]
fn version_only_document_empties_everything() {
    let mut loadout = Loadout::new();
    loadout.selections.toggle(SelectionKind::Beacon, "grey");
    loadout.prefs.toggle_stat("poison");
    loadout.prefs.create_combo("Solo", &["grey".to_string()]);

    assert_eq!(
        loadout.import(br#"{"version": 1}"#).unwrap(),
        ImportOutcome::Applied
    );
    assert_eq!(loadout, Loadout::new());
}

#[test]
fn invalid_json_is_an_error_and_changes_nothing() {
    let mut loadout = Loadout::new();
    loadout.selections.toggle(SelectionKind::Mission, "hoarder");
    let before = loadout.clone();
    let inputs: [&[u8]; 3] = [br#"{ "version": 1, "boons": ["#, b"", b"\xff"];
    for bad in inputs {
        let err = loadout.import(bad).unwrap_err();
        assert!(matches!(err, ImportError::Parse(_) | ImportError::Utf8(_)));
        assert_eq!(loadout, before);
    }
}

#[test]
fn json_without_an_object_root_is_ignored() {
    let mut loadout = Loadout::new();
    loadout.selections.toggle(SelectionKind::Boon, "looter");
    let before = loadout.clone();
    let inputs: [&[u8]; 4] = [b"[1, 2]", b"42", br#""text""#, b"true"];
    for doc in inputs {
        assert_eq!(
            loadout.import(doc).unwrap(),
            ImportOutcome::UnrecognizedVersion
        );
        assert_eq!(loadout, before);
    }
}

#[test]
fn older_documents_without_combos_import() {
    let doc = br#"{
        "version": 1,
        "exportedAt": "2024-02-01T10:00:00.000Z",
        "boons": ["looter", "looter", "hp_regen"],
        "statsInOverview": ["poison"]
    }"#;
    let mut loadout = Loadout::new();
    loadout.import(doc).unwrap();
    assert_eq!(loadout.selections.selected(SelectionKind::Boon), ["looter", "hp_regen"]);
    assert!(loadout.prefs.is_stat_in_overview("poison"));
    assert!(loadout.prefs.combos().is_empty());
}

#[test]
fn exported_document_has_fixed_envelope() {
    let mut loadout = Loadout::new();
    loadout.prefs.toggle_stat("walk_speed");
    loadout.prefs.toggle_stat("poison");
    let at = Utc.with_ymd_and_hms(2024, 12, 31, 23, 59, 59).unwrap();
    let doc: SaveDocument = loadout.export_at(at);
    let value = serde_json::to_value(&doc).unwrap();
    let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
    for key in [
        "version",
        "exportedAt",
        "boons",
        "beacons",
        "missions",
        "statsInOverview",
        "beaconCombos",
    ] {
        assert!(keys.iter().any(|k| k == key), "missing {key}");
    }
    assert_eq!(value["statsInOverview"], serde_json::json!(["poison", "walk_speed"]));
    assert_eq!(value["exportedAt"], "2024-12-31T23:59:59.000Z");
}

#[test]
fn combo_moves_round_trip_through_export() {
    let mut loadout = Loadout::new();
    for name in ["first", "second", "third"] {
        loadout.prefs.create_combo(name, &["grey".to_string()]);
    }
    assert!(loadout.prefs.move_combo(0, MoveDirection::Down));
    assert!(!loadout.prefs.move_combo(2, MoveDirection::Down));
    let restored = Loadout::from_document(loadout.export());
    let names: Vec<_> = restored.prefs.combos().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["second", "first", "third"]);
}
