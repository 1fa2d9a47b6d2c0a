// Checks on the bundled defaults/ files.

use std::path::PathBuf;

fn defaults_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../defaults")
}

/// Verify that defaults/batavg.toml is valid TOML.
#[test]
fn default_config_is_valid_toml() {
    let content = std::fs::read_to_string(defaults_dir().join("batavg.toml"))
        .expect("defaults/batavg.toml should exist");
    let parsed: Result<toml::Value, _> = toml::from_str(&content);
    assert!(parsed.is_ok(), "defaults/batavg.toml is not valid TOML: {:?}", parsed.err());
}

/// Verify that defaults/teams.json is a flat object of strings.
#[test]
fn default_teams_is_string_map() {
    let content = std::fs::read_to_string(defaults_dir().join("teams.json"))
        .expect("defaults/teams.json should exist");
    let parsed: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");
    let map = parsed.as_object().expect("top-level object");
    assert!(!map.is_empty());
    assert!(map.values().all(|v| v.is_string()));
}

/// Loading through the public API copies defaults into a fresh base dir.
#[test]
fn load_config_in_bootstraps_from_defaults() {
    let tmp = std::env::temp_dir().join("batavg_defaults_bootstrap");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("defaults")).unwrap();
    for name in ["batavg.toml", "teams.json"] {
        std::fs::copy(defaults_dir().join(name), tmp.join("defaults").join(name)).unwrap();
    }

    let config = batavg_core::config::load_config_in(&tmp).expect("should load");
    let teams = batavg_core::teams::TeamDirectory::load(&config.teams_path).expect("teams");
    assert_eq!(teams.display_name(Some("BOS")), "Boston Red Sox");

    let _ = std::fs::remove_dir_all(&tmp);
}
