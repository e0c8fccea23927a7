//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Merge Semantics:
//! - Defaults → Global: REPLACE
//! - Global → Local: UNION with `!id` negation, order kept
//! - Any → Env vars: REPLACE
//!
//! These tests use temp project directories only, so the local config merges
//! onto compiled defaults (or whatever global config the host has).

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use legendtoc::application::ApplicationError;
use legendtoc::config::{local_config_path, Settings};

fn write_local(dir: &TempDir, content: &str) {
    fs::write(local_config_path(dir.path()), content).unwrap();
}

#[test]
fn given_local_config_with_operational_when_load_then_unions_in_order() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
operational = ["parcels", "utilities", "parcels"]
"#,
    );

    let settings = Settings::load(Some(project.path())).expect("load settings");

    let parcels = settings.operational.iter().position(|s| s == "parcels");
    let utilities = settings.operational.iter().position(|s| s == "utilities");
    assert!(parcels < utilities, "local order kept");
    assert_eq!(
        settings.operational.iter().filter(|s| *s == "parcels").count(),
        1,
        "duplicates dropped"
    );
}

#[test]
fn given_local_config_with_negation_when_load_then_negated_id_absent() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
operational = ["imagery", "!imagery", "parcels"]
"#,
    );

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(!settings.operational.contains(&"imagery".to_string()));
    assert!(!settings.operational.contains(&"!imagery".to_string()));
    assert!(settings.operational.contains(&"parcels".to_string()));
}

#[test]
fn given_local_menu_section_when_load_then_only_given_keys_override() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
[menu]
title = "Legend"
empty_label = "(no label)"
"#,
    );

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert_eq!(settings.menu.title, "Legend");
    assert_eq!(settings.menu.empty_label, "(no label)");
    assert!(!settings.menu.anchor.is_empty());
    assert!(!settings.menu.image_mime.is_empty());
}

#[test]
fn given_local_paths_when_resolving_then_anchored_at_project() {
    let project = TempDir::new().unwrap();
    write_local(
        &project,
        r#"
map_file = "maps/city.json"
legend_dir = "cache/legends"
"#,
    );

    let mut settings = Settings::load(Some(project.path())).expect("load settings");
    settings.resolve_paths(project.path());

    assert_eq!(settings.map_file, project.path().join("maps/city.json"));
    assert_eq!(settings.legend_dir, project.path().join("cache/legends"));
}

#[test]
fn given_absolute_local_path_when_resolving_then_kept() {
    let project = TempDir::new().unwrap();
    write_local(&project, "map_file = \"/srv/maps/city.json\"\n");

    let mut settings = Settings::load(Some(project.path())).expect("load settings");
    settings.resolve_paths(project.path());

    assert_eq!(settings.map_file, PathBuf::from("/srv/maps/city.json"));
}

#[test]
fn given_malformed_local_config_when_load_then_config_error() {
    let project = TempDir::new().unwrap();
    write_local(&project, "operational = [unterminated\n");

    let result = Settings::load(Some(project.path()));

    match result {
        Err(ApplicationError::Config { message }) => {
            assert!(message.contains(".legendtoc.toml"))
        }
        other => panic!("expected config error, got {:?}", other),
    }
}

#[test]
fn given_project_without_local_config_when_load_then_succeeds() {
    let project = TempDir::new().unwrap();

    let settings = Settings::load(Some(project.path())).expect("load settings");

    assert!(!settings.menu.title.is_empty());
}
