use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestProject;

#[test]
fn test_partials_json_lists_flattened_names() {
    let project = TestProject::new().unwrap();
    project.write("src/templates/partials/header.mustache", "<header>").unwrap();
    project.write("src/templates/partials/nav/_item.mustache", "<li>").unwrap();
    project.write("src/templates/layout/base.mustache", "<html>").unwrap();

    let output = project.command().args(["partials", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let listing: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = listing.iter().filter_map(|entry| entry["name"].as_str()).collect();
    assert_eq!(names, vec!["base", "header", "nav__item"]);
    assert_eq!(listing[1]["bytes"], 8);
}

#[test]
fn test_partials_text_without_matches() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .arg("partials")
        .assert()
        .success()
        .stdout(predicate::str::contains("No partials found"));
}

/// Config found in a parent directory roots every pattern at that directory
#[test]
fn test_partials_discovered_from_subdirectory() {
    let project = TestProject::new().unwrap();
    project.write_config("[src]\npartials = [\"views/shared/*.hbs\"]\n\n[templates]\nextensions = [\"hbs\"]\n").unwrap();
    project.write("views/shared/card.hbs", "<div>").unwrap();
    project.write("views/pages/.keep", "").unwrap();

    project
        .command()
        .current_dir(project.path().join("views/pages"))
        .arg("partials")
        .assert()
        .success()
        .stdout(predicate::str::contains("card"));
}

#[test]
fn test_explicit_config_must_exist() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["--config", "missing.toml", "partials"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("missing.toml"));
}

#[test]
fn test_config_from_environment() {
    let project = TestProject::new().unwrap();
    project.write("conf/site.toml", "[src]\npartials = [\"bits/*.mustache\"]\n").unwrap();
    project.write("conf/bits/badge.mustache", "<b>").unwrap();

    project
        .command()
        .env("ASSETPIPE_CONFIG", "conf/site.toml")
        .arg("partials")
        .assert()
        .success()
        .stdout(predicate::str::contains("badge"));
}
