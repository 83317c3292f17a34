use predicates::prelude::*;
use serde_json::Value;

use crate::common::TestProject;

fn entry<'a>(listing: &'a [Value], name: &str) -> &'a Value {
    listing
        .iter()
        .find(|entry| entry["name"] == name)
        .unwrap_or_else(|| panic!("task '{name}' missing from listing"))
}

fn names(value: &Value) -> Vec<&str> {
    value.as_array().unwrap().iter().filter_map(Value::as_str).collect()
}

#[test]
fn test_tasks_json_describes_graph() {
    let project = TestProject::new().unwrap();

    let output = project.command().args(["tasks", "--format", "json"]).output().unwrap();
    assert!(output.status.success());

    let listing: Vec<Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(listing.len(), 12);

    let default = names(&entry(&listing, "default")["requires"]);
    for required in ["clean", "styles", "scripts", "images", "fonts", "templates"] {
        assert!(default.contains(&required), "default should require {required}");
    }

    let templates_after = names(&entry(&listing, "templates")["after"]);
    assert!(templates_after.contains(&"clean-templates"));

    let position = |name: &str| listing.iter().position(|e| e["name"] == name).unwrap();
    assert!(position("clean-styles") < position("clean"));
    assert!(position("clean") < position("default"));
    assert!(position("styles") < position("default"));
}

#[test]
fn test_tasks_text_listing() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .arg("tasks")
        .assert()
        .success()
        .stdout(predicate::str::contains("clean-fonts"))
        .stdout(predicate::str::contains("requires:"));
}
