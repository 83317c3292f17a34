use predicates::prelude::*;

use crate::common::TestProject;

/// `clean templates` only removes rendered pages from the shared build root
#[test]
fn test_clean_templates_keeps_other_output() {
    let project = TestProject::new().unwrap();
    project.write("build/index.html", "<p>home</p>").unwrap();
    project.write("build/docs/guide.html", "<p>guide</p>").unwrap();
    project.write("build/styles/site.css", "body {}").unwrap();

    project
        .command()
        .args(["clean", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("clean-templates"));

    assert!(!project.exists("build/index.html"));
    assert!(!project.exists("build/docs/guide.html"));
    assert!(project.exists("build/styles/site.css"));
}

#[test]
fn test_clean_all_removes_asset_directories() {
    let project = TestProject::new().unwrap();
    project.write("build/styles/site.css", "body {}").unwrap();
    project.write("build/scripts/app.js", "app()").unwrap();
    project.write("build/fonts/icons.woff", "woff").unwrap();
    project.write("build/index.html", "<p>home</p>").unwrap();

    project.command().arg("clean").assert().success();

    assert!(!project.exists("build/styles"));
    assert!(!project.exists("build/scripts"));
    assert!(!project.exists("build/fonts"));
    assert!(!project.exists("build/index.html"));
}

/// Cleaning output that was never built is not an error
#[test]
fn test_clean_without_build_output() {
    let project = TestProject::new().unwrap();

    project.command().args(["clean", "images"]).assert().success();
}

#[test]
fn test_clean_unknown_kind() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["clean", "fnts"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown task 'clean-fnts'"));
}
