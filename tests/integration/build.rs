use predicates::prelude::*;

use crate::common::TestProject;

/// A bare `build` runs the default task and produces every asset kind
#[test]
fn test_default_build_produces_all_assets() {
    let project = TestProject::new().unwrap();
    project.create_standard_site().unwrap();

    project
        .command()
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("Build complete: 12 tasks finished"));

    assert_eq!(project.read("build/styles/site.css"), "body { margin: 0; }");
    assert!(project.exists("build/styles/admin/panel.scss"));
    assert!(project.exists("build/fonts/icons.woff"));
    assert!(project.exists("build/images/logo.png"));

    let bundle = project.read("build/scripts/app.js");
    assert!(bundle.contains("nav()"));
    assert!(bundle.contains("main()"));

    assert_eq!(project.read("build/index.html"), "<header>Demo</header><main>Home</main><footer></footer>");
}

/// Stale output disappears because the default task cleans first
#[test]
fn test_default_build_removes_stale_output() {
    let project = TestProject::new().unwrap();
    project.create_standard_site().unwrap();
    project.write("build/styles/old.css", "stale").unwrap();
    project.write("build/retired.html", "stale").unwrap();

    project.command().arg("build").assert().success();

    assert!(!project.exists("build/styles/old.css"));
    assert!(!project.exists("build/retired.html"));
    assert!(project.exists("build/styles/site.css"));
}

/// Running a single task leaves other output alone
#[test]
fn test_single_task_build() {
    let project = TestProject::new().unwrap();
    project.create_standard_site().unwrap();
    project.write("build/fonts/keep.woff", "keep").unwrap();

    project
        .command()
        .args(["build", "templates"])
        .assert()
        .success()
        .stdout(predicate::str::contains("templates"));

    assert!(project.exists("build/index.html"));
    assert!(project.exists("build/fonts/keep.woff"));
    assert!(!project.exists("build/styles"));
}

#[test]
fn test_dry_run_prints_levels_without_building() {
    let project = TestProject::new().unwrap();
    project.create_standard_site().unwrap();

    project
        .command()
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1. clean-"))
        .stdout(predicate::str::contains("2. clean"))
        .stdout(predicate::str::contains("4. default"));

    assert!(!project.exists("build"));
}

#[test]
fn test_unknown_task_suggests_closest_name() {
    let project = TestProject::new().unwrap();

    project
        .command()
        .args(["build", "stlyes"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Unknown task 'stlyes'"))
        .stderr(predicate::str::contains("Did you mean 'styles'?"));
}

/// A non-template file matched by a partial glob fails the build before
/// any page is written
#[test]
fn test_invalid_partial_fails_templates() {
    let project = TestProject::new().unwrap();
    project.write("src/templates/index.mustache", "home").unwrap();
    project.write("src/templates/partials/notes.txt", "not a template").unwrap();
    project.write_config("[src]\npartials = [\"src/templates/partials/*\"]\n").unwrap();

    project
        .command()
        .args(["build", "templates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("notes.txt"));

    assert!(!project.exists("build/index.html"));
}

#[test]
fn test_missing_partial_reports_render_failure() {
    let project = TestProject::new().unwrap();
    project.write("src/templates/index.mustache", "{{> sidebar }}").unwrap();

    project
        .command()
        .args(["build", "templates"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to render template"));
}

#[test]
fn test_invalid_config_is_reported() {
    let project = TestProject::new().unwrap();
    project.write_config("[build]\nstyles = \"/var/www\"\n").unwrap();

    project
        .command()
        .arg("build")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration validation failed"));
}
