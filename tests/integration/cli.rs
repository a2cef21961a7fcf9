use predicates::prelude::*;

use crate::common::TestProject;

#[test]
fn test_help_lists_options() {
    let project = TestProject::new();
    project
        .agenticc()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--output"))
        .stdout(predicate::str::contains("--model"))
        .stdout(predicate::str::contains("--strategy"))
        .stdout(predicate::str::contains("--base-binary"))
        .stdout(predicate::str::contains("--strict-slots"))
        .stdout(predicate::str::contains("INPUT.out"));
}

#[test]
fn test_input_argument_required() {
    let project = TestProject::new();
    project
        .agenticc()
        .assert()
        .failure()
        .stderr(predicate::str::contains("INPUT"));
}

#[test]
fn test_missing_input_file_reports_error() {
    let project = TestProject::new();
    project
        .agenticc()
        .args(["--base-binary", "base", "absent.c"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("read input"))
        .stderr(predicate::str::contains("absent.c"));
    assert!(!project.path().join("absent").exists());
}

#[test]
fn test_unknown_strategy_rejected() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    project
        .agenticc()
        .args(["--strategy", "magic", "prog.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("magic"));
}

#[test]
fn test_invalid_config_file_reports_config_error() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    let config = project.config("strict_slots = [");
    project
        .agenticc()
        .env("AGENTICC_CONFIG", &config)
        .arg("prog.c")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_missing_configured_cargo() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    let config = project.config("cargo = \"/nonexistent/agenticc-test/cargo\"\n");
    project
        .agenticc()
        .args(["--config"])
        .arg(&config)
        .arg("prog.c")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"))
        .stderr(predicate::str::contains("rustup"));
    assert!(!project.path().join("prog").exists());
}
