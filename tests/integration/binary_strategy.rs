use predicates::prelude::*;
use std::fs;

use agenticc::binary::MarkerRegion;
use agenticc::constants::{CONTENT_REGION_LEN, LABEL_REGION_LEN};

use crate::common::{TestProject, content_offset, template_binary};

const PROGRAM: &str = "int main(){return 0;}";

fn label_region(bytes: &[u8]) -> &[u8] {
    // The label marker is overwritten by patching, so locate it in the base image
    let offset = MarkerRegion::LABEL.find(&template_binary(b"\x7fELF")).unwrap();
    &bytes[offset..offset + LABEL_REGION_LEN]
}

#[test]
fn test_patches_base_binary_end_to_end() {
    let project = TestProject::new();
    project.write("prog.c", PROGRAM);
    let base = project.write("base", template_binary(b"\x7fELF"));

    project
        .agenticc()
        .arg("--base-binary")
        .arg(&base)
        .arg("prog.c")
        .assert()
        .success()
        .stdout(predicate::str::contains("🤖 Agentically compiling prog.c"))
        .stdout(predicate::str::contains("🔗 Linking agents..."))
        .stdout(predicate::str::contains("✅ Successfully agentically compiled prog.c — prog"));

    let output = project.path().join("prog");
    let bytes = fs::read(&output).unwrap();
    assert_eq!(bytes.len(), fs::read(&base).unwrap().len());

    let start = content_offset(b"\x7fELF");
    let region = &bytes[start..start + CONTENT_REGION_LEN];
    assert_eq!(&region[..PROGRAM.len()], PROGRAM.as_bytes());
    assert!(region[PROGRAM.len()..].iter().all(|&b| b == 0));

    let label = label_region(&bytes);
    assert_eq!(&label[..5], b"gpt-4");
    assert!(label[5..].iter().all(|&b| b == 0));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}

#[test]
fn test_explicit_output_and_model() {
    let project = TestProject::new();
    project.write("fib.c", PROGRAM);
    let base = project.write("base", template_binary(b"\x7fELF"));

    project
        .agenticc()
        .args(["-o", "out/fib-agent", "--model=gpt-4o", "--strategy", "binary", "--base-binary"])
        .arg(&base)
        .arg("fib.c")
        .assert()
        .success();

    let bytes = fs::read(project.path().join("out/fib-agent")).unwrap();
    assert_eq!(&label_region(&bytes)[..6], b"gpt-4o");
    assert!(!project.path().join("fib").exists());
}

#[test]
fn test_model_from_environment_and_em_dash_flags() {
    let project = TestProject::new();
    project.write("prog.c", PROGRAM);
    let base = project.write("base", template_binary(b"\x7fELF"));

    project
        .agenticc()
        .env("AGENTICC_MODEL", "claude-3")
        .args(["prog.c", "—o", "agent", "—base-binary"])
        .arg(&base)
        .assert()
        .success();

    let bytes = fs::read(project.path().join("agent")).unwrap();
    assert_eq!(&label_region(&bytes)[..8], b"claude-3");
}

#[test]
fn test_default_model_from_config() {
    let project = TestProject::new();
    project.write("prog.c", PROGRAM);
    let base = project.write("base", template_binary(b"\x7fELF"));
    let config = project.config("default_model = \"local-llm\"\n");

    project
        .agenticc()
        .env("AGENTICC_CONFIG", &config)
        .arg("--base-binary")
        .arg(&base)
        .arg("prog.c")
        .assert()
        .success();

    let bytes = fs::read(project.path().join("prog")).unwrap();
    assert_eq!(&label_region(&bytes)[..9], b"local-llm");
}

#[test]
fn test_oversized_program_is_truncated_with_warning() {
    let project = TestProject::new();
    let program = "/* padding */\n".repeat(3000);
    assert!(program.len() > CONTENT_REGION_LEN);
    project.write("big.c", &program);
    let base = project.write("base", template_binary(b"\x7fELF"));

    project
        .agenticc()
        .arg("--base-binary")
        .arg(&base)
        .arg("big.c")
        .assert()
        .success()
        .stderr(predicate::str::contains("truncating"));

    let bytes = fs::read(project.path().join("big")).unwrap();
    let start = content_offset(b"\x7fELF");
    assert_eq!(
        &bytes[start..start + CONTENT_REGION_LEN],
        &program.as_bytes()[..CONTENT_REGION_LEN]
    );
}

#[test]
fn test_piped_warnings_are_plain_text() {
    let project = TestProject::new();
    project.write("big.c", "x".repeat(CONTENT_REGION_LEN + 1));
    let base = project.write("base", template_binary(b"\x7fELF"));

    project
        .agenticc()
        .env_remove("NO_COLOR")
        .arg("--base-binary")
        .arg(&base)
        .arg("big.c")
        .assert()
        .success()
        .stderr(predicate::str::contains("WARN"))
        .stderr(predicate::str::contains("truncating"))
        .stderr(predicate::str::contains("\u{1b}[").not());
}

#[test]
fn test_base_binary_without_markers_fails_cleanly() {
    let project = TestProject::new();
    project.write("prog.c", PROGRAM);
    let base = project.write("base", b"\x7fELF plain binary without regions".repeat(100));

    project
        .agenticc()
        .arg("--base-binary")
        .arg(&base)
        .arg("prog.c")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Successfully").not())
        .stderr(predicate::str::contains("Could not find content marker in base binary"));

    assert!(!project.path().join("prog").exists());
}

#[test]
fn test_quiet_suppresses_status_lines() {
    let project = TestProject::new();
    project.write("prog.c", PROGRAM);
    let base = project.write("base", template_binary(b"\x7fELF"));

    project
        .agenticc()
        .arg("-q")
        .arg("--base-binary")
        .arg(&base)
        .arg("prog.c")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    assert!(project.path().join("prog").exists());
}
