use predicates::prelude::*;
use std::fs;

use agenticc::build::BuildOrchestrator;
use agenticc::core::{AgenticcError, BuildRequest};
use agenticc::pipeline::{Pipeline, PipelineOptions};
use agenticc::template::{SlotPolicy, TemplateResolver};
use agenticc::toolchain::ToolchainStep;

use crate::common::{FakeToolchain, TestProject, init_test_logging};

const LABEL_ONLY_TEMPLATE: &str = "\
fn main() {
    let model_name: &str = &\"Y\".repeat(128);
    println!(\"{model_name}\");
}
";

fn fake_pipeline(
    project: &TestProject,
    resolver: TemplateResolver,
    toolchain: FakeToolchain,
    options: PipelineOptions,
) -> Pipeline<FakeToolchain> {
    let workspaces = project.path().join("workspaces");
    fs::create_dir_all(&workspaces).unwrap();
    Pipeline::new(
        resolver,
        BuildOrchestrator::new(toolchain).with_workspace_parent(workspaces),
        options,
    )
}

fn workspace_count(project: &TestProject) -> usize {
    fs::read_dir(project.path().join("workspaces")).unwrap().count()
}

#[tokio::test]
async fn test_missing_slot_still_reaches_toolchain() {
    init_test_logging(None);
    let project = TestProject::new();
    let template = project.write("label_only.rs", LABEL_ONLY_TEMPLATE);
    let output = project.path().join("prog");
    let request = BuildRequest::new("prog.c", "int main(){return 0;}", "gpt-4", &output);

    let pipeline = fake_pipeline(
        &project,
        TemplateResolver::new().with_override(Some(template)),
        FakeToolchain::new(),
        PipelineOptions::default(),
    );
    pipeline.run(&request).await.unwrap();

    let sources = pipeline.orchestrator().toolchain().compiled_sources();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].contains("    let model_name: &str = \"gpt-4\";"));
    assert!(!sources[0].contains("int main"));
    assert!(output.exists());
}

#[tokio::test]
async fn test_strict_slots_fail_before_any_workspace() {
    let project = TestProject::new();
    let template = project.write("label_only.rs", LABEL_ONLY_TEMPLATE);
    let output = project.path().join("prog");
    let request = BuildRequest::new("prog.c", "int main(){return 0;}", "gpt-4", &output);

    let pipeline = fake_pipeline(
        &project,
        TemplateResolver::new().with_override(Some(template)),
        FakeToolchain::new(),
        PipelineOptions {
            slot_policy: SlotPolicy::Strict,
            ..PipelineOptions::default()
        },
    );
    let err = pipeline.run(&request).await.unwrap_err();

    assert!(matches!(err.downcast_ref::<AgenticcError>(), Some(AgenticcError::MissingSlot { .. })));
    assert!(pipeline.orchestrator().toolchain().units().is_empty());
    assert_eq!(workspace_count(&project), 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_toolchain_failure_surfaces_diagnostics_and_cleans_up() {
    let project = TestProject::new();
    let output = project.path().join("prog");
    let request = BuildRequest::new("prog.c", "int main(){return 0;}", "gpt-4", &output);
    let diagnostics = "error[E0425]: cannot find value `embedded_code` in this scope\n";

    let pipeline = fake_pipeline(
        &project,
        TemplateResolver::new(),
        FakeToolchain::new().failing_at(ToolchainStep::Compile, diagnostics),
        PipelineOptions::default(),
    );
    let err = pipeline.run(&request).await.unwrap_err();

    let typed = err.chain().find_map(|e| e.downcast_ref::<AgenticcError>());
    match typed {
        Some(AgenticcError::ToolchainStepFailed {
            step,
            diagnostics: reported,
        }) => {
            assert_eq!(*step, ToolchainStep::Compile);
            assert_eq!(reported, diagnostics);
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let units = pipeline.orchestrator().toolchain().units();
    assert_eq!(units.len(), 1);
    assert!(!units[0].exists());
    assert_eq!(workspace_count(&project), 0);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_configured_candidates_used_when_bundle_is_empty() {
    let project = TestProject::new();
    let template = project.write(
        "templates/custom.rs",
        "let embedded_code: &str = &\"X\".repeat(1);\nlet model_name: &str = &\"Y\".repeat(1);\n",
    );
    let output = project.path().join("prog");
    let request = BuildRequest::new("prog.c", "puts(\"hi\");", "m", &output);

    let pipeline = fake_pipeline(
        &project,
        TemplateResolver::new()
            .with_bundled(None)
            .with_leading_candidates(vec![project.path().join("missing.rs"), template]),
        FakeToolchain::new(),
        PipelineOptions::default(),
    );
    pipeline.run(&request).await.unwrap();

    assert_eq!(
        fs::read_to_string(&output).unwrap(),
        "let embedded_code: &str = \"puts(\\\"hi\\\");\";\nlet model_name: &str = \"m\";\n"
    );
}

#[cfg(unix)]
#[test]
fn test_cli_builds_with_cargo_end_to_end() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    let cargo = project.fake_cargo(false);
    let config = project.config(&format!("cargo = \"{}\"\n", cargo.display()));

    project
        .agenticc()
        .env("AGENTICC_CONFIG", &config)
        .args(["--no-progress", "prog.c"])
        .assert()
        .success()
        .stdout(predicate::str::contains("🤖 Agentically compiling prog.c"))
        .stdout(predicate::str::contains("🔗 Linking agents..."))
        .stdout(predicate::str::contains("✅ Successfully agentically compiled prog.c — prog"));

    let built = fs::read_to_string(project.path().join("prog")).unwrap();
    assert!(built.contains("let embedded_code: &str = \"int main(){return 0;}\";"));
    assert!(built.contains("let model_name: &str = \"gpt-4\";"));

    let log = project.cargo_log();
    assert_eq!(log.len(), 4);
    assert!(log[0].starts_with("init --bin --vcs none --name agenticc-agent"));
    assert!(log[1].starts_with("add --quiet ureq@=2.10.1 --features json"));
    assert!(log[2].starts_with("generate-lockfile"));
    assert!(log[3].starts_with("build --release"));
}

#[cfg(unix)]
#[test]
fn test_cli_reports_compiler_diagnostics() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    let cargo = project.fake_cargo(true);
    let config = project.config(&format!("cargo = \"{}\"\n", cargo.display()));

    project
        .agenticc()
        .env("AGENTICC_CONFIG", &config)
        .arg("prog.c")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Successfully").not())
        .stderr(predicate::str::contains("Compilation failed"))
        .stderr(predicate::str::contains("error[E0308]: mismatched types"));

    assert!(!project.path().join("prog").exists());
}

#[cfg(unix)]
#[test]
fn test_cli_template_override_with_strict_slots() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    let template = project.write("label_only.rs", LABEL_ONLY_TEMPLATE);
    let cargo = project.fake_cargo(false);
    let config = project.config(&format!("cargo = \"{}\"\n", cargo.display()));

    project
        .agenticc()
        .env("AGENTICC_CONFIG", &config)
        .env("AGENTICC_TEMPLATE", &template)
        .args(["--strict-slots", "prog.c"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Template content slot not found"));

    assert!(project.cargo_log().is_empty());
    assert!(!project.path().join("prog").exists());
}

#[cfg(unix)]
#[test]
fn test_cli_missing_slot_warns_and_still_builds() {
    let project = TestProject::new();
    project.write("prog.c", "int main(){return 0;}");
    let template = project.write("label_only.rs", LABEL_ONLY_TEMPLATE);
    let cargo = project.fake_cargo(false);
    let config = project.config(&format!("cargo = \"{}\"\n", cargo.display()));

    project
        .agenticc()
        .env("AGENTICC_CONFIG", &config)
        .arg("--template")
        .arg(&template)
        .args(["--no-progress", "prog.c"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Template content slot not found"))
        .stderr(predicate::str::contains("continuing without it"))
        .stdout(predicate::str::contains("🔗 Linking agents...").not())
        .stdout(predicate::str::contains("✅ Successfully agentically compiled prog.c — prog"));

    let built = fs::read_to_string(project.path().join("prog")).unwrap();
    assert!(built.contains("    let model_name: &str = \"gpt-4\";"));
    assert!(!built.contains("int main"));
    assert_eq!(project.cargo_log().len(), 4);
}
