//! End-to-end tests for the `assemble` command.
//!
//! These tests run the real binary against local-provider manifests, so they
//! need neither network access nor any version control tool.

mod common;
use common::prelude::*;

const TWO_LOCAL_PROJECTS: &str = r#"
projects:
  - provider: local
    source: "{manifest_dir}/sources/core"
    destination: vendor
    tags: [blocking, sticky]
  - provider: local
    source: "{manifest_dir}/sources/app"
    destination: src/app
"#;

#[test]
fn test_assemble_help() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("assemble")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--manifest"))
        .stdout(predicate::str::contains("--destination"))
        .stdout(predicate::str::contains("--params"))
        .stdout(predicate::str::contains("--jobs"));
}

#[test]
fn test_assemble_missing_manifest_shows_hints() {
    let fixture = TestFixture::new();
    fixture
        .command()
        .arg("assemble")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Manifest file not found"))
        .stderr(predicate::str::contains("tasc-manifest.yml"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_assemble_local_projects() {
    let fixture = TestFixture::new()
        .with_source("core/lib.c", "int core;")
        .with_source("app/main.c", "int main;")
        .with_manifest(TWO_LOCAL_PROJECTS);

    fixture
        .assemble()
        .assert()
        .success()
        .stdout(predicate::str::contains("[ASSEMBLE] Assembling 2 projects"))
        .stdout(predicate::str::contains("| core     | unblocked |    success |"))
        .stdout(predicate::str::contains("| app      | No        |    success |"))
        .stdout(predicate::str::contains("[OK] Assembly complete"));

    fixture
        .child("out/vendor/lib.c")
        .assert(predicate::str::contains("int core;"));
    fixture
        .child("out/src/app/main.c")
        .assert(predicate::str::contains("int main;"));
}

#[test]
fn test_assemble_uses_manifest_from_environment() {
    let fixture = TestFixture::new()
        .with_source("core/lib.c", "int core;")
        .with_source("app/main.c", "int main;")
        .with_manifest(TWO_LOCAL_PROJECTS);

    fixture
        .command()
        .env("TASC_MANIFEST", fixture.manifest_path())
        .arg("assemble")
        .arg("-d")
        .arg(fixture.output())
        .arg("-q")
        .assert()
        .success();

    fixture.child("out/vendor/lib.c").assert(predicate::path::exists());
}

#[test]
fn test_assemble_substitutes_params() {
    let fixture = TestFixture::new()
        .with_source("lib-2.0/VERSION", "2.0")
        .with_manifest(
            r#"
projects:
  - provider: local
    source: "{manifest_dir}/sources/lib-{version}"
    destination: "third_party/{target}"
"#,
        );

    fixture
        .assemble()
        .arg("--params")
        .arg(r#"{"version": "2.0", "target": "lib"}"#)
        .assert()
        .success();

    fixture
        .child("out/third_party/lib/VERSION")
        .assert(predicate::str::contains("2.0"));
}

#[test]
fn test_assemble_invalid_params() {
    let fixture = TestFixture::new().with_manifest("projects: []\n");

    fixture
        .assemble()
        .arg("--params")
        .arg("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --params value"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_assemble_failed_project_exits_non_zero() {
    let fixture = TestFixture::new()
        .with_source("good/file.txt", "ok")
        .with_manifest(
            r#"
projects:
  - provider: local
    source: "{manifest_dir}/sources/missing"
    rename: broken
  - provider: local
    source: "{manifest_dir}/sources/good"
    destination: good
"#,
        );

    fixture
        .assemble()
        .assert()
        .failure()
        .stdout(predicate::str::contains("| broken   | No        |     failed |"))
        .stdout(predicate::str::contains("[ERR] broken: failed"))
        .stderr(predicate::str::contains(
            "Assembly incomplete: 1 of 2 projects and 0 of 0 patches failed",
        ));

    // The other project still ran.
    fixture
        .child("out/good/file.txt")
        .assert(predicate::path::exists());
}

#[test]
fn test_assemble_failure_behind_duplicate_name_exits_non_zero() {
    let fixture = TestFixture::new()
        .with_source("b/lib/file.txt", "ok")
        .with_manifest(
            r#"
projects:
  - provider: local
    source: "{manifest_dir}/sources/a/lib"
    destination: first
    tags: [blocking]
  - provider: local
    source: "{manifest_dir}/sources/b/lib"
    destination: second
"#,
        );

    fixture
        .assemble()
        .assert()
        .failure()
        .stdout(predicate::str::contains("[ERR] lib: failed"))
        .stderr(predicate::str::contains(
            "Assembly incomplete: 1 of 2 projects and 0 of 0 patches failed",
        ));

    fixture
        .child("out/second/file.txt")
        .assert(predicate::path::exists());
}

#[test]
fn test_assemble_prints_final_states_when_not_a_terminal() {
    let mut fixture = TestFixture::new();
    let mut manifest = String::from("projects:\n");
    for i in 0..6 {
        fixture = fixture.with_source(&format!("p{i}/file.txt"), "x");
        manifest.push_str(&format!(
            "  - provider: local\n    source: \"{{manifest_dir}}/sources/p{i}\"\n    destination: p{i}\n"
        ));
    }
    let fixture = fixture.with_manifest(&manifest);

    fixture
        .assemble()
        .assert()
        .success()
        .stdout(predicate::str::contains("| p0       | No        |    success |"))
        .stdout(predicate::str::contains("| p5       | No        |    success |"))
        .stdout(predicate::str::contains("processing").not())
        .stdout(predicate::str::contains("queued").not());
}

#[test]
fn test_assemble_quiet_prints_nothing_on_success() {
    let fixture = TestFixture::new()
        .with_source("core/lib.c", "int core;")
        .with_source("app/main.c", "int main;")
        .with_manifest(TWO_LOCAL_PROJECTS);

    fixture
        .assemble()
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_assemble_with_job_cap() {
    let mut manifest = String::from("projects:\n");
    let mut fixture = TestFixture::new();
    for i in 0..6 {
        fixture = fixture.with_source(&format!("p{i}/f"), "x");
        manifest.push_str(&format!(
            "  - provider: local\n    source: \"{{manifest_dir}}/sources/p{i}\"\n    destination: p{i}\n"
        ));
    }
    let fixture = fixture.with_manifest(&manifest);

    fixture.assemble().arg("-j").arg("2").arg("-q").assert().success();

    for i in 0..6 {
        fixture
            .child(&format!("out/p{i}/f"))
            .assert(predicate::path::exists());
    }
}

#[test]
fn test_assemble_applies_patches() {
    if !tool_available("patch") {
        eprintln!("skipping: patch not available");
        return;
    }
    let fixture = TestFixture::new()
        .with_source("greeter/greeting.txt", "hello\n")
        .with_file(
            "patches/greeting.patch",
            "--- greeting.txt\n+++ greeting.txt\n@@ -1 +1 @@\n-hello\n+goodbye\n",
        )
        .with_manifest(
            r#"
projects:
  - provider: local
    source: "{manifest_dir}/sources/greeter"
    destination: greeter
patches:
  - type: file
    source: "{manifest_dir}/patches/greeting.patch"
    destination: "{destination_dir}/greeter/greeting.txt"
"#,
        );

    fixture
        .assemble()
        .assert()
        .success()
        .stdout(predicate::str::contains("1 patches successfully applied."));

    fixture
        .child("out/greeter/greeting.txt")
        .assert("goodbye\n");
}

#[test]
fn test_assemble_reports_failed_patches() {
    let fixture = TestFixture::new()
        .with_source("greeter/greeting.txt", "hello\n")
        .with_manifest(
            r#"
projects:
  - provider: local
    source: "{manifest_dir}/sources/greeter"
    destination: greeter
patches:
  - source: "{manifest_dir}/patches/missing.patch"
    destination: "{destination_dir}/greeter/greeting.txt"
"#,
        );

    fixture
        .assemble()
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "1 patches failed to apply. Errors are listed below:",
        ))
        .stdout(predicate::str::contains("missing.patch: "))
        .stderr(predicate::str::contains("0 of 1 projects and 1 of 1 patches failed"));
}
