// Command-line tests for the cheadergen binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SOURCE: &str = "\
#include <stdlib.h>

static int helper(int x) { return x * 2; }

int api_call(const char *name, int flags)
{
    return helper(flags);
}
";

fn cheadergen(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("cheadergen").expect("binary should build");
    cmd.current_dir(dir)
        .env_remove("CHEADERGEN_LOG")
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"));
    cmd
}

fn write_source(dir: &TempDir, name: &str, text: &str) {
    fs::write(dir.path().join(name), text).expect("Failed to write source");
}

#[test]
fn test_writes_header_next_to_source() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "api.c", SOURCE);

    cheadergen(dir.path())
        .args(["api.c", "--author", "ada", "--date", "2024-02-03"])
        .assert()
        .success();

    let header = fs::read_to_string(dir.path().join("api.h")).expect("header should exist");
    assert!(header.starts_with("#ifndef API_H\n#define API_H\n"));
    assert!(header.contains("Executed by ada on 2024-02-03."));
    assert!(header.contains("int api_call(const char *name, int flags);"));
    assert!(!header.contains("helper"));
    assert!(header.ends_with("#endif\n"));
}

#[test]
fn test_stdout_mode_does_not_write() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "api.c", SOURCE);

    cheadergen(dir.path())
        .args(["api.c", "--stdout", "--static", "--no-guard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("static int helper(int x);"))
        .stdout(predicate::str::contains("#ifndef").not());

    assert!(!dir.path().join("api.h").exists());
}

#[test]
fn test_explicit_output_and_comment_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "api.c", SOURCE);
    fs::write(dir.path().join("banner.txt"), "// {Name} wrote this").unwrap();

    cheadergen(dir.path())
        .args([
            "api.c",
            "-o",
            "include-dir.h",
            "--comment-file",
            "banner.txt",
            "--author",
            "grace",
        ])
        .assert()
        .success();

    let header = fs::read_to_string(dir.path().join("include-dir.h")).unwrap();
    assert!(header.contains("#define INCLUDE_DIR_H"));
    assert!(header.contains("// grace wrote this"));
}

#[test]
fn test_project_settings_file_is_used() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "api.c", SOURCE);
    fs::write(
        dir.path().join(".cheadergen.toml"),
        "[generation]\ninclude_static = true\nheader_comment = \"\"\nemit_include_guard = false\n",
    )
    .unwrap();

    cheadergen(dir.path()).arg("api.c").assert().success();

    let header = fs::read_to_string(dir.path().join("api.h")).unwrap();
    assert_eq!(
        header,
        "static int helper(int x);\nint api_call(const char *name, int flags);\n"
    );
}

#[test]
fn test_existing_header_with_other_case_is_overwritten() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "api.c", SOURCE);
    fs::write(dir.path().join("API.H"), "stale").unwrap();

    cheadergen(dir.path()).arg("api.c").assert().success();

    let names: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.to_lowercase() == "api.h")
        .collect();
    assert_eq!(names, vec!["API.H"]);
    assert!(fs::read_to_string(dir.path().join("API.H"))
        .unwrap()
        .contains("int api_call("));
}

#[test]
fn test_scan_error_fails_without_writing() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "bad.c", "char *s = \"abc");

    cheadergen(dir.path())
        .arg("bad.c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unterminated string literal"));

    assert!(!dir.path().join("bad.h").exists());
}

#[test]
fn test_malformed_source_warns_and_writes() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "m.c", "int ok(void) { return 0; }\nvoid f() { if (x) { return; }\n");

    cheadergen(dir.path())
        .arg("m.c")
        .assert()
        .success()
        .stderr(predicate::str::contains("m.c:2:"));

    let header = fs::read_to_string(dir.path().join("m.h")).unwrap();
    assert!(header.contains("int ok(void);"));
}

#[test]
fn test_guard_collision_is_reported() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "my-file.c", "int a(void) { return 0; }");
    write_source(&dir, "my_file.c", "int b(void) { return 0; }");

    cheadergen(dir.path())
        .args(["my-file.c", "my_file.c"])
        .assert()
        .success()
        .stderr(predicate::str::contains("include guard MY_FILE_H is shared"));
}

#[test]
fn test_output_with_several_sources_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "a.c", "int a(void) { return 0; }");
    write_source(&dir, "b.c", "int b(void) { return 0; }");

    cheadergen(dir.path())
        .args(["a.c", "b.c", "-o", "x.h"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--output"));
}

#[test]
fn test_bad_date_is_rejected() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "a.c", "int a(void) { return 0; }");

    cheadergen(dir.path())
        .args(["a.c", "--date", "03/02/2024"])
        .assert()
        .failure();
}

#[test]
fn test_header_source_is_never_overwritten() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let inline = "static inline int sq(int x) { return x * x; }\nint cube(int x) { return x * sq(x); }\n";
    write_source(&dir, "util.h", inline);
    write_source(&dir, "api.c", SOURCE);

    cheadergen(dir.path())
        .arg("util.h")
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source"));
    cheadergen(dir.path())
        .args(["api.c", "-o", "./api.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("refusing to overwrite source"));

    assert_eq!(fs::read_to_string(dir.path().join("util.h")).unwrap(), inline);
    assert_eq!(fs::read_to_string(dir.path().join("api.c")).unwrap(), SOURCE);
}

#[test]
fn test_no_guard_skips_collision_check() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    write_source(&dir, "my-file.c", "int a(void) { return 0; }");
    write_source(&dir, "my_file.c", "int b(void) { return 0; }");

    cheadergen(dir.path())
        .args(["my-file.c", "my_file.c", "--no-guard"])
        .assert()
        .success()
        .stderr(predicate::str::contains("include guard").not());
}
