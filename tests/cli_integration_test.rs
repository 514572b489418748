//! End-to-end tests of the objcmeta binary.

mod common;

use common::HeaderFixture;
use std::fs;
use std::process::{Command, Output};
use tempfile::TempDir;

const FOO_HEADER: &str = "@interface Foo : NSObject\n- (void)doSomething;\n- (CGRect)frame;\n@end\n";

fn run(cwd: &std::path::Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_objcmeta"))
        .current_dir(cwd)
        .env_remove("RUST_LOG")
        .env_remove("OBJCMETA_JOBS")
        .args(args)
        .output()
        .expect("Failed to execute objcmeta")
}

fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "Command failed with status: {:?}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_extract_writes_default_output_file() {
    let fixture = HeaderFixture::new().with_header("MyKit/Foo.h", FOO_HEADER);
    let cwd = TempDir::new().unwrap();
    let headers = fixture.join("MyKit");

    let output = run(cwd.path(), &["extract", headers.to_str().unwrap()]);
    assert_success(&output);

    let document = fs::read_to_string(cwd.path().join("MyKit.extracted")).unwrap();
    assert!(document.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
    assert!(document.contains("\t\t\t\t\t\t<string>v16@0:8</string>\n"));
    assert!(document.contains("<string>{CGRect={CGPoint=dd}{CGSize=dd}}16@0:8</string>"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("MyKit.extracted"));
}

#[test]
fn test_extract_named_json_output() {
    let fixture = HeaderFixture::new().with_header("Foo.h", FOO_HEADER);
    let cwd = TempDir::new().unwrap();

    let output = run(
        cwd.path(),
        &[
            "extract",
            fixture.path().to_str().unwrap(),
            "--name",
            "com.example.app",
            "--format",
            "json",
            "--quiet",
        ],
    );
    assert_success(&output);
    assert!(output.stdout.is_empty());

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(cwd.path().join("com.example.app.json")).unwrap())
            .unwrap();
    assert_eq!(json["objcClasses"][0]["name"], "Foo");
    assert_eq!(json["objcClasses"][0]["methods"][1]["selector"], "frame");
}

#[test]
fn test_extract_runs_are_byte_identical() {
    let fixture = HeaderFixture::new()
        .with_header("Foo.h", FOO_HEADER)
        .with_header("Bar.h", "@interface Bar : Foo\n- (BOOL)isEqual:(id)object;\n@end\n");
    let cwd = TempDir::new().unwrap();
    let dir = fixture.path().to_str().unwrap();

    assert_success(&run(cwd.path(), &["extract", dir, "-o", "first.extracted", "-q"]));
    assert_success(&run(
        cwd.path(),
        &["extract", dir, "-o", "second.extracted", "-q", "--no-parallel"],
    ));

    let first = fs::read(cwd.path().join("first.extracted")).unwrap();
    let second = fs::read(cwd.path().join("second.extracted")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_unreadable_header_is_reported_but_not_fatal() {
    let fixture = HeaderFixture::new()
        .with_header("Foo.h", FOO_HEADER)
        .with_bytes("Broken.h", &[0xff, 0xfe, 0xfd]);
    let cwd = TempDir::new().unwrap();

    let output = run(
        cwd.path(),
        &["extract", fixture.path().to_str().unwrap(), "-o", "out.extracted"],
    );
    assert_success(&output);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Broken.h"), "stderr: {}", stderr);
    let document = fs::read_to_string(cwd.path().join("out.extracted")).unwrap();
    assert!(document.contains("<string>Foo</string>"));
}

#[test]
fn test_missing_directory_fails() {
    let cwd = TempDir::new().unwrap();
    let output = run(cwd.path(), &["extract", "does/not/exist"]);
    assert!(!output.status.success());
}

#[test]
fn test_explicit_invalid_config_fails() {
    let fixture = HeaderFixture::new().with_header("Foo.h", FOO_HEADER);
    let cwd = TempDir::new().unwrap();
    fs::write(cwd.path().join("bad.toml"), "[output]\nformat = \"xml\"\n").unwrap();

    let output = run(
        cwd.path(),
        &["extract", fixture.path().to_str().unwrap(), "--config", "bad.toml"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("bad.toml"));
}

#[test]
fn test_init_creates_config_once() {
    let cwd = TempDir::new().unwrap();

    assert_success(&run(cwd.path(), &["init"]));
    assert!(cwd.path().join(".objcmeta.toml").exists());

    let again = run(cwd.path(), &["init"]);
    assert!(!again.status.success());

    assert_success(&run(cwd.path(), &["init", "--force"]));
}

#[test]
fn test_discovered_config_applies_sort_order() {
    let fixture = HeaderFixture::new()
        .with_header("a.h", "@interface Zed : NSObject\n- (void)z;\n@end\n")
        .with_header("b.h", "@interface Abe : NSObject\n- (void)a;\n@end\n");
    let cwd = TempDir::new().unwrap();
    fs::write(
        cwd.path().join(".objcmeta.toml"),
        "[output]\nsort = \"name\"\nformat = \"json\"\n",
    )
    .unwrap();

    let output = run(
        cwd.path(),
        &["extract", fixture.path().to_str().unwrap(), "-o", "out.json", "-q"],
    );
    assert_success(&output);

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(cwd.path().join("out.json")).unwrap()).unwrap();
    assert_eq!(json["objcClasses"][0]["name"], "Abe");
    assert_eq!(json["objcClasses"][1]["name"], "Zed");
}
