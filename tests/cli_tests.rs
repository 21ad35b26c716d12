use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn gowasm(cwd: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("gowasm"));
    cmd.current_dir(cwd.path()).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_command() {
    let cwd = TempDir::new().unwrap();
    gowasm(&cwd)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Compile a Go source to WebAssembly",
        ));
}

#[test]
fn test_build_missing_source() {
    let cwd = TempDir::new().unwrap();
    gowasm(&cwd)
        .args(["build", "nope.go"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Source file not found"));
}

#[test]
fn test_env_ignores_ambient_target() {
    let cwd = TempDir::new().unwrap();
    gowasm(&cwd)
        .args(["env", "--json"])
        .env("GOOS", "linux")
        .env("GOARCH", "amd64")
        .env("GOROOT", "/usr/local/go")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""GOOS": "js""#))
        .stdout(predicate::str::contains(r#""GOARCH": "wasm""#))
        .stdout(predicate::str::contains(r#""GO111MODULE": "on""#))
        .stdout(predicate::str::contains(r#""GOROOT": "/usr/local/go""#));
}

#[cfg(unix)]
#[test]
fn test_env_cache_under_install_dir() {
    let cwd = TempDir::new().unwrap();
    gowasm(&cwd)
        .args(["env", "--install-dir", "/opt/gowasm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("GOCACHE=/opt/gowasm/.gocache"));
}

#[test]
fn test_build_without_goroot() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("widget.go"), "package main\n").unwrap();

    gowasm(&cwd)
        .args(["build", "widget.go"])
        .env_remove("GOROOT")
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOROOT is unset"));

    assert!(!cwd.path().join("dist").exists());
}

#[test]
fn test_malformed_config() {
    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("gowasm.toml"), "[bridge\n").unwrap();

    gowasm(&cwd)
        .arg("env")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
}

#[cfg(unix)]
#[test]
fn test_build_with_fake_toolchain() {
    use std::os::unix::fs::PermissionsExt;

    let toolchain = TempDir::new().unwrap();
    let bin = toolchain.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    let go = bin.join("go");
    std::fs::write(&go, "#!/bin/sh\nprintf 'fake-wasm' > \"$3\"\n").unwrap();
    std::fs::set_permissions(&go, std::fs::Permissions::from_mode(0o755)).unwrap();

    let cwd = TempDir::new().unwrap();
    std::fs::write(cwd.path().join("widget.go"), "package main\n").unwrap();

    gowasm(&cwd)
        .args(["build", "widget.go", "--install-dir"])
        .arg(toolchain.path())
        .env("GOROOT", toolchain.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Build completed"))
        // info-level tracing stays quiet without --debug or RUST_LOG
        .stderr(predicate::str::contains("compiling").not());

    let dist = cwd.path().join("dist");
    assert_eq!(std::fs::read(dist.join("widget.wasm")).unwrap(), b"fake-wasm");
    let module = std::fs::read_to_string(dist.join("widget.js")).unwrap();
    assert!(module.contains("fetch(__webpack_public_path__ + \"widget.wasm\")"));
    assert!(!cwd.path().join("widget.go.wasm").exists());
}
