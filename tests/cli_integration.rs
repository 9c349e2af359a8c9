//! CLI integration tests for ferry.
//!
//! These tests run the binary against generated source trees. None of them
//! need a real CMake; `create` is exercised with a scripted stand-in.

use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the ferry binary command, isolated from the user's global config.
fn ferry(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("ferry").unwrap();
    cmd.env("HOME", home).env_remove("FERRY_SOURCE").env_remove("CC");
    cmd
}

/// Write a c-toxcore style CMakeLists.txt declaring `version`.
fn toxcore_tree(dir: &Path, major: &str, minor: &str, patch: &str) {
    let content = format!(
        "cmake_minimum_required(VERSION 3.16)\n\
         project(toxcore)\n\
         set(PROJECT_VERSION_MAJOR \"{major}\")\n\
         set(PROJECT_VERSION_MINOR \"{minor}\")\n\
         set(PROJECT_VERSION_PATCH \"{patch}\")\n\
         set(PROJECT_VERSION \"${{PROJECT_VERSION_MAJOR}}.${{PROJECT_VERSION_MINOR}}.${{PROJECT_VERSION_PATCH}}\")\n"
    );
    fs::write(dir.join("CMakeLists.txt"), content).unwrap();
}

struct Fixture {
    home: TempDir,
    source: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let fixture = Fixture {
            home: TempDir::new().unwrap(),
            source: TempDir::new().unwrap(),
        };
        toxcore_tree(fixture.source.path(), "0", "2", "20");
        fixture
    }

    fn cmd(&self, args: &[&str]) -> Command {
        let mut cmd = ferry(self.home.path());
        cmd.args(args).arg("--source").arg(self.source.path());
        cmd
    }
}

fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

// ============================================================================
// ferry inspect
// ============================================================================

#[test]
fn test_inspect_shows_metadata() {
    let fx = Fixture::new();

    fx.cmd(&["inspect", "-s", "os=Linux"])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: c-toxcore"))
        .stdout(predicate::str::contains("version: 0.2.20"))
        .stdout(predicate::str::contains("license: GPL-3.0-only"))
        .stdout(predicate::str::contains("shared = False [True, False]"))
        .stdout(predicate::str::contains("libsodium/1.0.18"))
        .stdout(predicate::str::contains("pthreads4w").not());
}

#[test]
fn test_inspect_windows_requires_pthreads() {
    let fx = Fixture::new();

    let json = json_stdout(&mut fx.cmd(&["inspect", "-s", "os=Windows", "-s", "compiler=msvc", "--json"]));
    assert_eq!(json["name"], "c-toxcore");
    assert_eq!(json["version"], "0.2.20");
    assert_eq!(
        json["requires"],
        serde_json::json!(["libsodium/1.0.18", "opus/1.3.1", "libvpx/1.9.0", "pthreads4w/3.0.0"])
    );
}

#[test]
fn test_inspect_missing_build_description() {
    let home = TempDir::new().unwrap();
    let empty = TempDir::new().unwrap();

    ferry(home.path())
        .args(["inspect", "--source"])
        .arg(empty.path())
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("no CMakeLists.txt found"))
        .stderr(predicate::str::contains("Pass --source"));
}

#[test]
fn test_missing_version_field_fails() {
    let fx = Fixture::new();
    fs::write(
        fx.source.path().join("CMakeLists.txt"),
        "set(PROJECT_VERSION_MAJOR \"0\")\nset(PROJECT_VERSION_PATCH \"20\")\n",
    )
    .unwrap();

    fx.cmd(&["inspect"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("PROJECT_VERSION_MINOR"))
        .stderr(predicate::str::contains("phase: version resolution"))
        .stderr(predicate::str::contains("CMakeLists.txt"));
}

#[test]
fn test_non_numeric_version_field_fails() {
    let fx = Fixture::new();
    toxcore_tree(fx.source.path(), "0", "2", "x");

    fx.cmd(&["inspect"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-numeric value `x`"));
}

// ============================================================================
// ferry config
// ============================================================================

#[test]
fn test_config_linux_static_defaults() {
    let fx = Fixture::new();

    let json = json_stdout(&mut fx.cmd(&["config", "-s", "os=Linux", "-s", "compiler=gcc", "--json"]));
    let vars = json["cache_variables"].as_object().unwrap();
    let keys: Vec<_> = vars.keys().map(String::as_str).collect();

    assert_eq!(
        keys,
        vec![
            "AUTOTEST",
            "BUILD_MISC_TESTS",
            "CMAKE_WINDOWS_EXPORT_ALL_SYMBOLS",
            "ENABLE_SHARED",
            "ENABLE_STATIC",
            "MUST_BUILD_TOXAV",
            "TEST_TIMEOUT_SECONDS",
        ]
    );
    assert_eq!(vars["ENABLE_STATIC"], true);
    assert_eq!(vars["ENABLE_SHARED"], false);
    assert_eq!(vars["TEST_TIMEOUT_SECONDS"], "300");
    assert_eq!(json["reference"], "c-toxcore/0.2.20");
}

#[test]
fn test_config_msvc_adds_windows_keys() {
    let fx = Fixture::new();

    let json = json_stdout(&mut fx.cmd(&[
        "config", "-s", "os=Windows", "-s", "compiler=msvc", "-o", "shared=True", "--json",
    ]));
    let vars = &json["cache_variables"];

    assert_eq!(vars["MSVC_STATIC_SODIUM"], true);
    assert_eq!(vars["FLAT_OUTPUT_STRUCTURE"], true);
    assert_eq!(vars["ENABLE_SHARED"], true);
    assert_eq!(vars["ENABLE_STATIC"], false);
    assert_eq!(json["settings"]["compiler"], "msvc");
}

#[test]
fn test_config_text_output() {
    let fx = Fixture::new();

    fx.cmd(&["config", "-s", "os=Linux", "-s", "compiler=clang", "-o", "with_tests=true"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AUTOTEST:BOOL = ON"))
        .stdout(predicate::str::contains("TEST_TIMEOUT_SECONDS:STRING = 300"))
        .stdout(predicate::str::contains("with_tests = True"));
}

#[test]
fn test_invalid_option_value() {
    let fx = Fixture::new();

    fx.cmd(&["config", "-o", "shared=maybe"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid value `maybe`"))
        .stderr(predicate::str::contains("phase: option validation"));
}

#[test]
fn test_unknown_option() {
    let fx = Fixture::new();

    fx.cmd(&["config", "-o", "fPIC=True"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown option `fPIC`"))
        .stderr(predicate::str::contains("shared, with_tests"));
}

#[test]
fn test_unknown_setting_value() {
    let fx = Fixture::new();

    fx.cmd(&["config", "-s", "os=Plan9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value `Plan9`"));
}

#[test]
fn test_project_config_options_apply_and_cli_wins() {
    let fx = Fixture::new();
    let config_dir = fx.source.path().join(".ferry");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.toml"),
        "[options]\nshared = true\nwith_tests = true\n\n[settings]\nos = \"Linux\"\ncompiler = \"gcc\"\n",
    )
    .unwrap();

    let json = json_stdout(&mut fx.cmd(&["config", "-o", "with_tests=False", "--json"]));
    assert_eq!(json["options"]["shared"], true);
    assert_eq!(json["options"]["with_tests"], false);
    assert_eq!(json["cache_variables"]["ENABLE_SHARED"], true);
    assert_eq!(json["cache_variables"]["AUTOTEST"], false);
}

// ============================================================================
// ferry create
// ============================================================================

#[cfg(unix)]
fn fake_cmake(dir: &Path, script: &str) -> std::path::PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-cmake");
    fs::write(&path, format!("#!/bin/sh\n{}", script)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[cfg(unix)]
#[test]
fn test_create_with_scripted_cmake() {
    let fx = Fixture::new();
    let tools = TempDir::new().unwrap();
    // `cmake --install <dir> --config <type> --prefix <prefix>`
    let cmake = fake_cmake(
        tools.path(),
        "if [ \"$1\" = \"--install\" ]; then mkdir -p \"$6/lib\" && touch \"$6/lib/libtoxcore.a\"; fi\nexit 0\n",
    );
    let prefix = fx.source.path().join("out");

    fx.cmd(&["create", "-s", "os=Linux", "-s", "compiler=gcc"])
        .arg(format!("--prefix={}", prefix.display()))
        .env("CMAKE", &cmake)
        .assert()
        .success()
        .stdout(predicate::str::contains("libraries: toxcore"))
        .stdout(predicate::str::contains("link: -ltoxcore"));

    let info: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(prefix.join("ferry-package.json")).unwrap()).unwrap();
    assert_eq!(info["name"], "c-toxcore");
    assert_eq!(info["version"], "0.2.20");
    assert_eq!(info["libraries"], serde_json::json!(["toxcore"]));
    assert_eq!(info["systemLibraries"], serde_json::json!([]));

    let script = fs::read_to_string(fx.source.path().join("build/ferry_cache.cmake")).unwrap();
    assert!(script.contains("set(ENABLE_STATIC \"ON\" CACHE BOOL \"\" FORCE)"));
}

#[cfg(unix)]
#[test]
fn test_create_relative_dirs_resolve_against_cwd() {
    let fx = Fixture::new();
    let tools = TempDir::new().unwrap();
    let cmake = fake_cmake(
        tools.path(),
        "if [ \"$1\" = \"--install\" ]; then mkdir -p \"$6/lib\" && touch \"$6/lib/libtoxcore.a\"; fi\nexit 0\n",
    );

    fx.cmd(&["create", "-s", "os=Linux", "-s", "compiler=gcc", "--build-dir", "out", "--prefix", "pkg"])
        .current_dir(fx.source.path())
        .env("CMAKE", &cmake)
        .assert()
        .success()
        .stdout(predicate::str::contains("libraries: toxcore"));

    assert!(fx.source.path().join("out/ferry_cache.cmake").is_file());
    assert!(!fx.source.path().join("out/out").exists());
    let info: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(fx.source.path().join("pkg/ferry-package.json")).unwrap())
            .unwrap();
    assert_eq!(info["libraries"], serde_json::json!(["toxcore"]));
}

#[cfg(unix)]
#[test]
fn test_create_configure_failure() {
    let fx = Fixture::new();
    let tools = TempDir::new().unwrap();
    let cmake = fake_cmake(tools.path(), "echo 'CMake Error: could not find libsodium' >&2\nexit 1\n");
    let prefix = fx.source.path().join("out");

    fx.cmd(&["create", "-s", "os=Linux", "-s", "compiler=gcc"])
        .arg(format!("--prefix={}", prefix.display()))
        .env("CMAKE", &cmake)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("configure step failed with exit code 1"))
        .stderr(predicate::str::contains("could not find libsodium"));

    assert!(!prefix.join("ferry-package.json").exists());
}

// ============================================================================
// ferry completions
// ============================================================================

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();

    ferry(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ferry"));
}
