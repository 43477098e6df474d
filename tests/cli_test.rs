//! Integration tests for the watcher binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::net::TcpListener;
use tempfile::TempDir;

/// A command with its own watcher home and an empty search path.
fn watcher(home: &TempDir) -> Command {
    let bin = home.path().join("bin");
    fs::create_dir_all(&bin).unwrap();

    let mut cmd = Command::new(cargo_bin("watcher"));
    cmd.env("WATCHER_HOME", home.path().join("home"))
        .env("PATH", &bin)
        .env("NO_COLOR", "1")
        .env_remove("WATCHER_API_KEY")
        .env_remove("WATCHER_HOST")
        .env_remove("WATCHER_PORT")
        .env_remove("RUST_LOG");
    cmd
}

#[cfg(unix)]
fn fake_tool(home: &TempDir, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    let path = home.path().join("bin").join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn default_key(home: &TempDir) -> std::path::PathBuf {
    home.path().join("home").join("keys").join("default")
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("runtime versions"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_requires_subcommand() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home).assert().failure();
    Ok(())
}

#[cfg(unix)]
#[test]
fn get_runtimes_json_lists_fake_tools() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    fake_tool(&home, "java", r#"echo 'openjdk version "17.0.8" 2023-07-18' >&2"#);
    fake_tool(&home, "go", "echo 'go version go1.21.5 linux/amd64'");

    let output = watcher(&home)
        .args(["get", "runtimes", "-o", "json"])
        .output()?;
    assert!(output.status.success());

    let runtimes: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = runtimes
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["java", "go"]);
    assert_eq!(runtimes[0]["version"], "17.0.8");
    assert_eq!(runtimes[1]["version"], "1.21.5");
    Ok(())
}

#[cfg(unix)]
#[test]
fn get_runtimes_filter_limits_output() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    fake_tool(&home, "java", r#"echo 'openjdk version "21.0.1"' >&2"#);
    fake_tool(&home, "go", "echo 'go version go1.22.0 linux/amd64'");

    watcher(&home)
        .args(["get", "runtimes", "--runtime", "go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.22.0"))
        .stdout(predicate::str::contains("21.0.1").not());
    Ok(())
}

#[cfg(unix)]
#[test]
fn get_runtime_accepts_alias() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    fake_tool(&home, "go", "echo 'go version go1.21.5 linux/amd64'");

    watcher(&home)
        .args(["get", "runtime", "golang", "-o", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("version: 1.21.5"));
    Ok(())
}

#[test]
fn get_runtime_not_installed_warns() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .args(["get", "runtime", "redis"])
        .assert()
        .success()
        .stderr(predicate::str::contains("redis is not installed"));
    Ok(())
}

#[test]
fn get_runtime_unknown_name_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .args(["get", "runtime", "cobol"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown runtime: cobol"));
    Ok(())
}

#[test]
fn key_gen_then_show() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;

    watcher(&home).args(["key", "gen"]).assert().success();

    let key = fs::read_to_string(default_key(&home))?;
    assert!(key.starts_with("watcher_"));
    assert_eq!(key.len(), "watcher_".len() + 64);

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(default_key(&home))?.permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    let masked = format!("{}...{}", &key[..10], &key[key.len() - 4..]);
    watcher(&home)
        .args(["key", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(masked))
        .stderr(predicate::str::contains("key file"));
    Ok(())
}

#[test]
fn key_show_prefers_flag_over_env() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .env("WATCHER_API_KEY", "env-key")
        .args(["key", "show", "--api-key", "flag-key", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flag-key"))
        .stdout(predicate::str::contains("--api-key flag"));
    Ok(())
}

#[test]
fn key_show_without_key_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .args(["key", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No API key configured"));
    Ok(())
}

#[test]
fn serve_key_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let key = "watcher_0123456789abcdef";

    watcher(&home)
        .args(["serve", "key", "add", key, "ci runner"])
        .assert()
        .success();

    watcher(&home)
        .args(["serve", "key", "add", key])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key already exists"));

    watcher(&home)
        .args(["serve", "key", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("watcher_01...cdef"))
        .stdout(predicate::str::contains("ci runner"));

    let keystore = home.path().join("home").join("server").join("keys.json");
    let stored: serde_json::Value = serde_json::from_str(&fs::read_to_string(&keystore)?)?;
    assert_eq!(stored[0]["key"], key);

    watcher(&home)
        .args(["serve", "key", "delete", key])
        .assert()
        .success();
    watcher(&home)
        .args(["serve", "key", "delete", key])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Key not found"));
    Ok(())
}

#[test]
fn serve_key_clear_empties_store() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    for key in ["k1", "k2"] {
        watcher(&home)
            .args(["serve", "key", "add", key])
            .assert()
            .success();
    }

    watcher(&home)
        .args(["serve", "key", "clear"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed 2 API key(s)"));

    watcher(&home)
        .args(["serve", "key", "list", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::diff("[]\n"));
    Ok(())
}

#[test]
fn compare_requires_hosts() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .args(["compare", "runtimes"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--hosts"));
    Ok(())
}

#[test]
fn compare_unreachable_hosts_fails() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?.to_string();
    drop(listener);

    watcher(&home)
        .args(["compare", "runtimes", "--hosts", &addr, "--timeout", "5"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(addr.as_str()))
        .stderr(predicate::str::contains("No host could be queried"));
    Ok(())
}

#[test]
fn completions_generate_for_bash() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_watcher"));
    Ok(())
}

#[test]
fn home_is_not_created_by_read_only_commands() -> Result<(), Box<dyn std::error::Error>> {
    let home = TempDir::new()?;
    watcher(&home).args(["get", "runtime", "redis"]).assert().success();
    assert!(!home.path().join("home").exists());
    Ok(())
}
