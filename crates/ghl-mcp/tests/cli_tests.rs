//! CLI tests that run the compiled `ghl-mcp` binary.
//!
//! Each test runs in an empty temporary directory with the GHL variables
//! removed, so neither the developer's shell nor a stray `.env` leaks in.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const VARS: [&str; 3] = ["GHL_ACCESS_TOKEN", "GHL_LOCATION_ID", "GHL_API_BASE_URL"];

fn ghl_mcp(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("ghl-mcp"));
    cmd.current_dir(dir.path()).env("RUST_LOG", "off");
    for var in VARS {
        cmd.env_remove(var);
    }
    cmd
}

const HANDSHAKE: &str = concat!(
    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{"protocolVersion":"2024-11-05","capabilities":{},"clientInfo":{"name":"test","version":"1.0"}}}"#,
    "\n",
    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    "\n",
    r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
    "\n",
);

#[test]
fn help_lists_flags() {
    let dir = TempDir::new().unwrap();
    ghl_mcp(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--access-token"))
        .stdout(predicate::str::contains("--location-id"))
        .stdout(predicate::str::contains("--base-url"));
}

#[test]
fn help_never_echoes_token() {
    let dir = TempDir::new().unwrap();
    ghl_mcp(&dir)
        .env("GHL_ACCESS_TOKEN", "pit-super-secret")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("pit-super-secret").not());
}

#[test]
fn missing_token_exits_with_error() {
    let dir = TempDir::new().unwrap();
    ghl_mcp(&dir)
        .env("GHL_LOCATION_ID", "loc-1")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: missing required configuration: GHL_ACCESS_TOKEN",
        ));
}

#[test]
fn missing_location_exits_with_error() {
    let dir = TempDir::new().unwrap();
    ghl_mcp(&dir)
        .env("GHL_ACCESS_TOKEN", "pit-token")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "error: missing required configuration: GHL_LOCATION_ID",
        ));
}

#[test]
fn flags_satisfy_configuration() {
    let dir = TempDir::new().unwrap();
    ghl_mcp(&dir)
        .args(["--access-token", "pit-token", "--location-id", "loc-1"])
        .write_stdin(HANDSHAKE)
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""name":"ghl-mcp""#))
        .stdout(predicate::str::contains("search_contacts"))
        .stdout(predicate::str::contains("create_custom_field"));
}

#[test]
fn dotenv_file_supplies_configuration() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join(".env"),
        "GHL_ACCESS_TOKEN=pit-from-file\nGHL_LOCATION_ID=loc-from-file\n",
    )
    .unwrap();

    let output = ghl_mcp(&dir).write_stdin(HANDSHAKE).output().unwrap();
    assert!(output.status.success());

    // One line per request; the notification gets none
    let stdout = String::from_utf8(output.stdout).unwrap();
    let responses: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    assert!(responses.iter().any(|r| r["id"] == 1));
    let list = responses.iter().find(|r| r["id"] == 2).unwrap();
    assert_eq!(list["result"]["tools"].as_array().unwrap().len(), 21);
}

#[test]
fn malformed_line_gets_parse_error() {
    let dir = TempDir::new().unwrap();
    ghl_mcp(&dir)
        .args(["--access-token", "pit-token", "--location-id", "loc-1"])
        .write_stdin("{not json\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("-32700"));
}
