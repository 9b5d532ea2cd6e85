use predicates::prelude::*;
use serde_json::Value;

#[test]
fn help_lists_commands() {
    assert_cmd::cargo::cargo_bin_cmd!("shapeguard")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("formats"));
}

#[test]
fn version_is_available() {
    assert_cmd::cargo::cargo_bin_cmd!("shapeguard")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn unknown_arguments_map_to_exit_three() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("shapeguard")
        .args(["validate", "--bogus"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(3));
    let stderr: Value = serde_json::from_slice(&output.stderr).expect("stderr json");
    assert_eq!(stderr["error"], "input_usage_error");
    assert_eq!(stderr["details"]["kind"], "cli_parse_error");
}

#[test]
fn formats_lists_names() {
    let output = assert_cmd::cargo::cargo_bin_cmd!("shapeguard")
        .arg("formats")
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));
    let payload: Value = serde_json::from_slice(&output.stdout).expect("stdout json");
    let formats = payload["formats"].as_array().expect("formats");
    assert!(formats.iter().any(|name| name == "date"));
    assert!(formats.iter().any(|name| name == "url"));
}
