//! Process-level tests for the `localchat` binary: what ends up on stdout,
//! stderr and in the exit status.

use std::process::{Command, Output};

/// Base URL of a local port with nothing listening on it.
fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    let addr = listener.local_addr().expect("Failed to read address");
    drop(listener);
    format!("http://{addr}/v1")
}

/// Run the binary with a clean model environment and no `.env` file.
fn run_localchat(args: &[&str], vars: &[(&str, &str)]) -> Output {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let env_file = dir.path().join(".env");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_localchat"));
    cmd.arg("--env-file").arg(&env_file).args(args);
    for key in [
        "LOCAL_MODEL_BASE_URL",
        "LOCAL_API_KEY",
        "LOCAL_MODEL_NAME",
        "DEFAULT_MAX_TOKENS",
        "DEFAULT_TEMPERATURE",
        "LOCALCHAT_TIMEOUT_SECS",
    ] {
        cmd.env_remove(key);
    }
    for (key, value) in vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to run localchat")
}

#[test]
fn test_failed_chat_logs_to_stderr_and_exits_zero() {
    let base_url = unreachable_base_url();
    let output = run_localchat(&["chat"], &[("LOCAL_MODEL_BASE_URL", &base_url)]);

    assert!(output.status.success(), "status: {:?}", output.status);
    assert!(output.stdout.is_empty(), "stdout: {:?}", String::from_utf8_lossy(&output.stdout));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Network error"), "stderr: {stderr}");
}

#[test]
fn test_strict_flag_turns_failure_into_non_zero_exit() {
    let base_url = unreachable_base_url();
    let output = run_localchat(&["--strict", "chat"], &[("LOCAL_MODEL_BASE_URL", &base_url)]);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_mock_chat_prints_only_the_reply() {
    let output = run_localchat(&["--mock", "chat"], &[]);

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "echo: Hello! How are you?\n");
}

#[test]
fn test_bad_generation_variable_does_not_block_chat() {
    let output = run_localchat(
        &["--strict", "--mock", "chat"],
        &[("DEFAULT_TEMPERATURE", "hot"), ("DEFAULT_MAX_TOKENS", "0")],
    );

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "echo: Hello! How are you?\n");
}

#[test]
fn test_bad_generation_variable_fails_advanced() {
    let output = run_localchat(
        &["--strict", "--mock", "advanced"],
        &[("DEFAULT_TEMPERATURE", "hot")],
    );

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("DEFAULT_TEMPERATURE"));
}
