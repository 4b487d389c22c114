//! # Chatline CLI Serve Integration Tests
//!
//! File: cli/tests/serve.rs
//!
//! ## Overview
//!
//! Starts `chatline serve` as a child process and talks to it with
//! `chatline send`, covering the widget and the development service end to
//! end.
//!

mod common;
use common::*;
use predicates::prelude::*;
use std::net::TcpStream;
use std::path::Path;
use std::process::{Child, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// Kills the service when the test ends, pass or fail.
struct ServiceGuard(Child);

impl Drop for ServiceGuard {
    fn drop(&mut self) {
        let _ = self.0.kill();
        let _ = self.0.wait();
    }
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

fn wait_until_listening(port: u16) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while Instant::now() < deadline {
        if TcpStream::connect(("127.0.0.1", port)).is_ok() {
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
    panic!("chatline serve did not start listening on port {}", port);
}

/// Starts `chatline serve --port <port>` inside `dir` and waits until it
/// accepts connections.
fn spawn_serve(dir: &Path, port: u16) -> ServiceGuard {
    let child = std::process::Command::new(assert_cmd::cargo::cargo_bin("chatline"))
        .current_dir(dir)
        .arg("--config")
        .arg(dir.join("config.toml"))
        .args(["serve", "--port", &port.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .expect("Failed to start chatline serve");
    let guard = ServiceGuard(child);
    wait_until_listening(port);
    guard
}

#[test]
fn test_send_against_dev_service() {
    let port = free_port();
    let (_cmd, dir) = isolated_cmd();
    let _guard = spawn_serve(dir.path(), port);

    let endpoint = format!("http://127.0.0.1:{}/chat", port);
    let (mut cmd, _dir) = isolated_cmd();
    cmd.args(["send", "--no-timestamps", "--endpoint", &endpoint, "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "bot: No language model configured. You said: 'Hello'",
        ));
}

#[test]
fn test_serve_rejects_bad_config() {
    let (mut cmd, dir) = isolated_cmd();
    std::fs::write(dir.path().join(".chatline.toml"), "[service]\nport = 0\n").unwrap();
    cmd.arg("serve")
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-zero"));
}

#[test]
fn test_serve_ignores_client_endpoint_setting() {
    let port = free_port();
    let (_cmd, dir) = isolated_cmd();
    std::fs::write(
        dir.path().join(".chatline.toml"),
        "endpoint = \"ftp://old.example/chat\"\n",
    )
    .unwrap();
    let _guard = spawn_serve(dir.path(), port);

    let endpoint = format!("http://127.0.0.1:{}/chat", port);
    let (mut cmd, _dir) = isolated_cmd();
    cmd.args(["send", "--no-timestamps", "--endpoint", &endpoint, "ping"])
        .assert()
        .success()
        .stdout(predicate::str::contains("You said: 'ping'"));
}

#[test]
fn test_port_flag_overrides_zero_port_in_config() {
    let port = free_port();
    let (_cmd, dir) = isolated_cmd();
    std::fs::write(dir.path().join(".chatline.toml"), "[service]\nport = 0\n").unwrap();
    let _guard = spawn_serve(dir.path(), port);
    assert!(TcpStream::connect(("127.0.0.1", port)).is_ok());
}
