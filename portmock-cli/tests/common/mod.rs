//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers with a scrubbed environment
//! - A handle on a running daemon process

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use std::fs;
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Child, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Environment variables that would leak configuration into a test.
const PORTMOCK_VARS: [&str; 9] = [
    "PORTMOCK_PORT",
    "PORTMOCK_MIN_PORT",
    "PORTMOCK_MAX_PORT",
    "PORTMOCK_MIN_TIMEOUT",
    "PORTMOCK_MAX_TIMEOUT",
    "PORTMOCK_TIMEOUT",
    "PORTMOCK_LOG_FILE",
    "PORTMOCK_DEBUG",
    "PORTMOCK_LOG_MODE",
];

/// Test environment with an isolated working directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory, used as the working directory
    pub temp_path: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        Self {
            temp_dir,
            temp_path,
        }
    }

    /// A `portmock` command running in the temporary directory with every
    /// `PORTMOCK_*` variable removed.
    pub fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("portmock").expect("Failed to find portmock binary");
        cmd.current_dir(&self.temp_path);
        for var in PORTMOCK_VARS {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Write a file into the temporary directory.
    pub fn write_file(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_path.join(name);
        fs::write(&path, contents).expect("Failed to write test file");
        path
    }

    /// Start `portmock serve` on a free port with the given extra arguments.
    ///
    /// The daemon logs to `daemon.log` in the temporary directory.
    pub fn spawn_daemon(&self, extra_args: &[&str]) -> Daemon {
        let port = free_port();
        let log_file = self.temp_path.join("daemon.log");

        let mut cmd = std::process::Command::new(cargo_bin("portmock"));
        cmd.current_dir(&self.temp_path)
            .arg("serve")
            .arg("--port")
            .arg(port.to_string())
            .args(["--min-port", "20000", "--max-port", "20100"])
            .arg("--log-file")
            .arg(&log_file)
            .args(extra_args)
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        for var in PORTMOCK_VARS {
            cmd.env_remove(var);
        }

        let child = cmd.spawn().expect("Failed to spawn daemon");
        Daemon {
            child,
            base: format!("http://127.0.0.1:{port}"),
            log_file,
        }
    }
}

/// Ask the OS for a port that is free right now.
pub fn free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    listener.local_addr().unwrap().port()
}

/// A running daemon. Killed on drop if still alive.
pub struct Daemon {
    child: Child,
    /// `http://127.0.0.1:<port>`
    pub base: String,
    /// Where the daemon writes its log.
    pub log_file: PathBuf,
}

#[allow(dead_code)]
impl Daemon {
    /// Wait until `/ping` answers.
    pub fn wait_ready(&mut self, limit: Duration) {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Ok(Some(status)) = self.child.try_wait() {
                panic!("daemon exited early with {status}");
            }
            if reqwest::blocking::get(format!("{}/ping", self.base)).is_ok() {
                return;
            }
            thread::sleep(Duration::from_millis(50));
        }
        panic!("daemon did not become ready within {limit:?}");
    }

    /// `GET <path>` decoded as JSON.
    pub fn get_json(&self, path: &str) -> serde_json::Value {
        reqwest::blocking::get(format!("{}/{path}", self.base))
            .expect("request failed")
            .json()
            .expect("response was not JSON")
    }

    /// `GET <path>` as a raw response.
    pub fn get(&self, path: &str) -> reqwest::blocking::Response {
        reqwest::blocking::get(format!("{}/{path}", self.base)).expect("request failed")
    }

    /// Wait for the process to exit, returning `None` on timeout.
    pub fn wait_exit(&mut self, limit: Duration) -> Option<ExitStatus> {
        let deadline = Instant::now() + limit;
        while Instant::now() < deadline {
            if let Some(status) = self.child.try_wait().expect("try_wait failed") {
                return Some(status);
            }
            thread::sleep(Duration::from_millis(50));
        }
        None
    }

    /// The log file contents so far.
    pub fn log(&self) -> String {
        read_log(&self.log_file)
    }
}

impl Drop for Daemon {
    fn drop(&mut self) {
        if let Ok(None) = self.child.try_wait() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

/// Read a log file, treating a missing file as empty.
pub fn read_log(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_default()
}
