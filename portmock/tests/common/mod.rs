//! Common test utilities for integration tests.
//!
//! This module provides helpers for building settings and for running the
//! HTTP server on an ephemeral port with a manually driven clock.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use portmock::config::{Config, ConfigBuilder};
use portmock::idle::ManualClock;
use portmock::{AppState, IdleSupervisor, Port, Settings};

/// Epoch second the manual clock starts at.
#[allow(dead_code)]
pub const CLOCK_START: i64 = 1_700_000_000;

/// Shorthand for a known-valid port.
#[allow(dead_code)]
pub fn port(value: u16) -> Port {
    Port::try_from(value).unwrap()
}

/// Settings with the given allocation range and startup timeout, server on
/// 7999, timeout bounds 5-300.
#[allow(dead_code)]
pub fn settings(min_port: u16, max_port: u16, timeout: u64) -> Settings {
    ConfigBuilder::new()
        .skip_files()
        .skip_env()
        .with_config(Config {
            port: Some(7999),
            min_port: Some(min_port),
            max_port: Some(max_port),
            min_timeout: Some(5),
            max_timeout: Some(300),
            timeout: Some(timeout),
            ..Default::default()
        })
        .build()
        .unwrap()
}

/// A running server bound to `127.0.0.1:0`.
#[allow(dead_code)]
pub struct TestServer {
    /// `http://127.0.0.1:<port>`
    pub base: String,
    /// Drives the idle supervisor.
    pub clock: Arc<ManualClock>,
    /// The state shared with the handlers.
    pub state: AppState,
    client: reqwest::Client,
    handle: JoinHandle<portmock::Result<()>>,
}

#[allow(dead_code)]
impl TestServer {
    /// Starts a server for `settings` on an ephemeral port.
    pub async fn start(settings: &Settings) -> Self {
        let clock = Arc::new(ManualClock::new(CLOCK_START));
        let supervisor = Arc::new(IdleSupervisor::with_clock(
            settings.timeouts,
            settings.timeout,
            clock.clone(),
        ));
        let state = AppState::with_supervisor(settings, supervisor, "portmock-test");

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(portmock::server::serve(listener, state.clone()));

        Self {
            base,
            clock,
            state,
            client: reqwest::Client::new(),
            handle,
        }
    }

    /// Sends `GET <path>` and returns the raw response.
    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/{path}", self.base))
            .send()
            .await
            .unwrap()
    }

    /// Sends `GET <path>` and decodes the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> T {
        let response = self.get(path).await;
        assert!(response.status().is_success(), "GET {path}: {}", response.status());
        response.json().await.unwrap()
    }

    /// Waits for the server task to finish, failing after `limit`.
    pub async fn join(self, limit: Duration) -> portmock::Result<()> {
        tokio::time::timeout(limit, self.handle)
            .await
            .expect("server did not shut down in time")
            .unwrap()
    }

    /// Cancels the server and waits for it.
    pub async fn shutdown(self) {
        self.state.shutdown.cancel();
        self.join(Duration::from_secs(5)).await.unwrap();
    }
}
