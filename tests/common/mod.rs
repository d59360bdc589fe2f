//! Shared helpers for integration tests.

#![allow(dead_code)]

pub mod harness;
pub mod http_client;

pub use harness::{ServerStartupError, TestServer, TestServerConfig, spawn_test_server};
pub use http_client::{AskOutcome, TestClient};
