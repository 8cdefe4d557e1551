//! Common test utilities for integration tests
//!
//! A wiremock server stands in for both the Responsys login host and the
//! API endpoint returned by login.

#![allow(dead_code)]

use rsys::{ResponsysClient, ResponsysClientConfig};
use serde_json::{json, Value};
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const AUTH_PATH: &str = "/rest/api/v1.3/auth/token";
pub const CAMPAIGNS_PATH: &str = "/rest/api/v1.3/campaigns";
pub const PROGRAMS_PATH: &str = "/rest/api/v1.3/programs";
pub const TOKEN: &str = "tok-0123456789-abcdef";

/// Client config pointing at the mock server with fast retries
pub fn client_config(server: &MockServer) -> ResponsysClientConfig {
    ResponsysClientConfig {
        login_base_url: server.uri(),
        times_to_try: 3,
        initial_backoff_ms: 10,
        max_backoff_ms: 50,
        rate_limit_rps: 1000.0, // High limit for tests
        burst_size: 100,
        ..Default::default()
    }
}

/// Body of a successful auth response whose endpoint is the mock server
pub fn login_body(server: &MockServer, token: &str) -> Value {
    json!({
        "authToken": token,
        "endPoint": server.uri(),
        "issuedAt": 1_572_800_000_000_i64
    })
}

/// Accept password logins and hand out `token`
pub async fn mount_password_login(server: &MockServer, token: &str) {
    Mock::given(method("POST"))
        .and(path(AUTH_PATH))
        .and(body_string_contains("auth_type=password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(login_body(server, token)))
        .mount(server)
        .await;
}

/// A client already logged in against `server`
pub async fn logged_in_client(server: &MockServer, config: ResponsysClientConfig) -> ResponsysClient {
    mount_password_login(server, TOKEN).await;
    let client = ResponsysClient::new(config).expect("client should build");
    client
        .password_login("jdoe", "hunter2")
        .await
        .expect("login should succeed");
    client
}

/// Minimal campaign record
pub fn campaign(id: i64, name: &str) -> Value {
    json!({ "id": id, "name": name, "type": "EMAIL" })
}
