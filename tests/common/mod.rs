//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// crates.io
use httpmock::{Mock, prelude::*};
// self
use finsmart_client::{client::ReqwestApiClient, config::ClientConfig};

pub const CSRF_PATH: &str = "/api/security/csrf-token";
pub const REFRESH_PATH: &str = "/api/auth/refresh";
pub const CSRF_TOKEN: &str = "csrf-1";

/// Builds a reqwest-backed client pointed at the mock server.
pub fn build_client(server: &MockServer) -> ReqwestApiClient {
	let config =
		ClientConfig::new(server.base_url()).expect("Mock server base URL should be valid.");

	ReqwestApiClient::new(config).expect("Reqwest client should build for tests.")
}

/// Serves [`CSRF_TOKEN`] from the CSRF endpoint.
pub async fn mock_csrf(server: &MockServer) -> Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(GET).path(CSRF_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{{\"csrfToken\":\"{CSRF_TOKEN}\"}}"));
		})
		.await
}
