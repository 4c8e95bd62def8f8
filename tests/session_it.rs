#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;

const USER_BODY: &str = "{\"_id\":\"u1\",\"email\":\"ada@example.com\",\"name\":\"Ada\"}";

#[tokio::test]
async fn login_installs_token_for_later_requests() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let login = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/auth/login")
				.header("x-csrf-token", CSRF_TOKEN)
				.json_body(serde_json::json!({ "email": "ada@example.com", "password": "pw" }));
			then.status(200)
				.header("content-type", "application/json")
				.body(format!("{{\"user\":{USER_BODY},\"accessToken\":\"access-1\"}}"));
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer access-1");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;
	let client = build_client(&server);

	client.session.set_can_refresh(false);

	let user = client.login("ada@example.com", "pw").await.expect("Login should succeed.");

	assert_eq!(user.id, "u1");
	assert!(client.session.can_refresh());
	assert_eq!(client.me().await.expect("Current user should load.").email, "ada@example.com");

	login.assert_async().await;
	me.assert_async().await;
}

#[tokio::test]
async fn signup_sends_name_and_signs_in() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let signup = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/signup").json_body(serde_json::json!({
				"email": "ada@example.com",
				"name": "Ada",
				"password": "pw",
			}));
			then.status(201)
				.header("content-type", "application/json")
				.body(format!("{{\"user\":{USER_BODY},\"accessToken\":\"access-2\"}}"));
		})
		.await;
	let client = build_client(&server);
	let user = client.signup("ada@example.com", "Ada", "pw").await.expect("Signup should succeed.");

	assert_eq!(user.name, "Ada");
	assert_eq!(
		client.session.access_token().map(|t| t.expose().to_owned()),
		Some("access-2".into())
	);

	signup.assert_async().await;
}

#[tokio::test]
async fn logout_clears_state_even_when_server_fails() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let logout = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/logout");
			then.status(500)
				.header("content-type", "application/json")
				.body("{\"error\":\"Session store offline\"}");
		})
		.await;
	let client = build_client(&server);

	client.session.install("access-1".into());

	let err = client.logout().await.expect_err("Server failure should still be reported.");

	assert_eq!(err.status(), Some(500));
	assert!(client.session.access_token().is_none());
	assert!(!client.session.can_refresh());
	assert!(client.session.csrf_token().is_some());

	logout.assert_async().await;
}

#[tokio::test]
async fn diagnostics_update_refresh_hint() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let diagnostics = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diagnostics");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"hasRefreshToken\":false,\"env\":\"test\"}");
		})
		.await;
	let client = build_client(&server);

	assert!(client.session.can_refresh());

	let report = client.get_diagnostics().await.expect("Diagnostics should load.");

	assert!(!report.has_refresh_token);
	assert!(!client.session.can_refresh());
	assert_eq!(report.details.get("env"), Some(&serde_json::json!("test")));

	diagnostics.assert_async().await;
}

#[tokio::test]
async fn bootstrap_skips_refresh_for_logged_out_visitor() {
	let server = MockServer::start_async().await;
	let csrf = mock_csrf(&server).await;
	let _diagnostics = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diagnostics");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"hasRefreshToken\":false}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(401).header("content-type", "application/json").body("{}");
		})
		.await;
	let client = build_client(&server);

	assert!(client.bootstrap().await.is_none());

	csrf.assert_calls_async(1).await;
	refresh.assert_calls_async(0).await;
}

#[tokio::test]
async fn bootstrap_restores_session_from_refresh_cookie() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let _diagnostics = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diagnostics");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"hasRefreshToken\":true}");
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"accessToken\":\"restored\"}");
		})
		.await;
	let me = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer restored");
			then.status(200).header("content-type", "application/json").body(USER_BODY);
		})
		.await;
	let client = build_client(&server);
	let user = client.bootstrap().await.expect("Refresh cookie should restore the session.");

	assert_eq!(user.email, "ada@example.com");

	refresh.assert_calls_async(1).await;
	me.assert_async().await;
}

#[tokio::test]
async fn bootstrap_failure_clears_session() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let _diagnostics = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diagnostics");
			then.status(500);
		})
		.await;
	let refresh = server
		.mock_async(|when, then| {
			when.method(POST).path(REFRESH_PATH);
			then.status(401)
				.header("content-type", "application/json")
				.body("{\"error\":\"Refresh token revoked\"}");
		})
		.await;
	let client = build_client(&server);

	assert!(client.bootstrap().await.is_none());
	assert!(client.session.access_token().is_none());
	assert!(!client.session.can_refresh());

	refresh.assert_calls_async(1).await;
}
