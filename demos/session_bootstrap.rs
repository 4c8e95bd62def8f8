//! Restores a session on startup the way a reloaded browser tab would: CSRF bootstrap,
//! diagnostics probe, cookie-backed refresh, then authenticated finance calls through the
//! same client.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use finsmart_client::{
	client::ReqwestApiClient,
	config::ClientConfig,
	finance::TransactionFilter,
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let json = "application/json";

	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/security/csrf-token");
			then.status(200).header("content-type", json).body("{\"csrfToken\":\"demo-csrf\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/diagnostics");
			then.status(200).header("content-type", json).body("{\"hasRefreshToken\":true}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/auth/refresh").header("x-csrf-token", "demo-csrf");
			then.status(200).header("content-type", json).body("{\"accessToken\":\"demo-access\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/auth/me").header("authorization", "Bearer demo-access");
			then.status(200)
				.header("content-type", json)
				.body("{\"_id\":\"u1\",\"email\":\"ada@example.com\",\"name\":\"Ada\"}");
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts").header("authorization", "Bearer demo-access");
			then.status(200).header("content-type", json).body(
				"[{\"_id\":\"acc-1\",\"type\":\"current\",\"balance\":254310,\"sortCode\":\"12-34-56\",\"accountNumber\":\"12345678\"}]",
			);
		})
		.await;
	server
		.mock_async(|when, then| {
			when.method(GET).path("/api/transactions").query_param("accountId", "acc-1");
			then.status(200).header("content-type", json).body(
				"[{\"_id\":\"t1\",\"name\":\"Groceries\",\"amount\":4215,\"type\":\"expense\",\"createdAt\":\"2024-03-02T17:45:00Z\"}]",
			);
		})
		.await;

	let client = ReqwestApiClient::new(ClientConfig::new(server.base_url())?)?;
	let Some(user) = client.bootstrap().await else {
		println!("No session to restore; show the login page.");

		return Ok(());
	};

	println!("Welcome back, {}.", user.name);

	for account in client.accounts().await? {
		println!("{} {}: £{}.", account.kind, account.account_number, account.balance);

		for tx in client.transactions(&TransactionFilter::for_account(&account.id)).await? {
			println!("  {} {} £{}", tx.created_at.date(), tx.name, tx.amount);
		}
	}

	println!("Refresh calls sent: {}.", client.refresh_metrics.attempts());

	Ok(())
}
