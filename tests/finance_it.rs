#![cfg(feature = "reqwest")]

mod common;

// crates.io
use httpmock::prelude::*;
// self
use common::*;
use finsmart_client::{
	error::Error,
	finance::{LedgerEntry, NewBudget, Pence, TransactionFilter, TransferRequest},
};

fn transfer(to_sort_code: &str) -> TransferRequest {
	TransferRequest {
		from_account_id: "acc-1".into(),
		to_name: "Grace Hopper".into(),
		to_sort_code: to_sort_code.into(),
		to_account_number: "87654321".into(),
		amount: Pence::new(12_500),
		reference: "Dinner".into(),
	}
}

#[tokio::test]
async fn accounts_decode_with_server_ids() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let accounts = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/accounts");
			then.status(200).header("content-type", "application/json").body(
				"[{\"_id\":\"acc-1\",\"type\":\"current\",\"balance\":123456,\"sortCode\":\"12-34-56\",\"accountNumber\":\"12345678\"}]",
			);
		})
		.await;
	let client = build_client(&server);
	let listed = client.accounts().await.expect("Accounts should decode.");

	assert_eq!(listed.len(), 1);
	assert_eq!(listed[0].id, "acc-1");
	assert_eq!(listed[0].balance.to_pounds_string(), "1234.56");

	accounts.assert_async().await;
}

#[tokio::test]
async fn transaction_filter_becomes_query_params() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let transactions = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/api/transactions")
				.query_param("accountId", "acc-1")
				.query_param("q", "coffee")
				.query_param("from", "2024-01-01")
				.query_param("to", "2024-01-31");
			then.status(200).header("content-type", "application/json").body(
				"[{\"_id\":\"t1\",\"name\":\"Coffee\",\"amount\":350,\"type\":\"expense\",\"createdAt\":\"2024-01-05T08:00:00Z\"}]",
			);
		})
		.await;
	let client = build_client(&server);
	let filter =
		TransactionFilter::for_account("acc-1").with_query("coffee").between("2024-01-01", "2024-01-31");
	let listed = client.transactions(&filter).await.expect("Transactions should decode.");

	assert_eq!(listed[0].amount, Pence::new(350));

	transactions.assert_async().await;
}

#[tokio::test]
async fn invalid_transfer_never_reaches_the_network() {
	let server = MockServer::start_async().await;
	let csrf = mock_csrf(&server).await;
	let send = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/transfers/send");
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.send_transfer(&transfer("123456"))
		.await
		.expect_err("Undashed sort code should be rejected locally.");

	assert!(matches!(err, Error::Validation { field: "to_sort_code", .. }));

	csrf.assert_calls_async(0).await;
	send.assert_calls_async(0).await;
}

#[tokio::test]
async fn transfer_rejection_carries_server_message() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let send = server
		.mock_async(|when, then| {
			when.method(POST).path("/api/transfers/send").json_body(serde_json::json!({
				"fromAccountId": "acc-1",
				"toName": "Grace Hopper",
				"toSortCode": "12-34-56",
				"toAccountNumber": "87654321",
				"amount": 12_500,
				"reference": "Dinner",
			}));
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"Insufficient funds\"}");
		})
		.await;
	let client = build_client(&server);
	let err = client
		.send_transfer(&transfer("12-34-56"))
		.await
		.expect_err("Server rejection should surface.");

	assert_eq!(err.status(), Some(400));
	assert_eq!(err.server_message(), Some("Insufficient funds"));

	send.assert_async().await;
}

#[tokio::test]
async fn expense_posts_ledger_entry() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let expense = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/transactions/expense")
				.header("content-type", "application/json")
				.header("x-csrf-token", CSRF_TOKEN)
				.json_body(serde_json::json!({
					"accountId": "acc-1",
					"amount": 899,
					"name": "Books",
					"note": "Rust in Action",
				}));
			then.status(201).header("content-type", "application/json").body("{}");
		})
		.await;
	let client = build_client(&server);
	let entry = LedgerEntry::new("acc-1", Pence::parse_pounds("8.99").expect("Amount should parse."))
		.with_name("Books")
		.with_note("Rust in Action");

	client.record_expense(&entry).await.expect("Expense should be recorded.");

	expense.assert_async().await;
}

#[tokio::test]
async fn budgets_goals_and_recipients_round_trip() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let usage = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/budgets/usage");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"food\":{\"limit\":20000,\"spent\":25000},\"travel\":{\"limit\":5000,\"spent\":0}}");
		})
		.await;
	let create = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/budgets")
				.json_body(serde_json::json!({ "category": "fun", "limit": 3000 }));
			then.status(201).header("content-type", "application/json").body("{}");
		})
		.await;
	let goal_deposit = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/api/goals/g1/deposit")
				.json_body(serde_json::json!({ "accountId": "acc-1", "amount": 1000 }));
			then.status(200).header("content-type", "application/json").body("{}");
		})
		.await;
	let delete = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/api/transfers/recipients/r1");
			then.status(204);
		})
		.await;
	let client = build_client(&server);
	let lines = client.budget_usage().await.expect("Budget usage should decode.");

	assert!(lines["food"].is_over());
	assert_eq!(lines["travel"].remaining(), Pence::new(5_000));

	client
		.create_budget(&NewBudget { category: "fun".into(), limit: Pence::new(3_000) })
		.await
		.expect("Budget should be created.");
	client
		.deposit_to_goal("g1", "acc-1", Pence::new(1_000))
		.await
		.expect("Goal deposit should succeed.");
	client.delete_recipient("r1").await.expect("Recipient should be deleted.");

	usage.assert_async().await;
	create.assert_async().await;
	goal_deposit.assert_async().await;
	delete.assert_async().await;
}

#[tokio::test]
async fn lookups_and_analytics_pass_json_through() {
	let server = MockServer::start_async().await;
	let _csrf = mock_csrf(&server).await;
	let find = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/transfers/find-user").query_param("email", "grace@example.com");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"name\":\"Grace Hopper\",\"sortCode\":\"12-34-56\"}");
		})
		.await;
	let insights = server
		.mock_async(|when, then| {
			when.method(GET).path("/api/insights/category").query_param("accountId", "acc-1");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"categories\":[{\"name\":\"food\",\"total\":4200}]}");
		})
		.await;
	let client = build_client(&server);
	let found =
		client.find_user_by_email(" grace@example.com ").await.expect("Lookup should succeed.");
	let report = client.category_insights("acc-1").await.expect("Insights should load.");

	assert_eq!(found["name"], "Grace Hopper");
	assert_eq!(report["categories"][0]["total"], 4200);

	find.assert_async().await;
	insights.assert_async().await;
}
