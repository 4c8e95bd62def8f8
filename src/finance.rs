//! Typed finance endpoints: accounts, transactions, transfers, budgets, goals, and analytics.
//!
//! Every call goes through [`ApiClient::request`], so it inherits bearer/CSRF attachment and
//! refresh recovery. Inputs that the API would reject anyway are checked locally first and
//! surface as [`Error::Validation`] without touching the network.

pub mod model;
pub mod money;
pub mod validation;

pub use model::*;
pub use money::*;
pub use validation::*;

// crates.io
use serde_json::Value;
// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	http::ApiHttpClient,
};

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Lists the current user's accounts.
	pub async fn accounts(&self) -> Result<Vec<Account>> {
		self.request_json(ApiRequest::get("/api/accounts")).await
	}

	/// Lists cards across the current user's accounts.
	pub async fn cards(&self) -> Result<Vec<Card>> {
		self.request_json(ApiRequest::get("/api/accounts/cards")).await
	}

	/// Orders a replacement card for an account and returns the server's payload.
	pub async fn replace_card(&self, account_id: &str) -> Result<Value> {
		let account_id = path_segment("account_id", account_id)?;

		self.request_json(ApiRequest::post(format!("/api/accounts/{account_id}/replace-card")))
			.await
	}

	/// Lists transactions matching `filter`; absent filter fields are not sent.
	pub async fn transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
		let request = ApiRequest::get("/api/transactions")
			.with_optional_query("accountId", filter.account_id.as_deref())
			.with_optional_query("q", filter.query.as_deref())
			.with_optional_query("from", filter.from.as_deref())
			.with_optional_query("to", filter.to.as_deref());

		self.request_json(request).await
	}

	/// Deposits money into an account.
	pub async fn deposit(&self, entry: &LedgerEntry) -> Result<()> {
		check_ledger_entry(entry, false)?;

		self.post("/api/transactions/deposit", entry).await.map(|_| ())
	}

	/// Records an expense against an account. A payee name is required.
	pub async fn record_expense(&self, entry: &LedgerEntry) -> Result<()> {
		check_ledger_entry(entry, true)?;

		self.post("/api/transactions/expense", entry).await.map(|_| ())
	}

	/// Records income on an account. A source name is required.
	pub async fn record_income(&self, entry: &LedgerEntry) -> Result<()> {
		check_ledger_entry(entry, true)?;

		self.post("/api/transactions/income", entry).await.map(|_| ())
	}

	/// Sends a bank transfer after checking the recipient's details locally.
	pub async fn send_transfer(&self, transfer: &TransferRequest) -> Result<Value> {
		check_transfer(transfer)?;

		Ok(self.post("/api/transfers/send", transfer).await?.json()?)
	}

	/// Lists saved transfer recipients.
	pub async fn recipients(&self) -> Result<Vec<Recipient>> {
		self.request_json(ApiRequest::get("/api/transfers/recipients")).await
	}

	/// Deletes a saved recipient.
	pub async fn delete_recipient(&self, recipient_id: &str) -> Result<()> {
		let recipient_id = path_segment("recipient_id", recipient_id)?;

		self.delete(&format!("/api/transfers/recipients/{recipient_id}")).await.map(|_| ())
	}

	/// Looks up another FinSmart user by email.
	pub async fn find_user_by_email(&self, email: &str) -> Result<Value> {
		self.find_user("email", email).await
	}

	/// Looks up another FinSmart user by name.
	pub async fn find_user_by_name(&self, name: &str) -> Result<Value> {
		self.find_user("name", name).await
	}

	/// Returns spending against each budget category.
	pub async fn budget_usage(&self) -> Result<BudgetUsage> {
		self.request_json(ApiRequest::get("/api/budgets/usage")).await
	}

	/// Creates a budget.
	pub async fn create_budget(&self, budget: &NewBudget) -> Result<()> {
		if !required(&budget.category, 1) {
			return Err(Error::validation("category", "category is required"));
		}
		if budget.limit <= Pence::ZERO {
			return Err(Error::validation("limit", "limit must be positive"));
		}

		self.post("/api/budgets", budget).await.map(|_| ())
	}

	/// Lists savings goals.
	pub async fn goals(&self) -> Result<Vec<Goal>> {
		self.request_json(ApiRequest::get("/api/goals")).await
	}

	/// Creates a savings goal.
	pub async fn create_goal(&self, goal: &NewGoal) -> Result<()> {
		if !required(&goal.name, 1) {
			return Err(Error::validation("name", "goal name is required"));
		}
		if goal.target <= Pence::ZERO {
			return Err(Error::validation("target", "target must be positive"));
		}

		self.post("/api/goals", goal).await.map(|_| ())
	}

	/// Moves money from an account into a goal.
	pub async fn deposit_to_goal(&self, goal_id: &str, account_id: &str, amount: Pence) -> Result<()> {
		let goal_id = path_segment("goal_id", goal_id)?;

		if !required(account_id, 1) {
			return Err(Error::validation("account_id", "an account must be selected"));
		}
		if amount <= Pence::ZERO {
			return Err(Error::validation("amount", "amount must be positive"));
		}

		self.post(&format!("/api/goals/{goal_id}/deposit"), &GoalDeposit { account_id, amount })
			.await
			.map(|_| ())
	}

	/// Returns the analytics payload for an account.
	pub async fn analytics(&self, account_id: &str) -> Result<Value> {
		self.request_json(ApiRequest::get("/api/analytics").with_query("accountId", account_id))
			.await
	}

	/// Returns per-category spending insights for an account.
	pub async fn category_insights(&self, account_id: &str) -> Result<Value> {
		self.request_json(
			ApiRequest::get("/api/insights/category").with_query("accountId", account_id),
		)
		.await
	}

	async fn find_user(&self, key: &str, value: &str) -> Result<Value> {
		if !required(value, 1) {
			return Err(Error::validation("query", "search text is required"));
		}

		self.request_json(ApiRequest::get("/api/transfers/find-user").with_query(key, value.trim()))
			.await
	}
}

fn check_ledger_entry(entry: &LedgerEntry, name_required: bool) -> Result<()> {
	if !required(&entry.account_id, 1) {
		return Err(Error::validation("account_id", "an account must be selected"));
	}
	if entry.amount <= Pence::ZERO {
		return Err(Error::validation("amount", "amount must be positive"));
	}
	if name_required && !entry.name.as_deref().is_some_and(|name| required(name, 1)) {
		return Err(Error::validation("name", "name is required"));
	}

	Ok(())
}

fn check_transfer(transfer: &TransferRequest) -> Result<()> {
	if !required(&transfer.from_account_id, 1) {
		return Err(Error::validation("from_account_id", "an account must be selected"));
	}
	if !required(&transfer.to_name, 1) {
		return Err(Error::validation("to_name", "recipient name is required"));
	}
	if !is_valid_sort_code(&transfer.to_sort_code) {
		return Err(Error::validation("to_sort_code", "sort code must look like 12-34-56"));
	}
	if !is_valid_account_number(&transfer.to_account_number) {
		return Err(Error::validation("to_account_number", "account number must be 8 digits"));
	}
	if transfer.amount <= Pence::ZERO {
		return Err(Error::validation("amount", "amount must be positive"));
	}

	Ok(())
}

// Identifiers are interpolated into paths, so anything that would change the route is refused.
fn path_segment<'a>(field: &'static str, id: &'a str) -> Result<&'a str> {
	let id = id.trim();

	// URL parsing folds `.`/`..` (also when spelled `%2e`) into the parent path and treats `\`
	// as a separator.
	let dots = id.to_ascii_lowercase().replace("%2e", ".");

	if id.is_empty() || id.contains(['/', '\\', '?', '#']) || dots == "." || dots == ".." {
		return Err(Error::validation(field, "identifier must be a single non-empty path segment"));
	}

	Ok(id)
}
