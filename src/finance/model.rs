//! Wire models for the finance endpoints. Server identifiers arrive as `_id`.

// self
use crate::{_prelude::*, finance::Pence};

/// Bank account owned by the current user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
	/// Server identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Account type label (e.g. `current`, `savings`).
	#[serde(rename = "type")]
	pub kind: String,
	/// Current balance.
	#[serde(default)]
	pub balance: Pence,
	/// Sort code in `NN-NN-NN` form.
	#[serde(default)]
	pub sort_code: String,
	/// Eight-digit account number.
	#[serde(default)]
	pub account_number: String,
}

/// Payment card linked to an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
	/// Server identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Identifier of the owning account.
	pub account: String,
	/// Card number as rendered by the API (typically masked).
	pub number: String,
	/// Expiry month, 1-12.
	pub expiry_month: u8,
	/// Four-digit expiry year.
	pub expiry_year: u16,
}

/// Ledger entry on an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
	/// Server identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Payee or description.
	#[serde(default)]
	pub name: String,
	/// Amount moved.
	pub amount: Pence,
	/// Entry type (e.g. `deposit`, `expense`, `income`, `transfer`).
	#[serde(rename = "type")]
	pub kind: String,
	/// Optional free-text note.
	#[serde(default)]
	pub note: Option<String>,
	/// Creation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}

/// Saved transfer recipient.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipient {
	/// Server identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Recipient name.
	pub name: String,
	/// Recipient sort code.
	pub sort_code: String,
	/// Recipient account number.
	pub account_number: String,
	/// Number of transfers sent to this recipient.
	#[serde(default)]
	pub count: u32,
	/// Most recent transfer instant.
	#[serde(default, with = "time::serde::rfc3339::option")]
	pub last_used_at: Option<OffsetDateTime>,
}

/// Savings goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
	/// Server identifier.
	#[serde(rename = "_id")]
	pub id: String,
	/// Goal name.
	pub name: String,
	/// Target amount.
	pub target: Pence,
	/// Amount saved so far.
	#[serde(default)]
	pub saved: Pence,
}
impl Goal {
	/// Saved share of the target as a whole percentage, clamped to `0..=100`.
	pub fn progress_percent(&self) -> u8 {
		if self.target.get() <= 0 {
			return 0;
		}

		let target = i128::from(self.target.get());
		let percent = i128::from(self.saved.get()).clamp(0, target) * 100 / target;

		u8::try_from(percent).unwrap_or(100)
	}
}

/// Spending against one budget category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetLine {
	/// Budget limit.
	pub limit: Pence,
	/// Amount spent in the current period.
	pub spent: Pence,
}
impl BudgetLine {
	/// Amount left before the limit is reached; negative once over budget.
	pub fn remaining(&self) -> Pence {
		Pence::new(self.limit.get().saturating_sub(self.spent.get()))
	}

	/// Whether spending exceeds the limit.
	pub fn is_over(&self) -> bool {
		self.spent > self.limit
	}
}

/// Budget usage keyed by category.
pub type BudgetUsage = BTreeMap<String, BudgetLine>;

/// Filters for the transaction listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TransactionFilter {
	/// Restrict to one account.
	pub account_id: Option<String>,
	/// Free-text search.
	pub query: Option<String>,
	/// Inclusive lower date bound, as the API expects it (`YYYY-MM-DD`).
	pub from: Option<String>,
	/// Inclusive upper date bound, as the API expects it (`YYYY-MM-DD`).
	pub to: Option<String>,
}
impl TransactionFilter {
	/// Filter for a single account.
	pub fn for_account(account_id: impl Into<String>) -> Self {
		Self { account_id: Some(account_id.into()), ..Default::default() }
	}

	/// Adds a free-text search.
	pub fn with_query(mut self, query: impl Into<String>) -> Self {
		self.query = Some(query.into());

		self
	}

	/// Adds a date range.
	pub fn between(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
		self.from = Some(from.into());
		self.to = Some(to.into());

		self
	}
}

/// Deposit, expense, or income posted to an account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
	/// Target account.
	pub account_id: String,
	/// Strictly positive amount.
	pub amount: Pence,
	/// Payee or source; required for expenses and income.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	/// Optional free-text note.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub note: Option<String>,
}
impl LedgerEntry {
	/// Creates an entry without name or note.
	pub fn new(account_id: impl Into<String>, amount: Pence) -> Self {
		Self { account_id: account_id.into(), amount, name: None, note: None }
	}

	/// Sets the payee or source.
	pub fn with_name(mut self, name: impl Into<String>) -> Self {
		self.name = Some(name.into());

		self
	}

	/// Sets the note.
	pub fn with_note(mut self, note: impl Into<String>) -> Self {
		self.note = Some(note.into());

		self
	}
}

/// Outgoing bank transfer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRequest {
	/// Account the money leaves.
	pub from_account_id: String,
	/// Recipient name.
	pub to_name: String,
	/// Recipient sort code.
	pub to_sort_code: String,
	/// Recipient account number.
	pub to_account_number: String,
	/// Strictly positive amount.
	pub amount: Pence,
	/// Payment reference shown to the recipient.
	pub reference: String,
}

/// New budget for a spending category.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewBudget {
	/// Category name.
	pub category: String,
	/// Spending limit.
	pub limit: Pence,
}

/// New savings goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NewGoal {
	/// Goal name.
	pub name: String,
	/// Target amount.
	pub target: Pence,
}

/// Money moved from an account into a goal.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoalDeposit<'a> {
	pub account_id: &'a str,
	pub amount: Pence,
}
