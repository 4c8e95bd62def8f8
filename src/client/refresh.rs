//! Access-token refresh with a single-flight guard.
//!
//! A 401 from a protected endpoint waits on the session's refresh gate, carrying the refresh
//! epoch seen when the request was sent. The first caller through with an unchanged epoch
//! performs `POST <refresh>`; everybody queued behind it shares that outcome.
//! Success installs the new access token; failure clears it and drops the refresh hint so
//! later 401s surface immediately. Either way, the original request is resubmitted once.

mod metrics;

pub use metrics::RefreshMetrics;

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	http::ApiHttpClient,
	obs::{self, FlowKind},
	session::{RefreshTurn, TokenSecret},
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefreshBody {
	access_token: Option<String>,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Exchanges the refresh cookie for a new access token, sharing any refresh already in
	/// flight.
	///
	/// Returns the access token held once the refresh settles (`None` if the session could not
	/// be restored). When another caller's refresh settles first, its error is not replayed;
	/// the outcome is read from the session instead.
	pub async fn refresh(&self) -> Result<Option<TokenSecret>> {
		let observed_epoch = self.session.refresh_epoch();

		match self.session.begin_refresh(observed_epoch).await {
			RefreshTurn::Leader(lease) => {
				let result = self.perform_refresh().await;

				drop(lease);

				result
			},
			RefreshTurn::Settled => {
				self.refresh_metrics.record_coalesced();

				Ok(self.session.access_token())
			},
		}
	}

	pub(crate) async fn recover_session(&self, path: &str, observed_epoch: u64) {
		match self.session.begin_refresh(observed_epoch).await {
			RefreshTurn::Leader(lease) => {
				obs::trace_recovery(path, "leader");

				// Failure already cleared the session; the resubmission reports the outcome.
				let _ = self.perform_refresh().await;

				drop(lease);
			},
			RefreshTurn::Settled => {
				obs::trace_recovery(path, "coalesced");
				self.refresh_metrics.record_coalesced();
			},
		}
	}

	async fn perform_refresh(&self) -> Result<Option<TokenSecret>> {
		self.refresh_metrics.record_attempt();

		match obs::observe(FlowKind::Refresh, "perform_refresh", self.request_refresh()).await {
			Ok(token) => {
				if let Some(token) = token {
					self.session.set_access_token(Some(TokenSecret::new(token)));
				}

				self.refresh_metrics.record_success();

				Ok(self.session.access_token())
			},
			Err(err) => {
				self.session.clear();
				self.refresh_metrics.record_failure();

				Err(err)
			},
		}
	}

	async fn request_refresh(&self) -> Result<Option<String>> {
		let request = ApiRequest::post(self.config.endpoints.refresh.as_str());
		let body = self.send_once(&request).await?.json::<RefreshBody>()?;

		Ok(body.access_token.filter(|token| !token.is_empty()))
	}
}
