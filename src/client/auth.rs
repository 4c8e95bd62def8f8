//! Session lifecycle: login, signup, logout, current user, diagnostics, and page-load
//! bootstrap from the refresh cookie.

// self
use crate::{
	_prelude::*,
	client::{ApiClient, ApiRequest},
	http::ApiHttpClient,
	obs::{self, FlowKind},
	session::TokenSecret,
};

/// Authenticated user as reported by the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
	/// Server identifier.
	#[serde(alias = "_id")]
	pub id: String,
	/// Login email.
	pub email: String,
	/// Display name.
	pub name: String,
}

/// Server diagnostics payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerDiagnostics {
	/// Whether the server saw a refresh-capable cookie on this request.
	#[serde(default)]
	pub has_refresh_token: bool,
	/// Remaining diagnostic fields, passed through untouched.
	#[serde(flatten)]
	pub details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Serialize)]
struct Credentials<'a> {
	email: &'a str,
	#[serde(skip_serializing_if = "Option::is_none")]
	name: Option<&'a str>,
	password: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthBody {
	user: User,
	access_token: TokenSecret,
}

impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Logs in with email + password, installing the issued access token.
	pub async fn login(&self, email: &str, password: &str) -> Result<User> {
		let credentials = Credentials { email, name: None, password };
		let path = self.config.endpoints.login.clone();

		obs::observe(FlowKind::Session, "login", self.authenticate(path, credentials)).await
	}

	/// Creates an account and signs it in, installing the issued access token.
	pub async fn signup(&self, email: &str, name: &str, password: &str) -> Result<User> {
		let credentials = Credentials { email, name: Some(name), password };
		let path = self.config.endpoints.signup.clone();

		obs::observe(FlowKind::Session, "signup", self.authenticate(path, credentials)).await
	}

	/// Logs out server-side and clears local token state.
	///
	/// Local state is cleared even when the server call fails; the failure is still returned.
	pub async fn logout(&self) -> Result<()> {
		obs::observe(FlowKind::Session, "logout", async {
			let result = self.request(ApiRequest::post(self.config.endpoints.logout.as_str())).await;

			self.session.clear();

			result.map(|_| ())
		})
		.await
	}

	/// Fetches the current user.
	pub async fn me(&self) -> Result<User> {
		self.request_json(ApiRequest::get(self.config.endpoints.me.as_str())).await
	}

	/// Fetches server diagnostics and updates the refresh hint from `hasRefreshToken`.
	pub async fn get_diagnostics(&self) -> Result<ServerDiagnostics> {
		obs::observe(FlowKind::Diagnostics, "get_diagnostics", self.fetch_diagnostics()).await
	}

	/// Restores a session on startup.
	///
	/// Fetches the CSRF token, consults diagnostics (keeping the current hint if they fail),
	/// and only when a refresh cookie is believed to exist refreshes and loads the current
	/// user. Returns `None` for a logged-out visitor; any failure along the way clears the
	/// session and also yields `None`.
	pub async fn bootstrap(&self) -> Option<User> {
		match obs::observe(FlowKind::Session, "bootstrap", self.restore_session()).await {
			Ok(user) => user,
			Err(_) => {
				self.session.clear();

				None
			},
		}
	}

	async fn fetch_diagnostics(&self) -> Result<ServerDiagnostics> {
		let diagnostics: ServerDiagnostics =
			self.request_json(ApiRequest::get(self.config.endpoints.diagnostics.as_str())).await?;

		self.session.set_can_refresh(diagnostics.has_refresh_token);

		Ok(diagnostics)
	}

	async fn restore_session(&self) -> Result<Option<User>> {
		self.ensure_csrf().await?;

		// Diagnostics only steer the decision; the current hint stands if they fail.
		let _ = self.get_diagnostics().await;

		if !self.session.can_refresh() {
			return Ok(None);
		}
		if self.refresh().await?.is_none() {
			return Ok(None);
		}

		self.me().await.map(Some)
	}

	async fn authenticate(&self, path: String, credentials: Credentials<'_>) -> Result<User> {
		let request = ApiRequest::post(path).with_json(&credentials)?;
		let body: AuthBody = self.request_json(request).await?;

		self.session.install(body.access_token);

		Ok(body.user)
	}
}
