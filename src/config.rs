//! Client configuration: API base URL and the endpoint paths the authentication pipeline
//! treats specially.

/// Builder API for assembling client configurations.
pub mod builder;

pub use builder::*;

// self
use crate::{_prelude::*, error::ConfigError};

/// Endpoint paths with authentication semantics.
///
/// Paths are matched against request paths by containment, so a request to
/// `/api/auth/login?next=/` still counts as a login call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiEndpoints {
	/// CSRF-issuing endpoint (`GET`, returns `{ csrfToken }`).
	pub csrf: String,
	/// Login endpoint (`POST`, returns `{ user, accessToken }`).
	pub login: String,
	/// Signup endpoint (`POST`, returns `{ user, accessToken }`).
	pub signup: String,
	/// Refresh/bootstrap endpoint (`POST`, returns `{ accessToken }`).
	pub refresh: String,
	/// Logout endpoint (`POST`).
	pub logout: String,
	/// Current-user endpoint (`GET`).
	pub me: String,
	/// Diagnostics endpoint (`GET`, reports `hasRefreshToken`).
	pub diagnostics: String,
}
impl ApiEndpoints {
	/// Whether a 401 from `path` must be surfaced without attempting a refresh.
	pub fn is_exempt(&self, path: &str) -> bool {
		[&self.login, &self.signup, &self.refresh, &self.csrf, &self.diagnostics]
			.into_iter()
			.any(|endpoint| path.contains(endpoint.as_str()))
	}

	/// Whether `path` targets the CSRF-issuing endpoint.
	pub fn is_csrf(&self, path: &str) -> bool {
		path.contains(self.csrf.as_str())
	}

	fn validate(&self) -> Result<(), ConfigError> {
		let entries = [
			("csrf", &self.csrf),
			("login", &self.login),
			("signup", &self.signup),
			("refresh", &self.refresh),
			("logout", &self.logout),
			("me", &self.me),
			("diagnostics", &self.diagnostics),
		];

		for (endpoint, path) in entries {
			if !path.starts_with('/') {
				return Err(ConfigError::InvalidEndpointPath { endpoint, path: path.clone() });
			}
		}

		Ok(())
	}
}
impl Default for ApiEndpoints {
	fn default() -> Self {
		Self {
			csrf: "/api/security/csrf-token".into(),
			login: "/api/auth/login".into(),
			signup: "/api/auth/signup".into(),
			refresh: "/api/auth/refresh".into(),
			logout: "/api/auth/logout".into(),
			me: "/api/auth/me".into(),
			diagnostics: "/api/diagnostics".into(),
		}
	}
}

/// Validated client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
	/// API origin (plus optional path prefix) every request path is appended to.
	pub base_url: Url,
	/// Endpoint paths with authentication semantics.
	pub endpoints: ApiEndpoints,
}
impl ClientConfig {
	/// Base URL used when neither the builder nor the environment supplies one.
	pub const DEFAULT_BASE_URL: &'static str = "http://localhost:4000";
	/// Environment variables consulted by [`ClientConfig::from_env`], in priority order.
	pub const ENV_KEYS: [&'static str; 2] = ["FINSMART_API_URL", "FINSMART_API_BASE"];

	/// Creates a new builder seeded with defaults.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::new()
	}

	/// Builds a configuration for `base_url` with default endpoints.
	pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
		Self::builder().base_url(base_url).build()
	}

	/// Reads the base URL from the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Reads the base URL through `lookup`, falling back to [`Self::DEFAULT_BASE_URL`].
	/// Empty values are skipped.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let base_url = Self::ENV_KEYS
			.iter()
			.filter_map(|key| lookup(key))
			.find(|value| !value.trim().is_empty())
			.unwrap_or_else(|| Self::DEFAULT_BASE_URL.into());

		Self::new(base_url.trim())
	}

	/// Resolves a request path (or absolute URL) plus query pairs into a full URL.
	///
	/// Relative paths are appended to the base URL, keeping any base path prefix.
	pub fn resolve(&self, path: &str, query: &[(String, String)]) -> Result<Url, ConfigError> {
		let raw = if path.starts_with("http://") || path.starts_with("https://") {
			path.to_owned()
		} else {
			format!(
				"{}/{}",
				self.base_url.as_str().trim_end_matches('/'),
				path.trim_start_matches('/')
			)
		};
		let mut url = Url::parse(&raw)
			.map_err(|source| ConfigError::InvalidRequestPath { path: path.to_owned(), source })?;

		if !query.is_empty() {
			let mut pairs = url.query_pairs_mut();

			for (key, value) in query {
				pairs.append_pair(key, value);
			}
		}

		Ok(url)
	}
}
