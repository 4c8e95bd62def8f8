// self
use crate::{
	_prelude::*,
	config::{ApiEndpoints, ClientConfig},
	error::ConfigError,
};

/// Builder for [`ClientConfig`] values.
#[derive(Debug)]
pub struct ClientConfigBuilder {
	/// Raw base URL; validated by [`ClientConfigBuilder::build`].
	pub base_url: String,
	/// Endpoint paths with authentication semantics.
	pub endpoints: ApiEndpoints,
}
impl ClientConfigBuilder {
	/// Creates a new builder seeded with [`ClientConfig::DEFAULT_BASE_URL`] and default endpoints.
	pub fn new() -> Self {
		Self { base_url: ClientConfig::DEFAULT_BASE_URL.into(), endpoints: ApiEndpoints::default() }
	}

	/// Sets the base URL.
	pub fn base_url(mut self, url: impl Into<String>) -> Self {
		self.base_url = url.into();

		self
	}

	/// Replaces the whole endpoint set.
	pub fn endpoints(mut self, endpoints: ApiEndpoints) -> Self {
		self.endpoints = endpoints;

		self
	}

	/// Overrides the CSRF-issuing endpoint path.
	pub fn csrf_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.csrf = path.into();

		self
	}

	/// Overrides the refresh endpoint path.
	pub fn refresh_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.refresh = path.into();

		self
	}

	/// Overrides the diagnostics endpoint path.
	pub fn diagnostics_endpoint(mut self, path: impl Into<String>) -> Self {
		self.endpoints.diagnostics = path.into();

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		let base_url = Url::parse(&self.base_url)
			.map_err(|source| ConfigError::InvalidBaseUrl { url: self.base_url.clone(), source })?;

		match base_url.scheme() {
			"http" | "https" => {},
			other => return Err(ConfigError::UnsupportedScheme { scheme: other.to_owned() }),
		}

		if base_url.host_str().is_none_or(str::is_empty) {
			return Err(ConfigError::MissingHost);
		}

		self.endpoints.validate()?;

		Ok(ClientConfig { base_url, endpoints: self.endpoints })
	}
}
impl Default for ClientConfigBuilder {
	fn default() -> Self {
		Self::new()
	}
}
