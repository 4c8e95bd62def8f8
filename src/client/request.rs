//! Request descriptor used by every API call.

// self
use crate::{_prelude::*, error::ConfigError};

/// Outgoing API call: method, path, query, optional JSON body, and extra headers.
///
/// The `retried` marker is owned by the client; a request that was already resubmitted after
/// a refresh never triggers a second recovery.
#[derive(Clone, Debug)]
pub struct ApiRequest {
	/// HTTP method.
	pub method: Method,
	/// Path relative to the configured base URL (or an absolute URL).
	pub path: String,
	/// Query pairs appended in order.
	pub query: Vec<(String, String)>,
	/// Serialized JSON body.
	pub body: Option<Vec<u8>>,
	/// Caller-supplied headers; an explicit `Authorization` header wins over the session token.
	pub headers: HeaderMap,
	retried: bool,
}
impl ApiRequest {
	/// Creates a request for `method` + `path`.
	pub fn new(method: Method, path: impl Into<String>) -> Self {
		Self {
			method,
			path: path.into(),
			query: Vec::new(),
			body: None,
			headers: HeaderMap::new(),
			retried: false,
		}
	}

	/// Shorthand for a `GET` request.
	pub fn get(path: impl Into<String>) -> Self {
		Self::new(Method::GET, path)
	}

	/// Shorthand for a `POST` request.
	pub fn post(path: impl Into<String>) -> Self {
		Self::new(Method::POST, path)
	}

	/// Shorthand for a `PATCH` request.
	pub fn patch(path: impl Into<String>) -> Self {
		Self::new(Method::PATCH, path)
	}

	/// Shorthand for a `DELETE` request.
	pub fn delete(path: impl Into<String>) -> Self {
		Self::new(Method::DELETE, path)
	}

	/// Appends a query pair.
	pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.query.push((key.into(), value.into()));

		self
	}

	/// Appends a query pair when `value` is present.
	pub fn with_optional_query(self, key: impl Into<String>, value: Option<impl Into<String>>) -> Self {
		match value {
			Some(value) => self.with_query(key, value),
			None => self,
		}
	}

	/// Serializes `body` as the JSON payload.
	pub fn with_json<T>(mut self, body: &T) -> Result<Self, ConfigError>
	where
		T: ?Sized + Serialize,
	{
		self.body = Some(serde_json::to_vec(body).map_err(ConfigError::RequestBody)?);

		Ok(self)
	}

	/// Adds (or replaces) a header.
	pub fn with_header(mut self, name: ::http::HeaderName, value: HeaderValue) -> Self {
		self.headers.insert(name, value);

		self
	}

	/// Whether this request is the single resubmission after a refresh.
	pub fn is_retry(&self) -> bool {
		self.retried
	}

	pub(crate) fn mark_retry(&mut self) {
		self.retried = true;
	}
}
