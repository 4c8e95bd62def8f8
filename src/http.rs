//! Transport primitives for API calls.
//!
//! The module exposes [`ApiHttpClient`] alongside the fully resolved [`PreparedRequest`] and
//! the buffered [`ApiResponse`] so downstream crates can plug in custom HTTP stacks (or test
//! doubles) without touching the client's authentication pipeline. Transports only move
//! bytes: bearer tokens, CSRF headers, and refresh recovery are applied by
//! [`ApiClient`](crate::client::ApiClient) before a request reaches them.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// self
use crate::{_prelude::*, error::DecodeError};

/// Boxed future returned by [`ApiHttpClient::execute`].
pub type TransportFuture<'a, E> =
	Pin<Box<dyn Future<Output = Result<ApiResponse, E>> + 'a + Send>>;

/// Abstraction over HTTP transports capable of executing prepared API requests.
///
/// The trait acts as the client's only dependency on an HTTP stack. Implementations must be
/// `Send + Sync + 'static` so one transport can back many clones of
/// [`ApiClient`](crate::client::ApiClient), and the futures they return must be `Send` so
/// requests can hop executor threads.
///
/// A transport reports an error only when no response was received. Every HTTP status,
/// including 4xx and 5xx, is returned as an [`ApiResponse`] so the client can classify it.
pub trait ApiHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Concrete error emitted by the underlying transport.
	type TransportError: 'static + Send + Sync + StdError;

	/// Dispatches the request and buffers the full response body.
	fn execute(&self, request: PreparedRequest) -> TransportFuture<'_, Self::TransportError>;
}

/// Fully resolved request handed to a transport.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute URL, including the query string.
	pub url: Url,
	/// Final header set, including authentication headers.
	pub headers: HeaderMap,
	/// Serialized body, if any.
	pub body: Option<Vec<u8>>,
}

/// Buffered API response.
#[derive(Clone, Debug)]
pub struct ApiResponse {
	/// HTTP status code.
	pub status: StatusCode,
	/// Response headers.
	pub headers: HeaderMap,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl ApiResponse {
	/// Builds a response from its parts.
	pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Vec<u8>>) -> Self {
		Self { status, headers, body: body.into() }
	}

	/// Whether the status is in the 2xx range.
	pub fn is_success(&self) -> bool {
		self.status.is_success()
	}

	/// Decodes the body as JSON, reporting the failing path on mismatch.
	pub fn json<T>(&self) -> Result<T, DecodeError>
	where
		T: DeserializeOwned,
	{
		let mut de = serde_json::Deserializer::from_slice(&self.body);

		serde_path_to_error::deserialize(&mut de)
			.map_err(|source| DecodeError::Json { source, status: self.status.as_u16() })
	}

	/// Extracts the `error` field the API places in failure bodies.
	pub fn error_message(&self) -> Option<String> {
		#[derive(Deserialize)]
		struct ErrorBody {
			error: Option<String>,
		}

		serde_json::from_slice::<ErrorBody>(&self.body)
			.ok()
			.and_then(|body| body.error)
			.filter(|message| !message.trim().is_empty())
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// [`ReqwestHttpClient::new`] enables reqwest's cookie store: the refresh flow depends on the
/// session cookie set by login riding along on every later request. Configure any custom
/// [`ReqwestClient`] passed to [`ReqwestHttpClient::with_client`] the same way.
#[cfg(feature = "reqwest")]
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Builds a reqwest client with a cookie store.
	pub fn new() -> Result<Self, crate::error::ConfigError> {
		let client = ReqwestClient::builder()
			.cookie_store(true)
			.build()
			.map_err(crate::error::ConfigError::http_client_build)?;

		Ok(Self(client))
	}

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl ApiHttpClient for ReqwestHttpClient {
	type TransportError = ReqwestError;

	fn execute(&self, request: PreparedRequest) -> TransportFuture<'_, Self::TransportError> {
		let client = self.0.clone();

		Box::pin(async move {
			let PreparedRequest { method, url, headers, body } = request;
			let mut builder = client.request(method, url).headers(headers);

			if let Some(body) = body {
				builder = builder.body(body);
			}

			let response = builder.send().await?;
			let status = response.status();
			let headers = response.headers().to_owned();
			let body = response.bytes().await?.to_vec();

			Ok(ApiResponse::new(status, headers, body))
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn response(status: u16, body: &str) -> ApiResponse {
		ApiResponse::new(
			StatusCode::from_u16(status).expect("Fixture status should be valid."),
			HeaderMap::new(),
			body.as_bytes().to_vec(),
		)
	}

	#[test]
	fn error_message_reads_error_field() {
		assert_eq!(
			response(400, "{\"error\":\"Insufficient funds\"}").error_message(),
			Some("Insufficient funds".into()),
		);
		assert_eq!(response(500, "<html>oops</html>").error_message(), None);
		assert_eq!(response(400, "{\"error\":\"  \"}").error_message(), None);
	}

	#[test]
	fn json_decode_reports_status_on_failure() {
		let err = response(200, "[1,2,")
			.json::<Vec<u8>>()
			.expect_err("Truncated JSON should fail to decode.");

		match err {
			DecodeError::Json { status, .. } => assert_eq!(status, 200),
		}
	}
}
