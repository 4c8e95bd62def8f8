//! Authenticated request pipeline.
//!
//! Every call goes through [`ApiClient::request`]: pre-flight attaches the bearer token and
//! the CSRF header (bootstrapping the CSRF token on first use), and a 401 from a protected
//! endpoint triggers one shared refresh followed by exactly one resubmission.

pub mod auth;
pub mod refresh;
pub mod request;

pub use auth::*;
pub use refresh::*;
pub use request::*;

// crates.io
use ::http::{HeaderName, header::AUTHORIZATION, header::CONTENT_TYPE};
// self
#[cfg(feature = "reqwest")] use crate::http::ReqwestHttpClient;
use crate::{
	_prelude::*,
	config::ClientConfig,
	error::{ConfigError, TransportError},
	http::{ApiHttpClient, ApiResponse, PreparedRequest},
	obs::{self, FlowKind},
	session::{Session, TokenSecret},
};

/// Header carrying the cached CSRF token.
pub const CSRF_HEADER: &str = "x-csrf-token";

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestApiClient = ApiClient<ReqwestHttpClient>;

/// Authenticated FinSmart API client.
///
/// Clones share the transport, configuration, session state, and refresh metrics, so a
/// refresh triggered through one clone is observed by all of them.
pub struct ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// HTTP transport used for every outbound request.
	pub http_client: Arc<C>,
	/// Base URL and endpoint paths.
	pub config: Arc<ClientConfig>,
	/// Token state shared across clones.
	pub session: Arc<Session>,
	/// Shared counters for refresh outcomes.
	pub refresh_metrics: Arc<RefreshMetrics>,
}
impl<C> ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	/// Creates a client over a caller-provided transport with a fresh session.
	pub fn with_http_client(config: ClientConfig, http_client: impl Into<Arc<C>>) -> Self {
		Self {
			http_client: http_client.into(),
			config: Arc::new(config),
			session: Default::default(),
			refresh_metrics: Default::default(),
		}
	}

	/// Replaces the session, e.g. to share one session between clients or to seed state.
	pub fn with_session(mut self, session: Arc<Session>) -> Self {
		self.session = session;

		self
	}

	/// Sets (or clears) the access token attached to subsequent requests.
	pub fn set_access_token(&self, token: Option<TokenSecret>) {
		self.session.set_access_token(token);
	}

	/// Returns the cached CSRF token, fetching it once if needed.
	///
	/// Concurrent callers arriving before the first fetch resolves share that fetch.
	pub async fn ensure_csrf(&self) -> Result<Option<TokenSecret>> {
		if let Some(token) = self.session.csrf_token() {
			return Ok(Some(token));
		}

		obs::observe(FlowKind::Csrf, "ensure_csrf", self.fetch_csrf()).await
	}

	async fn fetch_csrf(&self) -> Result<Option<TokenSecret>> {
		#[derive(Deserialize)]
		#[serde(rename_all = "camelCase")]
		struct CsrfBody {
			csrf_token: Option<String>,
		}

		let _singleflight = self.session.csrf_gate().lock().await;

		if let Some(token) = self.session.csrf_token() {
			return Ok(Some(token));
		}

		let request = ApiRequest::get(self.config.endpoints.csrf.as_str());
		let response = self.execute(&request).await?;
		let body = self.check_status(&request, response)?.json::<CsrfBody>()?;
		let token = body.csrf_token.filter(|value| !value.is_empty()).map(TokenSecret::new);

		if token.is_some() {
			self.session.set_csrf_token(token.clone());
		}

		Ok(token)
	}

	/// Issues a request with authentication, CSRF, and single-flight refresh recovery.
	pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
		obs::observe(FlowKind::Request, "request", self.request_with_recovery(request)).await
	}

	/// Issues a request and decodes the JSON response body.
	pub async fn request_json<T>(&self, request: ApiRequest) -> Result<T>
	where
		T: DeserializeOwned,
	{
		Ok(self.request(request).await?.json()?)
	}

	/// Shorthand for a `GET` through [`ApiClient::request`].
	pub async fn get(&self, path: &str) -> Result<ApiResponse> {
		self.request(ApiRequest::get(path)).await
	}

	/// Shorthand for a JSON `POST` through [`ApiClient::request`].
	pub async fn post<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(ApiRequest::post(path).with_json(body)?).await
	}

	/// Shorthand for a JSON `PATCH` through [`ApiClient::request`].
	pub async fn patch<B>(&self, path: &str, body: &B) -> Result<ApiResponse>
	where
		B: ?Sized + Serialize,
	{
		self.request(ApiRequest::patch(path).with_json(body)?).await
	}

	/// Shorthand for a `DELETE` through [`ApiClient::request`].
	pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
		self.request(ApiRequest::delete(path)).await
	}

	async fn request_with_recovery(&self, mut request: ApiRequest) -> Result<ApiResponse> {
		// Taken before sending: a refresh that settles while this request is in flight already
		// covers its 401.
		let observed_epoch = self.session.refresh_epoch();
		let response = self.dispatch(&request).await?;

		if !self.should_recover(&request, &response) {
			return self.check_status(&request, response);
		}

		self.recover_session(&request.path, observed_epoch).await;
		request.mark_retry();

		let response = self.dispatch(&request).await?;

		self.check_status(&request, response)
	}

	fn should_recover(&self, request: &ApiRequest, response: &ApiResponse) -> bool {
		response.status == StatusCode::UNAUTHORIZED
			&& !request.is_retry()
			&& !self.config.endpoints.is_exempt(&request.path)
			&& self.session.can_refresh()
	}

	/// Dispatches once without refresh recovery, mapping non-2xx statuses to errors.
	pub(crate) async fn send_once(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let response = self.dispatch(request).await?;

		self.check_status(request, response)
	}

	async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
		if self.session.csrf_token().is_none() && !self.config.endpoints.is_csrf(&request.path) {
			self.ensure_csrf().await?;
		}

		self.execute(request).await
	}

	async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse> {
		let prepared = self.prepare(request)?;

		self.http_client
			.execute(prepared)
			.await
			.map_err(|err| TransportError::network(err).into())
	}

	fn prepare(&self, request: &ApiRequest) -> Result<PreparedRequest> {
		let url = self.config.resolve(&request.path, &request.query)?;
		let mut headers = request.headers.clone();

		if !headers.contains_key(AUTHORIZATION) {
			if let Some(token) = self.session.access_token() {
				headers.insert(
					AUTHORIZATION,
					sensitive_header(&format!("Bearer {}", token.expose()), "authorization")?,
				);
			}
		}

		let csrf_header = HeaderName::from_static(CSRF_HEADER);

		if !headers.contains_key(&csrf_header) {
			if let Some(token) = self.session.csrf_token() {
				headers.insert(csrf_header, sensitive_header(token.expose(), CSRF_HEADER)?);
			}
		}
		if request.body.is_some() && !headers.contains_key(CONTENT_TYPE) {
			headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		}

		Ok(PreparedRequest {
			method: request.method.clone(),
			url,
			headers,
			body: request.body.clone(),
		})
	}

	fn check_status(&self, request: &ApiRequest, response: ApiResponse) -> Result<ApiResponse> {
		if response.is_success() {
			return Ok(response);
		}

		Err(Error::Status {
			status: response.status.as_u16(),
			message: response.error_message(),
			path: request.path.clone(),
		})
	}
}
#[cfg(feature = "reqwest")]
impl ApiClient<ReqwestHttpClient> {
	/// Creates a client backed by a cookie-enabled reqwest transport.
	pub fn new(config: ClientConfig) -> Result<Self> {
		Ok(Self::with_http_client(config, ReqwestHttpClient::new()?))
	}

	/// Creates a reqwest-backed client configured from the environment.
	pub fn from_env() -> Result<Self> {
		Self::new(ClientConfig::from_env()?)
	}
}
impl<C> Clone for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			http_client: Arc::clone(&self.http_client),
			config: Arc::clone(&self.config),
			session: Arc::clone(&self.session),
			refresh_metrics: Arc::clone(&self.refresh_metrics),
		}
	}
}
impl<C> Debug for ApiClient<C>
where
	C: ?Sized + ApiHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApiClient")
			.field("base_url", &self.config.base_url.as_str())
			.field("session", &self.session)
			.finish()
	}
}

fn sensitive_header(raw: &str, name: &'static str) -> Result<HeaderValue, ConfigError> {
	let mut value = HeaderValue::from_str(raw).map_err(|_| ConfigError::InvalidHeader { name })?;

	value.set_sensitive(true);

	Ok(value)
}
