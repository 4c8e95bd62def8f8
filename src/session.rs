//! Session state owner: access token, CSRF token, refresh hint, and refresh coordination.
//!
//! A [`Session`] is shared (behind `Arc`) by every clone of an
//! [`ApiClient`](crate::client::ApiClient) and is the only place token state is written.
//! Refresh coordination uses an async gate plus a settlement epoch: a caller snapshots
//! [`Session::refresh_epoch`] before sending a request and, if that request comes back 401,
//! calls [`Session::begin_refresh`] with the snapshot.
//! The first caller through the gate with an unchanged epoch becomes the
//! [`RefreshTurn::Leader`]; everyone queued behind it sees the epoch move once the leader's
//! [`RefreshLease`] drops and gets [`RefreshTurn::Settled`].

pub mod secret;

pub use secret::TokenSecret;

// std
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
// self
use crate::_prelude::*;

#[derive(Clone, Debug)]
struct SessionTokens {
	access_token: Option<TokenSecret>,
	csrf_token: Option<TokenSecret>,
	can_refresh: bool,
}

/// Token state shared by every request issued through one client.
pub struct Session {
	tokens: RwLock<SessionTokens>,
	refresh_gate: AsyncMutex<()>,
	csrf_gate: AsyncMutex<()>,
	refresh_epoch: AtomicU64,
	refreshing: AtomicBool,
	waiters: AtomicUsize,
}
impl Session {
	/// Creates an empty session.
	///
	/// The refresh hint starts out `true`: without diagnostics the client assumes a refresh
	/// cookie may exist, which matches a browser tab that was reloaded mid-session.
	pub fn new() -> Self {
		Self::with_refresh_hint(true)
	}

	/// Creates an empty session with an explicit refresh hint.
	pub fn with_refresh_hint(can_refresh: bool) -> Self {
		Self {
			tokens: RwLock::new(SessionTokens {
				access_token: None,
				csrf_token: None,
				can_refresh,
			}),
			refresh_gate: AsyncMutex::new(()),
			csrf_gate: AsyncMutex::new(()),
			refresh_epoch: AtomicU64::new(0),
			refreshing: AtomicBool::new(false),
			waiters: AtomicUsize::new(0),
		}
	}

	/// Returns the current access token, if any.
	pub fn access_token(&self) -> Option<TokenSecret> {
		self.tokens.read().access_token.clone()
	}

	/// Replaces (or clears) the access token attached to subsequent requests.
	pub fn set_access_token(&self, token: Option<TokenSecret>) {
		self.tokens.write().access_token = token;
	}

	/// Returns the cached CSRF token, if one has been issued.
	pub fn csrf_token(&self) -> Option<TokenSecret> {
		self.tokens.read().csrf_token.clone()
	}

	/// Replaces (or clears) the cached CSRF token.
	pub fn set_csrf_token(&self, token: Option<TokenSecret>) {
		self.tokens.write().csrf_token = token;
	}

	/// Hint that a refresh cookie exists server-side.
	pub fn can_refresh(&self) -> bool {
		self.tokens.read().can_refresh
	}

	/// Overrides the refresh hint.
	pub fn set_can_refresh(&self, can_refresh: bool) {
		self.tokens.write().can_refresh = can_refresh;
	}

	/// Installs a token issued by login, signup, or refresh and marks refresh as possible.
	pub fn install(&self, token: TokenSecret) {
		let mut tokens = self.tokens.write();

		tokens.access_token = Some(token);
		tokens.can_refresh = true;
	}

	/// Drops the access token and the refresh hint together. The CSRF token survives.
	pub fn clear(&self) {
		let mut tokens = self.tokens.write();

		tokens.access_token = None;
		tokens.can_refresh = false;
	}

	/// Whether a refresh is currently in flight.
	pub fn is_refreshing(&self) -> bool {
		self.refreshing.load(Ordering::Acquire)
	}

	/// Number of callers queued behind the refresh gate.
	pub fn pending_refresh_waiters(&self) -> usize {
		self.waiters.load(Ordering::Acquire)
	}

	/// Settlement counter; advances each time a refresh finishes (successfully or not).
	pub fn refresh_epoch(&self) -> u64 {
		self.refresh_epoch.load(Ordering::Acquire)
	}

	/// Waits for the refresh gate.
	///
	/// `observed_epoch` must be read via [`Session::refresh_epoch`] before the request that
	/// failed was sent. If a refresh settled since then, the caller shares that outcome
	/// instead of starting another one.
	pub async fn begin_refresh(&self, observed_epoch: u64) -> RefreshTurn<'_> {
		let waiting = WaiterSlot::enter(&self.waiters);
		let guard = self.refresh_gate.lock().await;

		drop(waiting);

		if self.refresh_epoch() != observed_epoch {
			return RefreshTurn::Settled;
		}

		self.refreshing.store(true, Ordering::Release);

		RefreshTurn::Leader(RefreshLease { session: self, _guard: guard })
	}

	pub(crate) fn csrf_gate(&self) -> &AsyncMutex<()> {
		&self.csrf_gate
	}
}
impl Default for Session {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for Session {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let tokens = self.tokens.read();

		f.debug_struct("Session")
			.field("access_token_set", &tokens.access_token.is_some())
			.field("csrf_token_set", &tokens.csrf_token.is_some())
			.field("can_refresh", &tokens.can_refresh)
			.field("refreshing", &self.is_refreshing())
			.finish()
	}
}

/// Outcome of [`Session::begin_refresh`].
#[derive(Debug)]
pub enum RefreshTurn<'a> {
	/// The caller must perform the refresh; dropping the lease settles it.
	Leader(RefreshLease<'a>),
	/// Another caller's refresh settled while this one waited.
	Settled,
}

// Counts a caller queued on the refresh gate; leaves on drop so abandoned waits are uncounted.
struct WaiterSlot<'a>(&'a AtomicUsize);
impl<'a> WaiterSlot<'a> {
	fn enter(waiters: &'a AtomicUsize) -> Self {
		waiters.fetch_add(1, Ordering::AcqRel);

		Self(waiters)
	}
}
impl Drop for WaiterSlot<'_> {
	fn drop(&mut self) {
		self.0.fetch_sub(1, Ordering::AcqRel);
	}
}

/// Exclusive right to run the refresh call.
///
/// Dropping the lease (including when the owning future is cancelled) advances the epoch,
/// clears the in-flight flag, and lets the queued waiters through the gate one at a time.
/// The gate is only eventually fair, so waiters are not guaranteed to resume in arrival
/// order; every one of them sees the advanced epoch regardless.
pub struct RefreshLease<'a> {
	session: &'a Session,
	_guard: AsyncMutexGuard<'a, ()>,
}
impl Drop for RefreshLease<'_> {
	fn drop(&mut self) {
		self.session.refresh_epoch.fetch_add(1, Ordering::AcqRel);
		self.session.refreshing.store(false, Ordering::Release);
	}
}
impl Debug for RefreshLease<'_> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RefreshLease(..)")
	}
}
