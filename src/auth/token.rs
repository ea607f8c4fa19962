//! Bearer token provider with a shared cache and singleflight fetches.
//!
//! [`CachedTokenProvider`] hands the cached [`Credential`] to every caller until it is
//! missing, past a reported expiry, or a caller forces a refresh. Fetches run under a single
//! async guard so concurrent callers piggy-back on the same in-flight call instead of
//! stampeding the token endpoint. Each fetch is stamped with a sequence number taken when it
//! starts, and a forced caller only accepts a credential whose fetch started after the caller
//! arrived. Forced callers queued behind the same in-flight fetch therefore share the fetch
//! that follows it, while a forced caller arriving after a fetch has started waits for a newer
//! one.

mod metrics;

pub use metrics::TokenMetrics;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::Credential,
	obs::{self, RequestKind, RequestOutcome, RequestSpan},
};

/// Boxed future returned by [`TokenProvider::get_token`].
pub type TokenFuture<'a> = Pin<Box<dyn Future<Output = Result<Arc<Credential>>> + 'a + Send>>;
/// Boxed future returned by [`CredentialIssuer::issue`].
pub type IssueFuture<'a> = Pin<Box<dyn Future<Output = Result<Credential>> + 'a + Send>>;

/// Source of bearer credentials consulted by the transport.
///
/// Implementations must be safe to call concurrently. A non-forced call may return a cached
/// credential; a forced call must return a credential fetched after the call began.
pub trait TokenProvider
where
	Self: Send + Sync,
{
	/// Returns the active credential, renewing it when `force_refresh` is set.
	fn get_token(&self, force_refresh: bool) -> TokenFuture<'_>;
}

/// Network call that mints a new credential.
///
/// Failures propagate unchanged; retrying is the transport's job.
pub trait CredentialIssuer
where
	Self: Send + Sync,
{
	/// Requests a new credential from the token endpoint.
	fn issue(&self) -> IssueFuture<'_>;
}

struct CachedCredential {
	sequence: u64,
	credential: Arc<Credential>,
}

/// [`TokenProvider`] that caches the credential minted by a [`CredentialIssuer`].
pub struct CachedTokenProvider<I>
where
	I: ?Sized + CredentialIssuer,
{
	issuer: Arc<I>,
	cache: RwLock<Option<CachedCredential>>,
	fetch_guard: AsyncMutex<()>,
	fetch_sequence: AtomicU64,
	metrics: TokenMetrics,
}
impl<I> CachedTokenProvider<I>
where
	I: ?Sized + CredentialIssuer,
{
	/// Creates an empty cache in front of `issuer`.
	pub fn new(issuer: impl Into<Arc<I>>) -> Self {
		Self {
			issuer: issuer.into(),
			cache: RwLock::new(None),
			fetch_guard: AsyncMutex::new(()),
			fetch_sequence: AtomicU64::new(0),
			metrics: TokenMetrics::default(),
		}
	}

	/// Counters describing cache behavior.
	pub fn metrics(&self) -> &TokenMetrics {
		&self.metrics
	}

	/// Returns the cached credential without validating it.
	pub fn cached(&self) -> Option<Arc<Credential>> {
		self.cache.read().as_ref().map(|entry| entry.credential.clone())
	}

	/// Drops the cached credential; the next lookup fetches a new one.
	pub fn invalidate(&self) {
		*self.cache.write() = None;
	}

	async fn lookup(&self, force_refresh: bool) -> Result<Arc<Credential>> {
		let ticket = self.fetch_sequence.load(Ordering::Acquire);

		if force_refresh {
			self.metrics.record_forced();
		} else if let Some(credential) = self.reusable(false, ticket) {
			return Ok(credential);
		}

		let _singleflight = self.fetch_guard.lock().await;

		if let Some(credential) = self.reusable(force_refresh, ticket) {
			return Ok(credential);
		}

		let sequence = self.fetch_sequence.fetch_add(1, Ordering::AcqRel) + 1;

		self.metrics.record_fetch();

		let credential = self.issuer.issue().await.inspect_err(|_| {
			self.metrics.record_failure();
		})?;
		let credential = Arc::new(credential);

		*self.cache.write() = Some(CachedCredential { sequence, credential: credential.clone() });

		Ok(credential)
	}

	fn reusable(&self, force_refresh: bool, ticket: u64) -> Option<Arc<Credential>> {
		let cache = self.cache.read();
		let entry = cache.as_ref()?;

		if force_refresh {
			return (entry.sequence > ticket).then(|| entry.credential.clone());
		}
		if entry.credential.is_expired_at(OffsetDateTime::now_utc()) {
			return None;
		}

		Some(entry.credential.clone())
	}
}
impl<I> TokenProvider for CachedTokenProvider<I>
where
	I: ?Sized + CredentialIssuer,
{
	fn get_token(&self, force_refresh: bool) -> TokenFuture<'_> {
		const KIND: RequestKind = RequestKind::Token;

		Box::pin(async move {
			let span =
				RequestSpan::new(KIND, if force_refresh { "force_refresh" } else { "get_token" });

			obs::record_request_outcome(KIND, RequestOutcome::Attempt);

			let result = span.instrument(self.lookup(force_refresh)).await;

			match &result {
				Ok(_) => obs::record_request_outcome(KIND, RequestOutcome::Success),
				Err(_) => obs::record_request_outcome(KIND, RequestOutcome::Failure),
			}

			result
		})
	}
}
impl<I> Debug for CachedTokenProvider<I>
where
	I: ?Sized + CredentialIssuer,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CachedTokenProvider")
			.field("cached", &self.cache.read().is_some())
			.field("metrics", &self.metrics)
			.finish()
	}
}
