// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for token lookups.
#[derive(Debug, Default)]
pub struct TokenMetrics {
	fetches: AtomicU64,
	forced: AtomicU64,
	failures: AtomicU64,
}
impl TokenMetrics {
	/// Returns the number of token endpoint calls.
	pub fn fetches(&self) -> u64 {
		self.fetches.load(Ordering::Relaxed)
	}

	/// Returns the number of lookups that demanded a forced refresh.
	pub fn forced(&self) -> u64 {
		self.forced.load(Ordering::Relaxed)
	}

	/// Returns the number of failed token endpoint calls.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_fetch(&self) {
		self.fetches.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_forced(&self) {
		self.forced.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}
