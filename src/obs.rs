//! Optional observability helpers for outbound requests.
//!
//! # Feature Flags
//!
//! - `tracing`: one `sinch_core.request` span per logical request carrying `kind`, `stage`,
//!   `auth`, `attempt`, and `status`, plus a debug event when an expired credential forces the
//!   second attempt.
//! - `metrics`: the `sinch_core_request_total{kind,outcome}` counter and, for transport calls,
//!   the `sinch_core_request_duration_seconds{kind,auth}` histogram.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Request families observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// JSON request sent through the transport.
	Send,
	/// Multipart request sent through the transport.
	Multipart,
	/// Token lookup or client-credentials exchange.
	Token,
	/// Page fetched by a paginated listing.
	Page,
}
impl RequestKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestKind::Send => "send",
			RequestKind::Multipart => "multipart",
			RequestKind::Token => "token",
			RequestKind::Page => "page",
		}
	}
}
impl Display for RequestKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RequestOutcome {
	/// Entry to a request helper.
	Attempt,
	/// Second attempt after an expired credential was renewed.
	Retry,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl RequestOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOutcome::Attempt => "attempt",
			RequestOutcome::Retry => "retry",
			RequestOutcome::Success => "success",
			RequestOutcome::Failure => "failure",
		}
	}
}
impl Display for RequestOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(RequestKind::Multipart.to_string(), "multipart");
		assert_eq!(RequestOutcome::Retry.as_str(), "retry");
	}
}
