// std
use std::time::Duration as StdDuration;
// self
use crate::obs::{RequestKind, RequestOutcome};

/// Bumps `sinch_core_request_total{kind,outcome}` when the `metrics` feature is on.
pub fn record_request_outcome(kind: RequestKind, outcome: RequestOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"sinch_core_request_total",
			"kind" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records end-to-end latency, retries included, in
/// `sinch_core_request_duration_seconds{kind,auth}`.
pub fn record_request_latency(kind: RequestKind, auth: &'static str, elapsed: StdDuration) {
	#[cfg(feature = "metrics")]
	{
		metrics::histogram!(
			"sinch_core_request_duration_seconds",
			"kind" => kind.as_str(),
			"auth" => auth
		)
		.record(elapsed.as_secs_f64());
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, auth, elapsed);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recording_without_a_recorder_is_a_noop() {
		record_request_outcome(RequestKind::Page, RequestOutcome::Failure);
		record_request_latency(RequestKind::Multipart, "signed", StdDuration::from_millis(12));
	}
}
