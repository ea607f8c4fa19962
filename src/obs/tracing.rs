// self
use crate::{_prelude::*, obs::RequestKind};

/// Future returned by [`RequestSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(feature = "tracing")]
pub type InstrumentedRequest<F> = tracing::instrument::Instrumented<F>;
/// Future returned by [`RequestSpan::instrument`]; a plain passthrough without `tracing`.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedRequest<F> = F;

/// Span covering one logical request, the renewed-credential attempt included.
///
/// Fields: `kind`, `stage`, `auth` (strategy, when one applies), `attempt` (1 or 2), and
/// `status` (last HTTP status seen).
#[derive(Clone, Debug)]
pub struct RequestSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl RequestSpan {
	/// Opens a span for `kind` at call site `stage`.
	pub fn new(kind: RequestKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"sinch_core.request",
				kind = kind.as_str(),
				stage,
				auth = tracing::field::Empty,
				attempt = 1_u8,
				status = tracing::field::Empty,
			);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Tags the span with the auth strategy attached to the request.
	pub fn with_auth(self, strategy: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		self.span.record("auth", strategy);
		#[cfg(not(feature = "tracing"))]
		let _ = strategy;

		self
	}

	/// Records the HTTP status of the latest response.
	pub fn record_status(&self, status: u16) {
		#[cfg(feature = "tracing")]
		self.span.record("status", status);
		#[cfg(not(feature = "tracing"))]
		let _ = status;
	}

	/// Marks the switch to the second attempt after `status` reported an expired credential.
	pub fn record_retry(&self, status: u16) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("attempt", 2_u8);
			tracing::debug!(parent: &self.span, status, "credential expired; retrying once");
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = status;
		}
	}

	/// Runs `fut` inside the span, entering it only while the future is polled.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedRequest<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn span_fields_do_not_disturb_the_output() {
		let span = RequestSpan::new(RequestKind::Send, "transport").with_auth("signed");

		span.record_status(401);
		span.record_retry(401);
		span.record_status(200);

		assert_eq!(span.instrument(async { 42 }).await, 42);
	}
}
