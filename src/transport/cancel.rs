// std
use std::pin::pin;
// crates.io
use futures::future::{self, Either};
use tokio_util::sync::CancellationToken;
// self
use crate::_prelude::*;

/// Races `fut` against `token`; the loser is dropped, which aborts any in-flight request.
pub(crate) async fn with_cancellation<F, T>(token: &CancellationToken, fut: F) -> Result<T>
where
	F: Future<Output = Result<T>>,
{
	if token.is_cancelled() {
		return Err(Error::Cancelled);
	}

	let fut = pin!(fut);
	let cancelled = pin!(token.cancelled());

	match future::select(fut, cancelled).await {
		Either::Left((result, _)) => result,
		Either::Right(((), _)) => Err(Error::Cancelled),
	}
}
