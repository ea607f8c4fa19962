//! Authentication strategies: cached bearer credentials and per-request application signing.
//!
//! Both strategies attach an `authorization` header to every outbound request. Only the
//! token strategy is refreshable: its credential can be forced to renew after the server
//! reports an expired token. Signed requests carry a fresh signature each time, so there is
//! nothing to refresh.

pub mod credential;
pub mod signer;
pub mod token;

pub use credential::*;
pub use signer::*;
pub use token::*;

// self
use crate::_prelude::*;

/// Active auth strategy consulted by the transport for every request.
#[derive(Clone)]
pub enum AuthStrategy {
	/// Bearer credential from a cached, force-renewable provider.
	Token(Arc<dyn TokenProvider>),
	/// Application signature computed per request.
	Signed(Arc<dyn RequestSigner>),
}
impl AuthStrategy {
	/// Wraps a token provider.
	pub fn token(provider: impl TokenProvider + 'static) -> Self {
		Self::Token(Arc::new(provider))
	}

	/// Wraps a request signer.
	pub fn signed(signer: impl RequestSigner + 'static) -> Self {
		Self::Signed(Arc::new(signer))
	}

	/// Returns `true` when an unauthorized response may be retried with a renewed credential.
	pub fn is_refreshable(&self) -> bool {
		matches!(self, Self::Token(_))
	}

	/// Stable label suitable for span or log fields.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::Token(_) => "token",
			Self::Signed(_) => "signed",
		}
	}
}
impl Debug for AuthStrategy {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "AuthStrategy({})", self.as_str())
	}
}
