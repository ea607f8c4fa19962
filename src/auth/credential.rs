//! Bearer credentials and the redacting secret wrapper they carry.

// self
use crate::_prelude::*;

/// Redacted secret wrapper keeping sensitive material out of logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSecret(String);
impl TokenSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the inner value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Returns `true` for an empty secret.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
impl AsRef<str> for TokenSecret {
	fn as_ref(&self) -> &str {
		self.expose()
	}
}
impl Debug for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("TokenSecret").field(&"<redacted>").finish()
	}
}
impl Display for TokenSecret {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("<redacted>")
	}
}

/// Bearer credential issued by the token endpoint.
///
/// Credentials are immutable; a refresh replaces the whole value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credential {
	/// Authorization scheme name, e.g. `Bearer`.
	pub scheme: String,
	/// Opaque token value.
	pub token: TokenSecret,
	/// Instant the credential was received.
	pub issued_at: OffsetDateTime,
	/// Expiry reported by the token endpoint, if any.
	pub expires_at: Option<OffsetDateTime>,
}
impl Credential {
	/// Scheme used for OAuth access tokens.
	pub const BEARER: &'static str = "Bearer";

	/// Creates a bearer credential issued now without a known expiry.
	pub fn bearer(token: impl Into<String>) -> Self {
		Self {
			scheme: Self::BEARER.into(),
			token: TokenSecret::new(token),
			issued_at: OffsetDateTime::now_utc(),
			expires_at: None,
		}
	}

	/// Records a relative lifetime measured from `issued_at`.
	pub fn with_expires_in(mut self, lifetime: Duration) -> Self {
		self.expires_at = self.issued_at.checked_add(lifetime);

		self
	}

	/// Returns `true` once a known expiry has passed.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}

	/// Value for the `authorization` header.
	pub fn header_value(&self) -> String {
		format!("{} {}", self.scheme, self.token.expose())
	}
}
