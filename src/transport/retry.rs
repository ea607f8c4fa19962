// crates.io
use reqwest::header::{HeaderMap, HeaderName};
// self
use crate::{config::ExpirySignalConfig, error::ConfigError};

/// Position of one logical request in the auth retry cycle.
///
/// The only path to [`RetryState::Retrying`] is from [`RetryState::FirstAttempt`] after an
/// unauthorized response that a refreshable strategy reports as an expired token. Every other
/// non-success outcome ends in [`RetryState::Done`], so a request is sent at most twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryState {
	/// First send, using whatever credential is cached.
	FirstAttempt,
	/// Second send, with a credential fetched after the expiry was observed.
	Retrying,
	/// No further sends.
	Done,
}
impl RetryState {
	/// Whether the credential for this attempt must be freshly fetched.
	pub fn force_refresh(self) -> bool {
		matches!(self, Self::Retrying)
	}

	/// Next state after a non-success response.
	pub fn advance(self, expired_token: bool) -> Self {
		match (self, expired_token) {
			(Self::FirstAttempt, true) => Self::Retrying,
			_ => Self::Done,
		}
	}
}

/// Decides whether an unauthorized response means the bearer token expired.
pub trait ExpirySignal
where
	Self: Send + Sync,
{
	/// Returns `true` when the 401 response headers report an expired token.
	fn is_expired(&self, headers: &HeaderMap) -> bool;
}

/// [`ExpirySignal`] that looks for a marker substring inside one response header.
#[derive(Clone, Debug)]
pub struct HeaderExpirySignal {
	header: HeaderName,
	needle: String,
}
impl HeaderExpirySignal {
	/// Matches `needle` (case-insensitive) inside any value of `header`.
	pub fn new(header: &str, needle: &str) -> Result<Self, ConfigError> {
		let header = HeaderName::from_bytes(header.as_bytes())
			.map_err(|_| ConfigError::InvalidHeader { header: header.to_owned() })?;

		Ok(Self { header, needle: needle.to_ascii_lowercase() })
	}

	/// Builds the signal described by the client configuration.
	pub fn from_config(config: &ExpirySignalConfig) -> Result<Self, ConfigError> {
		Self::new(&config.header, &config.needle)
	}
}
impl Default for HeaderExpirySignal {
	fn default() -> Self {
		Self { header: reqwest::header::WWW_AUTHENTICATE, needle: "expired".into() }
	}
}
impl ExpirySignal for HeaderExpirySignal {
	fn is_expired(&self, headers: &HeaderMap) -> bool {
		headers.get_all(&self.header).iter().any(|value| {
			value
				.to_str()
				.is_ok_and(|value| value.to_ascii_lowercase().contains(self.needle.as_str()))
		})
	}
}
