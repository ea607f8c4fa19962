//! Inbound webhook verification and decoding.
//!
//! Callbacks carry `x-sinch-signature: base64(hmac_sha256(secret, raw_body))`. Validation is
//! fail-closed: a missing secret, body, or header and an undecodable header all yield `false`,
//! and the digest comparison runs in constant time.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;
// self
use crate::{_prelude::*, auth::TokenSecret, codec::TaggedUnion, error::ConfigError};

/// Header carrying the webhook signature.
pub const SIGNATURE_HEADER: &str = "x-sinch-signature";

type HmacSha256 = Hmac<Sha256>;

/// Stateless webhook signature checks.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureValidator;
impl SignatureValidator {
	/// Computes the signature header value for `body`.
	pub fn sign(secret: &str, body: &[u8]) -> Result<String, ConfigError> {
		Ok(STANDARD.encode(Self::mac(secret, body)?.finalize().into_bytes()))
	}

	/// Returns `true` only when `header` is the signature of `body` under `secret`.
	pub fn validate(secret: &str, body: &[u8], header: &str) -> bool {
		let header = header.trim();

		if secret.is_empty() || body.is_empty() || header.is_empty() {
			return false;
		}

		let (Ok(signature), Ok(mac)) = (STANDARD.decode(header), Self::mac(secret, body)) else {
			return false;
		};

		mac.verify_slice(&signature).is_ok()
	}

	/// Finds [`SIGNATURE_HEADER`] case-insensitively in `headers` and validates it.
	pub fn validate_headers<I, K, V>(secret: &str, body: &[u8], headers: I) -> bool
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		headers
			.into_iter()
			.find(|(name, _)| name.as_ref().eq_ignore_ascii_case(SIGNATURE_HEADER))
			.is_some_and(|(_, value)| Self::validate(secret, body, value.as_ref()))
	}

	fn mac(secret: &str, body: &[u8]) -> Result<HmacSha256, ConfigError> {
		let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
			.map_err(|_| ConfigError::InvalidSigningKey)?;

		mac.update(body);

		Ok(mac)
	}
}

/// Webhook helper bound to the configured secret.
#[derive(Clone, Debug, Default)]
pub struct Webhooks {
	secret: Option<TokenSecret>,
}
impl Webhooks {
	/// Binds the helper to `secret`; `None` rejects every payload.
	pub fn new(secret: Option<TokenSecret>) -> Self {
		Self { secret }
	}

	/// Returns `true` when a secret is configured.
	pub fn has_secret(&self) -> bool {
		self.secret.as_ref().is_some_and(|secret| !secret.is_empty())
	}

	/// Validates a signature header value against the raw body.
	pub fn validate(&self, body: &[u8], header: &str) -> bool {
		self.secret
			.as_ref()
			.is_some_and(|secret| SignatureValidator::validate(secret.expose(), body, header))
	}

	/// Validates the signature found in a header collection.
	pub fn validate_headers<I, K, V>(&self, body: &[u8], headers: I) -> bool
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		self.secret.as_ref().is_some_and(|secret| {
			SignatureValidator::validate_headers(secret.expose(), body, headers)
		})
	}

	/// Decodes a callback body into its event union.
	///
	/// Decoding does not check the signature; validate first.
	pub fn decode<U>(&self, body: &[u8]) -> Result<U>
	where
		U: TaggedUnion,
	{
		Ok(crate::codec::decode_slice(body)?)
	}
}
