//! Per-request application signing, the non-refreshable auth strategy.
//!
//! The canonical string covers, in order and separated by `\n`:
//!
//! 1. the upper-cased HTTP method,
//! 2. `base64(md5(body))`, or an empty line when the request has no body,
//! 3. the request content type,
//! 4. `x-timestamp:<timestamp>`,
//! 5. the path and query of the request URL.
//!
//! The signature is `base64(hmac_sha256(base64_decode(secret), canonical))` and travels as
//! `authorization: Application <key>:<signature>` next to the `x-timestamp` header it covers.

// crates.io
use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;
use time::format_description::well_known::Rfc3339;
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Header carrying the signed timestamp.
pub const TIMESTAMP_HEADER: &str = "x-timestamp";

type HmacSha256 = Hmac<Sha256>;

/// Request fields covered by a signature. Built once per attempt and never persisted.
#[derive(Clone, Copy, Debug)]
pub struct SignedRequestContext<'a> {
	/// HTTP method; upper-cased before signing.
	pub method: &'a str,
	/// Path plus optional `?query` of the request URL.
	pub path_and_query: &'a str,
	/// Value sent in the `x-timestamp` header.
	pub timestamp: &'a str,
	/// Content type of the body, or empty when there is none.
	pub content_type: &'a str,
	/// Raw body bytes.
	pub body: &'a [u8],
}
impl SignedRequestContext<'_> {
	/// Builds the canonical string hashed by [`ApplicationSigner`].
	pub fn canonical_string(&self) -> String {
		let digest = if self.body.is_empty() {
			String::new()
		} else {
			STANDARD.encode(Md5::digest(self.body))
		};

		format!(
			"{}\n{}\n{}\n{TIMESTAMP_HEADER}:{}\n{}",
			self.method.to_ascii_uppercase(),
			digest,
			self.content_type,
			self.timestamp,
			self.path_and_query,
		)
	}
}

/// Computes request signatures. Implementations are pure: no caching, no I/O.
pub trait RequestSigner
where
	Self: Send + Sync,
{
	/// Signs the request described by `context`.
	fn sign(&self, context: &SignedRequestContext<'_>) -> String;

	/// Formats the `authorization` header value for a computed signature.
	fn authorization(&self, signature: &str) -> String;
}

/// Signer for application key/secret pairs.
///
/// The decoded secret only lives inside the keyed MAC, which is cloned per request.
#[derive(Clone)]
pub struct ApplicationSigner {
	key: String,
	mac: HmacSha256,
}
impl ApplicationSigner {
	/// Authorization scheme name.
	pub const SCHEME: &'static str = "Application";

	/// Creates a signer from the application key and its base64-encoded secret.
	pub fn new(key: impl Into<String>, secret: &TokenSecret) -> Result<Self, ConfigError> {
		let secret = STANDARD
			.decode(secret.expose())
			.map_err(|source| ConfigError::InvalidApplicationSecret { source })?;
		let mac =
			HmacSha256::new_from_slice(&secret).map_err(|_| ConfigError::InvalidSigningKey)?;

		Ok(Self { key: key.into(), mac })
	}

	/// Application key sent in the clear.
	pub fn key(&self) -> &str {
		&self.key
	}
}
impl RequestSigner for ApplicationSigner {
	fn sign(&self, context: &SignedRequestContext<'_>) -> String {
		let mut mac = self.mac.clone();

		mac.update(context.canonical_string().as_bytes());

		STANDARD.encode(mac.finalize().into_bytes())
	}

	fn authorization(&self, signature: &str) -> String {
		format!("{} {}:{signature}", Self::SCHEME, self.key)
	}
}
impl Debug for ApplicationSigner {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ApplicationSigner")
			.field("key", &self.key)
			.field("secret", &"<redacted>")
			.finish()
	}
}

/// Formats the current UTC instant for the `x-timestamp` header.
pub fn timestamp_now() -> Result<String, ConfigError> {
	Ok(OffsetDateTime::now_utc().format(&Rfc3339)?)
}
