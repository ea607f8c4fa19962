//! Client configuration and its validating builder.

// crates.io
use reqwest::header::{HeaderName, HeaderValue};
// self
use crate::{_prelude::*, auth::TokenSecret, error::ConfigError};

/// Token endpoint used when none is configured.
pub const DEFAULT_AUTH_URL: &str = "https://auth.sinch.com/oauth2/token";
/// Client identification header value used when none is configured.
pub const DEFAULT_SDK_HEADER: &str = concat!("sinch-core-rust/", env!("CARGO_PKG_VERSION"));

/// Auth strategy selected for outbound requests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthKind {
	/// Cached bearer token minted with the client-credentials grant.
	#[default]
	#[serde(rename = "oauth")]
	OAuth,
	/// Per-request application signature.
	#[serde(rename = "application")]
	Application,
}

/// Connection pool settings for the client-owned HTTP pool.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolSettings {
	/// Upper bound on idle connections kept per host.
	pub max_idle_per_host: usize,
	/// Idle connections are evicted after this many seconds.
	pub idle_timeout_secs: u64,
	/// Whole-request timeout; `None` disables it.
	pub request_timeout_secs: Option<u64>,
}
impl Default for PoolSettings {
	fn default() -> Self {
		Self { max_idle_per_host: 16, idle_timeout_secs: 90, request_timeout_secs: Some(30) }
	}
}

/// Response header inspected to tell an expired token from any other 401.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpirySignalConfig {
	/// Header name, matched case-insensitively.
	pub header: String,
	/// Substring that marks expiry, matched case-insensitively.
	pub needle: String,
}
impl Default for ExpirySignalConfig {
	fn default() -> Self {
		Self { header: "www-authenticate".into(), needle: "expired".into() }
	}
}

/// Complete client configuration.
///
/// Deserializable so hosts can load it from their own config files; call
/// [`ClientConfig::validate`] (or go through [`ClientConfigBuilder`]) before use.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
	/// OAuth token endpoint; [`DEFAULT_AUTH_URL`] when unset.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub auth_url: Option<Url>,
	/// Selected auth strategy.
	#[serde(default)]
	pub auth_kind: AuthKind,
	/// OAuth client identifier.
	pub key_id: Option<String>,
	/// OAuth client secret.
	pub key_secret: Option<TokenSecret>,
	/// Application key for signed requests.
	pub application_key: Option<String>,
	/// Base64-encoded application secret for signed requests.
	pub application_secret: Option<TokenSecret>,
	/// Shared secret used to validate inbound webhooks.
	pub webhook_secret: Option<TokenSecret>,
	/// Value of the `x-sinch-sdk` header.
	#[serde(default = "default_sdk_header")]
	pub sdk_header: String,
	/// Connection pool settings.
	#[serde(default)]
	pub pool: PoolSettings,
	/// Token-expiry signal settings.
	#[serde(default)]
	pub expiry_signal: ExpirySignalConfig,
	/// Permits plain-HTTP endpoints. Meant for local fakes only.
	#[serde(default)]
	pub allow_insecure: bool,
}
impl ClientConfig {
	/// Starts a builder with default settings.
	pub fn builder() -> ClientConfigBuilder {
		ClientConfigBuilder::default()
	}

	/// Checks that the selected strategy has its credentials and that all values are usable.
	pub fn validate(&self) -> Result<(), ConfigError> {
		match self.auth_kind {
			AuthKind::OAuth => {
				require_text("key_id", self.key_id.as_deref())?;
				require_secret("key_secret", self.key_secret.as_ref())?;
			},
			AuthKind::Application => {
				require_text("application_key", self.application_key.as_deref())?;
				require_secret("application_secret", self.application_secret.as_ref())?;
			},
		}

		let auth_url = self.token_url()?;

		if !self.allow_insecure && auth_url.scheme() != "https" {
			return Err(ConfigError::InsecureEndpoint { endpoint: "auth", url: auth_url.into() });
		}

		HeaderValue::from_str(&self.sdk_header)
			.map_err(|_| ConfigError::InvalidHeader { header: "x-sinch-sdk".into() })?;
		HeaderName::from_bytes(self.expiry_signal.header.as_bytes())
			.map_err(|_| ConfigError::InvalidHeader { header: self.expiry_signal.header.clone() })?;

		Ok(())
	}

	/// Token endpoint in effect: the configured one or [`DEFAULT_AUTH_URL`].
	pub fn token_url(&self) -> Result<Url, ConfigError> {
		match &self.auth_url {
			Some(url) => Ok(url.clone()),
			None => Url::parse(DEFAULT_AUTH_URL)
				.map_err(|source| ConfigError::InvalidTokenUrl { source }),
		}
	}
}
impl Default for ClientConfig {
	fn default() -> Self {
		Self {
			auth_url: None,
			auth_kind: AuthKind::default(),
			key_id: None,
			key_secret: None,
			application_key: None,
			application_secret: None,
			webhook_secret: None,
			sdk_header: default_sdk_header(),
			pool: PoolSettings::default(),
			expiry_signal: ExpirySignalConfig::default(),
			allow_insecure: false,
		}
	}
}

/// Builder for [`ClientConfig`] values.
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
	config: ClientConfig,
}
impl ClientConfigBuilder {
	/// Overrides the OAuth token endpoint.
	pub fn auth_url(mut self, url: Url) -> Self {
		self.config.auth_url = Some(url);

		self
	}

	/// Sets OAuth client credentials and selects the token strategy.
	pub fn oauth(mut self, key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
		self.config.key_id = Some(key_id.into());
		self.config.key_secret = Some(TokenSecret::new(key_secret));
		self.config.auth_kind = AuthKind::OAuth;

		self
	}

	/// Sets application credentials and selects the signing strategy.
	pub fn application(mut self, key: impl Into<String>, secret: impl Into<String>) -> Self {
		self.config.application_key = Some(key.into());
		self.config.application_secret = Some(TokenSecret::new(secret));
		self.config.auth_kind = AuthKind::Application;

		self
	}

	/// Selects the auth strategy explicitly when both credential sets are present.
	pub fn auth_kind(mut self, kind: AuthKind) -> Self {
		self.config.auth_kind = kind;

		self
	}

	/// Sets the webhook validation secret.
	pub fn webhook_secret(mut self, secret: impl Into<String>) -> Self {
		self.config.webhook_secret = Some(TokenSecret::new(secret));

		self
	}

	/// Overrides the `x-sinch-sdk` header value.
	pub fn sdk_header(mut self, value: impl Into<String>) -> Self {
		self.config.sdk_header = value.into();

		self
	}

	/// Overrides the connection pool settings.
	pub fn pool(mut self, pool: PoolSettings) -> Self {
		self.config.pool = pool;

		self
	}

	/// Overrides the token-expiry signal.
	pub fn expiry_signal(mut self, header: impl Into<String>, needle: impl Into<String>) -> Self {
		self.config.expiry_signal = ExpirySignalConfig { header: header.into(), needle: needle.into() };

		self
	}

	/// Permits plain-HTTP endpoints.
	pub fn allow_insecure(mut self, allow: bool) -> Self {
		self.config.allow_insecure = allow;

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<ClientConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

fn default_sdk_header() -> String {
	DEFAULT_SDK_HEADER.into()
}

fn require_text(field: &'static str, value: Option<&str>) -> Result<(), ConfigError> {
	match value {
		Some(value) if !value.is_empty() => Ok(()),
		_ => Err(ConfigError::MissingCredential { field }),
	}
}

fn require_secret(field: &'static str, value: Option<&TokenSecret>) -> Result<(), ConfigError> {
	require_text(field, value.map(TokenSecret::expose))
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn builder_applies_defaults() {
		let config = ClientConfig::builder()
			.oauth("key-id", "key-secret")
			.build()
			.expect("OAuth config should validate.");

		assert_eq!(config.auth_kind, AuthKind::OAuth);
		assert_eq!(config.token_url().expect("Default URL should parse.").as_str(), DEFAULT_AUTH_URL);
		assert!(config.sdk_header.starts_with("sinch-core-rust/"));
		assert_eq!(config.expiry_signal.needle, "expired");
		assert_eq!(config.pool, PoolSettings::default());
	}

	#[test]
	fn selected_strategy_requires_its_credentials() {
		let err = ClientConfig::builder().build().expect_err("Empty config should fail.");

		assert!(matches!(err, ConfigError::MissingCredential { field: "key_id" }));

		let err = ClientConfig::builder()
			.oauth("key-id", "key-secret")
			.auth_kind(AuthKind::Application)
			.build()
			.expect_err("Application strategy without keys should fail.");

		assert!(matches!(err, ConfigError::MissingCredential { field: "application_key" }));
	}

	#[test]
	fn plain_http_requires_opt_in() {
		let url = Url::parse("http://127.0.0.1:8080/oauth2/token").expect("URL should parse.");
		let err = ClientConfig::builder()
			.oauth("key-id", "key-secret")
			.auth_url(url.clone())
			.build()
			.expect_err("Plain HTTP should be rejected.");

		assert!(matches!(err, ConfigError::InsecureEndpoint { endpoint: "auth", .. }));
		assert!(
			ClientConfig::builder()
				.oauth("key-id", "key-secret")
				.auth_url(url)
				.allow_insecure(true)
				.build()
				.is_ok()
		);
	}

	#[test]
	fn rejects_invalid_header_values() {
		let err = ClientConfig::builder()
			.application("app-key", "c2VjcmV0")
			.sdk_header("bad\nvalue")
			.build()
			.expect_err("Newlines are not valid in header values.");

		assert!(matches!(err, ConfigError::InvalidHeader { .. }));
	}

	#[test]
	fn deserializes_with_defaults() {
		let config: ClientConfig = serde_json::from_str(
			r#"{
				"auth_kind": "application",
				"application_key": "app-key",
				"application_secret": "c2VjcmV0",
				"pool": { "max_idle_per_host": 4 }
			}"#,
		)
		.expect("Config fixture should deserialize.");

		assert_eq!(config.auth_kind, AuthKind::Application);
		assert_eq!(config.pool.max_idle_per_host, 4);
		assert_eq!(config.pool.idle_timeout_secs, 90);
		assert!(config.auth_url.is_none());
		assert_eq!(config.token_url().expect("Default URL should parse.").as_str(), DEFAULT_AUTH_URL);
		assert!(config.validate().is_ok());
	}
}
