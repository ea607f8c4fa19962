//! Client facade that wires configuration, the pooled HTTP client, and the auth strategy.

// self
use crate::{
	_prelude::*,
	auth::{ApplicationSigner, AuthStrategy, CachedTokenProvider},
	config::{AuthKind, ClientConfig},
	error::ConfigError,
	http::ReqwestHttpClient,
	oauth::OAuthIssuer,
	transport::{HeaderExpirySignal, Transport},
	webhook::Webhooks,
};

/// Token provider used by OAuth-configured clients.
pub type OAuthTokenProvider = CachedTokenProvider<OAuthIssuer>;

/// Entry point owning one connection pool, one auth strategy, and one token cache.
///
/// Clones share all three. Dropping the last clone releases the pool and the cached token.
#[derive(Clone)]
pub struct SinchClient {
	config: Arc<ClientConfig>,
	transport: Transport,
	token_provider: Option<Arc<OAuthTokenProvider>>,
	webhooks: Webhooks,
}
impl SinchClient {
	/// Validates `config` and builds a client with its own connection pool.
	pub fn new(config: ClientConfig) -> Result<Self> {
		config.validate()?;

		let http_client = ReqwestHttpClient::from_pool(&config.pool)?;

		Self::with_http_client(config, http_client)
	}

	/// Builds a client on top of a caller-supplied HTTP client.
	pub fn with_http_client(config: ClientConfig, http_client: ReqwestHttpClient) -> Result<Self> {
		config.validate()?;

		let (auth, token_provider) = match config.auth_kind {
			AuthKind::OAuth => {
				let (key_id, key_secret) = match (&config.key_id, &config.key_secret) {
					(Some(key_id), Some(key_secret)) => (key_id, key_secret),
					(None, _) => Err(ConfigError::MissingCredential { field: "key_id" })?,
					(_, None) => Err(ConfigError::MissingCredential { field: "key_secret" })?,
				};
				let issuer =
					OAuthIssuer::new(&config.token_url()?, key_id, key_secret, http_client.clone())?;
				let provider = Arc::new(OAuthTokenProvider::new(issuer));

				(AuthStrategy::Token(provider.clone()), Some(provider))
			},
			AuthKind::Application => {
				let (key, secret) = match (&config.application_key, &config.application_secret) {
					(Some(key), Some(secret)) => (key, secret),
					(None, _) =>
						Err(ConfigError::MissingCredential { field: "application_key" })?,
					(_, None) =>
						Err(ConfigError::MissingCredential { field: "application_secret" })?,
				};

				(AuthStrategy::signed(ApplicationSigner::new(key.clone(), secret)?), None)
			},
		};
		let transport = Transport::new(http_client, auth)
			.with_expiry_signal(HeaderExpirySignal::from_config(&config.expiry_signal)?)
			.with_sdk_header(&config.sdk_header)?;
		let webhooks = Webhooks::new(config.webhook_secret.clone());

		Ok(Self { config: Arc::new(config), transport, token_provider, webhooks })
	}

	/// Validated configuration the client was built from.
	pub fn config(&self) -> &ClientConfig {
		&self.config
	}

	/// Authenticated transport for API calls.
	pub fn transport(&self) -> &Transport {
		&self.transport
	}

	/// Token cache, present only for OAuth-configured clients.
	pub fn token_provider(&self) -> Option<&Arc<OAuthTokenProvider>> {
		self.token_provider.as_ref()
	}

	/// Webhook validator bound to the configured secret.
	pub fn webhooks(&self) -> &Webhooks {
		&self.webhooks
	}
}
impl Debug for SinchClient {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("SinchClient")
			.field("auth_kind", &self.config.auth_kind)
			.field("transport", &self.transport)
			.field("webhook_secret_set", &self.webhooks.has_secret())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn oauth_config_builds_token_strategy() {
		let config = ClientConfig::builder()
			.oauth("key-id", "key-secret")
			.webhook_secret("hook")
			.build()
			.expect("OAuth config should validate.");
		let client = SinchClient::new(config).expect("OAuth client should build.");

		assert_eq!(client.transport().auth().as_str(), "token");
		assert!(client.token_provider().is_some_and(|provider| provider.cached().is_none()));
		assert!(client.webhooks().has_secret());
	}

	#[test]
	fn application_config_builds_signed_strategy() {
		let config = ClientConfig::builder()
			.application("app-key", "c2VjcmV0")
			.build()
			.expect("Application config should validate.");
		let client = SinchClient::new(config).expect("Signed client should build.");

		assert_eq!(client.transport().auth().as_str(), "signed");
		assert!(client.token_provider().is_none());
		assert!(!client.webhooks().has_secret());
	}

	#[test]
	fn rejects_application_secret_that_is_not_base64() {
		let config = ClientConfig::builder()
			.application("app-key", "not base64!")
			.build()
			.expect("Secret encoding is checked when the signer is built.");
		let err = SinchClient::new(config).expect_err("Invalid secret should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::InvalidApplicationSecret { .. })));
	}

	#[test]
	fn rejects_unvalidated_configs() {
		let err = SinchClient::new(ClientConfig::default())
			.expect_err("Config without credentials should be rejected.");

		assert!(matches!(err, Error::Config(ConfigError::MissingCredential { field: "key_id" })));
	}
}
