//! Shared fixtures for the integration tests.

#![allow(dead_code)]

// std
use std::sync::{
	Arc,
	atomic::{AtomicUsize, Ordering},
};
// crates.io
use httpmock::MockServer;
use sinch_core::{
	auth::{
		ApplicationSigner, AuthStrategy, Credential, TokenFuture, TokenProvider, TokenSecret,
	},
	config::ClientConfig,
	http::ReqwestHttpClient,
	reqwest::Client as ReqwestClient,
	transport::Transport,
	url::Url,
};

pub const KEY_ID: &str = "key-id";
pub const KEY_SECRET: &str = "key-secret";
pub const APPLICATION_KEY: &str = "app-key";
/// `base64("app-secret")`.
pub const APPLICATION_SECRET: &str = "YXBwLXNlY3JldA==";
pub const EXPIRED_CHALLENGE: &str =
	"Bearer error=\"invalid_token\", error_description=\"Jwt is expired\"";

/// Builds a reqwest client that accepts the self-signed certificates produced by `httpmock`.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = ReqwestClient::builder()
		.danger_accept_invalid_certs(true)
		.build()
		.expect("Failed to build insecure Reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

pub fn server_url(server: &MockServer, path: &str) -> Url {
	Url::parse(&server.url(path)).expect("Mock server URL should parse.")
}

/// OAuth configuration whose token endpoint lives on `server`.
pub fn oauth_test_config(server: &MockServer) -> ClientConfig {
	ClientConfig::builder()
		.oauth(KEY_ID, KEY_SECRET)
		.auth_url(server_url(server, "/oauth2/token"))
		.allow_insecure(true)
		.build()
		.expect("OAuth test config should validate.")
}

pub fn signed_transport() -> Transport {
	let signer = ApplicationSigner::new(APPLICATION_KEY, &TokenSecret::new(APPLICATION_SECRET))
		.expect("Fixture application secret should be valid base64.");

	Transport::new(test_reqwest_http_client(), AuthStrategy::signed(signer))
}

/// Token provider that hands out `stale` until forced, then `fresh-1`, `fresh-2`, ...
#[derive(Debug, Default)]
pub struct ScriptedTokenProvider {
	calls: AtomicUsize,
	forced: AtomicUsize,
}
impl ScriptedTokenProvider {
	pub fn calls(&self) -> usize {
		self.calls.load(Ordering::SeqCst)
	}

	pub fn forced(&self) -> usize {
		self.forced.load(Ordering::SeqCst)
	}
}
impl TokenProvider for ScriptedTokenProvider {
	fn get_token(&self, force_refresh: bool) -> TokenFuture<'_> {
		self.calls.fetch_add(1, Ordering::SeqCst);

		let token = if force_refresh {
			format!("fresh-{}", self.forced.fetch_add(1, Ordering::SeqCst) + 1)
		} else {
			"stale".to_owned()
		};

		Box::pin(async move { Ok(Arc::new(Credential::bearer(token))) })
	}
}

pub fn scripted_transport() -> (Transport, Arc<ScriptedTokenProvider>) {
	let provider = Arc::new(ScriptedTokenProvider::default());
	let transport =
		Transport::new(test_reqwest_http_client(), AuthStrategy::Token(provider.clone()));

	(transport, provider)
}
