mod common;

// crates.io
use httpmock::prelude::*;
use serde_json::Value;
use sinch_core::{
	auth::{CachedTokenProvider, TokenProvider, TokenSecret},
	client::SinchClient,
	error::Error,
	oauth::OAuthIssuer,
	reqwest::Method,
};
// self
use common::*;

const BASIC_AUTH: &str = "Basic a2V5LWlkOmtleS1zZWNyZXQ=";

fn build_provider(server: &MockServer) -> CachedTokenProvider<OAuthIssuer> {
	let issuer = OAuthIssuer::new(
		&server_url(server, "/oauth2/token"),
		KEY_ID,
		&TokenSecret::new(KEY_SECRET),
		test_reqwest_http_client(),
	)
	.expect("Issuer should build for the mock token endpoint.");

	CachedTokenProvider::new(issuer)
}

#[tokio::test]
async fn client_credentials_token_is_cached() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token").header("authorization", BASIC_AUTH);
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"cached-token\",\"token_type\":\"bearer\",\"expires_in\":3599}",
			);
		})
		.await;
	let provider = build_provider(&server);
	let first = provider.get_token(false).await.expect("Initial fetch should succeed.");
	let second = provider.get_token(false).await.expect("Cached lookup should succeed.");

	assert_eq!(first.token.expose(), "cached-token");
	assert_eq!(first.scheme, "Bearer");
	assert!(first.expires_at.is_some());
	assert_eq!(second.header_value(), "Bearer cached-token");
	assert_eq!(provider.metrics().fetches(), 1);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn concurrent_first_lookups_share_one_fetch() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"guard-token\",\"token_type\":\"bearer\",\"expires_in\":900}",
			);
		})
		.await;
	let provider = build_provider(&server);
	let (first, second) = tokio::join!(provider.get_token(false), provider.get_token(false));

	assert_eq!(first.expect("First lookup should succeed.").token.expose(), "guard-token");
	assert_eq!(second.expect("Second lookup should succeed.").token.expose(), "guard-token");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn forced_lookup_always_fetches() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"token\",\"token_type\":\"bearer\",\"expires_in\":900}");
		})
		.await;
	let provider = build_provider(&server);

	provider.get_token(false).await.expect("Initial fetch should succeed.");
	provider.get_token(true).await.expect("Forced fetch should succeed.");

	assert_eq!(provider.metrics().forced(), 1);
	assert_eq!(provider.metrics().fetches(), 2);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn rejected_client_maps_to_auth_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(401).header("content-type", "application/json").body(
				"{\"error\":\"invalid_client\",\"error_description\":\"Unknown key\"}",
			);
		})
		.await;
	let provider = build_provider(&server);
	let err = provider.get_token(false).await.expect_err("Rejected client should fail.");

	match err {
		Error::Auth { reason, status } => {
			assert!(reason.contains("invalid_client"));
			assert_eq!(status, Some(401));
		},
		other => panic!("Expected an auth error, got {other:?}."),
	}
	assert!(provider.cached().is_none());
	assert_eq!(provider.metrics().failures(), 1);
}

#[tokio::test]
async fn client_attaches_oauth_bearer_to_api_calls() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path("/oauth2/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"api-token\",\"token_type\":\"bearer\",\"expires_in\":900}");
		})
		.await;
	let api = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/projects/p/activeNumbers").header("authorization", "Bearer api-token");
			then.status(200).header("content-type", "application/json").body("{\"activeNumbers\":[]}");
		})
		.await;
	let client = SinchClient::with_http_client(oauth_test_config(&server), test_reqwest_http_client())
		.expect("Client should build.");

	for _ in 0..2 {
		let page: Value = client
			.transport()
			.send::<(), _>(Method::GET, server_url(&server, "/v1/projects/p/activeNumbers"), None)
			.await
			.expect("API call should succeed.");

		assert_eq!(page["activeNumbers"], serde_json::json!([]));
	}

	assert!(client.token_provider().is_some_and(|provider| provider.cached().is_some()));

	token.assert_calls_async(1).await;
	api.assert_calls_async(2).await;
}
