//! Client-credentials exchange backed by the `oauth2` crate.

pub use oauth2;

// crates.io
use oauth2::{
	ClientId, ClientSecret, EndpointNotSet, EndpointSet, HttpClientError, RequestTokenError,
	TokenResponse, TokenUrl,
	basic::{BasicClient, BasicRequestTokenError, BasicTokenResponse, BasicTokenType},
};
// self
use crate::{
	_prelude::*,
	auth::{Credential, CredentialIssuer, IssueFuture, TokenSecret},
	error::{ConfigError, DecodeError, TransportError},
	http::{ReqwestHttpClient, ResponseMetadata, ResponseMetadataSlot},
};

type ConfiguredBasicClient =
	BasicClient<EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointNotSet, EndpointSet>;

/// [`CredentialIssuer`] that runs the client-credentials grant against the token endpoint.
///
/// The client authenticates with HTTP Basic using its key id and secret. Token exchanges share
/// the pooled HTTP client with API calls.
pub struct OAuthIssuer {
	oauth_client: ConfiguredBasicClient,
	http_client: ReqwestHttpClient,
}
impl OAuthIssuer {
	/// Creates an issuer for `token_url`.
	pub fn new(
		token_url: &Url,
		key_id: &str,
		key_secret: &TokenSecret,
		http_client: ReqwestHttpClient,
	) -> Result<Self, ConfigError> {
		let token_url = TokenUrl::new(token_url.to_string())
			.map_err(|source| ConfigError::InvalidTokenUrl { source })?;
		let oauth_client = BasicClient::new(ClientId::new(key_id.to_owned()))
			.set_client_secret(ClientSecret::new(key_secret.expose().to_owned()))
			.set_token_uri(token_url);

		Ok(Self { oauth_client, http_client })
	}
}
impl CredentialIssuer for OAuthIssuer {
	fn issue(&self) -> IssueFuture<'_> {
		let meta = ResponseMetadataSlot::default();

		Box::pin(async move {
			let instrumented = self.http_client.instrumented(meta.clone());
			let response = self
				.oauth_client
				.exchange_client_credentials()
				.request_async(&instrumented)
				.await
				.map_err(|err| map_request_error(meta.take(), err))?;

			Ok(credential_from_response(&response))
		})
	}
}
impl Debug for OAuthIssuer {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuthIssuer")
			.field("token_url", &self.oauth_client.token_uri().as_str())
			.finish()
	}
}

fn credential_from_response(response: &BasicTokenResponse) -> Credential {
	let mut credential = Credential::bearer(response.access_token().secret().to_owned());

	if !matches!(response.token_type(), BasicTokenType::Bearer) {
		credential.scheme = response.token_type().as_ref().to_owned();
	}
	if let Some(lifetime) = response.expires_in().and_then(|d| Duration::try_from(d).ok()) {
		credential = credential.with_expires_in(lifetime);
	}

	credential
}

fn map_request_error(
	meta: Option<ResponseMetadata>,
	err: BasicRequestTokenError<HttpClientError<ReqwestError>>,
) -> Error {
	let status = meta.and_then(|value| value.status);

	match err {
		RequestTokenError::ServerResponse(response) => {
			let reason = match response.error_description() {
				Some(description) => format!("{} ({description})", response.error().as_ref()),
				None => response.error().as_ref().to_owned(),
			};

			Error::Auth { reason, status }
		},
		RequestTokenError::Request(err) => map_transport_error(err),
		RequestTokenError::Parse(source, _body) =>
			if status.is_some_and(is_success) {
				DecodeError::Body { source, status }.into()
			} else {
				Error::Auth { reason: "unreadable error response".into(), status }
			},
		RequestTokenError::Other(message) =>
			if status.is_some_and(is_success) {
				TransportError::Other { message }.into()
			} else {
				Error::Auth { reason: message, status }
			},
	}
}

fn map_transport_error(err: HttpClientError<ReqwestError>) -> Error {
	match err {
		HttpClientError::Reqwest(inner) =>
			if inner.is_builder() {
				ConfigError::from(*inner).into()
			} else {
				TransportError::from(*inner).into()
			},
		HttpClientError::Http(inner) => ConfigError::from(inner).into(),
		HttpClientError::Io(inner) => TransportError::Io(inner).into(),
		HttpClientError::Other(message) => TransportError::Other { message }.into(),
		_ => TransportError::Other { message: "unrecognized HTTP client failure".into() }.into(),
	}
}

fn is_success(status: u16) -> bool {
	(200..300).contains(&status)
}

#[cfg(test)]
mod tests {
	// std
	use std::time::Duration as StdDuration;
	// crates.io
	use oauth2::{AccessToken, EmptyExtraTokenFields};
	// self
	use super::*;

	fn token_response(token_type: BasicTokenType, expires_in: Option<u64>) -> BasicTokenResponse {
		let mut response = BasicTokenResponse::new(
			AccessToken::new("access-token".into()),
			token_type,
			EmptyExtraTokenFields {},
		);

		response.set_expires_in(expires_in.map(StdDuration::from_secs).as_ref());

		response
	}

	#[test]
	fn builds_issuer_for_https_token_url() {
		let url = Url::parse("https://auth.example.com/oauth2/token").expect("URL should parse.");
		let issuer = OAuthIssuer::new(
			&url,
			"key-id",
			&TokenSecret::new("key-secret"),
			ReqwestHttpClient::default(),
		)
		.expect("Issuer should build.");

		assert!(format!("{issuer:?}").contains("auth.example.com"));
		assert!(!format!("{issuer:?}").contains("key-secret"));
	}

	#[test]
	fn bearer_response_maps_to_expiring_credential() {
		let credential = credential_from_response(&token_response(BasicTokenType::Bearer, Some(3600)));

		assert_eq!(credential.scheme, Credential::BEARER);
		assert_eq!(credential.header_value(), "Bearer access-token");
		assert_eq!(credential.expires_at, Some(credential.issued_at + Duration::hours(1)));
	}

	#[test]
	fn missing_expiry_leaves_credential_open_ended() {
		let credential = credential_from_response(&token_response(BasicTokenType::Bearer, None));

		assert!(credential.expires_at.is_none());
	}

	#[test]
	fn other_failures_after_success_status_are_not_auth_errors() {
		let err = map_request_error(
			Some(ResponseMetadata { status: Some(200) }),
			RequestTokenError::Other("unexpected content type".into()),
		);

		assert!(matches!(err, Error::Transport(TransportError::Other { .. })));

		let err = map_request_error(
			Some(ResponseMetadata { status: Some(401) }),
			RequestTokenError::Other("empty error response".into()),
		);

		assert!(matches!(err, Error::Auth { status: Some(401), .. }));
	}
}
