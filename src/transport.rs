//! Authenticated HTTP transport shared by every API call.
//!
//! [`Transport`] serializes the request, attaches the active auth strategy's headers, sends
//! through the client-owned pool, and decodes the response. An unauthorized response is retried
//! once, and only when the strategy is refreshable and the [`ExpirySignal`] reports an expired
//! token; see [`RetryState`].

mod cancel;
mod multipart;
mod retry;

pub use multipart::*;
pub use retry::*;

// std
use std::time::Instant;
// crates.io
use reqwest::{
	Method, Response,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use tokio_util::sync::CancellationToken;
// self
use crate::{
	_prelude::*,
	auth::{self, AuthStrategy, SignedRequestContext},
	error::{ApiError, ApiErrorBody, ConfigError, DecodeError, TransportError},
	http::ReqwestHttpClient,
	obs::{self, RequestKind, RequestOutcome, RequestSpan},
};

/// Client identification header attached to every request.
pub const SDK_HEADER: &str = "x-sinch-sdk";
/// Content type of JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

enum Payload {
	Json(Option<Vec<u8>>),
	Multipart(EncodedMultipart),
}

/// Sends authenticated requests and decodes their responses.
#[derive(Clone)]
pub struct Transport {
	http: ReqwestHttpClient,
	auth: AuthStrategy,
	expiry_signal: Arc<dyn ExpirySignal>,
	sdk_header: HeaderValue,
}
impl Transport {
	/// Creates a transport with the default expiry signal and client identification header.
	pub fn new(http: ReqwestHttpClient, auth: AuthStrategy) -> Self {
		Self {
			http,
			auth,
			expiry_signal: Arc::new(HeaderExpirySignal::default()),
			sdk_header: HeaderValue::from_static(crate::config::DEFAULT_SDK_HEADER),
		}
	}

	/// Replaces the signal used to recognize expired tokens.
	pub fn with_expiry_signal(mut self, signal: impl ExpirySignal + 'static) -> Self {
		self.expiry_signal = Arc::new(signal);

		self
	}

	/// Replaces the `x-sinch-sdk` header value.
	pub fn with_sdk_header(mut self, value: &str) -> Result<Self, ConfigError> {
		self.sdk_header = HeaderValue::from_str(value)
			.map_err(|_| ConfigError::InvalidHeader { header: SDK_HEADER.into() })?;

		Ok(self)
	}

	/// Active auth strategy.
	pub fn auth(&self) -> &AuthStrategy {
		&self.auth
	}

	/// Pooled HTTP client.
	pub fn http_client(&self) -> &ReqwestHttpClient {
		&self.http
	}

	/// Sends a JSON request. A `None` body sends no body at all.
	///
	/// Success responses declared as JSON are decoded into `Res`, and an empty JSON body is a
	/// decode error. Any other success response yields `Res::default()`.
	pub async fn send<Req, Res>(&self, method: Method, url: Url, body: Option<&Req>) -> Result<Res>
	where
		Req: ?Sized + Serialize,
		Res: DeserializeOwned + Default,
	{
		let body =
			body.map(serde_json::to_vec).transpose().map_err(|source| Error::RequestBody { source })?;

		self.execute(RequestKind::Send, method, url, Payload::Json(body)).await
	}

	/// Sends a multipart request built from `request`'s fields plus `file`.
	pub async fn send_multipart<Req, Res>(
		&self,
		method: Method,
		url: Url,
		request: &Req,
		file: FilePart,
	) -> Result<Res>
	where
		Req: ?Sized + Serialize,
		Res: DeserializeOwned + Default,
	{
		let body = MultipartBody::from_request(request, file)?.encode()?;

		self.execute(RequestKind::Multipart, method, url, Payload::Multipart(body)).await
	}

	/// [`Transport::send`] that resolves to [`Error::Cancelled`] once `cancel` fires.
	pub async fn send_cancellable<Req, Res>(
		&self,
		method: Method,
		url: Url,
		body: Option<&Req>,
		cancel: &CancellationToken,
	) -> Result<Res>
	where
		Req: ?Sized + Serialize,
		Res: DeserializeOwned + Default,
	{
		cancel::with_cancellation(cancel, self.send(method, url, body)).await
	}

	/// [`Transport::send_multipart`] that resolves to [`Error::Cancelled`] once `cancel` fires.
	pub async fn send_multipart_cancellable<Req, Res>(
		&self,
		method: Method,
		url: Url,
		request: &Req,
		file: FilePart,
		cancel: &CancellationToken,
	) -> Result<Res>
	where
		Req: ?Sized + Serialize,
		Res: DeserializeOwned + Default,
	{
		cancel::with_cancellation(cancel, self.send_multipart(method, url, request, file)).await
	}

	async fn execute<Res>(
		&self,
		kind: RequestKind,
		method: Method,
		url: Url,
		payload: Payload,
	) -> Result<Res>
	where
		Res: DeserializeOwned + Default,
	{
		let span = RequestSpan::new(kind, "transport").with_auth(self.auth.as_str());
		let started = Instant::now();

		obs::record_request_outcome(kind, RequestOutcome::Attempt);

		let result = span.instrument(self.run(kind, &span, &method, &url, &payload)).await;

		obs::record_request_latency(kind, self.auth.as_str(), started.elapsed());

		match &result {
			Ok(_) => obs::record_request_outcome(kind, RequestOutcome::Success),
			Err(_) => obs::record_request_outcome(kind, RequestOutcome::Failure),
		}

		result
	}

	async fn run<Res>(
		&self,
		kind: RequestKind,
		span: &RequestSpan,
		method: &Method,
		url: &Url,
		payload: &Payload,
	) -> Result<Res>
	where
		Res: DeserializeOwned + Default,
	{
		let mut state = RetryState::FirstAttempt;

		loop {
			let response = self.attempt(state, method, url, payload).await?;
			let status = response.status();

			span.record_status(status.as_u16());

			if status.is_success() {
				return decode_success(response).await;
			}

			let expired_token = status == reqwest::StatusCode::UNAUTHORIZED
				&& self.auth.is_refreshable()
				&& self.expiry_signal.is_expired(response.headers());

			state = state.advance(expired_token);

			if state != RetryState::Retrying {
				return Err(read_api_error(response).await.into());
			}

			span.record_retry(status.as_u16());
			obs::record_request_outcome(kind, RequestOutcome::Retry);
		}
	}

	async fn attempt(
		&self,
		state: RetryState,
		method: &Method,
		url: &Url,
		payload: &Payload,
	) -> Result<Response> {
		let mut request = self
			.http
			.request(method.clone(), url.clone())
			.header(SDK_HEADER, self.sdk_header.clone())
			.header(ACCEPT, "application/json");
		let (content_type, body): (String, &[u8]) = match payload {
			Payload::Json(Some(bytes)) => {
				request = request.header(CONTENT_TYPE, JSON_CONTENT_TYPE).body(bytes.clone());

				(JSON_CONTENT_TYPE.to_owned(), bytes.as_slice())
			},
			Payload::Json(None) => (String::new(), &[]),
			Payload::Multipart(multipart) => {
				request = request
					.header(CONTENT_TYPE, multipart.content_type.as_str())
					.body(multipart.bytes.clone());

				(multipart.content_type.clone(), multipart.bytes.as_slice())
			},
		};

		match &self.auth {
			AuthStrategy::Token(provider) => {
				let credential = provider.get_token(state.force_refresh()).await?;

				request = request.header(AUTHORIZATION, credential.header_value());
			},
			AuthStrategy::Signed(signer) => {
				let timestamp = auth::timestamp_now()?;
				let path_and_query = match url.query() {
					Some(query) => format!("{}?{query}", url.path()),
					None => url.path().to_owned(),
				};
				let signature = signer.sign(&SignedRequestContext {
					method: method.as_str(),
					path_and_query: &path_and_query,
					timestamp: &timestamp,
					content_type: &content_type,
					body,
				});

				request = request
					.header(auth::TIMESTAMP_HEADER, timestamp)
					.header(AUTHORIZATION, signer.authorization(&signature));
			},
		}

		request.send().await.map_err(map_send_error)
	}
}
impl Debug for Transport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Transport")
			.field("auth", &self.auth)
			.field("sdk_header", &self.sdk_header)
			.finish()
	}
}

/// Decodes a JSON payload, reporting the failing path on mismatch.
pub fn decode_json<T>(bytes: &[u8], status: Option<u16>) -> Result<T>
where
	T: DeserializeOwned,
{
	let mut deserializer = serde_json::Deserializer::from_slice(bytes);

	serde_path_to_error::deserialize(&mut deserializer)
		.map_err(|source| DecodeError::Body { source, status }.into())
}

async fn decode_success<Res>(response: Response) -> Result<Res>
where
	Res: DeserializeOwned + Default,
{
	if !is_json(response.headers()) {
		return Ok(Res::default());
	}

	let status = response.status().as_u16();
	let bytes = response.bytes().await.map_err(TransportError::from)?;

	decode_json(&bytes, Some(status))
}

async fn read_api_error(response: Response) -> ApiError {
	let status = response.status();
	let reason = status.canonical_reason().unwrap_or("Unknown Status").to_owned();
	let body = if is_json(response.headers()) {
		response
			.bytes()
			.await
			.ok()
			.and_then(|bytes| serde_json::from_slice::<ApiErrorBody>(&bytes).ok())
	} else {
		None
	};

	ApiError { status: status.as_u16(), reason, body }
}

fn is_json(headers: &HeaderMap) -> bool {
	let Some(essence) = headers
		.get(CONTENT_TYPE)
		.and_then(|value| value.to_str().ok())
		.and_then(|value| value.split(';').next())
	else {
		return false;
	};
	let essence = essence.trim().to_ascii_lowercase();

	essence == "application/json" || essence.ends_with("+json")
}

fn map_send_error(err: ReqwestError) -> Error {
	if err.is_builder() { ConfigError::from(err).into() } else { TransportError::from(err).into() }
}
