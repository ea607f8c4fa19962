//! Client-level error types shared by the transport, auth strategies, and codecs.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// The API answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// A response or webhook payload could not be decoded.
	#[error(transparent)]
	Decode(#[from] DecodeError),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),

	/// Token endpoint rejected the client credentials.
	#[error("Token endpoint rejected the client: {reason}.")]
	Auth {
		/// Provider- or client-supplied reason string.
		reason: String,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Request body could not be serialized.
	#[error("Request body could not be serialized.")]
	RequestBody {
		/// Underlying serializer failure.
		#[source]
		source: serde_json::Error,
	},
	/// The caller's cancellation token fired before the request completed.
	#[error("Request was cancelled.")]
	Cancelled,
}

/// Non-success response surfaced by the transport.
#[derive(Clone, Debug, PartialEq, ThisError)]
#[error("API request failed with HTTP {status} {reason}.")]
pub struct ApiError {
	/// HTTP status code.
	pub status: u16,
	/// Canonical reason phrase for the status.
	pub reason: String,
	/// Structured error payload, when the body was JSON and parseable.
	pub body: Option<ApiErrorBody>,
}
impl ApiError {
	/// Returns `true` for HTTP 401 responses.
	pub fn is_unauthorized(&self) -> bool {
		self.status == 401
	}

	/// Server-supplied message, if the body carried one.
	pub fn message(&self) -> Option<&str> {
		self.body.as_ref().and_then(|body| body.error.message.as_deref())
	}

	/// Structured detail records preserved from the error body.
	pub fn details(&self) -> &[ErrorDetail] {
		self.body.as_ref().map(|body| body.error.details.as_slice()).unwrap_or_default()
	}
}

/// Error envelope returned by the APIs: `{ "error": { ... } }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
	/// Inner error record.
	pub error: ApiErrorDetail,
}

/// Inner error record of an [`ApiErrorBody`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiErrorDetail {
	/// Numeric error code.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub code: Option<i64>,
	/// Human-readable message.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Symbolic status such as `INVALID_ARGUMENT`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub status: Option<String>,
	/// Free-form detail records.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub details: Vec<ErrorDetail>,
}

/// One detail record; only `type` is fixed, every other field is kept verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
	/// Detail type URL or name.
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Remaining fields of the record.
	#[serde(flatten)]
	pub fields: serde_json::Map<String, Value>,
}

/// Decoding failures for response bodies and tagged payloads.
#[derive(Debug, ThisError)]
pub enum DecodeError {
	/// A declared-JSON response body did not match the expected shape.
	#[error("Response body could not be decoded: {source}.")]
	Body {
		/// Structured parsing failure including the JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code, when available.
		status: Option<u16>,
	},
	/// Payload is not valid JSON at all.
	#[error("Payload is not valid JSON.")]
	Json(#[from] serde_json::Error),
	/// The discriminator names no registered variant.
	#[error("Unknown {union} discriminator `{field}` value `{value}`.")]
	UnknownDiscriminator {
		/// Union being decoded.
		union: &'static str,
		/// Discriminator field name.
		field: &'static str,
		/// Offending discriminator value.
		value: String,
	},
	/// The discriminator field is absent.
	#[error("{union} payload is missing the `{field}` discriminator.")]
	MissingDiscriminator {
		/// Union being decoded.
		union: &'static str,
		/// Discriminator field name.
		field: &'static str,
	},
	/// Tagged payloads must be JSON objects.
	#[error("{union} payload must be a JSON object.")]
	NotAnObject {
		/// Union being decoded or encoded.
		union: &'static str,
	},
	/// The variant matched but its fields did not.
	#[error("{union} variant `{tag}` could not be decoded: {source}.")]
	Variant {
		/// Union being decoded.
		union: &'static str,
		/// Matched discriminator value.
		tag: &'static str,
		/// Field-level failure.
		#[source]
		source: serde_json::Error,
	},
	/// A variant could not be serialized.
	#[error("{union} value could not be encoded.")]
	Encode {
		/// Union being encoded.
		union: &'static str,
		/// Serializer failure.
		#[source]
		source: serde_json::Error,
	},
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client or request could not be constructed.
	#[error("HTTP client or request could not be constructed.")]
	HttpBuild {
		/// Underlying builder failure.
		#[source]
		source: BoxError,
	},
	/// HTTP request construction failed inside the OAuth layer.
	#[error(transparent)]
	HttpRequest(#[from] oauth2::http::Error),
	/// Token endpoint URL cannot be used by the OAuth client.
	#[error("Token endpoint URL is invalid.")]
	InvalidTokenUrl {
		/// Underlying parsing failure.
		#[source]
		source: oauth2::url::ParseError,
	},
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// The selected auth strategy lacks a credential.
	#[error("Missing `{field}` for the selected auth strategy.")]
	MissingCredential {
		/// Configuration field that must be supplied.
		field: &'static str,
	},
	/// Application secrets are base64 encoded.
	#[error("Application secret is not valid base64.")]
	InvalidApplicationSecret {
		/// Underlying decoding failure.
		#[source]
		source: base64::DecodeError,
	},
	/// HMAC key rejected by the MAC implementation.
	#[error("Signing key cannot key HMAC-SHA256.")]
	InvalidSigningKey,
	/// A configured header name or value is not valid HTTP.
	#[error("Header `{header}` is not a valid HTTP header.")]
	InvalidHeader {
		/// Header that failed validation.
		header: String,
	},
	/// Multipart requests must serialize to a JSON object.
	#[error("Multipart request fields must serialize to a JSON object.")]
	MultipartFields,
	/// Signing timestamp could not be formatted.
	#[error("Signing timestamp could not be formatted.")]
	Timestamp(#[from] time::error::Format),
}
impl ConfigError {
	/// Wraps a builder failure inside [`ConfigError`].
	pub fn http_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Underlying IO failure surfaced during transport.
	#[error("I/O error occurred while calling the API.")]
	Io(#[from] std::io::Error),
	/// HTTP client failure without a typed source.
	#[error("HTTP client error occurred while calling the API: {message}.")]
	Other {
		/// Client-supplied description.
		message: String,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		Self::network(e)
	}
}
