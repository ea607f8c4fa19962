mod common;

// std
use std::{
	io::{Read, Write},
	net::TcpListener,
	thread::{self, JoinHandle},
	time::Duration as StdDuration,
};
// crates.io
use httpmock::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sinch_core::{
	auth::{ApplicationSigner, RequestSigner, SignedRequestContext, TokenSecret},
	error::{DecodeError, Error},
	reqwest::Method,
	transport::{FilePart, HeaderExpirySignal},
	url::Url,
};
use tokio_util::sync::CancellationToken;
// self
use common::*;

#[derive(Debug, Default, Deserialize)]
struct Callout {
	#[serde(rename = "callId")]
	call_id: String,
}

#[derive(Serialize)]
struct FaxFields {
	a: &'static str,
	b: &'static str,
}

#[tokio::test]
async fn expired_token_is_renewed_and_retried_once() {
	let server = MockServer::start_async().await;
	let stale = server
		.mock_async(|when, then| {
			when.method(POST).path("/calling/v1/callouts").header("authorization", "Bearer stale");
			then.status(401).header("www-authenticate", EXPIRED_CHALLENGE);
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/calling/v1/callouts")
				.header("authorization", "Bearer fresh-1")
				.header("content-type", "application/json; charset=utf-8");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"callId\":\"call-1\"}");
		})
		.await;
	let (transport, provider) = scripted_transport();
	let callout: Callout = transport
		.send(
			Method::POST,
			server_url(&server, "/calling/v1/callouts"),
			Some(&serde_json::json!({ "method": "ttsCallout" })),
		)
		.await
		.expect("Retried request should succeed.");

	assert_eq!(callout.call_id, "call-1");
	assert_eq!(provider.calls(), 2);
	assert_eq!(provider.forced(), 1);

	stale.assert_calls_async(1).await;
	fresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn second_unauthorized_response_is_terminal() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/projects/p/activeNumbers");
			then.status(401).header("www-authenticate", EXPIRED_CHALLENGE);
		})
		.await;
	let (transport, provider) = scripted_transport();
	let err = transport
		.send::<(), Value>(Method::GET, server_url(&server, "/v1/projects/p/activeNumbers"), None)
		.await
		.expect_err("Repeated expiry should surface.");

	assert!(matches!(err, Error::Api(ref api) if api.is_unauthorized()));
	assert_eq!(provider.forced(), 1);

	mock.assert_calls_async(2).await;
}

#[tokio::test]
async fn unauthorized_without_expiry_signal_is_not_retried() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/projects/p/activeNumbers");
			then.status(401).header("www-authenticate", "Bearer error=\"invalid_token\"");
		})
		.await;
	let (transport, provider) = scripted_transport();
	let err = transport
		.send::<(), Value>(Method::GET, server_url(&server, "/v1/projects/p/activeNumbers"), None)
		.await
		.expect_err("Plain 401 should surface.");

	assert!(matches!(err, Error::Api(ref api) if api.status == 401));
	assert_eq!(provider.forced(), 0);

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn custom_expiry_signal_drives_the_retry() {
	let server = MockServer::start_async().await;
	let stale = server
		.mock_async(|when, then| {
			when.method(GET).path("/sms").header("authorization", "Bearer stale");
			then.status(401).header("x-auth-status", "TOKEN_EXPIRED");
		})
		.await;
	let fresh = server
		.mock_async(|when, then| {
			when.method(GET).path("/sms").header("authorization", "Bearer fresh-1");
			then.status(204);
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let transport = transport.with_expiry_signal(
		HeaderExpirySignal::new("x-auth-status", "token_expired")
			.expect("Header name should be valid."),
	);
	let value: Value = transport
		.send::<(), _>(Method::GET, server_url(&server, "/sms"), None)
		.await
		.expect("Retried request should succeed.");

	assert_eq!(value, Value::Null);

	stale.assert_calls_async(1).await;
	fresh.assert_calls_async(1).await;
}

#[tokio::test]
async fn signed_requests_are_never_retried() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/calling/v1/callouts")
				.header_exists("authorization")
				.header_exists("x-timestamp");
			then.status(401).header("www-authenticate", EXPIRED_CHALLENGE);
		})
		.await;
	let err = signed_transport()
		.send::<_, Value>(
			Method::POST,
			server_url(&server, "/calling/v1/callouts"),
			Some(&serde_json::json!({ "method": "conferenceCallout" })),
		)
		.await
		.expect_err("Signed 401 should surface.");

	assert!(matches!(err, Error::Api(ref api) if api.is_unauthorized()));

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn error_bodies_keep_their_detail_records() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/v1/projects/p/activeNumbers");
			then.status(400).header("content-type", "application/json").body(
				r#"{"error":{"code":400,"message":"Invalid page size.","status":"INVALID_ARGUMENT","details":[{"type":"BadRequest","fieldViolations":[{"field":"pageSize"}]}]}}"#,
			);
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let err = transport
		.send::<(), Value>(Method::GET, server_url(&server, "/v1/projects/p/activeNumbers"), None)
		.await
		.expect_err("400 should surface.");
	let Error::Api(api) = err else {
		panic!("Expected an API error.");
	};

	assert_eq!(api.status, 400);
	assert_eq!(api.reason, "Bad Request");
	assert_eq!(api.message(), Some("Invalid page size."));
	assert_eq!(api.details()[0].kind.as_deref(), Some("BadRequest"));
}

#[tokio::test]
async fn non_json_error_bodies_are_dropped() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/status");
			then.status(503).header("content-type", "text/html").body("<h1>down</h1>");
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let err = transport
		.send::<(), Value>(Method::GET, server_url(&server, "/status"), None)
		.await
		.expect_err("503 should surface.");

	assert!(matches!(err, Error::Api(ref api) if api.status == 503 && api.body.is_none()));
}

#[tokio::test]
async fn mismatched_success_body_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/calling/v1/callouts");
			then.status(200).header("content-type", "application/json").body("{\"callId\":7}");
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let err = transport
		.send::<Value, Callout>(
			Method::POST,
			server_url(&server, "/calling/v1/callouts"),
			Some(&serde_json::json!({})),
		)
		.await
		.expect_err("Numeric callId should fail.");

	assert!(matches!(err, Error::Decode(_)));
}

#[tokio::test]
async fn every_request_carries_the_sdk_header() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path("/ping")
				.header("x-sinch-sdk", "custom/1.0")
				.header("accept", "application/json");
			then.status(200).header("content-type", "application/json").body("{\"callId\":\"c-1\"}");
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let transport = transport.with_sdk_header("custom/1.0").expect("Header value should be valid.");
	let callout: Callout = transport
		.send::<(), _>(Method::GET, server_url(&server, "/ping"), None)
		.await
		.expect("Request with the custom header should succeed.");

	assert_eq!(callout.call_id, "c-1");

	mock.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_json_success_body_is_a_decode_error() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/calling/v1/calls/id/c-1");
			then.status(200).header("content-type", "application/json").body("");
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let err = transport
		.send::<(), Callout>(Method::GET, server_url(&server, "/calling/v1/calls/id/c-1"), None)
		.await
		.expect_err("Declared JSON with no body should not decode.");

	assert!(matches!(err, Error::Decode(DecodeError::Body { status: Some(200), .. })));
}

#[tokio::test]
async fn non_json_success_body_yields_the_default() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(DELETE).path("/calling/v1/calls/id/c-1");
			then.status(204);
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let callout: Callout = transport
		.send::<(), _>(Method::DELETE, server_url(&server, "/calling/v1/calls/id/c-1"), None)
		.await
		.expect("Bodiless success should decode to the default.");

	assert!(callout.call_id.is_empty());
}

#[tokio::test]
async fn cancellation_aborts_in_flight_request() {
	let server = MockServer::start_async().await;
	let _mock = server
		.mock_async(|when, then| {
			when.method(GET).path("/slow");
			then.status(200).delay(StdDuration::from_secs(5));
		})
		.await;
	let (transport, _provider) = scripted_transport();
	let cancel = CancellationToken::new();
	let trigger = cancel.clone();

	tokio::spawn(async move {
		tokio::time::sleep(StdDuration::from_millis(50)).await;
		trigger.cancel();
	});

	let err = transport
		.send_cancellable::<(), Value>(Method::GET, server_url(&server, "/slow"), None, &cancel)
		.await
		.expect_err("Cancelled request should fail.");

	assert!(matches!(err, Error::Cancelled));
}

fn header_end(request: &[u8]) -> Option<usize> {
	request.windows(4).position(|window| window == b"\r\n\r\n").map(|index| index + 4)
}

fn header_value(head: &str, name: &str) -> Option<String> {
	head.lines().find_map(|line| {
		let (key, value) = line.split_once(':')?;

		key.trim().eq_ignore_ascii_case(name).then(|| value.trim().to_owned())
	})
}

fn request_complete(request: &[u8]) -> bool {
	let Some(end) = header_end(request) else {
		return false;
	};
	let head = String::from_utf8_lossy(&request[..end]);

	match header_value(&head, "content-length").and_then(|value| value.parse::<usize>().ok()) {
		Some(length) => request.len() - end >= length,
		None => request.ends_with(b"0\r\n\r\n"),
	}
}

fn capture_one_request(path: &str) -> (Url, JoinHandle<Vec<u8>>) {
	let listener = TcpListener::bind("127.0.0.1:0").expect("Loopback listener should bind.");
	let address = listener.local_addr().expect("Listener should have an address.");
	let url = Url::parse(&format!("http://{address}{path}")).expect("Capture URL should parse.");
	let handle = thread::spawn(move || {
		let (mut stream, _) = listener.accept().expect("Client should connect.");
		let mut request = Vec::new();
		let mut buffer = [0_u8; 4096];

		while !request_complete(&request) {
			let read = stream.read(&mut buffer).expect("Request should be readable.");

			if read == 0 {
				break;
			}

			request.extend_from_slice(&buffer[..read]);
		}

		let body = "{\"id\":\"fax-1\"}";
		let response = format!(
			"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
			body.len(),
		);

		stream.write_all(response.as_bytes()).expect("Response should be writable.");

		request
	});

	(url, handle)
}

#[tokio::test]
async fn multipart_sends_one_part_per_field_plus_the_file() {
	let (url, capture) = capture_one_request("/fax/v3/projects/p/faxes");
	let file = FilePart::new("f.pdf", b"0123456789".to_vec()).with_mime("application/pdf");
	let response: Value = signed_transport()
		.send_multipart(Method::POST, url, &FaxFields { a: "x", b: "y" }, file)
		.await
		.expect("Multipart request should succeed.");

	assert_eq!(response["id"], "fax-1");

	let request = capture.join().expect("Capture thread should finish.");
	let end = header_end(&request).expect("Request should have a header block.");
	let head = String::from_utf8_lossy(&request[..end]).into_owned();
	let body = String::from_utf8_lossy(&request[end..]).into_owned();
	let content_type = header_value(&head, "content-type").expect("Content type should be set.");
	let boundary = content_type
		.split_once("boundary=")
		.map(|(_, boundary)| boundary.trim_matches('"').to_owned())
		.expect("Multipart content type should carry a boundary.");
	let parts = body
		.split(&format!("--{boundary}"))
		.filter(|part| part.to_ascii_lowercase().contains("content-disposition: form-data"))
		.collect::<Vec<_>>();

	let timestamp = header_value(&head, "x-timestamp").expect("Signed request should be timestamped.");
	let signer = ApplicationSigner::new(APPLICATION_KEY, &TokenSecret::new(APPLICATION_SECRET))
		.expect("Fixture application secret should be valid base64.");
	let expected = signer.authorization(&signer.sign(&SignedRequestContext {
		method: "POST",
		path_and_query: "/fax/v3/projects/p/faxes",
		timestamp: &timestamp,
		content_type: &content_type,
		body: &request[end..],
	}));

	assert!(content_type.starts_with("multipart/form-data"));
	assert_eq!(header_value(&head, "authorization"), Some(expected));
	assert_eq!(parts.len(), 3);
	assert!(parts[0].contains("name=\"a\"") && parts[0].contains("\r\n\r\nx\r\n"));
	assert!(parts[1].contains("name=\"b\"") && parts[1].contains("\r\n\r\ny\r\n"));
	assert!(parts[2].contains("name=\"file\"; filename=\"f.pdf\""));
	assert!(parts[2].contains("\r\n\r\n0123456789\r\n"));
}
