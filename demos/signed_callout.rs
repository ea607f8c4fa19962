//! Demonstrates the application-signed strategy: the client signs each request with the
//! application secret, and the mock endpoint only answers when the signature headers are there.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
use serde_json::json;
// self
use sinch_core::{client::SinchClient, config::ClientConfig, reqwest::Method, url::Url};

#[derive(Debug, Default, Deserialize)]
struct CalloutResponse {
	#[serde(rename = "callId")]
	call_id: String,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let callout_mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/calling/v1/callouts")
				.header_exists("authorization")
				.header_exists("x-timestamp");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"callId\":\"demo-call\"}");
		})
		.await;
	let config = ClientConfig::builder()
		.application("demo-application", "ZGVtby1zZWNyZXQ=")
		.sdk_header("sinch-core-demo/0.1")
		.build()?;
	let client = SinchClient::new(config)?;
	let response: CalloutResponse = client
		.transport()
		.send(
			Method::POST,
			Url::parse(&server.url("/calling/v1/callouts"))?,
			Some(&json!({
				"method": "ttsCallout",
				"ttsCallout": {
					"destination": { "type": "number", "endpoint": "+15551230001" },
					"text": "Your code is 1 2 3 4."
				}
			})),
		)
		.await?;

	println!("Placed call {}.", response.call_id);

	callout_mock.assert_async().await;

	Ok(())
}
