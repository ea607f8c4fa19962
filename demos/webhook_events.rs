//! Demonstrates validating an inbound callback, decoding it into its event union, and answering
//! with a call-control document.

// crates.io
use color_eyre::{Result, eyre::eyre};
// self
use sinch_core::{
	auth::TokenSecret,
	model::{
		svaml::{ConnectConf, Hangup, Say, Svaml},
		voice::CallEvent,
	},
	webhook::{SIGNATURE_HEADER, SignatureValidator, Webhooks},
};

const SECRET: &str = "demo-webhook-secret";

fn main() -> Result<()> {
	color_eyre::install()?;

	let body = br#"{
		"event": "ice",
		"callid": "demo-call",
		"timestamp": "2024-05-01T10:00:00Z",
		"cli": "+15551230002",
		"to": { "type": "number", "endpoint": "+15551230001" },
		"domain": "pstn"
	}"#;
	// Produced by the platform in production; signed locally here.
	let headers = [
		("content-type".to_owned(), "application/json".to_owned()),
		(SIGNATURE_HEADER.to_owned(), SignatureValidator::sign(SECRET, body)?),
	];
	let webhooks = Webhooks::new(Some(TokenSecret::new(SECRET)));

	if !webhooks.validate_headers(body, headers.iter().map(|(name, value)| (name, value))) {
		return Err(eyre!("Callback signature did not validate."));
	}

	let svaml = match webhooks.decode::<CallEvent>(body)? {
		CallEvent::Incoming(ice) => {
			println!("Incoming call {} from {:?}.", ice.call_id.unwrap_or_default(), ice.cli);

			Svaml::new(ConnectConf { conference_id: "demo-room".into(), moh: None })
				.instruction(Say { text: "Joining the conference.".into(), locale: None })
		},
		other => {
			println!("Ignoring {} event.", other.call_id().unwrap_or("unknown"));

			Svaml::new(Hangup {})
		},
	};

	println!("{}", serde_json::to_string_pretty(&svaml)?);

	Ok(())
}
