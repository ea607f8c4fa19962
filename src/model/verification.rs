//! Verification callback events.

// self
use crate::{_prelude::*, model::Price};

crate::open_enum! {
	/// Verification state.
	pub enum VerificationStatus {
		/// Awaiting the code or call.
		Pending = "PENDING",
		/// Verified.
		Successful = "SUCCESSFUL",
		/// Verification failed.
		Fail = "FAIL",
		/// Denied by the application.
		Denied = "DENIED",
		/// Aborted before completion.
		Aborted = "ABORTED",
		/// Platform error.
		Error = "ERROR",
	}
}

crate::open_enum! {
	/// Channel used to verify the identity.
	pub enum VerificationMethod {
		/// One-time code over SMS.
		Sms = "sms",
		/// Missed-call CLI verification.
		FlashCall = "flashcall",
		/// Code read out on a phone call.
		Callout = "callout",
		/// Data-connection verification.
		Seamless = "seamless",
	}
}

crate::open_enum! {
	/// Why a verification did not succeed.
	pub enum VerificationReason {
		/// Blocked by fraud detection.
		Fraud = "Fraud",
		/// The account ran out of credit.
		NotEnoughCredit = "Not enough credit",
		/// The destination is blocked.
		Blocked = "Blocked",
		/// The application's callback denied the request.
		DeniedByCallback = "Denied by callback",
		/// The application's callback answered with an invalid document.
		InvalidCallback = "Invalid callback",
		/// Platform error.
		InternalError = "Internal error",
		/// The destination was denied.
		DestinationDenied = "Destination denied",
		/// The number could not be reached.
		NetworkErrorOrNumberUnreachable = "Network error or number unreachable",
		/// Still pending when it failed.
		FailedPending = "Failed pending",
		/// The SMS could not be delivered.
		SmsDeliveryFailure = "SMS delivery failure",
		/// The caller identity was invalid.
		InvalidCli = "Invalid CLI",
		/// The wrong code was entered.
		InvalidCode = "Invalid code",
		/// The verification expired.
		Expired = "Expired",
		/// The callee hung up without entering a valid code.
		HungUpWithoutEnteringValidCode = "Hung up without entering valid code",
	}
}

/// Identity being verified.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	/// Identity kind, currently always `number`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Phone number.
	pub endpoint: String,
}

/// Sent when a verification starts so the application can allow or deny it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequestEvent {
	/// Verification identifier.
	pub id: String,
	/// Identity being verified.
	pub identity: Identity,
	/// Verification channel.
	pub method: VerificationMethod,
	/// Caller-supplied reference.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
	/// Caller-supplied passthrough data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom: Option<String>,
	/// Cost of the verification.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub price: Option<Price>,
	/// Languages accepted by the end user's device.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub accept_language: Vec<String>,
}

/// Sent when a verification completes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResultEvent {
	/// Verification identifier.
	pub id: String,
	/// Identity that was verified.
	pub identity: Identity,
	/// Verification channel.
	pub method: VerificationMethod,
	/// Final state.
	pub status: VerificationStatus,
	/// Failure reason.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<VerificationReason>,
	/// Caller-supplied reference.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reference: Option<String>,
	/// `intercept` or `manual` for how the code was supplied.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub source: Option<String>,
	/// Caller-supplied passthrough data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom: Option<String>,
}

crate::tagged_union! {
	/// Verification callback event, discriminated by `event`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum VerificationEvent: "event" {
		/// Verification requested.
		Request(VerificationRequestEvent) = "VerificationRequestEvent",
		/// Verification finished.
		Result(VerificationResultEvent) = "VerificationResultEvent",
	}
}
impl VerificationEvent {
	/// Verification identifier shared by both event kinds.
	pub fn id(&self) -> &str {
		match self {
			Self::Request(event) => &event.id,
			Self::Result(event) => &event.id,
		}
	}
}
