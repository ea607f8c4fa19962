//! Voice callback events delivered to the application's callback URL.

// self
use crate::{_prelude::*, model::Price};

crate::open_enum! {
	/// Final result of a call.
	pub enum CallResult {
		/// The callee answered.
		Answered = "ANSWERED",
		/// The callee was busy.
		Busy = "BUSY",
		/// Nobody answered before the dial timeout.
		NoAnswer = "NOANSWER",
		/// The call could not be completed.
		Failed = "FAILED",
	}
}

crate::open_enum! {
	/// Why a call ended.
	pub enum DisconnectReason {
		/// Not applicable.
		NotApplicable = "N/A",
		/// Timed out.
		Timeout = "TIMEOUT",
		/// The caller hung up.
		CallerHangup = "CALLERHANGUP",
		/// The callee hung up.
		CalleeHangup = "CALLEEHANGUP",
		/// The call was blocked.
		Blocked = "BLOCKED",
		/// The partner account ran out of credit.
		NoCreditPartner = "NOCREDITPARTNER",
		/// Hung up through the management API.
		ManagerHangup = "MANAGERHANGUP",
		/// Cancelled before connecting.
		Cancel = "CANCEL",
		/// Unspecified platform error.
		GeneralError = "GENERALERROR",
		/// The application answered with invalid SVAML.
		InvalidSvamlAction = "INVALIDSVAMLACTION",
	}
}

crate::open_enum! {
	/// Network a call leg travels on.
	pub enum Domain {
		/// Public switched telephone network.
		Pstn = "pstn",
		/// In-app (data) call.
		Mxp = "mxp",
		/// SIP trunk.
		Sip = "sip",
		/// Conference bridge.
		Conference = "conference",
	}
}

crate::open_enum! {
	/// Kind of endpoint a [`Destination`] names.
	pub enum DestinationType {
		/// E.164 phone number.
		Number = "number",
		/// In-app user name.
		Username = "username",
		/// SIP URI.
		Sip = "sip",
		/// Direct inward dialing number.
		Did = "did",
	}
}

/// Call endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Destination {
	/// Endpoint kind.
	#[serde(rename = "type")]
	pub kind: DestinationType,
	/// Number, user name, or URI.
	pub endpoint: String,
}

/// Custom SIP header carried on a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallHeader {
	/// Header name.
	pub key: String,
	/// Header value.
	pub value: String,
}

/// Incoming call event (`ice`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingCallEvent {
	/// Call identifier.
	#[serde(rename = "callid", default, skip_serializing_if = "Option::is_none")]
	pub call_id: Option<String>,
	/// Event time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub timestamp: Option<OffsetDateTime>,
	/// Caller-supplied passthrough data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom: Option<String>,
	/// Application the call belongs to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub application_key: Option<String>,
	/// Caller identity.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cli: Option<String>,
	/// Dialed endpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<Destination>,
	/// Network of the incoming leg.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub domain: Option<Domain>,
	/// Per-minute rate charged to the user.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub user_rate: Option<Price>,
	/// Custom SIP headers.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub call_headers: Vec<CallHeader>,
}

/// Answering machine detection outcome.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnsweringMachineDetection {
	/// `human`, `machine`, or `notsure`.
	pub status: String,
	/// Detector reason code.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<String>,
	/// Detection time in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration: Option<u32>,
}

/// Answered call event (`ace`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredCallEvent {
	/// Call identifier.
	#[serde(rename = "callid", default, skip_serializing_if = "Option::is_none")]
	pub call_id: Option<String>,
	/// Event time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub timestamp: Option<OffsetDateTime>,
	/// Caller-supplied passthrough data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom: Option<String>,
	/// Application the call belongs to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub application_key: Option<String>,
	/// Answering machine detection result, when enabled.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amd: Option<AnsweringMachineDetection>,
}

/// Disconnected call event (`dice`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisconnectedCallEvent {
	/// Call identifier.
	#[serde(rename = "callid", default, skip_serializing_if = "Option::is_none")]
	pub call_id: Option<String>,
	/// Event time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub timestamp: Option<OffsetDateTime>,
	/// Why the call ended.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub reason: Option<DisconnectReason>,
	/// Final result.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub result: Option<CallResult>,
	/// Connected duration in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub duration: Option<u32>,
	/// Amount charged for the call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub debit: Option<Price>,
	/// Caller identity.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	/// Dialed endpoint.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub to: Option<Destination>,
}

/// Result of a menu collected during a call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuResult {
	/// Menu that produced the result.
	pub menu_id: String,
	/// `return`, `sequence`, `timeout`, `hangup`, or `invalidinput`.
	#[serde(rename = "type")]
	pub kind: String,
	/// Collected value.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub value: Option<String>,
	/// `dtmf` or `voice`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub input_method: Option<String>,
}

/// Prompt input event (`pie`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptInputEvent {
	/// Call identifier.
	#[serde(rename = "callid", default, skip_serializing_if = "Option::is_none")]
	pub call_id: Option<String>,
	/// Event time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub timestamp: Option<OffsetDateTime>,
	/// Menu outcome.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub menu_result: Option<MenuResult>,
}

/// Notification event (`notify`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotifyEvent {
	/// Call identifier.
	#[serde(rename = "callid", default, skip_serializing_if = "Option::is_none")]
	pub call_id: Option<String>,
	/// Event schema version.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub version: Option<u32>,
	/// Notification type, e.g. `recording_finished`.
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub kind: Option<String>,
	/// Caller-supplied passthrough data.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub custom: Option<String>,
}

crate::tagged_union! {
	/// Voice callback event, discriminated by `event`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum CallEvent: "event" {
		/// Incoming call.
		Incoming(IncomingCallEvent) = "ice",
		/// Call answered.
		Answered(AnsweredCallEvent) = "ace",
		/// Call disconnected.
		Disconnected(DisconnectedCallEvent) = "dice",
		/// Menu input collected.
		PromptInput(PromptInputEvent) = "pie",
		/// Notification.
		Notify(NotifyEvent) = "notify",
	}
}
impl CallEvent {
	/// Call identifier shared by every event kind.
	pub fn call_id(&self) -> Option<&str> {
		match self {
			Self::Incoming(event) => event.call_id.as_deref(),
			Self::Answered(event) => event.call_id.as_deref(),
			Self::Disconnected(event) => event.call_id.as_deref(),
			Self::PromptInput(event) => event.call_id.as_deref(),
			Self::Notify(event) => event.call_id.as_deref(),
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::codec;

	#[test]
	fn decodes_disconnect_event_with_open_enums() {
		let event: CallEvent = codec::decode_slice(
			br#"{
				"event": "dice",
				"callid": "call-1",
				"timestamp": "2024-05-01T10:00:00Z",
				"reason": "CALLERHANGUP",
				"result": "SOMETHING_NEW",
				"duration": 12,
				"debit": { "currencyId": "USD", "amount": 0.0135 },
				"to": { "type": "number", "endpoint": "+15551230001" }
			}"#,
		)
		.expect("Disconnect fixture should decode.");
		let CallEvent::Disconnected(dice) = &event else {
			panic!("Expected a disconnect event.");
		};

		assert_eq!(event.call_id(), Some("call-1"));
		assert_eq!(dice.reason, Some(DisconnectReason::CallerHangup));
		assert_eq!(dice.result, Some(CallResult::Unrecognized("SOMETHING_NEW".into())));
		assert_eq!(dice.to.as_ref().map(|to| &to.kind), Some(&DestinationType::Number));
		assert!(dice.timestamp.is_some());
	}
}
