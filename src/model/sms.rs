//! SMS messages: inbound (mobile-originated) messages with their index-paged listing, and the
//! headers of outbound batches.

// self
use crate::{
	_prelude::*,
	pagination::{Continuation, Page, PageParts, PagedRequest},
};

/// Text message received from a handset (`mo_text`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoText {
	/// Message identifier.
	pub id: String,
	/// Sender number.
	pub from: String,
	/// Receiving number or short code.
	pub to: String,
	/// Message text.
	pub body: String,
	/// Receipt time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub received_at: Option<OffsetDateTime>,
	/// Mobile network of the sender.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub operator_id: Option<String>,
	/// Reference of the batch this message replies to.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub client_reference: Option<String>,
}

/// Binary message received from a handset (`mo_binary`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoBinary {
	/// Message identifier.
	pub id: String,
	/// Sender number.
	pub from: String,
	/// Receiving number or short code.
	pub to: String,
	/// Base64-encoded payload.
	pub body: String,
	/// Hex-encoded user data header.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub udh: Option<String>,
	/// Receipt time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub received_at: Option<OffsetDateTime>,
}

/// Media attached to an MMS.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBody {
	/// Media URL.
	pub url: String,
	/// Accompanying text.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub message: Option<String>,
	/// Message subject.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub subject: Option<String>,
}

/// Media message received from a handset (`mo_media`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoMedia {
	/// Message identifier.
	pub id: String,
	/// Sender number.
	pub from: String,
	/// Receiving number or short code.
	pub to: String,
	/// Media content.
	pub body: MediaBody,
	/// Receipt time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub received_at: Option<OffsetDateTime>,
}

crate::tagged_union! {
	/// Inbound message, discriminated by `type`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum InboundMessage: "type" {
		/// Text.
		Text(MoText) = "mo_text",
		/// Binary.
		Binary(MoBinary) = "mo_binary",
		/// Media.
		Media(MoMedia) = "mo_media",
	}
}
impl InboundMessage {
	/// Sender number shared by every message kind.
	pub fn from(&self) -> &str {
		match self {
			Self::Text(message) => &message.from,
			Self::Binary(message) => &message.from,
			Self::Media(message) => &message.from,
		}
	}
}

/// Header of an outbound text batch (`mt_text`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBatchHeader {
	/// Batch identifier.
	pub id: String,
	/// Recipient numbers.
	pub to: Vec<String>,
	/// Sender number or alphanumeric sender.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	/// Message text.
	pub body: String,
	/// Whether the batch was cancelled before delivery.
	#[serde(default)]
	pub canceled: bool,
	/// Creation time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

/// Header of an outbound binary batch (`mt_binary`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryBatchHeader {
	/// Batch identifier.
	pub id: String,
	/// Recipient numbers.
	pub to: Vec<String>,
	/// Sender number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	/// Base64-encoded payload.
	pub body: String,
	/// Hex-encoded user data header.
	pub udh: String,
	/// Whether the batch was cancelled before delivery.
	#[serde(default)]
	pub canceled: bool,
	/// Creation time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

/// Header of an outbound MMS batch (`mt_media`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaBatchHeader {
	/// Batch identifier.
	pub id: String,
	/// Recipient numbers.
	pub to: Vec<String>,
	/// Sender number.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub from: Option<String>,
	/// Media content.
	pub body: MediaBody,
	/// Whether the batch was cancelled before delivery.
	#[serde(default)]
	pub canceled: bool,
	/// Creation time.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub created_at: Option<OffsetDateTime>,
}

crate::tagged_union! {
	/// Outbound batch header, discriminated by `type`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum BatchHeader: "type" {
		/// Text.
		Text(TextBatchHeader) = "mt_text",
		/// Binary.
		Binary(BinaryBatchHeader) = "mt_binary",
		/// Media.
		Media(MediaBatchHeader) = "mt_media",
	}
}
impl BatchHeader {
	/// Batch identifier.
	pub fn id(&self) -> &str {
		match self {
			Self::Text(batch) => &batch.id,
			Self::Binary(batch) => &batch.id,
			Self::Media(batch) => &batch.id,
		}
	}

	/// Returns `true` once the batch has been cancelled.
	pub fn is_canceled(&self) -> bool {
		match self {
			Self::Text(batch) => batch.canceled,
			Self::Binary(batch) => batch.canceled,
			Self::Media(batch) => batch.canceled,
		}
	}
}

/// One page of inbound messages.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InboundsPage {
	/// Messages on this page.
	#[serde(default)]
	pub inbounds: Vec<InboundMessage>,
	/// Zero-based page index.
	#[serde(default)]
	pub page: u32,
	/// Requested page size.
	#[serde(default)]
	pub page_size: u32,
	/// Total number of matching messages.
	#[serde(default)]
	pub count: u64,
}
impl Page for InboundsPage {
	type Item = InboundMessage;

	fn into_parts(self) -> PageParts<InboundMessage> {
		PageParts::from_index(self.inbounds, self.page, self.page_size)
	}
}

/// Query for listing inbound messages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListInboundsRequest {
	/// Zero-based page index.
	pub page: u32,
	/// Requested page size.
	pub page_size: Option<u32>,
	/// Receiving numbers to filter on.
	pub to: Vec<String>,
}
impl ListInboundsRequest {
	/// Appends this query to a listing URL.
	pub fn apply_to(&self, url: &mut Url) {
		let mut query = url.query_pairs_mut();

		query.append_pair("page", &self.page.to_string());

		if let Some(size) = self.page_size {
			query.append_pair("page_size", &size.to_string());
		}
		if !self.to.is_empty() {
			query.append_pair("to", &self.to.join(","));
		}
	}
}
impl PagedRequest for ListInboundsRequest {
	fn set_continuation(&mut self, next: &Continuation) {
		if let Continuation::Index(page) = next {
			self.page = *page;
		}
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn short_page_ends_listing() {
		let page: InboundsPage = serde_json::from_value(serde_json::json!({
			"count": 3,
			"page": 1,
			"page_size": 2,
			"inbounds": [{
				"type": "mo_text",
				"id": "m-3",
				"from": "+15551230002",
				"to": "12345",
				"body": "STOP",
				"received_at": "2024-05-01T10:00:00.000Z"
			}]
		}))
		.expect("Page fixture should decode.");

		assert_eq!(page.inbounds[0].from(), "+15551230002");
		assert!(page.into_parts().next.is_none());
	}

	#[test]
	fn batch_header_is_picked_by_type() {
		let header: BatchHeader = serde_json::from_value(serde_json::json!({
			"type": "mt_binary",
			"id": "b-1",
			"to": ["+15551230002"],
			"body": "AAEC",
			"udh": "050003",
			"canceled": true
		}))
		.expect("Binary header should decode.");

		assert_eq!(header.id(), "b-1");
		assert!(header.is_canceled());
		assert!(matches!(header, BatchHeader::Binary(BinaryBatchHeader { ref udh, .. }) if udh == "050003"));
	}
}
