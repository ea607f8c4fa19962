//! Active number listings and their voice provisioning records.

// self
use crate::{
	_prelude::*,
	pagination::{Continuation, Page, PageParts, PagedRequest},
};

crate::open_enum! {
	/// Number category.
	pub enum NumberType {
		/// Mobile number.
		Mobile = "MOBILE",
		/// Geographic number.
		Local = "LOCAL",
		/// Toll-free number.
		TollFree = "TOLL_FREE",
	}
}

/// Voice provisioning for a Real Time Communication application.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RtcConfiguration {
	/// Voice application identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub app_id: Option<String>,
	/// Last provisioning change.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub last_updated_time: Option<OffsetDateTime>,
}

/// Voice provisioning for an Elastic SIP Trunk.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstConfiguration {
	/// Trunk identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub trunk_id: Option<String>,
	/// Last provisioning change.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub last_updated_time: Option<OffsetDateTime>,
}

/// Voice provisioning for a fax service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaxConfiguration {
	/// Fax service identifier.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub service_id: Option<String>,
	/// Last provisioning change.
	#[serde(default, skip_serializing_if = "Option::is_none", with = "time::serde::rfc3339::option")]
	pub last_updated_time: Option<OffsetDateTime>,
}

crate::tagged_union! {
	/// Voice provisioning record, discriminated by `type`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum VoiceConfiguration: "type" {
		/// Real Time Communication application.
		Rtc(RtcConfiguration) = "RTC",
		/// Elastic SIP Trunk.
		Est(EstConfiguration) = "EST",
		/// Fax service.
		Fax(FaxConfiguration) = "FAX",
	}
}

/// Amount in a given currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Money {
	/// ISO 4217 currency code.
	pub currency_code: String,
	/// Decimal amount as sent by the API.
	pub amount: String,
}

/// Number rented by the project.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveNumber {
	/// E.164 number.
	pub phone_number: String,
	/// ISO 3166-1 alpha-2 region.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub region_code: Option<String>,
	/// Number category.
	#[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
	pub number_type: Option<NumberType>,
	/// Display name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub display_name: Option<String>,
	/// `SMS` and/or `VOICE`.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub capability: Vec<String>,
	/// Monthly rental price.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub money: Option<Money>,
	/// Voice provisioning.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub voice_configuration: Option<VoiceConfiguration>,
}

/// One page of active numbers.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveNumbersPage {
	/// Numbers on this page.
	#[serde(default)]
	pub active_numbers: Vec<ActiveNumber>,
	/// Token for the next page.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub next_page_token: Option<String>,
	/// Total number of active numbers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub total_size: Option<u64>,
}
impl Page for ActiveNumbersPage {
	type Item = ActiveNumber;

	fn into_parts(self) -> PageParts<ActiveNumber> {
		PageParts::from_token(self.active_numbers, self.next_page_token)
	}
}

/// Query for listing active numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListActiveNumbersRequest {
	/// ISO 3166-1 alpha-2 region.
	pub region_code: String,
	/// Number category.
	pub number_type: NumberType,
	/// Requested page size.
	pub page_size: Option<u32>,
	/// Continuation token from the previous page.
	pub page_token: Option<String>,
}
impl ListActiveNumbersRequest {
	/// First-page query.
	pub fn new(region_code: impl Into<String>, number_type: NumberType) -> Self {
		Self { region_code: region_code.into(), number_type, page_size: None, page_token: None }
	}

	/// Sets the page size.
	pub fn page_size(mut self, size: u32) -> Self {
		self.page_size = Some(size);

		self
	}

	/// Appends this query to a listing URL.
	pub fn apply_to(&self, url: &mut Url) {
		let mut query = url.query_pairs_mut();

		query.append_pair("regionCode", &self.region_code);
		query.append_pair("type", self.number_type.as_str());

		if let Some(size) = self.page_size {
			query.append_pair("pageSize", &size.to_string());
		}
		if let Some(token) = &self.page_token {
			query.append_pair("pageToken", token);
		}
	}
}
impl PagedRequest for ListActiveNumbersRequest {
	fn set_continuation(&mut self, next: &Continuation) {
		if let Continuation::Token(token) = next {
			self.page_token = Some(token.clone());
		}
	}
}
