//! Wire models whose shapes the pipeline itself depends on: the registered tagged unions,
//! the open string enums next to them, and the paged listings.

pub mod numbers;
pub mod sms;
pub mod svaml;
pub mod verification;
pub mod voice;

// self
use crate::_prelude::*;

/// Amount in a given currency, as reported on call and verification events.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
	/// ISO 4217 currency code.
	pub currency_id: String,
	/// Amount in major units.
	pub amount: f64,
}
