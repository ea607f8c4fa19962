//! Discriminated-union codec for webhook events, call-control actions, and provisioning
//! records.
//!
//! A [`TaggedUnion`] is a closed enum whose wire form is a flat JSON object carrying a string
//! discriminator field (`event`, `name`, `type`, ...). Each union registers one [`Variant`] per
//! discriminator value; decoding looks the value up in that table and deserializes the whole
//! object into the variant's payload, encoding serializes the payload alone and stamps the
//! discriminator back in. Unknown discriminator values are hard failures.
//!
//! [`tagged_union!`](crate::tagged_union) generates the enum, its registry, and serde impls.
//! [`open_enum!`](crate::open_enum) covers the opposite case: string enums that must tolerate
//! values added server-side.

// self
use crate::{_prelude::*, error::DecodeError};

#[doc(hidden)]
pub mod __private {
	pub use serde::{
		Deserialize, Deserializer, Serialize, Serializer, de::Error as DeError,
		ser::Error as SerError,
	};
	pub use serde_json::{Error as JsonError, Value, to_value};
}

/// Decoder for one registered discriminator value.
pub struct Variant<U> {
	/// Discriminator value on the wire.
	pub tag: &'static str,
	/// Deserializes the full wire object into the union.
	pub decode: fn(Value) -> Result<U, serde_json::Error>,
}
impl<U> Debug for Variant<U> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Variant").field("tag", &self.tag).finish()
	}
}

/// Closed sum type with a compile-time discriminator table.
pub trait TaggedUnion
where
	Self: 'static + Sized,
{
	/// Union name used in error messages.
	const NAME: &'static str;
	/// Name of the discriminator field.
	const TAG: &'static str;
	/// Registered variants.
	const VARIANTS: &'static [Variant<Self>];

	/// Discriminator value of this value's variant.
	fn tag(&self) -> &'static str;

	/// Serializes the variant payload without the discriminator.
	fn encode_payload(&self) -> Result<Value, serde_json::Error>;
}

/// Registry decoder for payload type `P`.
pub fn decode_variant<P, U>(value: Value) -> Result<U, serde_json::Error>
where
	P: DeserializeOwned + Into<U>,
{
	serde_json::from_value::<P>(value).map(Into::into)
}

/// Decodes a wire object into the union selected by its discriminator.
pub fn decode_value<U>(value: Value) -> Result<U, DecodeError>
where
	U: TaggedUnion,
{
	let Value::Object(fields) = &value else {
		return Err(DecodeError::NotAnObject { union: U::NAME });
	};
	let tag = match fields.get(U::TAG) {
		Some(Value::String(tag)) => tag,
		Some(other) =>
			return Err(DecodeError::UnknownDiscriminator {
				union: U::NAME,
				field: U::TAG,
				value: other.to_string(),
			}),
		None => return Err(DecodeError::MissingDiscriminator { union: U::NAME, field: U::TAG }),
	};
	let variant = U::VARIANTS.iter().find(|variant| variant.tag == tag).ok_or_else(|| {
		DecodeError::UnknownDiscriminator { union: U::NAME, field: U::TAG, value: tag.clone() }
	})?;

	(variant.decode)(value).map_err(|source| DecodeError::Variant {
		union: U::NAME,
		tag: variant.tag,
		source,
	})
}

/// Parses JSON bytes and decodes them as `U`.
pub fn decode_slice<U>(bytes: &[u8]) -> Result<U, DecodeError>
where
	U: TaggedUnion,
{
	decode_value(serde_json::from_slice(bytes)?)
}

/// Encodes a union value as its variant's fields plus the discriminator.
pub fn encode_value<U>(union: &U) -> Result<Value, DecodeError>
where
	U: TaggedUnion,
{
	let payload = union
		.encode_payload()
		.map_err(|source| DecodeError::Encode { union: U::NAME, source })?;
	let mut fields = match payload {
		Value::Object(fields) => fields,
		Value::Null => serde_json::Map::new(),
		_ => return Err(DecodeError::NotAnObject { union: U::NAME }),
	};

	fields.insert(U::TAG.to_owned(), Value::String(union.tag().to_owned()));

	Ok(Value::Object(fields))
}

/// Declares a [`TaggedUnion`] enum with one payload type per discriminator value.
///
/// ```
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
/// pub struct Say {
///     pub text: String,
/// }
///
/// #[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
/// pub struct Answer {}
///
/// sinch_core::tagged_union! {
///     /// Call instruction.
///     #[derive(Clone, Debug, PartialEq)]
///     pub enum Instruction: "name" {
///         /// Speak text.
///         Say(Say) = "say",
///         /// Answer the call.
///         Answer(Answer) = "answer",
///     }
/// }
///
/// let value = serde_json::json!({ "name": "say", "text": "hi" });
/// let decoded: Instruction = serde_json::from_value(value.clone()).unwrap();
///
/// assert_eq!(decoded, Instruction::Say(Say { text: "hi".into() }));
/// assert_eq!(serde_json::to_value(&decoded).unwrap(), value);
/// ```
#[macro_export]
macro_rules! tagged_union {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident : $tag_field:literal {
			$(
				$(#[$variant_meta:meta])*
				$variant:ident($payload:ty) = $tag:literal
			),+ $(,)?
		}
	) => {
		$(#[$meta])*
		$vis enum $name {
			$(
				$(#[$variant_meta])*
				$variant($payload),
			)+
		}
		impl $crate::codec::TaggedUnion for $name {
			const NAME: &'static str = stringify!($name);
			const TAG: &'static str = $tag_field;
			const VARIANTS: &'static [$crate::codec::Variant<Self>] = &[
				$(
					$crate::codec::Variant {
						tag: $tag,
						decode: $crate::codec::decode_variant::<$payload, Self>,
					},
				)+
			];

			fn tag(&self) -> &'static str {
				match self {
					$(Self::$variant(_) => $tag,)+
				}
			}

			fn encode_payload(
				&self,
			) -> ::std::result::Result<$crate::codec::__private::Value, $crate::codec::__private::JsonError>
			{
				match self {
					$(Self::$variant(payload) => $crate::codec::__private::to_value(payload),)+
				}
			}
		}
		impl $crate::codec::__private::Serialize for $name {
			fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
			where
				S: $crate::codec::__private::Serializer,
			{
				use $crate::codec::__private::SerError;

				let value = $crate::codec::encode_value(self).map_err(S::Error::custom)?;

				$crate::codec::__private::Serialize::serialize(&value, serializer)
			}
		}
		impl<'de> $crate::codec::__private::Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
			where
				D: $crate::codec::__private::Deserializer<'de>,
			{
				use $crate::codec::__private::DeError;

				let value = <$crate::codec::__private::Value as $crate::codec::__private::Deserialize>::deserialize(deserializer)?;

				$crate::codec::decode_value(value).map_err(D::Error::custom)
			}
		}
		$(
			impl ::std::convert::From<$payload> for $name {
				fn from(payload: $payload) -> Self {
					Self::$variant(payload)
				}
			}
		)+
	};
}

/// Declares a string enum that keeps unknown values as `Unrecognized(raw)` instead of failing.
#[macro_export]
macro_rules! open_enum {
	(
		$(#[$meta:meta])*
		$vis:vis enum $name:ident {
			$(
				$(#[$variant_meta:meta])*
				$variant:ident = $value:literal
			),+ $(,)?
		}
	) => {
		$(#[$meta])*
		#[derive(Clone, Debug, PartialEq, Eq, Hash)]
		$vis enum $name {
			$(
				$(#[$variant_meta])*
				$variant,
			)+
			/// Value not known to this version of the crate, kept verbatim.
			Unrecognized(::std::string::String),
		}
		impl $name {
			/// Wire value.
			pub fn as_str(&self) -> &str {
				match self {
					$(Self::$variant => $value,)+
					Self::Unrecognized(raw) => raw,
				}
			}

			/// Returns `false` for [`Self::Unrecognized`].
			pub fn is_known(&self) -> bool {
				!matches!(self, Self::Unrecognized(_))
			}
		}
		impl ::std::convert::From<&str> for $name {
			fn from(raw: &str) -> Self {
				match raw {
					$($value => Self::$variant,)+
					other => Self::Unrecognized(other.to_owned()),
				}
			}
		}
		impl ::std::fmt::Display for $name {
			fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
				f.write_str(self.as_str())
			}
		}
		impl $crate::codec::__private::Serialize for $name {
			fn serialize<S>(&self, serializer: S) -> ::std::result::Result<S::Ok, S::Error>
			where
				S: $crate::codec::__private::Serializer,
			{
				serializer.serialize_str(self.as_str())
			}
		}
		impl<'de> $crate::codec::__private::Deserialize<'de> for $name {
			fn deserialize<D>(deserializer: D) -> ::std::result::Result<Self, D::Error>
			where
				D: $crate::codec::__private::Deserializer<'de>,
			{
				let raw = <::std::string::String as $crate::codec::__private::Deserialize>::deserialize(
					deserializer,
				)?;

				Ok(Self::from(raw.as_str()))
			}
		}
	};
}
