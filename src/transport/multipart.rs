// crates.io
use reqwest::header::HeaderValue;
use sha2::{Digest, Sha256};
// self
use crate::{_prelude::*, error::ConfigError};

/// Binary part attached to a multipart request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePart {
	/// File name reported in the part's content disposition.
	pub filename: String,
	/// Raw content.
	pub content: Vec<u8>,
	/// Optional MIME type; the part carries no content type when absent.
	pub mime: Option<String>,
}
impl FilePart {
	/// Creates a part without an explicit MIME type.
	pub fn new(filename: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
		Self { filename: filename.into(), content: content.into(), mime: None }
	}

	/// Sets the MIME type of the part.
	pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
		self.mime = Some(mime.into());

		self
	}
}

/// Multipart body flattened from a serializable request plus one file.
///
/// Each top-level field of the serialized request becomes a text part: strings verbatim,
/// numbers and booleans as their JSON text, arrays as one part per element, nested objects as
/// JSON text. Null fields are skipped. The file travels in a part named `file`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartBody {
	fields: Vec<(String, String)>,
	file: FilePart,
}
impl MultipartBody {
	/// Name of the binary part.
	pub const FILE_FIELD: &'static str = "file";

	/// Flattens `request` into text parts and pairs them with `file`.
	pub fn from_request<Req>(request: &Req, file: FilePart) -> Result<Self>
	where
		Req: ?Sized + Serialize,
	{
		let value = serde_json::to_value(request).map_err(|source| Error::RequestBody { source })?;
		let Value::Object(map) = value else {
			return Err(ConfigError::MultipartFields.into());
		};
		let mut fields = Vec::with_capacity(map.len());

		for (name, value) in map {
			flatten_field(&name, value, &mut fields);
		}

		Ok(Self { fields, file })
	}

	/// Text parts in transmission order.
	pub fn fields(&self) -> &[(String, String)] {
		&self.fields
	}

	/// The binary part.
	pub fn file(&self) -> &FilePart {
		&self.file
	}

	/// Serializes the body to the exact bytes that are signed and sent.
	///
	/// The boundary is derived from the body's own digest, so encoding is deterministic and
	/// every attempt resends identical bytes.
	pub fn encode(&self) -> Result<EncodedMultipart, ConfigError> {
		if let Some(mime) = &self.file.mime {
			HeaderValue::from_str(mime)
				.map_err(|_| ConfigError::InvalidHeader { header: "content-type".into() })?;
		}

		let boundary = self.boundary();
		let mut bytes = Vec::with_capacity(self.file.content.len() + 256);

		for (name, value) in &self.fields {
			push_part_head(&mut bytes, &boundary, name, None, None);
			bytes.extend_from_slice(value.as_bytes());
			bytes.extend_from_slice(b"\r\n");
		}

		push_part_head(
			&mut bytes,
			&boundary,
			Self::FILE_FIELD,
			Some(&self.file.filename),
			self.file.mime.as_deref(),
		);
		bytes.extend_from_slice(&self.file.content);
		bytes.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

		Ok(EncodedMultipart {
			content_type: format!("multipart/form-data; boundary={boundary}"),
			bytes,
		})
	}

	fn boundary(&self) -> String {
		let mut hasher = Sha256::new();

		for (name, value) in &self.fields {
			hasher.update(name.as_bytes());
			hasher.update([0_u8]);
			hasher.update(value.as_bytes());
			hasher.update([0_u8]);
		}

		hasher.update(self.file.filename.as_bytes());
		hasher.update([0_u8]);
		hasher.update(&self.file.content);

		let digest = hasher.finalize();

		digest[..16].iter().fold(String::from("sinch-core-"), |mut boundary, byte| {
			boundary.push_str(&format!("{byte:02x}"));

			boundary
		})
	}
}

/// Multipart payload in wire form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedMultipart {
	/// `multipart/form-data` content type carrying the boundary.
	pub content_type: String,
	/// Body bytes.
	pub bytes: Vec<u8>,
}

fn push_part_head(
	out: &mut Vec<u8>,
	boundary: &str,
	name: &str,
	filename: Option<&str>,
	mime: Option<&str>,
) {
	out.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
	out.extend_from_slice(
		format!("Content-Disposition: form-data; name=\"{}\"", escape_quoted(name)).as_bytes(),
	);

	if let Some(filename) = filename {
		out.extend_from_slice(format!("; filename=\"{}\"", escape_quoted(filename)).as_bytes());
	}

	out.extend_from_slice(b"\r\n");

	if let Some(mime) = mime {
		out.extend_from_slice(format!("Content-Type: {mime}\r\n").as_bytes());
	}

	out.extend_from_slice(b"\r\n");
}

// Quoted header parameters cannot carry raw quotes or line breaks.
fn escape_quoted(value: &str) -> String {
	value.replace('"', "%22").replace('\r', "%0D").replace('\n', "%0A")
}

fn flatten_field(name: &str, value: Value, out: &mut Vec<(String, String)>) {
	match value {
		Value::Null => (),
		Value::String(text) => out.push((name.to_owned(), text)),
		Value::Array(items) =>
			for item in items {
				flatten_field(name, item, out);
			},
		other => out.push((name.to_owned(), other.to_string())),
	}
}
