//! SVAML call-control responses: a list of instructions followed by one action.

// self
use crate::{_prelude::*, model::voice::{CallHeader, Destination}};

/// Answering machine detection toggle for outbound legs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmdSettings {
	/// Enables detection.
	pub enabled: bool,
}

/// Hang up the call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hangup {}

/// Continue the call with the platform's default handling.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continue {}

/// Connect the call to a phone number.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectPstn {
	/// E.164 number to dial.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub number: Option<String>,
	/// Locale for progress tones.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
	/// Maximum connected duration in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_duration: Option<u32>,
	/// Dial timeout in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_dial_timeout: Option<u32>,
	/// Caller identity presented to the callee.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cli: Option<String>,
	/// Suppresses further callbacks for this call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub suppress_callbacks: Option<bool>,
	/// DTMF sent once the callee answers.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub dtmf: Option<String>,
	/// Answering machine detection.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub amd: Option<AmdSettings>,
}

/// Connect the call to a SIP endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectSip {
	/// SIP destination.
	pub destination: Destination,
	/// Maximum connected duration in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_duration: Option<u32>,
	/// Caller identity presented to the callee.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub cli: Option<String>,
	/// `UDP`, `TCP`, or `TLS`.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transport: Option<String>,
	/// Suppresses further callbacks for this call.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub suppress_callbacks: Option<bool>,
	/// Custom SIP headers.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub call_headers: Vec<CallHeader>,
	/// Music on hold.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub moh: Option<String>,
}

/// Connect the call to a conference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectConf {
	/// Conference identifier.
	pub conference_id: String,
	/// Music on hold.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub moh: Option<String>,
}

/// Connect the call to an in-app user.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectMxp {
	/// User destination.
	pub destination: Destination,
	/// Custom headers forwarded to the app.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub call_headers: Vec<CallHeader>,
}

/// Put the call on hold.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Park {
	/// Locale for prompts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
	/// Prompt played once on entry.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub intro_prompt: Option<String>,
	/// Prompt looped while parked.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub hold_prompt: Option<String>,
	/// Maximum parked duration in seconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_duration: Option<u32>,
}

/// One IVR menu.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
	/// Menu identifier; `main` is the entry point.
	pub id: String,
	/// Prompt played when the menu starts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub main_prompt: Option<String>,
	/// Prompt repeated after invalid input.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub repeat_prompt: Option<String>,
	/// Number of repeats before giving up.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub repeats: Option<u32>,
	/// Maximum number of digits to collect.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub max_digits: Option<u32>,
	/// Input timeout in milliseconds.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub timeout_mills: Option<u32>,
}

/// Run an IVR menu.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunMenu {
	/// Lets callers interrupt prompts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub barge: Option<bool>,
	/// Locale for text-to-speech prompts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
	/// Menu to start with.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub main_menu: Option<String>,
	/// Accepts spoken input.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub enable_voice: Option<bool>,
	/// Menu definitions.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub menus: Vec<Menu>,
}

crate::tagged_union! {
	/// Terminal SVAML action, discriminated by `name`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum Action: "name" {
		/// Hang up.
		Hangup(Hangup) = "hangup",
		/// Continue.
		Continue(Continue) = "continue",
		/// Dial a number.
		ConnectPstn(ConnectPstn) = "connectPstn",
		/// Dial a SIP endpoint.
		ConnectSip(ConnectSip) = "connectSip",
		/// Join a conference.
		ConnectConf(ConnectConf) = "connectConf",
		/// Dial an in-app user.
		ConnectMxp(ConnectMxp) = "connectMxp",
		/// Park the call.
		Park(Park) = "park",
		/// Run an IVR menu.
		RunMenu(RunMenu) = "runMenu",
	}
}

/// Play prerecorded or synthesized prompts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayFiles {
	/// Prompt identifiers, URLs, or `#tts[...]` markup.
	pub ids: Vec<String>,
	/// Locale for synthesized prompts.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
}

/// Speak text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Say {
	/// Text to synthesize.
	pub text: String,
	/// Voice locale.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
}

/// Send DTMF tones.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendDtmf {
	/// Tone sequence; `w` inserts a half-second pause.
	pub value: String,
}

/// Store a value that comes back on later callbacks of the same call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCookie {
	/// Cookie name.
	pub key: String,
	/// Cookie value.
	pub value: String,
}

/// Answer the call before running further instructions.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {}

/// Recording settings.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingOptions {
	/// Storage destination URL.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub destination_url: Option<String>,
	/// Requests a transcript.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub transcribe: Option<bool>,
	/// Transcription locale.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub locale: Option<String>,
}

/// Start recording the call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRecording {
	/// Recording settings.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub options: Option<RecordingOptions>,
}

/// Stop an active recording.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecording {}

crate::tagged_union! {
	/// SVAML instruction, discriminated by `name`.
	#[derive(Clone, Debug, PartialEq)]
	pub enum Instruction: "name" {
		/// Play prompts.
		PlayFiles(PlayFiles) = "playFiles",
		/// Speak text.
		Say(Say) = "say",
		/// Send DTMF.
		SendDtmf(SendDtmf) = "sendDtmf",
		/// Set a cookie.
		SetCookie(SetCookie) = "setCookie",
		/// Answer.
		Answer(Answer) = "answer",
		/// Start recording.
		StartRecording(StartRecording) = "startRecording",
		/// Stop recording.
		StopRecording(StopRecording) = "stopRecording",
	}
}

/// Call-control document returned from a callback.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Svaml {
	/// Instructions executed in order before the action.
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub instructions: Vec<Instruction>,
	/// Action that ends the document.
	pub action: Action,
}
impl Svaml {
	/// Document with only an action.
	pub fn new(action: impl Into<Action>) -> Self {
		Self { instructions: Vec::new(), action: action.into() }
	}

	/// Appends an instruction.
	pub fn instruction(mut self, instruction: impl Into<Instruction>) -> Self {
		self.instructions.push(instruction.into());

		self
	}
}
