//! Messages exchanged between the background core and its front ends.
//!
//! Every message is an object tagged by `msg`, e.g.
//! `{ "msg": "add_torrent_from_url", "url": "https://…/file.torrent" }`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Events broadcast by the status monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum Notification {
	ExtensionActivated,
	ExtensionDeactivated,
	AutoLoginFailed,
}

impl Notification {
	pub fn name(&self) -> &'static str {
		match self {
			Self::ExtensionActivated => "extension_activated",
			Self::ExtensionDeactivated => "extension_deactivated",
			Self::AutoLoginFailed => "auto_login_failed",
		}
	}
}

/// Requests accepted from front ends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "msg", rename_all = "snake_case")]
pub enum Command {
	AddTorrentFromUrl { url: String },
	AddTorrentFromMagnet { url: String },
	GetDownloadOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
	Success,
	Error,
}

/// Uniform reply to a command: `{ msg, result, error }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
	pub msg: ResponseStatus,
	#[serde(default)]
	pub result: Option<Value>,
	#[serde(default)]
	pub error: Option<String>,
}

impl CommandResponse {
	pub fn success(result: Value) -> Self {
		Self {
			msg: ResponseStatus::Success,
			result: Some(result),
			error: None,
		}
	}

	/// Success with nothing to report back.
	pub fn done() -> Self {
		Self {
			msg: ResponseStatus::Success,
			result: None,
			error: None,
		}
	}

	pub fn error(message: impl Into<String>) -> Self {
		Self {
			msg: ResponseStatus::Error,
			result: None,
			error: Some(message.into()),
		}
	}

	pub fn is_success(&self) -> bool {
		self.msg == ResponseStatus::Success
	}
}

/// Reply to `get_download_options`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadOptions {
	pub enable_deluge_icon: bool,
	pub enable_one_click_magnets: bool,
}
