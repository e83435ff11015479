//! Dispatch of front-end messages.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use siphon_protocol::{Command, CommandResponse, DownloadOptions};
use tracing::debug;

use crate::settings::SettingsStore;
use crate::torrents::TorrentWorkflows;

/// Reply sent for messages the router does not know.
pub const UNKNOWN_COMMAND: &str = "nothing called!";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RouterReply {
	Command(CommandResponse),
	DownloadOptions(DownloadOptions),
}

pub struct CommandRouter {
	workflows: TorrentWorkflows,
	settings: Arc<dyn SettingsStore>,
}

impl CommandRouter {
	pub fn new(workflows: TorrentWorkflows, settings: Arc<dyn SettingsStore>) -> Self {
		Self { workflows, settings }
	}

	/// Handles one raw message such as `{"msg": "add_torrent_from_url", "url": ...}`.
	pub async fn handle(&self, message: Value) -> RouterReply {
		match serde_json::from_value::<Command>(message) {
			Ok(command) => self.dispatch(command).await,
			Err(err) => {
				debug!(target = "siphon.router", error = %err, "unrecognized message");
				RouterReply::Command(CommandResponse::error(UNKNOWN_COMMAND))
			}
		}
	}

	pub async fn dispatch(&self, command: Command) -> RouterReply {
		match command {
			Command::AddTorrentFromUrl { url } => RouterReply::Command(self.workflows.add_torrent_from_url(&url).await),
			Command::AddTorrentFromMagnet { url } => {
				RouterReply::Command(self.workflows.add_torrent_from_magnet(&url).await)
			}
			Command::GetDownloadOptions => RouterReply::DownloadOptions(self.settings.settings().download_options()),
		}
	}
}

impl std::fmt::Debug for CommandRouter {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("CommandRouter").finish_non_exhaustive()
	}
}
