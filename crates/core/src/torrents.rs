//! Torrent add and control workflows.
//!
//! Every operation answers with a [`CommandResponse`]; failures never escape
//! as errors because the caller is a front end that only renders the reply.

use std::sync::Arc;

use serde_json::{Value, json};
use siphon_protocol::{CommandResponse, DaemonVersion, methods};
use tracing::{debug, info};

use crate::api::TorrentApi;
use crate::error::{Error, Result};

pub const DOWNLOAD_FAILED: &str = "failed to download torrent from URL.";
pub const OPTIONS_FAILED: &str = "unable to fetch options.";
pub const ADD_FAILED: &str = "unable to add torrent to deluge";
pub const MAGNET_FAILED: &str = "failed to add torrent from magnet.";

const STATE_FAILED: &str = "failed to update torrent state.";
const QUEUE_UP_FAILED: &str = "failed to move torrent up.";
const QUEUE_DOWN_FAILED: &str = "failed to move torrent down.";
const REMOVE_FAILED: &str = "failed to remove torrent.";
const MANAGED_FAILED: &str = "failed to toggle auto managed.";

/// Torrent state string the daemon reports for paused torrents.
pub const PAUSED_STATE: &str = "Paused";

#[derive(Clone)]
pub struct TorrentWorkflows {
	api: Arc<dyn TorrentApi>,
}

impl TorrentWorkflows {
	pub fn new(api: Arc<dyn TorrentApi>) -> Self {
		Self { api }
	}

	/// Downloads a remote `.torrent` into the WebUI, reads the default add
	/// options, then adds it. Stops at the first stage that fails.
	pub async fn add_torrent_from_url(&self, url: &str) -> CommandResponse {
		let path = match self.api.download_torrent_from_url(url).await {
			Ok(Some(path)) => path,
			Ok(None) => return stage_failed(DOWNLOAD_FAILED, "empty temp path"),
			Err(err) => return stage_failed(DOWNLOAD_FAILED, err),
		};
		debug!(target = "siphon.torrents", url, path = %path, "downloaded torrent");

		let options = match self.api.get_config(methods::ADD_OPTION_KEYS).await {
			Ok(Some(options)) => options,
			Ok(None) => return stage_failed(OPTIONS_FAILED, "empty config"),
			Err(err) => return stage_failed(OPTIONS_FAILED, err),
		};

		match self.api.add_torrent(&path, &options).await {
			Ok(true) => {
				info!(target = "siphon.torrents", url, "added torrent");
				CommandResponse::success(Value::Bool(true))
			}
			Ok(false) => stage_failed(ADD_FAILED, "falsy reply"),
			Err(err) => stage_failed(ADD_FAILED, err),
		}
	}

	pub async fn add_torrent_from_magnet(&self, uri: &str) -> CommandResponse {
		match self.api.add_torrent_magnet(uri).await {
			Ok(Some(torrent_id)) => {
				info!(target = "siphon.torrents", torrent_id = %torrent_id, "added magnet");
				CommandResponse::success(Value::String(torrent_id))
			}
			Ok(None) => stage_failed(MAGNET_FAILED, "no torrent id"),
			Err(err) => stage_failed(MAGNET_FAILED, err),
		}
	}

	pub async fn pause(&self, torrent_ids: &[String]) -> CommandResponse {
		done_or(self.api.pause_torrents(torrent_ids).await, STATE_FAILED)
	}

	pub async fn resume(&self, torrent_ids: &[String]) -> CommandResponse {
		done_or(self.api.resume_torrents(torrent_ids).await, STATE_FAILED)
	}

	/// Resumes a paused torrent and pauses anything else.
	pub async fn toggle_state(&self, torrent_id: &str, current_state: &str) -> CommandResponse {
		let ids = [torrent_id.to_string()];
		if current_state == PAUSED_STATE {
			self.resume(&ids).await
		} else {
			self.pause(&ids).await
		}
	}

	pub async fn queue_up(&self, torrent_ids: &[String]) -> CommandResponse {
		done_or(self.api.queue_up(torrent_ids).await, QUEUE_UP_FAILED)
	}

	pub async fn queue_down(&self, torrent_ids: &[String]) -> CommandResponse {
		done_or(self.api.queue_down(torrent_ids).await, QUEUE_DOWN_FAILED)
	}

	pub async fn remove(&self, torrent_id: &str, remove_data: bool) -> CommandResponse {
		match self.api.remove_torrent(torrent_id, remove_data).await {
			Ok(removed) => CommandResponse::success(json!(removed)),
			Err(err) => stage_failed(REMOVE_FAILED, err),
		}
	}

	pub async fn set_auto_managed(&self, torrent_id: &str, auto_managed: bool) -> CommandResponse {
		done_or(self.api.set_torrent_auto_managed(torrent_id, auto_managed).await, MANAGED_FAILED)
	}

	/// Parsed `daemon.info`.
	pub async fn daemon_version(&self) -> Result<DaemonVersion> {
		let raw = self.api.get_version().await?;
		DaemonVersion::parse(&raw).map_err(|e| Error::unexpected(methods::DAEMON_INFO, e.to_string()))
	}
}

impl std::fmt::Debug for TorrentWorkflows {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TorrentWorkflows").finish_non_exhaustive()
	}
}

fn stage_failed(message: &'static str, cause: impl std::fmt::Display) -> CommandResponse {
	debug!(target = "siphon.torrents", cause = %cause, "{message}");
	CommandResponse::error(message)
}

fn done_or(result: Result<()>, message: &'static str) -> CommandResponse {
	match result {
		Ok(()) => CommandResponse::done(),
		Err(err) => stage_failed(message, err),
	}
}
