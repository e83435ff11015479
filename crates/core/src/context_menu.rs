//! The "Add to Deluge" link menu entry.

use parking_lot::Mutex;
use siphon_protocol::CommandResponse;
use tracing::{debug, warn};

use crate::error::Result;
use crate::links::LinkKind;
use crate::settings::Settings;
use crate::torrents::TorrentWorkflows;

pub const MENU_TITLE: &str = "Add to Deluge";

/// Handle of a registered menu entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MenuId(pub String);

/// Creates and removes link menu entries in whatever host renders them.
pub trait MenuRegistrar: Send + Sync {
	fn create(&self, title: &str) -> Result<MenuId>;
	fn remove(&self, id: &MenuId) -> Result<()>;
}

/// Keeps at most one menu entry registered and routes its clicks.
pub struct ContextMenu<R> {
	registrar: R,
	workflows: TorrentWorkflows,
	entry: Mutex<Option<MenuId>>,
}

impl<R: MenuRegistrar> ContextMenu<R> {
	pub fn new(registrar: R, workflows: TorrentWorkflows) -> Self {
		Self {
			registrar,
			workflows,
			entry: Mutex::new(None),
		}
	}

	pub fn registrar(&self) -> &R {
		&self.registrar
	}

	pub fn is_registered(&self) -> bool {
		self.entry.lock().is_some()
	}

	/// Registers the entry if missing. Idempotent.
	pub fn add(&self) -> Result<()> {
		let mut entry = self.entry.lock();
		if entry.is_none() {
			let id = self.registrar.create(MENU_TITLE)?;
			debug!(target = "siphon.menu", id = %id.0, "context menu added");
			*entry = Some(id);
		}
		Ok(())
	}

	/// Unregisters the entry if present. Idempotent.
	pub fn remove(&self) -> Result<()> {
		let mut entry = self.entry.lock();
		if let Some(id) = entry.as_ref() {
			self.registrar.remove(id)?;
			debug!(target = "siphon.menu", id = %id.0, "context menu removed");
			*entry = None;
		}
		Ok(())
	}

	pub fn set_enabled(&self, enabled: bool) -> Result<()> {
		if enabled { self.add() } else { self.remove() }
	}

	/// Applies the `context_menu` setting.
	pub fn sync(&self, settings: &Settings) -> Result<()> {
		self.set_enabled(settings.context_menu)
	}

	/// Routes a clicked link. `None` when the link is not a torrent.
	pub async fn on_click(&self, link_url: &str) -> Option<CommandResponse> {
		let response = match LinkKind::classify(link_url) {
			LinkKind::TorrentUrl => self.workflows.add_torrent_from_url(link_url).await,
			LinkKind::Magnet => self.workflows.add_torrent_from_magnet(link_url).await,
			LinkKind::NotTorrent => {
				debug!(target = "siphon.menu", link_url, "link not a torrent");
				return None;
			}
		};

		if !response.is_success() {
			warn!(target = "siphon.menu", link_url, error = ?response.error, "torrent could not be added");
		}
		Some(response)
	}
}
