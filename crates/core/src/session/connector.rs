//! Attaches the WebUI to its single registered daemon.

use std::sync::Arc;

use siphon_protocol::HostDescriptor;
use tracing::{info, warn};

use super::DaemonLauncher;
use crate::api::TorrentApi;
use crate::error::{Error, Result};

pub struct SessionConnector {
	api: Arc<dyn TorrentApi>,
	launcher: DaemonLauncher,
}

impl SessionConnector {
	pub fn new(api: Arc<dyn TorrentApi>, launcher: DaemonLauncher) -> Self {
		Self { api, launcher }
	}

	/// Fetches the host list and connects to its only entry, starting the
	/// daemon first when needed.
	///
	/// Zero hosts yields [`Error::NoHosts`]; more than one yields
	/// [`Error::AmbiguousHost`] without any further call.
	pub async fn connect(&self) -> Result<HostDescriptor> {
		let mut hosts = self.api.get_hosts().await?;

		let host = match hosts.len() {
			0 => return Err(Error::NoHosts),
			1 => hosts.remove(0),
			count => {
				warn!(target = "siphon.session", count, "refusing to pick between daemon hosts");
				return Err(Error::AmbiguousHost { count });
			}
		};

		self.launcher.ensure_running(&host).await?;
		self.api.connect(&host.host_id).await?;
		info!(target = "siphon.session", host_id = %host.host_id, address = %host.address, port = host.port, "connected to daemon");
		Ok(host)
	}
}

impl std::fmt::Debug for SessionConnector {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionConnector").field("launcher", &self.launcher).finish_non_exhaustive()
	}
}
