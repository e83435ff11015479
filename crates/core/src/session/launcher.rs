//! Starts the daemon when the WebUI reports it offline.

use std::sync::Arc;
use std::time::Duration;

use siphon_protocol::HostDescriptor;
use tracing::{debug, info};

use crate::api::TorrentApi;
use crate::error::{Error, Result};
use crate::settings::DEFAULT_DAEMON_START_GRACE_MS;

pub struct DaemonLauncher {
	api: Arc<dyn TorrentApi>,
	grace: Duration,
}

impl DaemonLauncher {
	pub fn new(api: Arc<dyn TorrentApi>) -> Self {
		Self::with_grace(api, Duration::from_millis(DEFAULT_DAEMON_START_GRACE_MS))
	}

	/// `grace` is how long to wait after `web.start_daemon` before the
	/// daemon is assumed to accept connections.
	pub fn with_grace(api: Arc<dyn TorrentApi>, grace: Duration) -> Self {
		Self { api, grace }
	}

	pub fn grace(&self) -> Duration {
		self.grace
	}

	/// Makes sure the daemon behind `host` is running.
	///
	/// An offline daemon is started, then the grace period elapses before
	/// this resolves. Any other status resolves immediately. The port comes
	/// from the status row when it carries one (1.3 layout), otherwise from
	/// the host list row.
	pub async fn ensure_running(&self, host: &HostDescriptor) -> Result<()> {
		let host_id = host.host_id.as_str();
		let status = self.api.get_host_status(host_id).await.map_err(|source| Error::HostStatus {
			host_id: host_id.to_string(),
			source: Box::new(source),
		})?;

		if !status.daemon_status.is_offline() {
			debug!(target = "siphon.session", host_id, status = %status.daemon_status, "daemon already running");
			return Ok(());
		}

		let port = status.port.unwrap_or(host.port);

		info!(target = "siphon.session", host_id, port, "starting daemon");
		self.api.start_daemon(port).await?;
		tokio::time::sleep(self.grace).await;
		debug!(target = "siphon.session", host_id, grace_ms = self.grace.as_millis() as u64, "daemon start grace elapsed");
		Ok(())
	}
}

impl std::fmt::Debug for DaemonLauncher {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DaemonLauncher").field("grace", &self.grace).finish_non_exhaustive()
	}
}
