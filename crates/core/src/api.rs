//! Typed calls over an [`RpcTransport`].

use async_trait::async_trait;
use serde_json::{Map, Value, json};
use siphon_protocol::{HostDescriptor, HostStatus, methods};
use tracing::debug;

use crate::error::{Error, Result};
use crate::settings::Credentials;
use crate::transport::{CallOptions, RpcTransport};

/// Remote procedures used by the monitor and the torrent workflows.
///
/// Replies are decoded here; a payload of the wrong shape becomes
/// [`Error::UnexpectedResponse`].
#[async_trait]
pub trait TorrentApi: Send + Sync {
	/// Returns whether the WebUI accepted the password.
	async fn login(&self, credentials: &Credentials) -> Result<bool>;

	async fn get_hosts(&self) -> Result<Vec<HostDescriptor>>;

	async fn get_host_status(&self, host_id: &str) -> Result<HostStatus>;

	async fn start_daemon(&self, port: u16) -> Result<()>;

	async fn connect(&self, host_id: &str) -> Result<()>;

	/// Whether the WebUI is attached to a daemon. The timeout in `options`
	/// applies to this round-trip only.
	async fn is_connected(&self, options: CallOptions) -> Result<bool>;

	/// Fetches a remote `.torrent` into the WebUI's temp dir. `None` when the
	/// server replied with an empty path.
	async fn download_torrent_from_url(&self, url: &str) -> Result<Option<String>>;

	/// Adds a previously downloaded torrent file; returns the truthiness of the reply.
	async fn add_torrent(&self, path: &str, options: &Map<String, Value>) -> Result<bool>;

	async fn add_torrent_magnet(&self, uri: &str) -> Result<Option<String>>;

	/// `None` when the daemon answered with an empty config.
	async fn get_config(&self, keys: &[&str]) -> Result<Option<Map<String, Value>>>;

	async fn get_version(&self) -> Result<String>;

	async fn set_torrent_auto_managed(&self, torrent_id: &str, auto_managed: bool) -> Result<()>;

	async fn pause_torrents(&self, torrent_ids: &[String]) -> Result<()>;

	async fn resume_torrents(&self, torrent_ids: &[String]) -> Result<()>;

	async fn queue_up(&self, torrent_ids: &[String]) -> Result<()>;

	async fn queue_down(&self, torrent_ids: &[String]) -> Result<()>;

	async fn remove_torrent(&self, torrent_id: &str, remove_data: bool) -> Result<bool>;
}

/// [`TorrentApi`] over any [`RpcTransport`].
#[derive(Debug)]
pub struct DelugeClient<T> {
	transport: T,
}

impl<T: RpcTransport> DelugeClient<T> {
	pub fn new(transport: T) -> Self {
		Self { transport }
	}

	pub fn transport(&self) -> &T {
		&self.transport
	}

	async fn call(&self, method: &'static str, params: Vec<Value>) -> Result<Value> {
		self.transport.call(method, params, CallOptions::default()).await
	}
}

#[async_trait]
impl<T: RpcTransport> TorrentApi for DelugeClient<T> {
	async fn login(&self, credentials: &Credentials) -> Result<bool> {
		let reply = self.call(methods::AUTH_LOGIN, vec![json!(credentials.password)]).await?;
		reply.as_bool().ok_or_else(|| Error::unexpected(methods::AUTH_LOGIN, reply.to_string()))
	}

	async fn get_hosts(&self) -> Result<Vec<HostDescriptor>> {
		let reply = self.call(methods::WEB_GET_HOSTS, vec![]).await?;
		HostDescriptor::list_from_value(&reply).map_err(|e| Error::unexpected(methods::WEB_GET_HOSTS, e.to_string()))
	}

	async fn get_host_status(&self, host_id: &str) -> Result<HostStatus> {
		let reply = self.call(methods::WEB_GET_HOST_STATUS, vec![json!(host_id)]).await?;
		HostStatus::from_row(&reply).map_err(|e| Error::unexpected(methods::WEB_GET_HOST_STATUS, e.to_string()))
	}

	async fn start_daemon(&self, port: u16) -> Result<()> {
		self.call(methods::WEB_START_DAEMON, vec![json!(port)]).await?;
		Ok(())
	}

	async fn connect(&self, host_id: &str) -> Result<()> {
		self.call(methods::WEB_CONNECT, vec![json!(host_id)]).await?;
		Ok(())
	}

	async fn is_connected(&self, options: CallOptions) -> Result<bool> {
		let reply = self.transport.call(methods::WEB_CONNECTED, vec![], options).await?;
		reply.as_bool().ok_or_else(|| Error::unexpected(methods::WEB_CONNECTED, reply.to_string()))
	}

	async fn download_torrent_from_url(&self, url: &str) -> Result<Option<String>> {
		let reply = self.call(methods::WEB_DOWNLOAD_TORRENT_FROM_URL, vec![json!(url), json!("")]).await?;
		Ok(non_empty_string(reply))
	}

	async fn add_torrent(&self, path: &str, options: &Map<String, Value>) -> Result<bool> {
		let torrents = json!([{ "path": path, "options": options }]);
		let reply = self.call(methods::WEB_ADD_TORRENTS, vec![torrents]).await?;
		Ok(is_truthy(&reply))
	}

	async fn add_torrent_magnet(&self, uri: &str) -> Result<Option<String>> {
		let reply = self.call(methods::CORE_ADD_TORRENT_MAGNET, vec![json!(uri), json!("")]).await?;
		Ok(non_empty_string(reply))
	}

	async fn get_config(&self, keys: &[&str]) -> Result<Option<Map<String, Value>>> {
		let reply = self.call(methods::CORE_GET_CONFIG_VALUES, vec![json!(keys)]).await?;
		match reply {
			Value::Object(map) if !map.is_empty() => Ok(Some(map)),
			Value::Object(_) | Value::Null => Ok(None),
			other => Err(Error::unexpected(methods::CORE_GET_CONFIG_VALUES, other.to_string())),
		}
	}

	async fn get_version(&self) -> Result<String> {
		let reply = self.call(methods::DAEMON_INFO, vec![]).await?;
		match reply {
			Value::String(version) => Ok(version),
			other => Err(Error::unexpected(methods::DAEMON_INFO, other.to_string())),
		}
	}

	async fn set_torrent_auto_managed(&self, torrent_id: &str, auto_managed: bool) -> Result<()> {
		self.call(methods::CORE_SET_TORRENT_AUTO_MANAGED, vec![json!(torrent_id), json!(auto_managed)])
			.await?;
		Ok(())
	}

	async fn pause_torrents(&self, torrent_ids: &[String]) -> Result<()> {
		self.call(methods::CORE_PAUSE_TORRENT, vec![json!(torrent_ids)]).await?;
		Ok(())
	}

	async fn resume_torrents(&self, torrent_ids: &[String]) -> Result<()> {
		self.call(methods::CORE_RESUME_TORRENT, vec![json!(torrent_ids)]).await?;
		Ok(())
	}

	async fn queue_up(&self, torrent_ids: &[String]) -> Result<()> {
		self.call(methods::CORE_QUEUE_UP, vec![json!(torrent_ids)]).await?;
		Ok(())
	}

	async fn queue_down(&self, torrent_ids: &[String]) -> Result<()> {
		self.call(methods::CORE_QUEUE_DOWN, vec![json!(torrent_ids)]).await?;
		Ok(())
	}

	async fn remove_torrent(&self, torrent_id: &str, remove_data: bool) -> Result<bool> {
		let reply = self.call(methods::CORE_REMOVE_TORRENT, vec![json!(torrent_id), json!(remove_data)]).await?;
		debug!(target = "siphon.api", torrent_id, remove_data, reply = %reply, "remove_torrent");
		Ok(is_truthy(&reply))
	}
}

fn non_empty_string(value: Value) -> Option<String> {
	match value {
		Value::String(s) if !s.is_empty() => Some(s),
		_ => None,
	}
}

/// JSON truthiness as the WebUI front end judges replies.
fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(b) => *b,
		Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
		Value::String(s) => !s.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}
