//! User configuration and the stores that serve it.
//!
//! Keys match what the options page writes (`address_ip`, `handle_magnets`,
//! ...). Older installs stored camelCase keys such as `delugePassword` and a
//! single `delugeAddress` URL; those are migrated on load when the modern key
//! is absent.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use siphon_protocol::DownloadOptions;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

pub const DEFAULT_STATUS_CHECK_INTERVAL_MS: u64 = 60_000;
pub const DEFAULT_STATUS_CHECK_ERROR_INTERVAL_MS: u64 = 120_000;
pub const DEFAULT_DAEMON_START_GRACE_MS: u64 = 2_000;

/// Persisted user configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	pub address_protocol: String,
	pub address_ip: String,
	/// Kept as text because the options form stores whatever was typed.
	#[serde(deserialize_with = "port_from_any")]
	pub address_port: String,
	pub address_base: String,
	pub password: String,
	pub handle_torrents: bool,
	pub handle_magnets: bool,
	pub context_menu: bool,
	/// How long the toolbar badge stays up, in milliseconds.
	pub badge_timeout: u64,
	pub debug_mode: bool,
	pub status_check_interval_ms: u64,
	pub status_check_error_interval_ms: u64,
	pub daemon_start_grace_ms: u64,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			address_protocol: "http".to_string(),
			address_ip: "localhost".to_string(),
			address_port: "8112".to_string(),
			address_base: String::new(),
			password: "deluge".to_string(),
			handle_torrents: true,
			handle_magnets: true,
			context_menu: true,
			badge_timeout: 250,
			debug_mode: false,
			status_check_interval_ms: DEFAULT_STATUS_CHECK_INTERVAL_MS,
			status_check_error_interval_ms: DEFAULT_STATUS_CHECK_ERROR_INTERVAL_MS,
			daemon_start_grace_ms: DEFAULT_DAEMON_START_GRACE_MS,
		}
	}
}

impl Settings {
	/// Builds settings from a stored JSON object, migrating legacy keys.
	pub fn from_value(value: Value) -> Result<Self> {
		let Value::Object(mut map) = value else {
			return Err(Error::Config("settings must be a JSON object".into()));
		};
		migrate_legacy_keys(&mut map);
		Ok(serde_json::from_value(Value::Object(map))?)
	}

	/// Root URL of the WebUI, always ending in `/`.
	pub fn webui_url(&self) -> Result<Url> {
		let protocol = self.address_protocol.trim().trim_end_matches("://");
		let protocol = if protocol.is_empty() { "http" } else { protocol };
		let host = self.address_ip.trim();
		if host.is_empty() {
			return Err(Error::Config("address_ip is not set".into()));
		}

		let base = normalize_base(&self.address_base);
		let port = self.address_port.trim();
		let raw = if port.is_empty() {
			format!("{protocol}://{host}{base}/")
		} else {
			format!("{protocol}://{host}:{port}{base}/")
		};

		Url::parse(&raw).map_err(|e| Error::Config(format!("invalid WebUI address {raw}: {e}")))
	}

	/// The JSON-RPC endpoint (`<webui>/json`).
	pub fn rpc_endpoint(&self) -> Result<Url> {
		self.webui_url()?
			.join("json")
			.map_err(|e| Error::Config(format!("invalid WebUI address: {e}")))
	}

	/// Replaces the address parts with those of a full WebUI URL such as
	/// `https://seedbox.example:8112/deluge`.
	pub fn set_address(&mut self, raw: &str) -> Result<()> {
		let parts = split_address(raw).ok_or_else(|| Error::Config(format!("invalid WebUI address {raw}")))?;
		self.address_protocol = parts.protocol;
		self.address_ip = parts.host;
		self.address_port = parts.port;
		self.address_base = parts.base;
		Ok(())
	}

	pub fn credentials(&self) -> Credentials {
		Credentials {
			password: self.password.clone(),
		}
	}

	pub fn download_options(&self) -> DownloadOptions {
		DownloadOptions {
			enable_deluge_icon: self.handle_torrents,
			enable_one_click_magnets: self.handle_magnets,
		}
	}

	pub fn status_check_interval(&self) -> Duration {
		Duration::from_millis(self.status_check_interval_ms)
	}

	pub fn status_check_error_interval(&self) -> Duration {
		Duration::from_millis(self.status_check_error_interval_ms)
	}

	pub fn daemon_start_grace(&self) -> Duration {
		Duration::from_millis(self.daemon_start_grace_ms)
	}
}

/// Login secret, snapshotted once per poll cycle.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
	pub password: String,
}

impl std::fmt::Debug for Credentials {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Credentials").field("password", &"<redacted>").finish()
	}
}

/// Source of the current settings.
///
/// Implementations hand out snapshots; callers never hold a lock across an
/// RPC round-trip.
pub trait SettingsStore: Send + Sync {
	fn settings(&self) -> Settings;
}

/// In-memory store, updated programmatically.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
	inner: RwLock<Settings>,
}

impl MemorySettingsStore {
	pub fn new(settings: Settings) -> Self {
		Self {
			inner: RwLock::new(settings),
		}
	}

	pub fn update(&self, apply: impl FnOnce(&mut Settings)) {
		apply(&mut self.inner.write());
	}
}

impl SettingsStore for MemorySettingsStore {
	fn settings(&self) -> Settings {
		self.inner.read().clone()
	}
}

/// Store backed by a JSON file; a missing file yields defaults.
#[derive(Debug)]
pub struct FileSettingsStore {
	path: PathBuf,
	inner: RwLock<Settings>,
}

impl FileSettingsStore {
	pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
		let path = path.into();
		let settings = read_settings(&path)?;
		Ok(Self {
			path,
			inner: RwLock::new(settings),
		})
	}

	/// `$CONFIG_DIR/siphon/settings.json`.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join("siphon").join("settings.json"))
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	/// Re-reads the file, replacing the cached snapshot.
	pub fn reload(&self) -> Result<()> {
		let settings = read_settings(&self.path)?;
		*self.inner.write() = settings;
		Ok(())
	}
}

impl SettingsStore for FileSettingsStore {
	fn settings(&self) -> Settings {
		self.inner.read().clone()
	}
}

fn read_settings(path: &Path) -> Result<Settings> {
	match fs::read_to_string(path) {
		Ok(content) => {
			let value: Value = serde_json::from_str(&content)?;
			Settings::from_value(value)
		}
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
			debug!(target = "siphon.settings", path = %path.display(), "no settings file; using defaults");
			Ok(Settings::default())
		}
		Err(e) => Err(e.into()),
	}
}

fn normalize_base(raw: &str) -> String {
	let trimmed = raw.trim().trim_matches('/');
	if trimmed.is_empty() {
		String::new()
	} else {
		format!("/{trimmed}")
	}
}

fn port_from_any<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
	D: Deserializer<'de>,
{
	match Value::deserialize(deserializer)? {
		Value::Number(n) => Ok(n.to_string()),
		Value::String(s) => Ok(s),
		Value::Null => Ok(String::new()),
		other => Err(serde::de::Error::custom(format!("invalid port value {other}"))),
	}
}

fn migrate_legacy_keys(map: &mut Map<String, Value>) {
	if !map.contains_key("password") {
		if let Some(password) = take_first(map, &["delugePassword", "deluge_password"]) {
			map.insert("password".into(), password);
		}
	}

	for (modern, legacy) in [
		("handle_torrents", &["delugeDownloadIcon", "deluge_download_icon"][..]),
		("handle_magnets", &["oneClickMagnets"][..]),
		("context_menu", &["contextMenu"][..]),
		("debug_mode", &["debugMode"][..]),
	] {
		if map.contains_key(modern) {
			continue;
		}
		if let Some(flag) = take_first(map, legacy).as_ref().and_then(legacy_bool) {
			map.insert(modern.into(), Value::Bool(flag));
		}
	}

	if !map.contains_key("address_ip") {
		if let Some(Value::String(raw)) = take_first(map, &["delugeAddress", "deluge_address"]) {
			if let Some(parts) = split_legacy_address(&raw) {
				map.extend(parts);
			}
		}
	}
}

fn take_first(map: &mut Map<String, Value>, keys: &[&str]) -> Option<Value> {
	keys.iter().find_map(|key| map.remove(*key))
}

/// Legacy flags were stored as the strings `"true"`/`"false"`.
fn legacy_bool(value: &Value) -> Option<bool> {
	match value {
		Value::Bool(flag) => Some(*flag),
		Value::String(s) => s.parse().ok(),
		_ => None,
	}
}

struct AddressParts {
	protocol: String,
	host: String,
	port: String,
	base: String,
}

fn split_address(raw: &str) -> Option<AddressParts> {
	let url = Url::parse(raw.trim()).ok()?;
	let host = url.host_str()?.to_string();
	Some(AddressParts {
		protocol: url.scheme().to_string(),
		host,
		port: url.port().map(|p| p.to_string()).unwrap_or_default(),
		base: normalize_base(url.path()),
	})
}

fn split_legacy_address(raw: &str) -> Option<Map<String, Value>> {
	let parts = split_address(raw)?;
	let mut map = Map::new();
	map.insert("address_protocol".into(), Value::String(parts.protocol));
	map.insert("address_ip".into(), Value::String(parts.host));
	map.insert("address_port".into(), Value::String(parts.port));
	map.insert("address_base".into(), Value::String(parts.base));
	Some(map)
}
