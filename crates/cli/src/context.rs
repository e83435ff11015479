//! Per-invocation state: effective settings and how to reach the WebUI.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use siphon::{
	CheckOptions, DelugeClient, FileSettingsStore, HttpTransport, MemorySettingsStore, NotificationSink, Settings,
	SettingsStore, StatusMonitor, TorrentApi, TracingSink,
};
use tracing::debug;

use crate::cli::Cli;
use crate::error::{CliError, Result};
use crate::output::{EffectiveConfig, OutputFormat};

pub struct CommandContext {
	settings: Arc<MemorySettingsStore>,
	settings_path: Option<PathBuf>,
	format: OutputFormat,
}

impl CommandContext {
	/// Reads the settings file, then applies `--address` and `--password`.
	pub fn load(cli: &Cli) -> siphon::Result<Self> {
		let settings_path = cli.settings.clone().or_else(FileSettingsStore::default_path);
		let mut settings = match &settings_path {
			Some(path) => FileSettingsStore::open(path)?.settings(),
			None => Settings::default(),
		};

		if let Some(address) = &cli.address {
			settings.set_address(address)?;
		}
		if let Some(password) = &cli.password {
			settings.password = password.clone();
		}

		Ok(Self::new(settings, settings_path, cli.format))
	}

	pub fn new(settings: Settings, settings_path: Option<PathBuf>, format: OutputFormat) -> Self {
		Self {
			settings: Arc::new(MemorySettingsStore::new(settings)),
			settings_path,
			format,
		}
	}

	pub fn settings(&self) -> Settings {
		self.settings.settings()
	}

	pub fn settings_store(&self) -> Arc<dyn SettingsStore> {
		Arc::clone(&self.settings) as Arc<dyn SettingsStore>
	}

	pub fn settings_path(&self) -> Option<&Path> {
		self.settings_path.as_deref()
	}

	pub fn format(&self) -> OutputFormat {
		self.format
	}

	pub fn effective_config(&self) -> EffectiveConfig {
		EffectiveConfig {
			endpoint: self
				.settings()
				.rpc_endpoint()
				.map(|url| url.to_string())
				.unwrap_or_default(),
			settings_path: self.settings_path.clone(),
		}
	}

	/// A fresh client with its own cookie jar.
	pub fn api(&self) -> Result<Arc<dyn TorrentApi>> {
		let transport = HttpTransport::from_settings(&self.settings())?;
		debug!(target = "siphon_cli", endpoint = %transport.endpoint(), "using WebUI endpoint");
		Ok(Arc::new(DelugeClient::new(transport)))
	}

	pub fn monitor(&self, api: Arc<dyn TorrentApi>, sink: Arc<dyn NotificationSink>) -> StatusMonitor {
		StatusMonitor::new(api, self.settings_store(), sink)
	}

	/// Runs one status check so the returned client is logged in and
	/// attached to a daemon.
	pub async fn session(&self, timeout: Option<Duration>) -> Result<Arc<dyn TorrentApi>> {
		let api = self.api()?;
		let monitor = self.monitor(Arc::clone(&api), Arc::new(TracingSink));
		let report = monitor.check_status(CheckOptions { timeout }).await;
		monitor.cancel_pending();

		match CliError::from_probe(&report.probe) {
			None => Ok(api),
			Some(err) => Err(err),
		}
	}
}
