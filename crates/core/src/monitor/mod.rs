//! Status polling and session recovery.
//!
//! [`StatusMonitor`] asks the WebUI whether it is attached to a daemon and
//! repairs what it can:
//!
//! | `web.connected` outcome | action | next check |
//! |---|---|---|
//! | `true` | activate | normal interval |
//! | `false` | connect via [`SessionConnector`]; activate or deactivate | normal / error interval |
//! | auth error | login, then probe again at once | (see below) |
//! | other API error | deactivate | normal interval |
//! | transport error | deactivate | error interval |
//!
//! A rejected password deactivates, raises `auto_login_failed` and backs off
//! by the error interval. A login call that itself fails deactivates and
//! backs off the same way. Logins are capped per cycle; hitting the cap is
//! handled like a rejected password.
//!
//! Exactly one follow-up check is pending after every cycle. Cycles never
//! overlap: a manual [`check_status`](StatusMonitor::check_status) waits for
//! an in-flight timer cycle, then replaces its timer.

mod timer;

#[cfg(test)]
mod tests;

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

pub use timer::ScheduledCheck;
use timer::PollTimer;

use crate::api::TorrentApi;
use crate::error::Error;
use crate::notify::NotificationSink;
use crate::session::{DaemonLauncher, SessionConnector};
use crate::settings::{Settings, SettingsStore};
use crate::transport::CallOptions;

/// Polling intervals and recovery limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonitorConfig {
	pub normal_interval: Duration,
	pub error_interval: Duration,
	pub max_logins_per_cycle: u32,
}

impl Default for MonitorConfig {
	fn default() -> Self {
		Self::from_settings(&Settings::default())
	}
}

impl MonitorConfig {
	pub fn from_settings(settings: &Settings) -> Self {
		Self {
			normal_interval: settings.status_check_interval(),
			error_interval: settings.status_check_error_interval(),
			max_logins_per_cycle: 3,
		}
	}
}

/// Where the monitor believes the session stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
	#[default]
	Unknown,
	/// Logged in; daemon attachment not yet confirmed.
	Authenticated,
	/// Attached to a daemon; activation pending.
	Connected,
	Active,
	Failed,
}

impl SessionState {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Unknown => "unknown",
			Self::Authenticated => "authenticated",
			Self::Connected => "connected",
			Self::Active => "active",
			Self::Failed => "failed",
		}
	}
}

impl std::fmt::Display for SessionState {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// What a cycle found out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Probe {
	/// The WebUI was already attached.
	Connected,
	/// The WebUI was detached and got reattached to `host_id`.
	Reconnected { host_id: String },
	/// The WebUI was detached and reattaching failed.
	NotConnected { reason: String },
	/// The password was refused, or the login cap was reached.
	LoginRejected,
	/// The login call itself failed.
	LoginFailed { reason: String },
	ApiError { code: i64, message: String },
	/// No structured reply: network failure, timeout, bad status or body.
	TransportError { reason: String },
}

impl Probe {
	pub fn is_active(&self) -> bool {
		matches!(self, Self::Connected | Self::Reconnected { .. })
	}
}

/// Outcome of one [`StatusMonitor::check_status`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
	pub probe: Probe,
	pub state: SessionState,
	/// Delay before the follow-up check that this cycle scheduled.
	pub next_check: Duration,
	/// Logins attempted during the cycle.
	pub logins: u32,
}

/// Per-check options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckOptions {
	/// Timeout for the `web.connected` round-trip. Scheduling is unaffected.
	pub timeout: Option<Duration>,
}

impl CheckOptions {
	pub fn with_timeout(timeout: Duration) -> Self {
		Self { timeout: Some(timeout) }
	}
}

type TimerFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Polls the WebUI session forever, starting with [`start`](Self::start).
///
/// Cheap to clone; clones share one timer and one state. Dropping the last
/// clone cancels the pending check.
#[derive(Clone)]
pub struct StatusMonitor {
	inner: Arc<Inner>,
}

struct Inner {
	api: Arc<dyn TorrentApi>,
	connector: SessionConnector,
	settings: Arc<dyn SettingsStore>,
	sink: Arc<dyn NotificationSink>,
	config: MonitorConfig,
	state: Mutex<SessionState>,
	timer: PollTimer,
	cycle: tokio::sync::Mutex<()>,
}

impl StatusMonitor {
	/// Builds a monitor whose intervals and daemon grace period come from
	/// the current settings.
	pub fn new(api: Arc<dyn TorrentApi>, settings: Arc<dyn SettingsStore>, sink: Arc<dyn NotificationSink>) -> Self {
		let snapshot = settings.settings();
		let config = MonitorConfig::from_settings(&snapshot);
		let launcher = DaemonLauncher::with_grace(Arc::clone(&api), snapshot.daemon_start_grace());
		let connector = SessionConnector::new(Arc::clone(&api), launcher);
		Self::with_parts(api, connector, settings, sink, config)
	}

	pub fn with_parts(
		api: Arc<dyn TorrentApi>,
		connector: SessionConnector,
		settings: Arc<dyn SettingsStore>,
		sink: Arc<dyn NotificationSink>,
		config: MonitorConfig,
	) -> Self {
		Self {
			inner: Arc::new(Inner {
				api,
				connector,
				settings,
				sink,
				config,
				state: Mutex::new(SessionState::Unknown),
				timer: PollTimer::default(),
				cycle: tokio::sync::Mutex::new(()),
			}),
		}
	}

	/// Runs the first check in the background.
	pub fn start(&self) -> JoinHandle<CheckReport> {
		let monitor = self.clone();
		tokio::spawn(async move { monitor.check_status(CheckOptions::default()).await })
	}

	/// Runs one cycle now, superseding any pending check.
	pub async fn check_status(&self, options: CheckOptions) -> CheckReport {
		let _cycle = self.inner.cycle.lock().await;
		if self.inner.timer.cancel() {
			debug!(target = "siphon.monitor", "manual check replaced pending timer");
		}
		self.inner.run_cycle(options).await
	}

	pub fn state(&self) -> SessionState {
		*self.inner.state.lock()
	}

	pub fn pending_check(&self) -> Option<ScheduledCheck> {
		self.inner.timer.pending()
	}

	/// Drops the pending check. Returns whether one was pending.
	///
	/// The next [`check_status`](Self::check_status) resumes polling.
	pub fn cancel_pending(&self) -> bool {
		self.inner.timer.cancel()
	}

	/// Waits for an in-flight cycle, then drops the pending check. Returns
	/// whether one was pending.
	///
	/// Unlike [`cancel_pending`](Self::cancel_pending), a timer cycle that is
	/// already running cannot re-arm afterwards.
	pub async fn stop(&self) -> bool {
		let _cycle = self.inner.cycle.lock().await;
		self.inner.timer.cancel()
	}

	pub fn config(&self) -> MonitorConfig {
		self.inner.config
	}
}

impl std::fmt::Debug for StatusMonitor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StatusMonitor")
			.field("state", &self.state())
			.field("pending", &self.pending_check())
			.field("config", &self.inner.config)
			.finish_non_exhaustive()
	}
}

impl Inner {
	async fn run_cycle(self: &Arc<Self>, options: CheckOptions) -> CheckReport {
		let credentials = self.settings.settings().credentials();
		let call = CallOptions { timeout: options.timeout };
		let mut logins = 0;

		let (probe, next) = loop {
			match self.api.is_connected(call).await {
				Ok(true) => {
					self.activate();
					break (Probe::Connected, self.config.normal_interval);
				}
				Ok(false) => break self.reconnect().await,
				Err(err) if err.is_auth() => {
					if logins >= self.config.max_logins_per_cycle {
						warn!(target = "siphon.monitor", logins, "session still rejected after login; giving up this cycle");
						self.deactivate();
						self.sink.auto_login_failed();
						break (Probe::LoginRejected, self.config.error_interval);
					}
					logins += 1;
					match self.api.login(&credentials).await {
						Ok(true) => {
							debug!(target = "siphon.monitor", logins, "logged in; probing again");
							self.set_state(SessionState::Authenticated);
						}
						Ok(false) => {
							warn!(target = "siphon.monitor", "WebUI rejected the password");
							self.deactivate();
							self.sink.auto_login_failed();
							break (Probe::LoginRejected, self.config.error_interval);
						}
						Err(err) => {
							warn!(target = "siphon.monitor", error = %err, "login failed");
							self.deactivate();
							break (Probe::LoginFailed { reason: err.to_string() }, self.config.error_interval);
						}
					}
				}
				Err(Error::Api { code, message }) => {
					warn!(target = "siphon.monitor", code, message = %message, "status check rejected");
					self.deactivate();
					break (Probe::ApiError { code, message }, self.config.normal_interval);
				}
				Err(err) => {
					warn!(target = "siphon.monitor", error = %err, "WebUI unreachable");
					self.deactivate();
					break (Probe::TransportError { reason: err.to_string() }, self.config.error_interval);
				}
			}
		};

		let scheduled = self.schedule(next);
		CheckReport {
			probe,
			state: *self.state.lock(),
			next_check: scheduled.interval,
			logins,
		}
	}

	async fn reconnect(&self) -> (Probe, Duration) {
		match self.connector.connect().await {
			Ok(host) => {
				self.set_state(SessionState::Connected);
				self.activate();
				(Probe::Reconnected { host_id: host.host_id }, self.config.normal_interval)
			}
			Err(err) => {
				warn!(target = "siphon.monitor", error = %err, "could not attach WebUI to daemon");
				self.deactivate();
				(Probe::NotConnected { reason: err.to_string() }, self.config.error_interval)
			}
		}
	}

	fn schedule(self: &Arc<Self>, interval: Duration) -> ScheduledCheck {
		self.timer.cancel();
		let weak = Arc::downgrade(self);
		let check = self
			.timer
			.arm(interval, move |generation| tokio::spawn(fire(weak, interval, generation)));
		debug!(target = "siphon.monitor", interval_ms = interval.as_millis() as u64, "next status check scheduled");
		check
	}

	fn activate(&self) {
		self.set_state(SessionState::Active);
		self.sink.activate();
	}

	fn deactivate(&self) {
		self.set_state(SessionState::Failed);
		self.sink.deactivate();
	}

	fn set_state(&self, next: SessionState) {
		let previous = std::mem::replace(&mut *self.state.lock(), next);
		if previous != next {
			info!(target = "siphon.monitor", from = %previous, to = %next, "session state changed");
		}
	}
}

/// Body of a timer task. Boxed so the cycle that spawns it can name its type.
fn fire(inner: Weak<Inner>, interval: Duration, generation: u64) -> TimerFuture {
	Box::pin(async move {
		tokio::time::sleep(interval).await;
		let Some(inner) = inner.upgrade() else {
			return;
		};
		let _cycle = inner.cycle.lock().await;
		if !inner.timer.disarm(generation) {
			return;
		}
		debug!(target = "siphon.monitor", "scheduled status check");
		inner.run_cycle(CheckOptions::default()).await;
	})
}
