use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use siphon_protocol::{Notification, methods};
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::Instant;

use super::*;
use crate::api::DelugeClient;
use crate::notify::ChannelSink;
use crate::settings::MemorySettingsStore;
use crate::transport::{FakeReply, FakeTransport};

const NORMAL: Duration = Duration::from_secs(60);
const ERROR: Duration = Duration::from_secs(120);

struct Harness {
	fake: Arc<FakeTransport>,
	monitor: StatusMonitor,
	events: UnboundedReceiver<Notification>,
}

impl Harness {
	fn new() -> Self {
		let fake = Arc::new(FakeTransport::new());
		let api: Arc<dyn TorrentApi> = Arc::new(DelugeClient::new(Arc::clone(&fake)));
		let (sink, events) = ChannelSink::new();
		let monitor = StatusMonitor::new(api, Arc::new(MemorySettingsStore::default()), Arc::new(sink));
		Self { fake, monitor, events }
	}

	fn events(&mut self) -> Vec<Notification> {
		let mut out = Vec::new();
		while let Ok(event) = self.events.try_recv() {
			out.push(event);
		}
		out
	}

	fn probes(&self) -> usize {
		self.fake.call_count(methods::WEB_CONNECTED)
	}

	async fn check(&self) -> CheckReport {
		self.monitor.check_status(CheckOptions::default()).await
	}
}

fn single_host(status: &str) -> (serde_json::Value, serde_json::Value) {
	(
		json!([["h1", "127.0.0.1", 58846, ""]]),
		json!(["h1", "127.0.0.1", 58846, status, ""]),
	)
}

#[tokio::test(start_paused = true)]
async fn connected_session_activates_and_schedules_normal_interval() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));

	let started = Instant::now();
	let report = h.check().await;

	assert_eq!(report.probe, Probe::Connected);
	assert_eq!(report.state, SessionState::Active);
	assert_eq!(report.next_check, NORMAL);
	assert_eq!(h.events(), vec![Notification::ExtensionActivated]);

	let pending = h.monitor.pending_check().expect("one check pending");
	assert_eq!(pending.deadline, started + NORMAL);
}

#[tokio::test(start_paused = true)]
async fn state_starts_unknown() {
	let h = Harness::new();
	assert_eq!(h.monitor.state(), SessionState::Unknown);
	assert!(h.monitor.pending_check().is_none());
}

#[tokio::test(start_paused = true)]
async fn failures_then_success_end_active_with_one_timer() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::transport("connection refused"));
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::api_error(3, "Unknown method"));
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));

	assert_eq!(h.check().await.state, SessionState::Failed);
	assert_eq!(h.check().await.state, SessionState::Failed);
	let report = h.check().await;

	assert_eq!(report.state, SessionState::Active);
	assert_eq!(h.monitor.state(), SessionState::Active);
	assert_eq!(
		h.events(),
		vec![
			Notification::ExtensionDeactivated,
			Notification::ExtensionDeactivated,
			Notification::ExtensionActivated
		]
	);

	// Only the last cycle's timer survives: one more probe at +60s, none earlier.
	tokio::time::sleep(NORMAL - Duration::from_secs(1)).await;
	assert_eq!(h.probes(), 3);
	tokio::time::sleep(Duration::from_secs(2)).await;
	assert_eq!(h.probes(), 4);
	assert!(h.monitor.pending_check().is_some());
}

#[tokio::test(start_paused = true)]
async fn manual_check_replaces_pending_timer() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));

	let first = {
		h.check().await;
		h.monitor.pending_check().unwrap()
	};
	tokio::time::sleep(Duration::from_secs(30)).await;
	h.check().await;
	let second = h.monitor.pending_check().unwrap();

	assert_ne!(first, second);
	assert_eq!(second.deadline, first.deadline + Duration::from_secs(30));

	// The replaced timer at +60s never fires; the new one fires at +90s.
	tokio::time::sleep(Duration::from_secs(45)).await;
	assert_eq!(h.probes(), 2);
	tokio::time::sleep(Duration::from_secs(20)).await;
	assert_eq!(h.probes(), 3);
}

#[tokio::test(start_paused = true)]
async fn successful_login_reprobes_without_delay() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.fake.reply(methods::AUTH_LOGIN, FakeReply::ok(true));

	let report = h.check().await;

	assert_eq!(report.probe, Probe::Connected);
	assert_eq!(report.logins, 1);
	assert_eq!(
		h.fake.method_log(),
		vec![methods::WEB_CONNECTED, methods::AUTH_LOGIN, methods::WEB_CONNECTED]
	);
	let probes = h.fake.calls_to(methods::WEB_CONNECTED);
	assert_eq!(probes[0].at, probes[1].at);
	assert_eq!(h.fake.calls_to(methods::AUTH_LOGIN)[0].params, vec![json!("deluge")]);
	assert_eq!(h.events(), vec![Notification::ExtensionActivated]);
}

#[tokio::test(start_paused = true)]
async fn rejected_password_backs_off_with_error_interval_only() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
	h.fake.reply(methods::AUTH_LOGIN, FakeReply::ok(false));

	let started = Instant::now();
	let report = h.check().await;

	assert_eq!(report.probe, Probe::LoginRejected);
	assert_eq!(report.state, SessionState::Failed);
	assert!(report.next_check >= ERROR);
	assert_eq!(
		h.events(),
		vec![Notification::ExtensionDeactivated, Notification::AutoLoginFailed]
	);
	assert!(h.monitor.pending_check().unwrap().deadline >= started + ERROR);

	// No stray normal-interval timer.
	tokio::time::sleep(NORMAL + Duration::from_secs(1)).await;
	assert_eq!(h.probes(), 1);
	tokio::time::sleep(ERROR - NORMAL).await;
	assert_eq!(h.probes(), 2);
}

#[tokio::test(start_paused = true)]
async fn login_failure_deactivates_and_backs_off() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
	h.fake.reply(methods::AUTH_LOGIN, FakeReply::transport("connection reset"));

	let report = h.check().await;

	assert!(matches!(report.probe, Probe::LoginFailed { ref reason } if reason.contains("connection reset")));
	assert_eq!(report.next_check, ERROR);
	assert_eq!(h.events(), vec![Notification::ExtensionDeactivated]);
}

#[tokio::test(start_paused = true)]
async fn login_loop_is_bounded() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
	h.fake.reply(methods::AUTH_LOGIN, FakeReply::ok(true));

	let report = h.check().await;

	assert_eq!(report.logins, 3);
	assert_eq!(report.probe, Probe::LoginRejected);
	assert_eq!(report.next_check, ERROR);
	assert_eq!(h.probes(), 4);
	assert_eq!(
		h.events(),
		vec![Notification::ExtensionDeactivated, Notification::AutoLoginFailed]
	);
}

#[tokio::test(start_paused = true)]
async fn api_error_deactivates_with_normal_interval() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::api_error(2, "Unknown method"));

	let report = h.check().await;

	assert_eq!(
		report.probe,
		Probe::ApiError {
			code: 2,
			message: "Unknown method".into()
		}
	);
	assert_eq!(report.next_check, NORMAL);
	assert_eq!(h.events(), vec![Notification::ExtensionDeactivated]);
	assert_eq!(h.fake.call_count(methods::AUTH_LOGIN), 0);
}

#[tokio::test(start_paused = true)]
async fn transport_error_deactivates_with_error_interval() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::transport("502 Bad Gateway"));

	let report = h.check().await;

	assert!(matches!(report.probe, Probe::TransportError { .. }));
	assert_eq!(report.next_check, ERROR);
	assert_eq!(h.events(), vec![Notification::ExtensionDeactivated]);
}

#[tokio::test(start_paused = true)]
async fn malformed_reply_is_treated_as_unreachable() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok("maybe"));

	let report = h.check().await;
	assert!(matches!(report.probe, Probe::TransportError { .. }));
	assert_eq!(report.next_check, ERROR);
}

#[tokio::test(start_paused = true)]
async fn detached_webui_is_reconnected() {
	let mut h = Harness::new();
	let (hosts, status) = single_host("Online");
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(false));
	h.fake.reply(methods::WEB_GET_HOSTS, FakeReply::ok(hosts));
	h.fake.reply(methods::WEB_GET_HOST_STATUS, FakeReply::ok(status));
	h.fake.reply(methods::WEB_CONNECT, FakeReply::ok(json!([])));

	let report = h.check().await;

	assert_eq!(report.probe, Probe::Reconnected { host_id: "h1".into() });
	assert_eq!(report.state, SessionState::Active);
	assert_eq!(report.next_check, NORMAL);
	assert_eq!(h.fake.call_count(methods::WEB_START_DAEMON), 0);
	assert_eq!(h.events(), vec![Notification::ExtensionActivated]);
}

#[tokio::test(start_paused = true)]
async fn offline_daemon_is_started_before_connecting() {
	let h = Harness::new();
	let (hosts, status) = single_host("Offline");
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(false));
	h.fake.reply(methods::WEB_GET_HOSTS, FakeReply::ok(hosts));
	h.fake.reply(methods::WEB_GET_HOST_STATUS, FakeReply::ok(status));
	h.fake.reply(methods::WEB_START_DAEMON, FakeReply::ok(serde_json::Value::Null));
	h.fake.reply(methods::WEB_CONNECT, FakeReply::ok(json!([])));

	let report = h.check().await;

	assert!(report.probe.is_active());
	let start = &h.fake.calls_to(methods::WEB_START_DAEMON)[0];
	let connect = &h.fake.calls_to(methods::WEB_CONNECT)[0];
	assert_eq!(start.params, vec![json!(58846)]);
	assert!(connect.at - start.at >= Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn failed_reconnect_backs_off_with_error_interval() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(false));
	h.fake.reply(
		methods::WEB_GET_HOSTS,
		FakeReply::ok(json!([["h1", "a", 58846, ""], ["h2", "b", 58847, ""]])),
	);

	let report = h.check().await;

	assert!(matches!(report.probe, Probe::NotConnected { .. }));
	assert_eq!(report.state, SessionState::Failed);
	assert_eq!(report.next_check, ERROR);
	assert_eq!(h.fake.call_count(methods::WEB_GET_HOST_STATUS), 0);
	assert_eq!(h.events(), vec![Notification::ExtensionDeactivated]);
	assert!(h.monitor.pending_check().is_some());
}

#[tokio::test(start_paused = true)]
async fn timeout_applies_to_probe_only() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.fake.reply(methods::AUTH_LOGIN, FakeReply::ok(true));

	let timeout = Duration::from_millis(1000);
	let report = h.monitor.check_status(CheckOptions::with_timeout(timeout)).await;

	assert_eq!(report.next_check, NORMAL);
	for probe in h.fake.calls_to(methods::WEB_CONNECTED) {
		assert_eq!(probe.options.timeout, Some(timeout));
	}
	assert_eq!(h.fake.calls_to(methods::AUTH_LOGIN)[0].options.timeout, None);
}

#[tokio::test(start_paused = true)]
async fn slow_probe_times_out_as_transport_error() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.fake.set_latency(methods::WEB_CONNECTED, Duration::from_secs(5));

	let report = h.monitor.check_status(CheckOptions::with_timeout(Duration::from_secs(1))).await;

	assert!(matches!(report.probe, Probe::TransportError { .. }));
	assert_eq!(report.next_check, ERROR);
}

#[tokio::test(start_paused = true)]
async fn manual_check_waits_for_in_flight_timer_cycle() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));

	let started = Instant::now();
	h.check().await;
	h.fake.set_latency(methods::WEB_CONNECTED, Duration::from_secs(5));

	// The timer cycle starts at +60s and is still waiting on its probe.
	tokio::time::sleep(NORMAL + Duration::from_secs(1)).await;
	assert_eq!(h.probes(), 2);

	let report = h.check().await;
	assert_eq!(report.next_check, NORMAL);
	assert_eq!(h.probes(), 3);

	// The timer cycle finished at +65s; the manual one ran after it and ended at +70s.
	let pending = h.monitor.pending_check().unwrap();
	assert_eq!(pending.deadline, started + Duration::from_secs(70) + NORMAL);

	tokio::time::sleep_until(started + Duration::from_secs(126)).await;
	assert_eq!(h.probes(), 3);
}

#[tokio::test(start_paused = true)]
async fn start_runs_first_check_in_background() {
	let mut h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));

	let report = h.monitor.start().await.unwrap();
	assert_eq!(report.probe, Probe::Connected);
	assert_eq!(h.events(), vec![Notification::ExtensionActivated]);
}

#[tokio::test(start_paused = true)]
async fn polling_continues_after_every_outcome() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::transport("down"));
	h.check().await;

	tokio::time::sleep(ERROR * 3 + Duration::from_secs(1)).await;
	assert_eq!(h.probes(), 4);
	assert!(h.monitor.pending_check().is_some());
}

#[tokio::test(start_paused = true)]
async fn cancel_pending_stops_polling_until_next_check() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.check().await;

	assert!(h.monitor.cancel_pending());
	assert!(!h.monitor.cancel_pending());
	tokio::time::sleep(NORMAL * 2).await;
	assert_eq!(h.probes(), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_during_timer_cycle_leaves_nothing_armed() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.check().await;
	h.fake.set_latency(methods::WEB_CONNECTED, Duration::from_secs(5));

	// The timer cycle starts at +60s and is still waiting on its probe.
	tokio::time::sleep(NORMAL + Duration::from_secs(1)).await;
	assert_eq!(h.probes(), 2);

	assert!(h.monitor.stop().await);
	assert!(h.monitor.pending_check().is_none());
	tokio::time::sleep(NORMAL * 3).await;
	assert_eq!(h.probes(), 2);
}

#[tokio::test(start_paused = true)]
async fn aborted_first_check_does_not_resume_polling() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.fake.set_latency(methods::WEB_CONNECTED, Duration::from_secs(5));

	let first = h.monitor.start();
	tokio::time::sleep(Duration::from_secs(1)).await;
	assert_eq!(h.probes(), 1);

	first.abort();
	assert!(first.await.unwrap_err().is_cancelled());
	assert!(!h.monitor.stop().await);

	tokio::time::sleep(NORMAL * 3).await;
	assert_eq!(h.probes(), 1);
	assert!(h.monitor.pending_check().is_none());
}

#[tokio::test(start_paused = true)]
async fn dropping_monitor_cancels_timer() {
	let h = Harness::new();
	h.fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
	h.check().await;

	let Harness { fake, monitor, .. } = h;
	drop(monitor);
	tokio::time::sleep(NORMAL * 2).await;
	assert_eq!(fake.call_count(methods::WEB_CONNECTED), 1);
}

#[tokio::test(start_paused = true)]
async fn credentials_are_read_per_cycle() {
	let fake = Arc::new(FakeTransport::new());
	let api: Arc<dyn TorrentApi> = Arc::new(DelugeClient::new(Arc::clone(&fake)));
	let settings = Arc::new(MemorySettingsStore::default());
	let monitor = StatusMonitor::new(
		api,
		Arc::clone(&settings) as Arc<dyn SettingsStore>,
		Arc::new(crate::notify::TracingSink),
	);
	fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
	fake.reply(methods::AUTH_LOGIN, FakeReply::ok(false));

	monitor.check_status(CheckOptions::default()).await;
	settings.update(|s| s.password = "changed".into());
	monitor.check_status(CheckOptions::default()).await;

	let logins = fake.calls_to(methods::AUTH_LOGIN);
	assert_eq!(logins[0].params, vec![json!("deluge")]);
	assert_eq!(logins[1].params, vec![json!("changed")]);
}
