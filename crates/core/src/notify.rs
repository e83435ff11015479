//! Where monitor events go.

use siphon_protocol::Notification;
use tokio::sync::mpsc;
use tracing::info;

/// Receives activation changes and login failures.
///
/// Sinks are called from inside a poll cycle and must not block.
pub trait NotificationSink: Send + Sync {
	fn notify(&self, notification: Notification);

	fn activate(&self) {
		self.notify(Notification::ExtensionActivated);
	}

	fn deactivate(&self) {
		self.notify(Notification::ExtensionDeactivated);
	}

	fn auto_login_failed(&self) {
		self.notify(Notification::AutoLoginFailed);
	}
}

/// Logs every notification and nothing else.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
	fn notify(&self, notification: Notification) {
		info!(target = "siphon.notify", msg = notification.name(), "notification");
	}
}

/// Forwards notifications over an unbounded channel.
#[derive(Debug, Clone)]
pub struct ChannelSink {
	tx: mpsc::UnboundedSender<Notification>,
}

impl ChannelSink {
	pub fn new() -> (Self, mpsc::UnboundedReceiver<Notification>) {
		let (tx, rx) = mpsc::unbounded_channel();
		(Self { tx }, rx)
	}
}

impl NotificationSink for ChannelSink {
	fn notify(&self, notification: Notification) {
		// Receiver gone means nobody is listening anymore.
		let _ = self.tx.send(notification);
	}
}
