//! Client core for the Deluge WebUI.
//!
//! The crate keeps a remote Deluge daemon usable from a front end: it polls
//! the WebUI session, logs back in when the session cookie expires, starts and
//! connects the daemon when the WebUI is detached, and reports activation
//! changes to whoever renders them. Torrent workflows (add from URL or magnet,
//! pause, queue, remove) sit on the same typed API.
//!
//! Layering, leaf to root:
//!
//! * [`transport`]: JSON-RPC over HTTP ([`HttpTransport`]) or in memory ([`FakeTransport`])
//! * [`api`]: typed calls ([`TorrentApi`], [`DelugeClient`])
//! * [`session`]: [`DaemonLauncher`] and [`SessionConnector`]
//! * [`monitor`]: the polling [`StatusMonitor`]
//!
//! Settings are injected through [`SettingsStore`]; events leave through
//! [`NotificationSink`].

pub mod api;
pub mod context_menu;
pub mod error;
pub mod links;
pub mod monitor;
pub mod notify;
pub mod router;
pub mod session;
pub mod settings;
pub mod torrents;
pub mod transport;

pub use api::{DelugeClient, TorrentApi};
pub use context_menu::{ContextMenu, MenuId, MenuRegistrar};
pub use error::{Error, ErrorClass, Result};
pub use links::LinkKind;
pub use monitor::{CheckOptions, CheckReport, MonitorConfig, Probe, ScheduledCheck, SessionState, StatusMonitor};
pub use notify::{ChannelSink, NotificationSink, TracingSink};
pub use router::{CommandRouter, RouterReply};
pub use session::{DaemonLauncher, SessionConnector};
pub use settings::{Credentials, FileSettingsStore, MemorySettingsStore, Settings, SettingsStore};
pub use siphon_protocol as protocol;
pub use torrents::TorrentWorkflows;
pub use transport::{CallOptions, FakeReply, FakeTransport, HttpTransport, RecordedCall, RpcTransport};
