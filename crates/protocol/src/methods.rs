//! Remote method names understood by the WebUI.

pub const AUTH_LOGIN: &str = "auth.login";

pub const WEB_GET_HOSTS: &str = "web.get_hosts";
pub const WEB_GET_HOST_STATUS: &str = "web.get_host_status";
pub const WEB_START_DAEMON: &str = "web.start_daemon";
pub const WEB_CONNECT: &str = "web.connect";
pub const WEB_CONNECTED: &str = "web.connected";
pub const WEB_DOWNLOAD_TORRENT_FROM_URL: &str = "web.download_torrent_from_url";
pub const WEB_ADD_TORRENTS: &str = "web.add_torrents";

pub const CORE_GET_CONFIG_VALUES: &str = "core.get_config_values";
pub const CORE_ADD_TORRENT_MAGNET: &str = "core.add_torrent_magnet";
pub const CORE_SET_TORRENT_AUTO_MANAGED: &str = "core.set_torrent_auto_managed";
pub const CORE_PAUSE_TORRENT: &str = "core.pause_torrent";
pub const CORE_RESUME_TORRENT: &str = "core.resume_torrent";
pub const CORE_QUEUE_UP: &str = "core.queue_up";
pub const CORE_QUEUE_DOWN: &str = "core.queue_down";
pub const CORE_REMOVE_TORRENT: &str = "core.remove_torrent";

pub const DAEMON_INFO: &str = "daemon.info";

/// Daemon config keys forwarded as per-torrent options when adding a torrent file.
pub const ADD_OPTION_KEYS: &[&str] = &[
	"add_paused",
	"compact_allocation",
	"download_location",
	"max_connections_per_torrent",
	"max_download_speed_per_torrent",
	"max_upload_speed_per_torrent",
	"max_upload_slots_per_torrent",
	"prioritize_first_last_pieces",
];
