use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::{Value, json};
use tempfile::TempDir;

fn siphon_binary() -> PathBuf {
	PathBuf::from(env!("CARGO_BIN_EXE_siphon"))
}

fn write_settings(dir: &Path, settings: Value) -> PathBuf {
	let path = dir.join("settings.json");
	std::fs::write(&path, settings.to_string()).expect("settings should be written");
	path
}

fn run_siphon(settings: &Path, args: &[&str]) -> (bool, Value, String) {
	let output = Command::new(siphon_binary())
		.arg("--settings")
		.arg(settings)
		.args(["-f", "json"])
		.args(args)
		.output()
		.expect("failed to execute siphon");

	let stdout = String::from_utf8_lossy(&output.stdout).to_string();
	let stderr = String::from_utf8_lossy(&output.stderr).to_string();
	let parsed = serde_json::from_str::<Value>(&stdout).unwrap_or_else(|_| json!({ "raw": stdout }));
	(output.status.success(), parsed, stderr)
}

/// A port nothing listens on.
fn closed_port() -> u16 {
	let listener = TcpListener::bind("127.0.0.1:0").expect("ephemeral port should bind");
	listener.local_addr().expect("bound address").port()
}

#[test]
fn config_show_masks_the_password() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let settings = write_settings(
		tmp.path(),
		json!({ "address_ip": "nas.local", "address_port": 8112, "address_base": "deluge", "password": "hunter2" }),
	);

	let (success, json, stderr) = run_siphon(&settings, &["config", "show"]);
	assert!(success, "config show failed: {stderr}");
	assert_eq!(json["ok"], true);
	assert_eq!(json["command"], "config.show");
	assert_eq!(json["data"]["webuiUrl"], "http://nas.local:8112/deluge/");
	assert_eq!(json["data"]["endpoint"], "http://nas.local:8112/deluge/json");
	assert_eq!(json["data"]["settings"]["password"], "********");
	assert!(!json.to_string().contains("hunter2"));
}

#[test]
fn legacy_settings_files_are_migrated() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let settings = write_settings(
		tmp.path(),
		json!({ "delugeAddress": "https://seedbox:9000/ui", "oneClickMagnets": "false" }),
	);

	let (success, json, stderr) = run_siphon(&settings, &["config", "show"]);
	assert!(success, "config show failed: {stderr}");
	assert_eq!(json["data"]["endpoint"], "https://seedbox:9000/ui/json");
	assert_eq!(json["data"]["settings"]["handle_magnets"], false);
}

#[test]
fn address_flag_overrides_settings_file() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let settings = write_settings(tmp.path(), json!({ "address_ip": "nas.local" }));

	let (success, json, stderr) = run_siphon(&settings, &["--address", "http://10.0.0.5:8112", "config", "show"]);
	assert!(success, "config show failed: {stderr}");
	assert_eq!(json["data"]["endpoint"], "http://10.0.0.5:8112/json");
}

#[test]
fn options_reflect_link_handling_settings() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let settings = write_settings(tmp.path(), json!({ "handle_torrents": false, "handle_magnets": true }));

	let (success, json, stderr) = run_siphon(&settings, &["options"]);
	assert!(success, "options failed: {stderr}");
	assert_eq!(
		json["data"],
		json!({ "enable_deluge_icon": false, "enable_one_click_magnets": true })
	);
}

#[test]
fn options_work_without_a_usable_address() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let settings = write_settings(tmp.path(), json!({ "address_ip": "", "handle_torrents": true, "handle_magnets": false }));

	let (success, json, stderr) = run_siphon(&settings, &["options"]);
	assert!(success, "options failed: {stderr}");
	assert_eq!(
		json["data"],
		json!({ "enable_deluge_icon": true, "enable_one_click_magnets": false })
	);
}

#[test]
fn add_rejects_links_that_are_not_torrents() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let settings = write_settings(tmp.path(), json!({}));

	let (success, json, _) = run_siphon(&settings, &["add", "https://example.com/index.html"]);
	assert!(!success);
	assert_eq!(json["ok"], false);
	assert_eq!(json["command"], "add");
	assert_eq!(json["error"]["code"], "INVALID_INPUT");
}

#[test]
fn status_reports_unreachable_webui() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let port = closed_port();
	let settings = write_settings(tmp.path(), json!({ "address_ip": "127.0.0.1", "address_port": port }));

	let (success, json, _) = run_siphon(&settings, &["status", "--timeout-ms", "2000"]);
	assert!(!success);
	assert_eq!(json["ok"], false);
	assert_eq!(json["error"]["code"], "UNREACHABLE");
	assert_eq!(json["data"]["state"], "failed");
	assert_eq!(json["data"]["probe"]["kind"], "transport_error");
	assert_eq!(json["data"]["nextCheckMs"], 120_000);
}

#[test]
fn malformed_settings_file_fails_before_any_command() {
	let tmp = TempDir::new().expect("temp dir should be created");
	let path = tmp.path().join("settings.json");
	std::fs::write(&path, "{ not json").expect("settings should be written");

	let output = Command::new(siphon_binary())
		.arg("--settings")
		.arg(&path)
		.args(["config", "show"])
		.output()
		.expect("failed to execute siphon");
	assert!(!output.status.success());
	assert!(String::from_utf8_lossy(&output.stderr).contains("failed to load settings"));
}
