//! Host rows returned by the WebUI connection manager calls.
//!
//! Deluge answers with positional arrays rather than objects:
//!
//! * `web.get_hosts` → `[[id, address, port, status], ...]` (the status column
//!   is a placeholder on 1.3 and a username on 2.x)
//! * `web.get_host_status` → `[id, address, port, status, version]` on 1.3,
//!   `[id, status, version]` on 2.x

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Failure to interpret a positional host row.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed host row: {reason} (got {row})")]
pub struct HostRowError {
	pub reason: &'static str,
	pub row: String,
}

impl HostRowError {
	fn new(reason: &'static str, row: &Value) -> Self {
		Self { reason, row: row.to_string() }
	}
}

/// Daemon state as reported by the connection manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DaemonStatus {
	Online,
	Offline,
	/// The WebUI is currently attached to this daemon.
	Connected,
	Unknown(String),
}

impl DaemonStatus {
	pub fn parse(raw: &str) -> Self {
		match raw {
			"Online" => Self::Online,
			"Offline" => Self::Offline,
			"Connected" => Self::Connected,
			other => Self::Unknown(other.to_string()),
		}
	}

	pub fn as_str(&self) -> &str {
		match self {
			Self::Online => "Online",
			Self::Offline => "Offline",
			Self::Connected => "Connected",
			Self::Unknown(raw) => raw,
		}
	}

	pub fn is_offline(&self) -> bool {
		matches!(self, Self::Offline)
	}
}

impl From<String> for DaemonStatus {
	fn from(raw: String) -> Self {
		Self::parse(&raw)
	}
}

impl From<DaemonStatus> for String {
	fn from(status: DaemonStatus) -> Self {
		status.as_str().to_string()
	}
}

impl std::fmt::Display for DaemonStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A daemon endpoint registered in the WebUI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDescriptor {
	pub host_id: String,
	pub address: String,
	pub port: u16,
	pub daemon_status: DaemonStatus,
}

impl HostDescriptor {
	/// Parses one row of a `web.get_hosts` reply.
	pub fn from_row(row: &Value) -> Result<Self, HostRowError> {
		let cols = row.as_array().ok_or_else(|| HostRowError::new("expected an array", row))?;
		let host_id = string_col(cols, 0).ok_or_else(|| HostRowError::new("missing host id", row))?;
		let address = string_col(cols, 1).ok_or_else(|| HostRowError::new("missing address", row))?;
		let port = port_col(cols, 2).ok_or_else(|| HostRowError::new("missing port", row))?;
		let daemon_status = match string_col(cols, 3).map(|raw| DaemonStatus::parse(&raw)) {
			Some(DaemonStatus::Unknown(_)) | None => DaemonStatus::Unknown(String::new()),
			Some(status) => status,
		};

		Ok(Self {
			host_id,
			address,
			port,
			daemon_status,
		})
	}

	/// Parses a full `web.get_hosts` reply.
	pub fn list_from_value(value: &Value) -> Result<Vec<Self>, HostRowError> {
		match value {
			Value::Null => Ok(Vec::new()),
			Value::Array(rows) => rows.iter().map(Self::from_row).collect(),
			other => Err(HostRowError::new("expected a list of hosts", other)),
		}
	}
}

/// Reply of `web.get_host_status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostStatus {
	pub host_id: String,
	pub daemon_status: DaemonStatus,
	#[serde(default)]
	pub address: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub version: Option<String>,
}

impl HostStatus {
	pub fn from_row(row: &Value) -> Result<Self, HostRowError> {
		let cols = row.as_array().ok_or_else(|| HostRowError::new("expected an array", row))?;
		let host_id = string_col(cols, 0).ok_or_else(|| HostRowError::new("missing host id", row))?;

		if cols.len() >= 4 {
			let status = string_col(cols, 3).ok_or_else(|| HostRowError::new("missing status", row))?;
			return Ok(Self {
				host_id,
				daemon_status: DaemonStatus::parse(&status),
				address: string_col(cols, 1),
				port: port_col(cols, 2),
				version: string_col(cols, 4).filter(|v| !v.is_empty()),
			});
		}

		let status = string_col(cols, 1).ok_or_else(|| HostRowError::new("missing status", row))?;
		Ok(Self {
			host_id,
			daemon_status: DaemonStatus::parse(&status),
			address: None,
			port: None,
			version: string_col(cols, 2).filter(|v| !v.is_empty()),
		})
	}
}

fn string_col(cols: &[Value], index: usize) -> Option<String> {
	cols.get(index).and_then(Value::as_str).map(str::to_string)
}

fn port_col(cols: &[Value], index: usize) -> Option<u16> {
	match cols.get(index)? {
		Value::Number(n) => n.as_u64().and_then(|p| u16::try_from(p).ok()),
		Value::String(s) => s.parse().ok(),
		_ => None,
	}
}
