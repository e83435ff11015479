//! Daemon version reported by `daemon.info`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized daemon version {0:?}")]
pub struct VersionParseError(pub String);

/// `major.minor.build` with any `-suffix` dropped (`"1.3.15-dev"` → 1.3.15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DaemonVersion {
	pub major: u32,
	pub minor: u32,
	pub build: u32,
}

impl DaemonVersion {
	pub fn parse(raw: &str) -> Result<Self, VersionParseError> {
		let release = raw.trim().split('-').next().unwrap_or_default();
		let mut parts = release.split('.').map(str::parse::<u32>);
		let invalid = || VersionParseError(raw.to_string());

		let major = parts.next().and_then(Result::ok).ok_or_else(invalid)?;
		let minor = parts.next().and_then(Result::ok).ok_or_else(invalid)?;
		let build = match parts.next() {
			Some(part) => part.map_err(|_| invalid())?,
			None => 0,
		};

		Ok(Self { major, minor, build })
	}
}

impl std::fmt::Display for DaemonVersion {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}.{}.{}", self.major, self.minor, self.build)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn strips_dev_suffix() {
		assert_eq!(
			DaemonVersion::parse("1.3.15-dev").unwrap(),
			DaemonVersion {
				major: 1,
				minor: 3,
				build: 15
			}
		);
	}

	#[test]
	fn build_defaults_to_zero() {
		assert_eq!(DaemonVersion::parse("2.1").unwrap().build, 0);
	}

	#[test]
	fn rejects_garbage() {
		assert!(DaemonVersion::parse("").is_err());
		assert!(DaemonVersion::parse("two.one").is_err());
		assert!(DaemonVersion::parse("2.1.x").is_err());
	}

	#[test]
	fn orders_by_component() {
		assert!(DaemonVersion::parse("2.0.3").unwrap() > DaemonVersion::parse("1.3.15").unwrap());
	}
}
