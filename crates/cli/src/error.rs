use siphon::{Error as CoreError, ErrorClass, Probe};
use thiserror::Error;

use crate::output::{CommandError, ErrorCode};

#[derive(Error, Debug)]
pub enum CliError {
	#[error(transparent)]
	Core(#[from] CoreError),

	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// The daemon replied with an error response to a workflow.
	#[error("{0}")]
	CommandFailed(String),

	/// The session check did not end attached to a daemon.
	#[error("WebUI session not usable: {message}")]
	Session { code: ErrorCode, message: String },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;

impl CliError {
	pub fn to_command_error(&self) -> CommandError {
		let code = match self {
			CliError::Core(err) => core_error_code(err),
			CliError::InvalidInput(_) => ErrorCode::InvalidInput,
			CliError::CommandFailed(_) => ErrorCode::CommandFailed,
			CliError::Session { code, .. } => *code,
			CliError::Io(_) => ErrorCode::IoError,
		};

		CommandError {
			code,
			message: self.to_string(),
			details: None,
		}
	}
}

impl CliError {
	/// Error for a session check that did not end active; `None` when it did.
	pub fn from_probe(probe: &Probe) -> Option<Self> {
		let (code, message) = match probe {
			Probe::Connected | Probe::Reconnected { .. } => return None,
			Probe::NotConnected { reason } => (ErrorCode::DaemonNotConnected, reason.clone()),
			Probe::LoginRejected => (ErrorCode::AuthFailed, "password rejected by the WebUI".to_string()),
			Probe::LoginFailed { reason } => (ErrorCode::Unreachable, format!("login failed: {reason}")),
			Probe::ApiError { code, message } => (ErrorCode::ApiError, format!("api error {code}: {message}")),
			Probe::TransportError { reason } => (ErrorCode::Unreachable, reason.clone()),
		};
		Some(CliError::Session { code, message })
	}
}

fn core_error_code(err: &CoreError) -> ErrorCode {
	match err {
		CoreError::NoHosts => ErrorCode::NoHosts,
		CoreError::AmbiguousHost { .. } => ErrorCode::AmbiguousHost,
		CoreError::Config(_) | CoreError::Serialization(_) => ErrorCode::ConfigError,
		CoreError::Io(_) => ErrorCode::IoError,
		CoreError::HostStatus { .. } | CoreError::UnexpectedResponse { .. } => ErrorCode::UnexpectedResponse,
		CoreError::Transport(_) | CoreError::Api { .. } => match err.class() {
			ErrorClass::Transport => ErrorCode::Unreachable,
			ErrorClass::Auth => ErrorCode::AuthFailed,
			ErrorClass::Api | ErrorClass::Logic => ErrorCode::ApiError,
		},
	}
}
