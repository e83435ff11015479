//! Error types for the WebUI client.

use siphon_protocol::{AUTH_ERROR_CODE, RpcError};
use thiserror::Error;

/// Result type alias using the client error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification used by the status monitor to pick a recovery path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
	/// Network or HTTP-level failure; the server never produced a structured reply.
	Transport,
	/// Structured reply saying the session is not authenticated.
	Auth,
	/// Any other structured error reply.
	Api,
	/// Local precondition failures (ambiguous hosts, malformed replies, config).
	Logic,
}

#[derive(Error, Debug)]
pub enum Error {
	/// Connection refused, timeout, non-2xx status or undecodable body.
	#[error("transport error: {0}")]
	Transport(String),

	/// The WebUI answered with an error payload.
	#[error("api error {code}: {message}")]
	Api { code: i64, message: String },

	/// More than one daemon host is registered; selecting one is not supported.
	#[error("{count} daemon hosts registered; only a single host is supported")]
	AmbiguousHost { count: usize },

	#[error("no daemon host registered in the WebUI")]
	NoHosts,

	#[error("failed to query status of host {host_id}: {source}")]
	HostStatus {
		host_id: String,
		#[source]
		source: Box<Error>,
	},

	#[error("unexpected reply to {method}: {detail}")]
	UnexpectedResponse { method: &'static str, detail: String },

	#[error("configuration error: {0}")]
	Config(String),

	#[error(transparent)]
	Io(#[from] std::io::Error),

	#[error(transparent)]
	Serialization(#[from] serde_json::Error),
}

impl Error {
	pub fn class(&self) -> ErrorClass {
		match self {
			Error::Transport(_) => ErrorClass::Transport,
			Error::Api { code, .. } if *code == AUTH_ERROR_CODE => ErrorClass::Auth,
			Error::Api { .. } => ErrorClass::Api,
			Error::AmbiguousHost { .. }
			| Error::NoHosts
			| Error::HostStatus { .. }
			| Error::UnexpectedResponse { .. }
			| Error::Config(_)
			| Error::Io(_)
			| Error::Serialization(_) => ErrorClass::Logic,
		}
	}

	pub fn is_auth(&self) -> bool {
		self.class() == ErrorClass::Auth
	}

	pub(crate) fn unexpected(method: &'static str, detail: impl Into<String>) -> Self {
		Error::UnexpectedResponse {
			method,
			detail: detail.into(),
		}
	}
}

impl From<RpcError> for Error {
	fn from(err: RpcError) -> Self {
		Error::Api {
			code: err.code,
			message: err.message,
		}
	}
}
