//! JSON-RPC envelopes for the WebUI `/json` endpoint.
//!
//! Requests are posted as:
//! ```json
//! { "method": "web.connected", "params": [], "id": 7 }
//! ```
//!
//! and answered with either a result or a structured error:
//! ```json
//! { "id": 7, "result": true, "error": null }
//! { "id": 7, "result": null, "error": { "message": "Not authenticated", "code": 1 } }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Error code the WebUI returns when the request carries no valid session.
pub const AUTH_ERROR_CODE: i64 = 1;

/// Request body posted to the WebUI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
	pub method: String,
	pub params: Vec<Value>,
	pub id: u64,
}

impl RpcRequest {
	pub fn new(id: u64, method: impl Into<String>, params: Vec<Value>) -> Self {
		Self {
			method: method.into(),
			params,
			id,
		}
	}
}

/// Response body returned by the WebUI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
	/// Echo of the request id. Deluge sends it back verbatim.
	#[serde(default)]
	pub id: Value,
	#[serde(default)]
	pub result: Value,
	#[serde(default)]
	pub error: Option<RpcError>,
}

impl RpcResponse {
	/// Splits the envelope into the result payload or the structured error.
	pub fn into_result(self) -> Result<Value, RpcError> {
		match self.error {
			Some(error) => Err(error),
			None => Ok(self.result),
		}
	}
}

/// Structured error payload carried by a failed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
	#[serde(default)]
	pub message: String,
	pub code: i64,
}

impl RpcError {
	pub fn new(code: i64, message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			code,
		}
	}

	/// Returns `true` when the server rejected the call for lack of a session.
	pub fn is_auth(&self) -> bool {
		self.code == AUTH_ERROR_CODE
	}
}
