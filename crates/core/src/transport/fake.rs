//! In-memory transport for exercising the client without a WebUI.
//!
//! Replies are scripted per method. Each call consumes the front of that
//! method's queue; the last reply stays in place so a steady state only has
//! to be scripted once.
//!
//! ```ignore
//! let fake = Arc::new(FakeTransport::new());
//! fake.reply(methods::WEB_CONNECTED, FakeReply::auth_required());
//! fake.reply(methods::WEB_CONNECTED, FakeReply::ok(true));
//! let client = DelugeClient::new(Arc::clone(&fake));
//! ```

use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use siphon_protocol::AUTH_ERROR_CODE;
use tokio::time::Instant;

use super::{CallOptions, RpcTransport};
use crate::error::{Error, Result};

/// One scripted outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum FakeReply {
	Result(Value),
	ApiError { code: i64, message: String },
	TransportError(String),
}

impl FakeReply {
	pub fn ok(value: impl Into<Value>) -> Self {
		Self::Result(value.into())
	}

	pub fn auth_required() -> Self {
		Self::ApiError {
			code: AUTH_ERROR_CODE,
			message: "Not authenticated".into(),
		}
	}

	pub fn api_error(code: i64, message: impl Into<String>) -> Self {
		Self::ApiError {
			code,
			message: message.into(),
		}
	}

	pub fn transport(reason: impl Into<String>) -> Self {
		Self::TransportError(reason.into())
	}

	fn into_result(self) -> Result<Value> {
		match self {
			Self::Result(value) => Ok(value),
			Self::ApiError { code, message } => Err(Error::Api { code, message }),
			Self::TransportError(reason) => Err(Error::Transport(reason)),
		}
	}
}

/// A call observed by the fake, in arrival order.
#[derive(Debug, Clone)]
pub struct RecordedCall {
	pub method: &'static str,
	pub params: Vec<Value>,
	pub options: CallOptions,
	pub at: Instant,
}

#[derive(Debug, Default)]
struct FakeState {
	replies: HashMap<&'static str, VecDeque<FakeReply>>,
	latency: HashMap<&'static str, Duration>,
	calls: Vec<RecordedCall>,
}

#[derive(Debug, Default)]
pub struct FakeTransport {
	state: Mutex<FakeState>,
}

impl FakeTransport {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a reply to the queue for `method`.
	pub fn reply(&self, method: &'static str, reply: FakeReply) {
		self.state.lock().replies.entry(method).or_default().push_back(reply);
	}

	/// Drops every scripted reply for `method`.
	pub fn clear_replies(&self, method: &'static str) {
		self.state.lock().replies.remove(method);
	}

	/// Delays every reply to `method`. A call whose timeout is shorter than
	/// the latency fails with a transport error once the timeout elapses.
	pub fn set_latency(&self, method: &'static str, latency: Duration) {
		self.state.lock().latency.insert(method, latency);
	}

	pub fn calls(&self) -> Vec<RecordedCall> {
		self.state.lock().calls.clone()
	}

	pub fn calls_to(&self, method: &str) -> Vec<RecordedCall> {
		self.state.lock().calls.iter().filter(|c| c.method == method).cloned().collect()
	}

	pub fn call_count(&self, method: &str) -> usize {
		self.state.lock().calls.iter().filter(|c| c.method == method).count()
	}

	/// Method names in call order.
	pub fn method_log(&self) -> Vec<&'static str> {
		self.state.lock().calls.iter().map(|c| c.method).collect()
	}

	pub fn clear_calls(&self) {
		self.state.lock().calls.clear();
	}
}

#[async_trait]
impl RpcTransport for FakeTransport {
	async fn call(&self, method: &'static str, params: Vec<Value>, options: CallOptions) -> Result<Value> {
		let (reply, latency) = {
			let mut state = self.state.lock();
			state.calls.push(RecordedCall {
				method,
				params,
				options,
				at: Instant::now(),
			});
			let reply = state.replies.get_mut(method).and_then(|queue| {
				if queue.len() > 1 { queue.pop_front() } else { queue.front().cloned() }
			});
			(reply, state.latency.get(method).copied())
		};

		if let Some(latency) = latency {
			match options.timeout {
				Some(timeout) if timeout < latency => {
					tokio::time::sleep(timeout).await;
					return Err(Error::Transport(format!("{method}: request timed out")));
				}
				_ => tokio::time::sleep(latency).await,
			}
		}

		match reply {
			Some(reply) => reply.into_result(),
			None => Err(Error::Transport(format!("{method}: no scripted reply"))),
		}
	}
}
