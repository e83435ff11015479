//! JSON-RPC transport to the WebUI.
//!
//! [`RpcTransport`] is the single seam between the typed API and the wire.
//! [`HttpTransport`] talks to a real WebUI; [`FakeTransport`] replays scripted
//! replies for tests.

mod fake;
mod http;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub use fake::{FakeReply, FakeTransport, RecordedCall};
pub use http::HttpTransport;

use crate::error::Result;

/// Per-call options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallOptions {
	/// Overrides the transport's default request timeout.
	pub timeout: Option<Duration>,
}

impl CallOptions {
	pub fn with_timeout(timeout: Duration) -> Self {
		Self { timeout: Some(timeout) }
	}
}

/// Issues one JSON-RPC call and returns its `result` payload.
///
/// Implementations must map connection failures, timeouts, non-2xx statuses
/// and undecodable bodies to [`Error::Transport`](crate::Error::Transport),
/// and structured error replies to [`Error::Api`](crate::Error::Api).
#[async_trait]
pub trait RpcTransport: Send + Sync {
	async fn call(&self, method: &'static str, params: Vec<Value>, options: CallOptions) -> Result<Value>;
}

#[async_trait]
impl<T: RpcTransport + ?Sized> RpcTransport for std::sync::Arc<T> {
	async fn call(&self, method: &'static str, params: Vec<Value>, options: CallOptions) -> Result<Value> {
		(**self).call(method, params, options).await
	}
}
