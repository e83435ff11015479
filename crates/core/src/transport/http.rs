//! reqwest-backed transport.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use siphon_protocol::{RpcRequest, RpcResponse};
use tracing::{debug, trace};
use url::Url;

use super::{CallOptions, RpcTransport};
use crate::error::{Error, Result};
use crate::settings::Settings;

/// Default per-request timeout when the caller supplies none.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Posts JSON-RPC envelopes to `<webui>/json`.
///
/// The underlying client keeps a cookie jar, so the session cookie set by
/// `auth.login` is replayed on every later call.
#[derive(Debug)]
pub struct HttpTransport {
	client: reqwest::Client,
	endpoint: Url,
	next_id: AtomicU64,
}

impl HttpTransport {
	pub fn new(endpoint: Url) -> Result<Self> {
		let client = reqwest::Client::builder()
			.cookie_store(true)
			.timeout(DEFAULT_REQUEST_TIMEOUT)
			.build()
			.map_err(|e| Error::Transport(format!("failed to create HTTP client: {e}")))?;

		Ok(Self {
			client,
			endpoint,
			next_id: AtomicU64::new(1),
		})
	}

	pub fn from_settings(settings: &Settings) -> Result<Self> {
		Self::new(settings.rpc_endpoint()?)
	}

	pub fn endpoint(&self) -> &Url {
		&self.endpoint
	}
}

#[async_trait]
impl RpcTransport for HttpTransport {
	async fn call(&self, method: &'static str, params: Vec<Value>, options: CallOptions) -> Result<Value> {
		let id = self.next_id.fetch_add(1, Ordering::Relaxed);
		let body = RpcRequest::new(id, method, params);

		trace!(target = "siphon.transport", id, method, endpoint = %self.endpoint, "rpc request");

		let mut request = self.client.post(self.endpoint.clone()).json(&body);
		if let Some(timeout) = options.timeout {
			request = request.timeout(timeout);
		}

		let response = request.send().await.map_err(|e| {
			debug!(target = "siphon.transport", id, method, error = %e, "rpc request failed");
			Error::Transport(format!("{method}: {e}"))
		})?;

		let status = response.status();
		if !status.is_success() {
			debug!(target = "siphon.transport", id, method, %status, "rpc http error");
			return Err(Error::Transport(format!("{method}: unexpected status {status}")));
		}

		let envelope: RpcResponse = response
			.json()
			.await
			.map_err(|e| Error::Transport(format!("{method}: undecodable reply: {e}")))?;

		match envelope.into_result() {
			Ok(result) => {
				trace!(target = "siphon.transport", id, method, "rpc reply");
				Ok(result)
			}
			Err(error) => {
				debug!(target = "siphon.transport", id, method, code = error.code, message = %error.message, "rpc error reply");
				Err(error.into())
			}
		}
	}
}
