use std::sync::Arc;

use serde::Serialize;
use siphon::{ChannelSink, SessionState};
use tracing::info;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandResult, ResultBuilder, print_event};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchSummary {
	pub notifications: usize,
	pub state: SessionState,
}

/// Polls until interrupted (or `count` notifications), streaming each one.
pub async fn execute(ctx: &CommandContext, count: Option<usize>) -> Result<CommandResult<WatchSummary>> {
	let api = ctx.api()?;
	let (sink, mut events) = ChannelSink::new();
	let monitor = ctx.monitor(api, Arc::new(sink));
	let first = monitor.start();

	let mut seen = 0;
	loop {
		tokio::select! {
			event = events.recv() => {
				let Some(event) = event else { break };
				print_event(&event, ctx.format());
				seen += 1;
				if count.is_some_and(|limit| seen >= limit) {
					break;
				}
			}
			_ = tokio::signal::ctrl_c() => {
				info!(target = "siphon_cli", "interrupted");
				break;
			}
		}
	}
	first.abort();
	let _ = first.await;
	monitor.stop().await;

	Ok(ResultBuilder::new("watch")
		.data(WatchSummary {
			notifications: seen,
			state: monitor.state(),
		})
		.build())
}
