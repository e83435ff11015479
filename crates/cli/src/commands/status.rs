use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use siphon::{CheckOptions, CheckReport, Probe, SessionState, TracingSink};

use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{CommandResult, ResultBuilder};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusData {
	pub state: SessionState,
	pub probe: Probe,
	pub logins: u32,
	pub next_check_ms: u64,
}

impl From<CheckReport> for StatusData {
	fn from(report: CheckReport) -> Self {
		Self {
			state: report.state,
			probe: report.probe,
			logins: report.logins,
			next_check_ms: report.next_check.as_millis() as u64,
		}
	}
}

pub async fn execute(ctx: &CommandContext, timeout_ms: Option<u64>) -> Result<CommandResult<StatusData>> {
	let api = ctx.api()?;
	let monitor = ctx.monitor(api, Arc::new(TracingSink));
	let options = CheckOptions {
		timeout: timeout_ms.map(Duration::from_millis),
	};

	let report = monitor.check_status(options).await;
	monitor.cancel_pending();

	let failure = CliError::from_probe(&report.probe);
	let mut builder = ResultBuilder::new("status")
		.data(StatusData::from(report))
		.config(ctx.effective_config());
	if let Some(err) = failure {
		builder = builder.command_error(err.to_command_error());
	}
	Ok(builder.build())
}
