use serde::Serialize;
use siphon::TorrentWorkflows;
use siphon::protocol::DaemonVersion;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandResult, ResultBuilder};

#[derive(Debug, Serialize)]
pub struct VersionData {
	pub version: String,
	#[serde(flatten)]
	pub parsed: DaemonVersion,
}

pub async fn execute(ctx: &CommandContext) -> Result<CommandResult<VersionData>> {
	let workflows = TorrentWorkflows::new(ctx.session(None).await?);
	let parsed = workflows.daemon_version().await?;

	Ok(ResultBuilder::new("version")
		.data(VersionData {
			version: parsed.to_string(),
			parsed,
		})
		.config(ctx.effective_config())
		.build())
}
