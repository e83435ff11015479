use siphon::protocol::DownloadOptions;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandResult, ResultBuilder};

/// Answers `get_download_options` from local settings. No client is built,
/// so this works even when the WebUI address is unusable.
pub fn execute(ctx: &CommandContext) -> Result<CommandResult<DownloadOptions>> {
	Ok(ResultBuilder::new("options")
		.data(ctx.settings().download_options())
		.build())
}
