use serde_json::Value;
use siphon::protocol::Command;
use siphon::{CommandRouter, LinkKind, RouterReply, TorrentWorkflows};

use super::response_result;
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{CommandInputs, CommandResult, Diagnostic, DiagnosticLevel};

/// `add <link>`: picks URL or magnet handling from the link itself.
pub async fn execute_link(ctx: &CommandContext, link: &str) -> Result<CommandResult<Value>> {
	let kind = LinkKind::classify(link);
	let command = match kind {
		LinkKind::TorrentUrl => Command::AddTorrentFromUrl { url: link.to_string() },
		LinkKind::Magnet => Command::AddTorrentFromMagnet { url: link.to_string() },
		LinkKind::NotTorrent => return Err(CliError::InvalidInput(format!("not a torrent link: {link}"))),
	};

	let mut result = execute(ctx, "add", command).await?;
	result.diagnostics.push(Diagnostic {
		level: DiagnosticLevel::Info,
		message: format!("link handled as {kind:?}"),
		source: None,
	});
	Ok(result)
}

pub async fn execute(ctx: &CommandContext, name: &str, command: Command) -> Result<CommandResult<Value>> {
	let url = match &command {
		Command::AddTorrentFromUrl { url } | Command::AddTorrentFromMagnet { url } => Some(url.clone()),
		Command::GetDownloadOptions => None,
	};

	let api = ctx.session(None).await?;
	let router = CommandRouter::new(TorrentWorkflows::new(api), ctx.settings_store());

	let RouterReply::Command(response) = router.dispatch(command).await else {
		return Err(CliError::InvalidInput("expected an add command".into()));
	};

	let inputs = CommandInputs {
		url,
		..Default::default()
	};
	response_result(name, inputs, response)
}
