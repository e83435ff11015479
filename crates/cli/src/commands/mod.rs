mod add;
mod config;
mod options;
mod status;
mod torrent;
mod version;
mod watch;

use serde::Serialize;
use serde_json::Value;
use siphon::protocol::{Command, CommandResponse};
use tracing::warn;

use crate::cli::{Commands, ConfigAction};
use crate::context::CommandContext;
use crate::error::{CliError, Result};
use crate::output::{CommandInputs, CommandResult, ResultBuilder, print_result};

/// Runs one command and prints its envelope. Returns whether it succeeded.
pub async fn dispatch(command: Commands, ctx: &CommandContext) -> bool {
	let name = command.name();
	match command {
		Commands::Status { timeout_ms } => finish(ctx, name, status::execute(ctx, timeout_ms).await),
		Commands::Watch { count } => finish(ctx, name, watch::execute(ctx, count).await),
		Commands::Add { link } => finish(ctx, name, add::execute_link(ctx, &link).await),
		Commands::AddUrl { url } => finish(ctx, name, add::execute(ctx, name, Command::AddTorrentFromUrl { url }).await),
		Commands::AddMagnet { uri } => {
			finish(ctx, name, add::execute(ctx, name, Command::AddTorrentFromMagnet { url: uri }).await)
		}
		Commands::Torrent { action } => finish(ctx, name, torrent::execute(ctx, action).await),
		Commands::Version => finish(ctx, name, version::execute(ctx).await),
		Commands::Options => finish(ctx, name, options::execute(ctx)),
		Commands::Config {
			action: ConfigAction::Show,
		} => finish(ctx, name, config::show(ctx)),
	}
}

fn finish<T: Serialize>(ctx: &CommandContext, name: &str, outcome: Result<CommandResult<T>>) -> bool {
	match outcome {
		Ok(result) => {
			print_result(&result, ctx.format());
			result.ok
		}
		Err(err) => {
			warn!(target = "siphon_cli", command = name, error = %err, "command failed");
			let result: CommandResult<()> = ResultBuilder::new(name)
				.command_error(err.to_command_error())
				.config(ctx.effective_config())
				.build();
			print_result(&result, ctx.format());
			false
		}
	}
}

/// Turns a workflow reply into an envelope; error replies become failures.
fn response_result(name: &str, inputs: CommandInputs, response: CommandResponse) -> Result<CommandResult<Value>> {
	if response.is_success() {
		Ok(ResultBuilder::new(name)
			.inputs(inputs)
			.data(response.result.unwrap_or(Value::Null))
			.build())
	} else {
		Err(CliError::CommandFailed(
			response.error.unwrap_or_else(|| "command failed".to_string()),
		))
	}
}
