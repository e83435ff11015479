use serde_json::Value;
use siphon::TorrentWorkflows;

use super::response_result;
use crate::cli::TorrentAction;
use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandInputs, CommandResult};

pub async fn execute(ctx: &CommandContext, action: TorrentAction) -> Result<CommandResult<Value>> {
	let name = action.name();
	let workflows = TorrentWorkflows::new(ctx.session(None).await?);

	let (ids, response) = match action {
		TorrentAction::Pause { ids } => {
			let response = workflows.pause(&ids).await;
			(ids, response)
		}
		TorrentAction::Resume { ids } => {
			let response = workflows.resume(&ids).await;
			(ids, response)
		}
		TorrentAction::Toggle { id, state } => {
			let response = workflows.toggle_state(&id, &state).await;
			(vec![id], response)
		}
		TorrentAction::Up { ids } => {
			let response = workflows.queue_up(&ids).await;
			(ids, response)
		}
		TorrentAction::Down { ids } => {
			let response = workflows.queue_down(&ids).await;
			(ids, response)
		}
		TorrentAction::Remove { id, with_data } => {
			let response = workflows.remove(&id, with_data).await;
			(vec![id], response)
		}
		TorrentAction::Managed { id, enabled } => {
			let response = workflows.set_auto_managed(&id, enabled).await;
			(vec![id], response)
		}
	};

	let inputs = CommandInputs {
		torrent_ids: ids,
		..Default::default()
	};
	response_result(name, inputs, response)
}
