use serde::Serialize;
use serde_json::Value;

use crate::context::CommandContext;
use crate::error::Result;
use crate::output::{CommandResult, ResultBuilder};

const MASK: &str = "********";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigView {
	pub webui_url: String,
	pub endpoint: String,
	pub settings: Value,
}

pub fn show(ctx: &CommandContext) -> Result<CommandResult<ConfigView>> {
	let settings = ctx.settings();
	let webui_url = settings.webui_url()?.to_string();
	let endpoint = settings.rpc_endpoint()?.to_string();

	let mut value = serde_json::to_value(&settings).map_err(siphon::Error::from)?;
	if let Some(password) = value.get_mut("password") {
		*password = Value::String(MASK.to_string());
	}

	Ok(ResultBuilder::new("config.show")
		.data(ConfigView {
			webui_url,
			endpoint,
			settings: value,
		})
		.config(ctx.effective_config())
		.build())
}
