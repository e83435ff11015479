use anyhow::Context;
use clap::Parser;
use siphon_cli::cli::Cli;
use siphon_cli::context::CommandContext;
use siphon_cli::{commands, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let ctx = CommandContext::load(&cli).context("failed to load settings")?;
	logging::init_logging(cli.verbose, ctx.settings().debug_mode);

	if !commands::dispatch(cli.command, &ctx).await {
		std::process::exit(1);
	}
	Ok(())
}
