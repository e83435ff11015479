use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "siphon")]
#[command(about = "Siphon - drive a Deluge WebUI from the command line")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	/// Output format
	#[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Toon)]
	pub format: OutputFormat,

	/// Settings file (defaults to the user config dir)
	#[arg(long, global = true, value_name = "FILE")]
	pub settings: Option<PathBuf>,

	/// WebUI address, overriding the settings file (e.g. http://nas:8112/deluge)
	#[arg(long, global = true, value_name = "URL")]
	pub address: Option<String>,

	/// WebUI password, overriding the settings file
	#[arg(long, global = true)]
	pub password: Option<String>,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Check the WebUI session once, logging in and connecting as needed
	Status {
		/// Timeout for the connectivity probe (ms)
		#[arg(long)]
		timeout_ms: Option<u64>,
	},

	/// Keep polling and print every activation change
	Watch {
		/// Stop after this many notifications
		#[arg(long)]
		count: Option<usize>,
	},

	/// Add a torrent link, choosing URL or magnet handling from its shape
	Add { link: String },

	/// Add a remote .torrent by URL
	AddUrl { url: String },

	/// Add a magnet URI
	AddMagnet { uri: String },

	/// Control torrents already in the daemon
	Torrent {
		#[command(subcommand)]
		action: TorrentAction,
	},

	/// Show the daemon version
	Version,

	/// Show which link kinds this client intercepts
	Options,

	/// Inspect configuration
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

impl Commands {
	/// Name used in the result envelope.
	pub fn name(&self) -> &'static str {
		match self {
			Commands::Status { .. } => "status",
			Commands::Watch { .. } => "watch",
			Commands::Add { .. } => "add",
			Commands::AddUrl { .. } => "add-url",
			Commands::AddMagnet { .. } => "add-magnet",
			Commands::Torrent { action } => action.name(),
			Commands::Version => "version",
			Commands::Options => "options",
			Commands::Config { action } => match action {
				ConfigAction::Show => "config.show",
			},
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum TorrentAction {
	/// Pause torrents
	Pause {
		#[arg(required = true)]
		ids: Vec<String>,
	},
	/// Resume torrents
	Resume {
		#[arg(required = true)]
		ids: Vec<String>,
	},
	/// Resume a paused torrent, pause anything else
	Toggle {
		id: String,
		/// Current state as shown by the daemon (e.g. Paused, Seeding)
		state: String,
	},
	/// Move torrents up the queue
	Up {
		#[arg(required = true)]
		ids: Vec<String>,
	},
	/// Move torrents down the queue
	Down {
		#[arg(required = true)]
		ids: Vec<String>,
	},
	/// Remove a torrent
	Remove {
		id: String,
		/// Delete downloaded data too
		#[arg(long)]
		with_data: bool,
	},
	/// Set whether the daemon manages a torrent's queue position
	Managed {
		id: String,
		#[arg(action = clap::ArgAction::Set)]
		enabled: bool,
	},
}

impl TorrentAction {
	pub fn name(&self) -> &'static str {
		match self {
			TorrentAction::Pause { .. } => "torrent.pause",
			TorrentAction::Resume { .. } => "torrent.resume",
			TorrentAction::Toggle { .. } => "torrent.toggle",
			TorrentAction::Up { .. } => "torrent.up",
			TorrentAction::Down { .. } => "torrent.down",
			TorrentAction::Remove { .. } => "torrent.remove",
			TorrentAction::Managed { .. } => "torrent.managed",
		}
	}
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
	/// Print the effective settings (password masked)
	Show,
}
