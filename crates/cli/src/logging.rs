use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

/// Installs the stderr subscriber.
///
/// `-v` enables info, `-vv` debug, `-vvv` trace. `debug_mode` from the
/// settings file raises the floor to debug. `RUST_LOG` overrides both.
pub fn init_logging(verbose: u8, debug_mode: bool) {
	let floor = if debug_mode { 2 } else { 0 };
	let level = match verbose.max(floor) {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(format!("siphon={level},siphon_cli={level},warn")));

	let _ = fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_target(true)
		.try_init();
}
