use std::io;

use tracing_subscriber::{filter::LevelFilter, EnvFilter};

/// Sends log output to stderr. `RUST_LOG` overrides the default level.
pub(crate) fn init(verbose: bool) {
	let default_level = match verbose {
		true => LevelFilter::DEBUG,
		false => LevelFilter::WARN,
	};

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::builder()
			.with_default_directive(default_level.into())
			.from_env_lossy())
		.with_writer(io::stderr)
		.init();
}
