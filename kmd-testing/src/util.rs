use std::str::FromStr;

use crate::constants::env::TEST_LOG;

fn log_level() -> log::LevelFilter {
	std::env::var(TEST_LOG).ok()
		.and_then(|l| log::LevelFilter::from_str(&l).ok())
		.unwrap_or(log::LevelFilter::Trace)
}

pub fn init_logging() {
	// every test calls this, so we ignore the error it throws on
	// all calls after the first
	let _ = fern::Dispatch::new()
		.format(|out, msg, rec| {
			let now = chrono::Local::now();
			let stamp = now.format("%H:%M:%S.%3f");
			out.finish(format_args!("[{} {: >5}] {}", stamp, rec.level(), msg))
		})
		.level(log_level())
		.level_for("jsonrpc", log::LevelFilter::Warn)
		.chain(std::io::stdout())
		.apply();
}
