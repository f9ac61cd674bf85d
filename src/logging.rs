#![cfg(feature = "std")]

use log::{self, LevelFilter, Metadata, Record};
use std::env;

/// Environment variable holding the log level (`error` .. `trace`).
pub const LOG_ENV: &str = "SEABATTLE_LOG";

struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{} {}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Initialize logging with a level taken from `SEABATTLE_LOG`.
/// Defaults to `info` if the variable is not set or invalid. Logs go to
/// stderr so they never interleave with the rendered boards on stdout.
pub fn init_logging() {
    let level = env::var(LOG_ENV)
        .ok()
        .and_then(|lvl| lvl.parse().ok())
        .unwrap_or(LevelFilter::Info);
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
