//! Logging setup.
//!
//! Records go through the `log` facade into `tui-logger`, which buffers them
//! so the interface can show them in its log pane instead of writing over the
//! terminal.

use anyhow::{Result, anyhow};
use log::LevelFilter;

/// Install the in-memory logger. Call once, before the first log record.
pub fn initialize(level: LevelFilter) -> Result<()> {
	tui_logger::init_logger(level).map_err(|err| anyhow!("failed to install logger: {err}"))?;
	tui_logger::set_default_level(level);
	Ok(())
}

/// Move freshly recorded events into the buffer the log widget reads from.
pub fn pump() {
	tui_logger::move_events();
}

/// Parse a level name such as `info` or `DEBUG`.
pub fn parse_level(value: &str) -> Result<LevelFilter> {
	value
		.trim()
		.parse::<LevelFilter>()
		.map_err(|_| anyhow!("unknown log level '{value}' (expected off, error, warn, info, debug or trace)"))
}
