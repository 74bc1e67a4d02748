//! Process-wide logging bootstrap.
//!
//! Logs go to stderr through `flexi_logger`; the rest of the crate only
//! touches the `log` facade. Messages use `event=<name> key=value` pairs.

use std::sync::OnceLock;

use anyhow::{Result, anyhow};
use flexi_logger::{Logger, LoggerHandle};
use log::info;

static LOGGING_STATE: OnceLock<LoggingState> = OnceLock::new();

struct LoggingState {
    level: &'static str,
    _logger: LoggerHandle,
}

/// Starts the stderr logger at `level`.
///
/// Calling again with the same level is a no-op; a different level is
/// rejected since the backend cannot be swapped once started.
pub fn init_logging(level: &str) -> Result<()> {
    let level = normalize_level(level)?;

    if let Some(state) = LOGGING_STATE.get() {
        return ensure_same_level(state.level, level);
    }

    let logger = Logger::try_with_str(level)
        .map_err(|error| anyhow!("invalid log level `{level}`: {error}"))?
        .log_to_stderr()
        .format(flexi_logger::colored_default_format)
        .start()
        .map_err(|error| anyhow!("failed to start logger: {error}"))?;

    let state = LOGGING_STATE.get_or_init(|| LoggingState {
        level,
        _logger: logger,
    });
    ensure_same_level(state.level, level)?;

    info!(
        "event=app_start status=ok platform={} version={} level={}",
        std::env::consts::OS,
        env!("CARGO_PKG_VERSION"),
        level
    );
    Ok(())
}

pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn ensure_same_level(active: &str, requested: &str) -> Result<()> {
    if active == requested {
        Ok(())
    } else {
        Err(anyhow!(
            "logging already initialized with level `{active}`; refusing to switch to `{requested}`"
        ))
    }
}

fn normalize_level(level: &str) -> Result<&'static str> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(anyhow!(
            "unsupported log level `{other}`; expected trace|debug|info|warn|error"
        )),
    }
}
