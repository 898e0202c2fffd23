//! File logging for the journal.
//!
//! The dashboard owns the terminal, so diagnostics never go to stdout or
//! stderr; they are appended to rotating files under `<data-dir>/logs`.
//! Messages use `event=... module=... status=...` key/value pairs.

use std::env;
use std::path::Path;

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;

const LOG_LEVEL_ENV: &str = "DAYBOOK_LOG";
const LOG_FILE_BASENAME: &str = "daybook";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 2 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

/// Starts the file logger. The returned handle must be kept alive for the
/// lifetime of the process, dropping it flushes and stops logging.
pub fn init_logging(log_dir: &Path) -> Result<LoggerHandle, String> {
	let level = match env::var(LOG_LEVEL_ENV) {
		Ok(raw) if !raw.trim().is_empty() => normalize_level(&raw)?,
		_ => default_log_level(),
	};

	std::fs::create_dir_all(log_dir)
		.map_err(|err| format!("failed to create log directory `{}`: {err}", log_dir.display()))?;

	let handle = Logger::try_with_str(level)
		.map_err(|err| format!("invalid log level `{level}`: {err}"))?
		.log_to_file(FileSpec::default().directory(log_dir).basename(LOG_FILE_BASENAME))
		.rotate(
			Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
			Naming::Numbers,
			Cleanup::KeepLogFiles(MAX_LOG_FILES),
		)
		.write_mode(WriteMode::BufferAndFlush)
		.append()
		.format_for_files(flexi_logger::detailed_format)
		.start()
		.map_err(|err| format!("failed to start logger: {err}"))?;

	info!(
		"event=app_start module=core status=ok platform={} version={} level={level}",
		env::consts::OS,
		env!("CARGO_PKG_VERSION")
	);
	Ok(handle)
}

pub fn default_log_level() -> &'static str {
	if cfg!(debug_assertions) {
		"debug"
	} else {
		"info"
	}
}

fn normalize_level(level: &str) -> Result<&'static str, String> {
	match level.trim().to_ascii_lowercase().as_str() {
		"trace" => Ok("trace"),
		"debug" => Ok("debug"),
		"info" => Ok("info"),
		"warn" | "warning" => Ok("warn"),
		"error" => Ok("error"),
		"off" => Ok("off"),
		other => Err(format!(
			"unsupported log level `{other}`; expected trace|debug|info|warn|error|off"
		)),
	}
}

#[cfg(test)]
mod tests {
	use super::normalize_level;

	#[test]
	fn normalize_level_accepts_known_values() {
		assert_eq!(normalize_level("INFO").expect("INFO should normalize"), "info");
		assert_eq!(normalize_level(" warning ").expect("warning should normalize"), "warn");
		assert!(normalize_level("loud").is_err());
	}
}
