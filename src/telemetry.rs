//! Logging setup

use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingSettings};

/// Install the global tracing subscriber.
///
/// Priority (first match wins):
/// 1. `RUST_LOG` if set and valid
/// 2. The configured level
/// 3. `info`, with a warning once logging is up
pub fn init(settings: &LoggingSettings) {
	let (filter, invalid_level) = build_filter(&settings.level);
	let registry = tracing_subscriber::registry().with(filter);

	match settings.format {
		| LogFormat::Text => registry
			.with(
				tracing_subscriber::fmt::layer()
					.with_target(true)
					.with_thread_ids(false)
					.with_file(false)
					.with_line_number(false)
					.compact(),
			)
			.init(),
		| LogFormat::Json => registry
			.with(
				tracing_subscriber::fmt::layer()
					.json()
					.with_current_span(false)
					.flatten_event(true),
			)
			.init(),
	}

	if invalid_level {
		warn!(level = %settings.level, "Invalid log level, using info");
	}
}

/// Returns the filter and whether the configured level had to be replaced
fn build_filter(level: &str) -> (EnvFilter, bool) {
	if let Ok(filter) = EnvFilter::try_from_default_env() {
		return (filter, false);
	}
	match parse_level(level) {
		| Some(level) => {
			(EnvFilter::default().add_directive(level.into()), false)
		}
		| None => (
			EnvFilter::default().add_directive(LevelFilter::INFO.into()),
			true,
		),
	}
}

/// Accepts tracing level names plus the `warning`, `fatal` and `panic`
/// spellings common in other loggers' configs
fn parse_level(level: &str) -> Option<LevelFilter> {
	let level = level.trim();
	if let Ok(level) = level.parse::<LevelFilter>() {
		return Some(level);
	}
	match level.to_ascii_lowercase().as_str() {
		| "warning" => Some(LevelFilter::WARN),
		| "fatal" | "panic" | "critical" => Some(LevelFilter::ERROR),
		| _ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_configured_level_used() {
		if std::env::var_os("RUST_LOG").is_some() {
			return;
		}
		let (filter, invalid) = build_filter("debug");
		assert!(!invalid);
		assert_eq!(filter.to_string(), "debug");

		let (filter, invalid) = build_filter(" WARN ");
		assert!(!invalid);
		assert_eq!(filter.to_string(), "warn");
	}

	#[test]
	fn test_foreign_level_names_mapped() {
		assert_eq!(parse_level("warning"), Some(LevelFilter::WARN));
		assert_eq!(parse_level("Fatal"), Some(LevelFilter::ERROR));
		assert_eq!(parse_level("panic"), Some(LevelFilter::ERROR));
		assert_eq!(parse_level("trace"), Some(LevelFilter::TRACE));
		assert_eq!(parse_level("loud"), None);
	}

	#[test]
	fn test_invalid_level_falls_back() {
		if std::env::var_os("RUST_LOG").is_some() {
			return;
		}
		let (filter, invalid) = build_filter("loud");
		assert!(invalid);
		assert_eq!(filter.to_string(), "info");
	}
}
