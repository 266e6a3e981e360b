//! Human-readable durations for configuration values.
//!
//! Accepts a bare number of seconds (`10`) or a number with a unit
//! suffix: `ms`, `s`, `m` or `h` (`"500ms"`, `"10s"`, `"1m"`).

use std::time::Duration;

use serde::de::{self, Deserializer, Visitor};

pub fn parse(value: &str) -> Option<Duration> {
	let value = value.trim();
	let split = value
		.find(|c: char| !c.is_ascii_digit() && c != '.')
		.unwrap_or(value.len());
	let (number, unit) = value.split_at(split);
	let number: f64 = number.parse().ok()?;
	let seconds = match unit.trim() {
		| "ms" => number / 1000.0,
		| "" | "s" => number,
		| "m" => number * 60.0,
		| "h" => number * 3600.0,
		| _ => return None,
	};
	Duration::try_from_secs_f64(seconds).ok()
}

pub fn deserialize<'de, D: Deserializer<'de>>(
	deserializer: D,
) -> Result<Duration, D::Error> {
	struct DurationVisitor;

	impl Visitor<'_> for DurationVisitor {
		type Value = Duration;

		fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
			f.write_str("a duration such as 10, \"10s\", \"500ms\" or \"1m\"")
		}

		fn visit_u64<E: de::Error>(self, secs: u64) -> Result<Duration, E> {
			Ok(Duration::from_secs(secs))
		}

		fn visit_i64<E: de::Error>(self, secs: i64) -> Result<Duration, E> {
			u64::try_from(secs)
				.map(Duration::from_secs)
				.map_err(|_| E::custom("duration cannot be negative"))
		}

		fn visit_f64<E: de::Error>(self, secs: f64) -> Result<Duration, E> {
			Duration::try_from_secs_f64(secs).map_err(E::custom)
		}

		fn visit_str<E: de::Error>(self, value: &str) -> Result<Duration, E> {
			parse(value).ok_or_else(|| {
				E::invalid_value(de::Unexpected::Str(value), &self)
			})
		}
	}

	deserializer.deserialize_any(DurationVisitor)
}
