//! Segment-by-segment topic matching with MQTT wildcards.

use arcstr::Substr;

use super::topic_path::TopicPath;
use super::topic_pattern::TopicPattern;

/// Delimiter between topic levels
pub const SEGMENT_SEPARATOR: char = '/';

/// Matches exactly one topic level
pub const SINGLE_LEVEL_WILDCARD: &str = "+";

/// Matches its own level and every level after it, including none
pub const MULTI_LEVEL_WILDCARD: &str = "#";

/// Returns `true` if `topic` matches `pattern`.
///
/// Both strings are split on `/`. Literal segments must be equal
/// (case-sensitive), `+` consumes exactly one topic segment and `#`
/// accepts whatever remains of the topic, including nothing, so
/// `"sensors/#"` matches `"sensors"`. Without `#` the segment counts
/// must be equal.
///
/// ```rust
/// use mqtt_sensor_bridge::topic::matches;
///
/// assert!(matches("sensors/+/temp", "sensors/A1/temp"));
/// assert!(!matches("sensors/+/temp", "sensors/A1/B2/temp"));
/// assert!(matches("sensors/#", "sensors"));
/// ```
pub fn matches(pattern: &str, topic: &str) -> bool {
	TopicPattern::new(pattern).matches(&TopicPath::new(topic))
}

/// Recursively walks pattern and topic segments in lockstep
pub(crate) fn match_segments(pattern: &[Substr], topic: &[Substr]) -> bool {
	match (pattern, topic) {
		// '#' matches the remainder of the topic, however short
		| ([wildcard, ..], _) if wildcard.as_str() == MULTI_LEVEL_WILDCARD => {
			true
		}
		| ([], []) => true,
		// One side ran out first: segment counts differ
		| ([], _) | (_, []) => false,
		| (
			[expected, remaining_pattern @ ..],
			[segment, remaining_topic @ ..],
		) => {
			(expected.as_str() == SINGLE_LEVEL_WILDCARD || expected == segment)
				&& match_segments(remaining_pattern, remaining_topic)
		}
	}
}
