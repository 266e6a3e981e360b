//! Configured MQTT topic patterns

use std::fmt;

use arcstr::{ArcStr, Substr};
use thiserror::Error;

use super::topic_matcher::{
	MULTI_LEVEL_WILDCARD, SINGLE_LEVEL_WILDCARD, match_segments,
};
use super::topic_path::{TopicPath, split_segments};

/// Diagnostics for topic patterns that a broker would refuse or
/// interpret differently than the matcher does.
///
/// These never reject a rule. Malformed patterns are kept and simply
/// match nothing, or match too much.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TopicPatternError {
	/// Empty topic is not valid
	#[error("Topic pattern cannot be empty")]
	EmptyPattern,

	/// Hash wildcard (#) used not at the end of the pattern
	#[error(
		"Invalid topic pattern '{pattern}': # wildcard can only be the last \
		 segment"
	)]
	HashPosition {
		/// The offending pattern
		pattern: String,
	},

	/// Wildcard character mixed with other characters in one segment
	#[error(
		"Invalid wildcard usage in segment '{segment}' at position \
		 {position}"
	)]
	WildcardUsage {
		/// The offending segment
		segment: String,
		/// Zero-based segment index
		position: usize,
	},
}

impl TopicPatternError {
	/// Creates a new HashPosition error
	pub fn hash_position(pattern: impl Into<String>) -> Self {
		Self::HashPosition {
			pattern: pattern.into(),
		}
	}

	/// Creates a new WildcardUsage error
	pub fn wildcard_usage(segment: impl Into<String>, position: usize) -> Self {
		Self::WildcardUsage {
			segment: segment.into(),
			position,
		}
	}
}

/// A topic pattern split once into segments, ready for repeated matching.
#[derive(Debug, Clone)]
pub struct TopicPattern {
	pattern: ArcStr,
	segments: Vec<Substr>,
}

impl TopicPattern {
	pub fn new(pattern: impl Into<ArcStr>) -> Self {
		let pattern = pattern.into();
		let segments = split_segments(&pattern);
		Self { pattern, segments }
	}

	/// Raw pattern string, as configured and as sent to the broker
	pub fn as_str(&self) -> &str {
		&self.pattern
	}

	pub fn pattern(&self) -> ArcStr {
		self.pattern.clone()
	}

	pub fn segments(&self) -> &[Substr] {
		&self.segments
	}

	/// `true` if no segment is a wildcard
	pub fn is_exact(&self) -> bool {
		!self.segments.iter().any(|s| is_wildcard(s))
	}

	pub fn matches(&self, topic: &TopicPath) -> bool {
		match_segments(&self.segments, topic.segments())
	}

	/// Checks the pattern against broker conventions.
	pub fn validate(&self) -> Result<(), TopicPatternError> {
		if self.pattern.trim().is_empty() {
			return Err(TopicPatternError::EmptyPattern);
		}

		let last = self.segments.len() - 1;
		for (position, segment) in self.segments.iter().enumerate() {
			if segment.as_str() == MULTI_LEVEL_WILDCARD && position != last {
				return Err(TopicPatternError::hash_position(
					self.pattern.as_str(),
				));
			}
			if !is_wildcard(segment)
				&& (segment.contains(SINGLE_LEVEL_WILDCARD)
					|| segment.contains(MULTI_LEVEL_WILDCARD))
			{
				return Err(TopicPatternError::wildcard_usage(
					segment.as_str(),
					position,
				));
			}
		}
		Ok(())
	}
}

impl From<&str> for TopicPattern {
	fn from(pattern: &str) -> Self {
		Self::new(pattern)
	}
}

impl fmt::Display for TopicPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.pattern)
	}
}

fn is_wildcard(segment: &Substr) -> bool {
	segment.as_str() == SINGLE_LEVEL_WILDCARD
		|| segment.as_str() == MULTI_LEVEL_WILDCARD
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_valid_patterns() {
		for pattern in ["sensors/temp", "sensors/+/temp", "sensors/#", "#", "+"]
		{
			assert_eq!(TopicPattern::new(pattern).validate(), Ok(()));
		}
	}

	#[test]
	fn test_empty_pattern() {
		assert_eq!(
			TopicPattern::new("").validate(),
			Err(TopicPatternError::EmptyPattern)
		);
		assert_eq!(
			TopicPattern::new("   ").validate(),
			Err(TopicPatternError::EmptyPattern)
		);
	}

	#[test]
	fn test_hash_not_last() {
		assert_eq!(
			TopicPattern::new("sensors/#/temp").validate(),
			Err(TopicPatternError::hash_position("sensors/#/temp"))
		);
	}

	#[test]
	fn test_wildcard_inside_segment() {
		assert_eq!(
			TopicPattern::new("sensors/temp+").validate(),
			Err(TopicPatternError::wildcard_usage("temp+", 1))
		);
		assert_eq!(
			TopicPattern::new("a#/b").validate(),
			Err(TopicPatternError::wildcard_usage("a#", 0))
		);
	}

	#[test]
	fn test_is_exact() {
		assert!(TopicPattern::new("home/kitchen/reading").is_exact());
		assert!(!TopicPattern::new("home/+/reading").is_exact());
		assert!(!TopicPattern::new("home/#").is_exact());
	}

	#[test]
	fn test_malformed_hash_still_matches_broadly() {
		// '#' short-circuits matching even when it is not the last segment
		let pattern = TopicPattern::new("a/#/c");
		assert!(pattern.matches(&TopicPath::new("a/x/y/z")));
		assert!(pattern.matches(&TopicPath::new("a")));
		assert!(!pattern.matches(&TopicPath::new("b/x/c")));
	}
}
