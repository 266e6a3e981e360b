use std::collections::HashMap;

use arcstr::ArcStr;
use tracing::warn;

use super::topic_rule::TopicRule;
use crate::topic::{TopicPath, TopicPattern};

#[derive(Debug, Clone)]
struct IndexedRule {
	pattern: TopicPattern,
	rule: TopicRule,
}

/// Two-tier routing table built once from the configured rules.
///
/// An exact-string map answers the common case in one lookup; the
/// ordered rule list is scanned for wildcard matches when it misses.
/// Every map entry points into the list, and the first configured rule
/// wins both on duplicate patterns and among competing wildcards.
#[derive(Debug, Clone, Default)]
pub struct RuleIndex {
	exact: HashMap<ArcStr, usize>,
	ordered: Vec<IndexedRule>,
}

impl RuleIndex {
	/// Builds the index. Never fails: patterns that break broker
	/// conventions are logged and kept as-is.
	pub fn new(rules: impl IntoIterator<Item = TopicRule>) -> Self {
		let mut exact = HashMap::new();
		let mut ordered = Vec::new();

		for (position, rule) in rules.into_iter().enumerate() {
			let pattern = TopicPattern::new(rule.mqtt_topic.as_str());

			if let Err(err) = pattern.validate() {
				warn!(
					pattern = %pattern,
					error = %err,
					"Topic rule pattern is malformed and may match unexpectedly"
				);
			}
			if exact.contains_key(pattern.as_str()) {
				warn!(
					pattern = %pattern,
					position,
					"Duplicate topic rule is shadowed by an earlier rule"
				);
			} else {
				exact.insert(pattern.pattern(), position);
			}

			ordered.push(IndexedRule { pattern, rule });
		}

		Self { exact, ordered }
	}

	/// Finds the rule for a concrete topic.
	///
	/// An exact pattern match takes priority over any wildcard rule,
	/// whatever the configured order. Otherwise the first rule whose
	/// pattern matches wins.
	pub fn resolve(&self, topic: &str) -> Option<&TopicRule> {
		if let Some(&position) = self.exact.get(topic) {
			return Some(&self.ordered[position].rule);
		}

		let topic = TopicPath::new(topic);
		self.ordered
			.iter()
			.find(|indexed| indexed.pattern.matches(&topic))
			.map(|indexed| &indexed.rule)
	}

	/// Raw configured patterns in configured order
	pub fn patterns(&self) -> impl Iterator<Item = ArcStr> + '_ {
		self.ordered.iter().map(|indexed| indexed.pattern.pattern())
	}

	pub fn rules(&self) -> impl Iterator<Item = &TopicRule> {
		self.ordered.iter().map(|indexed| &indexed.rule)
	}

	pub fn len(&self) -> usize {
		self.ordered.len()
	}

	pub fn is_empty(&self) -> bool {
		self.ordered.is_empty()
	}
}

impl FromIterator<TopicRule> for RuleIndex {
	fn from_iter<I: IntoIterator<Item = TopicRule>>(iter: I) -> Self {
		Self::new(iter)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn rule(pattern: &str, description: &str) -> TopicRule {
		TopicRule::new(pattern, true).with_description(description)
	}

	fn resolved_description<'a>(
		index: &'a RuleIndex,
		topic: &str,
	) -> Option<&'a str> {
		index.resolve(topic).map(|rule| rule.description.as_str())
	}

	#[test]
	fn test_exact_match() {
		let index = RuleIndex::new([
			rule("home/kitchen/reading", "kitchen"),
			rule("home/garage/reading", "garage"),
		]);
		assert_eq!(
			resolved_description(&index, "home/garage/reading"),
			Some("garage")
		);
		assert_eq!(resolved_description(&index, "home/attic/reading"), None);
	}

	#[test]
	fn test_exact_match_beats_earlier_wildcard() {
		let index = RuleIndex::new([
			rule("home/#", "catch-all"),
			rule("home/+/reading", "per-room"),
			rule("home/kitchen/reading", "kitchen"),
		]);
		assert_eq!(
			resolved_description(&index, "home/kitchen/reading"),
			Some("kitchen")
		);
	}

	#[test]
	fn test_first_matching_wildcard_wins() {
		let index = RuleIndex::new([
			rule("home/+/reading", "per-room"),
			rule("home/#", "catch-all"),
		]);
		assert_eq!(
			resolved_description(&index, "home/office/reading"),
			Some("per-room")
		);
		assert_eq!(
			resolved_description(&index, "home/office/status"),
			Some("catch-all")
		);

		let reversed = RuleIndex::new([
			rule("home/#", "catch-all"),
			rule("home/+/reading", "per-room"),
		]);
		assert_eq!(
			resolved_description(&reversed, "home/office/reading"),
			Some("catch-all")
		);
	}

	#[test]
	fn test_no_rule() {
		let index = RuleIndex::new([rule("home/+/reading", "per-room")]);
		assert_eq!(resolved_description(&index, "office/reading"), None);
		assert_eq!(resolved_description(&index, "home/reading"), None);
	}

	#[test]
	fn test_duplicate_pattern_keeps_first() {
		let index = RuleIndex::new([
			rule("home/kitchen/reading", "first"),
			rule("home/kitchen/reading", "second"),
		]);
		assert_eq!(index.len(), 2);
		assert_eq!(
			resolved_description(&index, "home/kitchen/reading"),
			Some("first")
		);
	}

	#[test]
	fn test_malformed_patterns_are_kept() {
		let index = RuleIndex::new([rule("", "empty"), rule("a/#/c", "hash")]);
		assert_eq!(index.len(), 2);
		assert_eq!(resolved_description(&index, ""), Some("empty"));
		assert_eq!(resolved_description(&index, "a/b"), Some("hash"));
	}

	#[test]
	fn test_patterns_in_configured_order() {
		let index: RuleIndex = ["c/#", "a/+", "b"]
			.into_iter()
			.map(|p| rule(p, ""))
			.collect();
		let patterns: Vec<String> =
			index.patterns().map(|p| p.to_string()).collect();
		assert_eq!(patterns, vec!["c/#", "a/+", "b"]);
	}
}
