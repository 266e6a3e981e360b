//! Routing rules
//!
//! Configured topic rules and the read-only index the dispatcher resolves
//! incoming topics against.

pub mod rule_index;
pub mod topic_rule;

pub use rule_index::RuleIndex;
pub use topic_rule::TopicRule;
