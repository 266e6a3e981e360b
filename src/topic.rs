//! Topic handling module
//!
//! Splitting concrete MQTT topics and configured topic patterns into
//! segments, and deciding whether a pattern matches a topic.

pub mod topic_matcher;
pub mod topic_path;
/// Configured topic patterns and their diagnostics
pub mod topic_pattern;


pub use topic_matcher::{MULTI_LEVEL_WILDCARD, SINGLE_LEVEL_WILDCARD, matches};
pub use topic_path::TopicPath;
pub use topic_pattern::{TopicPattern, TopicPatternError};
