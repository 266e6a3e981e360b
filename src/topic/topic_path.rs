use std::fmt;

use arcstr::{ArcStr, Substr};

use super::topic_matcher::SEGMENT_SEPARATOR;

/// A concrete topic split into its `/`-delimited segments.
///
/// The split is a plain delimiter split, not a path normalization:
/// `""` is a single empty segment and `"a//b"` has three segments.
/// Segments are slices of the shared topic string.
#[derive(Debug, Clone)]
pub struct TopicPath {
	path: ArcStr,
	segments: Vec<Substr>,
}

impl TopicPath {
	pub fn new(path: impl Into<ArcStr>) -> Self {
		let path = path.into();
		let segments = split_segments(&path);
		Self { path, segments }
	}

	pub fn as_str(&self) -> &str {
		&self.path
	}

	pub fn path(&self) -> ArcStr {
		self.path.clone()
	}

	pub fn segments(&self) -> &[Substr] {
		&self.segments
	}
}

impl From<&str> for TopicPath {
	fn from(path: &str) -> Self {
		Self::new(path)
	}
}

impl fmt::Display for TopicPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.path)
	}
}

pub(crate) fn split_segments(path: &ArcStr) -> Vec<Substr> {
	path.split(SEGMENT_SEPARATOR)
		.map(|s| path.substr_from(s))
		.collect()
}
