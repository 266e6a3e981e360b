use serde::{Deserialize, Serialize};

/// One configured routing rule.
///
/// A rule without `sensor_id_from_payload` is configured but inert:
/// messages resolved to it are rejected rather than forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
	/// Topic pattern, may contain `+` and `#` segments
	pub mqtt_topic: String,
	/// Take the sensor identifier from the payload's `sensorId` field
	#[serde(default)]
	pub sensor_id_from_payload: bool,
	/// Free text, only used in logs
	#[serde(default)]
	pub description: String,
}

impl TopicRule {
	pub fn new(
		mqtt_topic: impl Into<String>,
		sensor_id_from_payload: bool,
	) -> Self {
		Self {
			mqtt_topic: mqtt_topic.into(),
			sensor_id_from_payload,
			description: String::new(),
		}
	}

	pub fn with_description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}
}
