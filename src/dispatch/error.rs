use thiserror::Error;

use crate::forwarder::ForwardError;

/// Reasons a message is dropped instead of forwarded
#[derive(Debug, Error)]
pub enum DispatchError {
	/// Payload is not a valid sensor message
	#[error("Failed to parse JSON payload: {0}")]
	Decode(#[from] serde_json::Error),

	/// Topic matches no configured rule
	#[error("No mapping found for topic: {topic}")]
	NoRule { topic: String },

	/// Rule found, but it does not take the sensor ID from the payload
	#[error(
		"Topic '{topic}' matched rule '{pattern}' but sensor_id_from_payload \
		 is not enabled"
	)]
	SensorIdFromPayloadDisabled { topic: String, pattern: String },

	/// Rule takes the sensor ID from the payload, but the payload has none
	#[error(
		"sensorId not found in payload for topic '{topic}' (rule '{pattern}')"
	)]
	MissingSensorId { topic: String, pattern: String },

	/// Forwarder reported a failure
	#[error("Failed to forward reading for sensor '{sensor_id}': {source}")]
	Forward {
		sensor_id: String,
		#[source]
		source: ForwardError,
	},
}

impl DispatchError {
	/// Short machine-friendly category, used as a log field
	pub fn kind(&self) -> &'static str {
		match self {
			| Self::Decode(_) => "decode",
			| Self::NoRule { .. } => "no_rule",
			| Self::SensorIdFromPayloadDisabled { .. } => "policy_rejected",
			| Self::MissingSensorId { .. } => "missing_sensor_id",
			| Self::Forward { .. } => "forward",
		}
	}
}
