use chrono::Utc;
use tracing::{debug, error, info, warn};

use super::error::DispatchError;
use super::payload::{SensorPayload, SensorReading};
use crate::forwarder::Forwarder;
use crate::rules::{RuleIndex, TopicRule};

/// Routes inbound messages to the forwarder.
///
/// Holds only the read-only rule index and the forwarder, so
/// `handle_message` can run concurrently from any number of tasks.
/// Messages are handled one at a time per call with no queue, no retry
/// and no timeout of its own; the forwarder's timeout applies.
#[derive(Debug)]
pub struct Dispatcher<F> {
	rules: RuleIndex,
	forwarder: F,
}

impl<F: Forwarder> Dispatcher<F> {
	pub fn new(rules: impl IntoIterator<Item = TopicRule>, forwarder: F) -> Self {
		Self::with_index(RuleIndex::new(rules), forwarder)
	}

	pub fn with_index(rules: RuleIndex, forwarder: F) -> Self {
		Self { rules, forwarder }
	}

	pub fn rules(&self) -> &RuleIndex {
		&self.rules
	}

	pub fn forwarder(&self) -> &F {
		&self.forwarder
	}

	pub fn resolve(&self, topic: &str) -> Option<&TopicRule> {
		self.rules.resolve(topic)
	}

	/// Handles one broker message and logs the outcome.
	///
	/// Never fails: decode, routing, policy and forwarding errors are
	/// logged and the message is dropped.
	pub async fn handle_message(&self, topic: &str, payload: &[u8]) {
		debug!(topic, payload_size = payload.len(), "Received MQTT message");

		match self.process(topic, payload).await {
			| Ok(reading) => {
				info!(
					topic,
					sensor_id = %reading.sensor_id,
					value = reading.value,
					timestamp = reading.timestamp_millis,
					"Successfully forwarded sensor data to API"
				);
			}
			| Err(err @ DispatchError::Decode(_)) => {
				error!(
					topic,
					kind = err.kind(),
					payload = %String::from_utf8_lossy(payload),
					error = %err,
					"Dropping message"
				);
			}
			| Err(
				err @ (DispatchError::NoRule { .. }
				| DispatchError::SensorIdFromPayloadDisabled { .. }),
			) => {
				warn!(topic, kind = err.kind(), error = %err, "Dropping message");
			}
			| Err(err @ DispatchError::MissingSensorId { .. }) => {
				error!(topic, kind = err.kind(), error = %err, "Dropping message");
			}
			| Err(DispatchError::Forward { sensor_id, source }) => {
				error!(
					topic,
					kind = "forward",
					sensor_id = %sensor_id,
					timeout = source.is_timeout(),
					error = %source,
					"Failed to send data to API"
				);
			}
		}
	}

	/// Runs the dispatch pipeline for one message and reports why it was
	/// dropped, or the reading that was forwarded.
	///
	/// The payload is decoded before the topic is resolved, so a
	/// malformed message on an unrouted topic is a decode failure.
	pub async fn process(
		&self,
		topic: &str,
		payload: &[u8],
	) -> Result<SensorReading, DispatchError> {
		let payload = SensorPayload::from_slice(payload)?;

		let rule = self.resolve(topic).ok_or_else(|| DispatchError::NoRule {
			topic: topic.to_string(),
		})?;

		let reading = reading_for_rule(topic, rule, payload)?;

		debug!(
			topic,
			sensor_id = %reading.sensor_id,
			value = reading.value,
			timestamp = reading.timestamp_millis,
			"Processing sensor data"
		);

		self.forwarder.send(&reading).await.map_err(|source| {
			DispatchError::Forward {
				sensor_id: reading.sensor_id.clone(),
				source,
			}
		})?;

		Ok(reading)
	}
}

/// Applies the rule's sensor identity policy and the timestamp default
fn reading_for_rule(
	topic: &str,
	rule: &TopicRule,
	payload: SensorPayload,
) -> Result<SensorReading, DispatchError> {
	if !rule.sensor_id_from_payload {
		return Err(DispatchError::SensorIdFromPayloadDisabled {
			topic: topic.to_string(),
			pattern: rule.mqtt_topic.clone(),
		});
	}
	if payload.sensor_id.is_empty() {
		return Err(DispatchError::MissingSensorId {
			topic: topic.to_string(),
			pattern: rule.mqtt_topic.clone(),
		});
	}

	let timestamp_millis = match payload.timestamp {
		| 0 => Utc::now().timestamp_millis(),
		| timestamp => timestamp,
	};

	Ok(SensorReading {
		sensor_id: payload.sensor_id,
		value: payload.value,
		timestamp_millis,
	})
}
