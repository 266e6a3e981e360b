//! Sensor message wire format

use serde::{Deserialize, Deserializer, Serialize};

/// Body of an inbound sensor message.
///
/// Only `value` is required. Unknown fields are ignored, and an explicit
/// `null` on an optional field reads the same as a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SensorPayload {
	#[serde(default, deserialize_with = "null_as_default")]
	pub sensor_id: String,
	pub value: f64,
	/// Epoch milliseconds, 0 when absent
	#[serde(default, deserialize_with = "null_as_default")]
	pub timestamp: i64,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl SensorPayload {
	pub fn from_slice(bytes: &[u8]) -> Result<Self, serde_json::Error> {
		serde_json::from_slice(bytes)
	}
}

/// A reading resolved to a sensor and ready to forward.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
	/// Never empty
	pub sensor_id: String,
	pub value: f64,
	pub timestamp_millis: i64,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_decode_full_payload() {
		let payload = SensorPayload::from_slice(
			br#"{"sensorId":"kitchen-01","value":21.5,"timestamp":1700000000000}"#,
		)
		.unwrap();
		assert_eq!(payload, SensorPayload {
			sensor_id: "kitchen-01".to_string(),
			value: 21.5,
			timestamp: 1_700_000_000_000,
		});
	}

	#[test]
	fn test_optional_fields_default() {
		let payload = SensorPayload::from_slice(br#"{"value":3}"#).unwrap();
		assert_eq!(payload.sensor_id, "");
		assert_eq!(payload.value, 3.0);
		assert_eq!(payload.timestamp, 0);
	}

	#[test]
	fn test_null_optional_fields_default() {
		let payload = SensorPayload::from_slice(
			br#"{"sensorId":"k","value":1,"timestamp":null}"#,
		)
		.unwrap();
		assert_eq!(payload.sensor_id, "k");
		assert_eq!(payload.timestamp, 0);

		let payload =
			SensorPayload::from_slice(br#"{"sensorId":null,"value":1}"#).unwrap();
		assert_eq!(payload.sensor_id, "");
		assert_eq!(payload.value, 1.0);
	}

	#[test]
	fn test_wrong_type_on_optional_field_fails() {
		assert!(
			SensorPayload::from_slice(br#"{"sensorId":7,"value":1}"#).is_err()
		);
		assert!(
			SensorPayload::from_slice(br#"{"value":1,"timestamp":"now"}"#)
				.is_err()
		);
	}

	#[test]
	fn test_unknown_fields_ignored() {
		let payload = SensorPayload::from_slice(
			br#"{"value":1.25,"unit":"C","rssi":-70,"sensorId":"x"}"#,
		)
		.unwrap();
		assert_eq!(payload.value, 1.25);
		assert_eq!(payload.sensor_id, "x");
	}

	#[test]
	fn test_missing_value_fails() {
		assert!(SensorPayload::from_slice(br#"{"sensorId":"x"}"#).is_err());
	}

	#[test]
	fn test_malformed_payloads_fail() {
		let payloads: [&[u8]; 5] = [
			b"not json",
			b"",
			br#"{"value":"hot"}"#,
			br#"{"value":null}"#,
			br#"[1,2,3]"#,
		];
		for bytes in payloads {
			assert!(
				SensorPayload::from_slice(bytes).is_err(),
				"payload {:?} should not decode",
				String::from_utf8_lossy(bytes)
			);
		}
	}
}
