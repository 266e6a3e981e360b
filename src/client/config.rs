//! Configuration for MQTT client initialization

use std::time::Duration;

use rumqttc::{MqttOptions, OptionError, QoS};

/// Client-level behavior settings
#[derive(Debug, Clone)]
pub struct ClientSettings {
	/// QoS requested for every subscription
	pub qos: QoS,
	/// Capacity of the rumqttc request channel
	pub event_loop_capacity: usize,
	/// How long to wait for the first CONNACK
	pub connection_timeout_millis: u64,
	/// Upper bound of the reconnect backoff
	pub max_reconnect_delay: Duration,
}

impl Default for ClientSettings {
	fn default() -> Self {
		Self {
			qos: QoS::AtMostOnce,
			event_loop_capacity: 10,
			connection_timeout_millis: 10_000,
			max_reconnect_delay: Duration::from_secs(60),
		}
	}
}

/// Configuration for bridge client creation
#[derive(Debug, Clone)]
pub struct BridgeClientConfig {
	/// Underlying MQTT connection options (from rumqttc)
	pub connection: MqttOptions,
	/// Client-level behavior settings
	pub settings: ClientSettings,
}

impl BridgeClientConfig {
	/// Create config with default settings
	pub fn new(client_id: &str, host: &str, port: u16) -> Self {
		Self {
			connection: MqttOptions::new(client_id, host, port),
			settings: ClientSettings::default(),
		}
	}

	/// Parse configuration from an MQTT URL.
	///
	/// Supports `tcp://`, `mqtt://`, `ssl://` and `mqtts://`. The URL
	/// must carry a `client_id` query parameter.
	pub fn from_url(url: &str) -> Result<Self, OptionError> {
		Ok(Self {
			connection: MqttOptions::parse_url(url)?,
			settings: ClientSettings::default(),
		})
	}

	/// Create config for localhost:1883
	pub fn localhost(client_id: &str) -> Self {
		Self::new(client_id, "localhost", 1883)
	}
}
