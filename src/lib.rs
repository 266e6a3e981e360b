//! # MQTT Sensor Bridge
//!
//! Subscribes to configured MQTT topic patterns, turns each incoming
//! sensor message into a reading and posts it to an HTTP collection
//! endpoint.
//!
//! ## Routing
//!
//! Each configured [`TopicRule`] carries a topic pattern that may use the
//! MQTT wildcards:
//!
//! - `+` matches a single topic level (e.g. `home/+/reading`)
//! - `#` matches its own level and everything after it (e.g. `home/#`),
//!   including nothing, so `home/#` matches `home`
//!
//! A topic equal to a configured pattern always resolves to that rule.
//! Otherwise the first configured rule whose pattern matches wins.
//!
//! ## Dispatch
//!
//! ```rust,no_run
//! use std::time::Duration;
//!
//! use mqtt_sensor_bridge::{ApiClient, Dispatcher, TopicRule};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let api = ApiClient::new(
//!         "http://localhost:8080/api/sensor-data",
//!         Duration::from_secs(10),
//!     )?;
//!     let dispatcher =
//!         Dispatcher::new([TopicRule::new("home/+/reading", true)], api);
//!
//!     // Decoded, routed and forwarded; failures are logged, never returned
//!     dispatcher
//!         .handle_message(
//!             "home/kitchen/reading",
//!             br#"{"sensorId":"kitchen-01","value":21.5}"#,
//!         )
//!         .await;
//!     Ok(())
//! }
//! ```
//!
//! Messages are dropped, never retried, when the payload is not valid
//! JSON, no rule matches, the rule does not take the sensor ID from the
//! payload, the payload has no `sensorId`, or the endpoint call fails.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod forwarder;
pub mod rules;
pub mod telemetry;
pub mod topic;

pub use client::{BridgeClientConfig, BridgeError, MqttBridge, MqttConnection};
pub use config::{BridgeConfig, ConfigError};
pub use dispatch::{DispatchError, Dispatcher, SensorPayload, SensorReading};
pub use forwarder::{ApiClient, ForwardError, Forwarder};
pub use rules::{RuleIndex, TopicRule};
pub use topic::{TopicPattern, matches};
