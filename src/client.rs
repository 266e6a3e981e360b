//! MQTT client module
//!
//! Connects to the broker, keeps the configured subscriptions alive
//! across reconnects and feeds every inbound message to the dispatcher.

/// Broker connection and event loop
pub mod bridge;
pub mod config;
/// Client error types
pub mod error;
pub mod connection;

pub use bridge::MqttBridge;
pub use config::{BridgeClientConfig, ClientSettings};
pub use connection::MqttConnection;
pub use error::{BridgeError, ConnectionEstablishmentError};
