use rumqttc::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum ConnectionEstablishmentError {
	#[error("Network connection failed: {0}")]
	Network(#[from] rumqttc::ConnectionError),

	#[error("Broker rejected connection: {code:?}")]
	BrokerRejected { code: rumqttc::ConnectReturnCode },

	#[error("Connection establishment timed out after {timeout_millis}ms")]
	Timeout { timeout_millis: u64 },
}

/// Errors that can occur while starting or stopping the bridge
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
	/// Request to the rumqttc event loop failed
	#[error("Client operation failed: {0}")]
	ClientOperation(#[from] ClientError),

	/// Invalid configuration parameter values
	#[error("Invalid configuration value: {0}")]
	ConfigurationValue(String),

	/// Connection establishment failed
	#[error("Failed to establish connection: {0}")]
	ConnectionEstablishment(#[from] ConnectionEstablishmentError),
}
