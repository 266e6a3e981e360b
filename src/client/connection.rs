//! Connection lifecycle handle

use std::time::Duration;

use rumqttc::AsyncClient;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::error::BridgeError;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// MQTT connection handle for lifecycle management
///
/// Owns the client and the event loop task. Keep it alive for as long
/// as the bridge should run, then call [`shutdown`](Self::shutdown).
pub struct MqttConnection {
	client: AsyncClient,
	event_loop_handle: Option<JoinHandle<()>>,
}

impl MqttConnection {
	pub(crate) fn new(
		client: AsyncClient,
		event_loop_handle: JoinHandle<()>,
	) -> Self {
		Self {
			client,
			event_loop_handle: Some(event_loop_handle),
		}
	}

	/// `true` while the event loop task is still running
	pub fn is_running(&self) -> bool {
		self.event_loop_handle
			.as_ref()
			.is_some_and(|handle| !handle.is_finished())
	}

	/// Gracefully shutdown the MQTT connection by:
	/// 1. Sending MQTT Disconnect packet (triggers event loop termination)
	/// 2. Waiting for the event loop to finish, aborting it if the broker
	///    is unreachable and the Disconnect cannot go out
	pub async fn shutdown(mut self) -> Result<(), BridgeError> {
		let disconnect = self.client.disconnect().await;
		if let Err(e) = &disconnect {
			warn!(error = %e, "Failed to disconnect MQTT client");
		}

		if let Some(mut handle) = self.event_loop_handle.take() {
			match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut handle).await {
				| Ok(Ok(())) => {}
				| Ok(Err(e)) => warn!(error = %e, "Event loop task failed"),
				| Err(_) => {
					warn!(
						timeout = ?SHUTDOWN_TIMEOUT,
						"Event loop did not stop in time, aborting"
					);
					handle.abort();
				}
			}
		}

		info!("Disconnected from MQTT broker");
		disconnect.map_err(BridgeError::from)
	}
}

impl Drop for MqttConnection {
	fn drop(&mut self) {
		if let Some(handle) = self.event_loop_handle.take() {
			error!(
				"MqttConnection dropped without calling shutdown(). Please \
				 call shutdown() and await its completion before dropping."
			);
			handle.abort();
		}
	}
}
