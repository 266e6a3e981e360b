use std::sync::Arc;
use std::time::Duration;

use rumqttc::Event::{Incoming, Outgoing};
use rumqttc::Packet::{self, Disconnect, Publish};
use rumqttc::{
	AsyncClient, ConnAck, ConnectReturnCode, EventLoop, QoS, SubAck,
	SubscribeFilter, SubscribeReasonCode,
};
use tokio::time;
use tracing::{debug, error, info, warn};

use super::config::BridgeClientConfig;
use super::connection::MqttConnection;
use super::error::{BridgeError, ConnectionEstablishmentError};
use crate::dispatch::Dispatcher;
use crate::forwarder::Forwarder;
use crate::rules::TopicRule;
use crate::topic::TopicPattern;

const INITIAL_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Bridge between the broker and the dispatcher.
///
/// Subscribes to every configured pattern whenever a connection is
/// established and awaits the dispatcher for each inbound message, in
/// receipt order. Reconnection is automatic and never gives up.
///
/// All patterns go out in a single SUBSCRIBE, so the broker's SUBACK
/// return codes line up with `subscriptions` by index.
pub struct MqttBridge<F> {
	dispatcher: Dispatcher<F>,
	subscriptions: Arc<[TopicRule]>,
	qos: QoS,
	max_reconnect_delay: Duration,
}

impl<F: Forwarder> MqttBridge<F> {
	/// Connects to the broker and starts the event loop.
	///
	/// Fails if the broker cannot be reached or rejects the connection
	/// within the configured timeout. After that, connection problems are
	/// retried in the background.
	pub async fn connect(
		config: BridgeClientConfig,
		dispatcher: Dispatcher<F>,
	) -> Result<MqttConnection, BridgeError> {
		if config.settings.event_loop_capacity == 0 {
			return Err(BridgeError::ConfigurationValue(
				"event_loop_capacity must be greater than 0".to_string(),
			));
		}

		let (broker_host, broker_port) = config.connection.broker_address();
		info!(host = %broker_host, port = broker_port, "Connecting to MQTT broker...");

		let (client, new_event_loop) = AsyncClient::new(
			config.connection,
			config.settings.event_loop_capacity,
		);

		let timeout_millis = config.settings.connection_timeout_millis;
		let connection_timeout = Duration::from_millis(timeout_millis);
		let connected_event_loop = time::timeout(
			connection_timeout,
			Self::establish_connection(new_event_loop),
		)
		.await
		.map_err(|_| ConnectionEstablishmentError::Timeout { timeout_millis })??;

		info!("Successfully connected to MQTT broker");

		let bridge = Self {
			subscriptions: subscribable_rules(dispatcher.rules().rules()),
			dispatcher,
			qos: config.settings.qos,
			max_reconnect_delay: config.settings.max_reconnect_delay,
		};
		bridge.spawn_subscribe_all(&client);

		let event_loop_client = client.clone();
		let event_loop_handle = tokio::spawn(async move {
			bridge.run(connected_event_loop, event_loop_client).await;
		});

		Ok(MqttConnection::new(client, event_loop_handle))
	}

	async fn establish_connection(
		mut event_loop: EventLoop,
	) -> Result<EventLoop, ConnectionEstablishmentError> {
		loop {
			match event_loop.poll().await {
				| Ok(Incoming(Packet::ConnAck(ConnAck { code, .. }))) => {
					if code == ConnectReturnCode::Success {
						debug!("MQTT connection established successfully");
						return Ok(event_loop);
					} else {
						debug!(code = ?code, "MQTT connection rejected by broker");
						return Err(
							ConnectionEstablishmentError::BrokerRejected {
								code,
							},
						);
					}
				}
				| Ok(notification) => {
					debug!(notification = ?notification, "Bootstrap phase notification");
				}
				| Err(connection_err) => {
					debug!(error = %connection_err, "MQTT connection error during bootstrap phase");
					return Err(ConnectionEstablishmentError::Network(
						connection_err,
					));
				}
			}
		}
	}

	/// Subscribes to every configured pattern from a separate task.
	///
	/// Subscribe requests go through the rumqttc request channel, which
	/// only drains while the event loop is polled, so they must not be
	/// awaited from inside the event loop.
	fn spawn_subscribe_all(&self, client: &AsyncClient) {
		if self.subscriptions.is_empty() {
			warn!("No subscribable topic patterns configured");
			return;
		}

		let client = client.clone();
		let subscriptions = Arc::clone(&self.subscriptions);
		let qos = self.qos;

		tokio::spawn(async move {
			info!(
				topics = subscriptions.len(),
				"Connected to MQTT broker, subscribing to topics..."
			);
			for rule in subscriptions.iter() {
				info!(
					topic = %rule.mqtt_topic,
					description = %rule.description,
					"Subscribing to topic"
				);
			}

			let filters = subscriptions
				.iter()
				.map(|rule| SubscribeFilter::new(rule.mqtt_topic.clone(), qos));
			if let Err(err) = client.subscribe_many(filters).await {
				error!(
					topics = subscriptions.len(),
					error = %err,
					"Failed to subscribe"
				);
			}
		});
	}

	fn log_suback(&self, ack: &SubAck) {
		if ack.return_codes.len() != self.subscriptions.len() {
			debug!(pkid = ack.pkid, return_codes = ?ack.return_codes, "Subscription acknowledged");
			return;
		}
		let rejected = rejected_patterns(&self.subscriptions, &ack.return_codes);
		for pattern in &rejected {
			warn!(topic = %pattern, "Broker rejected subscription");
		}
		debug!(
			pkid = ack.pkid,
			granted = self.subscriptions.len() - rejected.len(),
			rejected = rejected.len(),
			"Subscription acknowledged"
		);
	}

	/// Main event loop: dispatches publishes, resubscribes after every
	/// reconnect and backs off on connection errors. Terminates once the
	/// client sends DISCONNECT.
	async fn run(self, mut event_loop: EventLoop, client: AsyncClient) {
		let mut error_count: u32 = 0;

		loop {
			match event_loop.poll().await {
				| Ok(Incoming(Packet::ConnAck(ConnAck {
					session_present,
					code: ConnectReturnCode::Success,
				}))) => {
					error_count = 0;
					info!(session_present, "MQTT reconnected");
					self.spawn_subscribe_all(&client);
				}
				| Ok(Incoming(Packet::ConnAck(ConnAck { code, .. }))) => {
					warn!(code = ?code, "MQTT reconnect rejected by broker");
				}
				| Ok(Incoming(Publish(p))) => {
					error_count = 0;
					self.dispatcher.handle_message(&p.topic, &p.payload).await;
				}
				| Ok(Incoming(Packet::SubAck(ack))) => {
					self.log_suback(&ack);
				}
				| Ok(Incoming(Disconnect)) => {
					warn!("Received MQTT Disconnect packet from server");
				}
				| Ok(Outgoing(rumqttc::Outgoing::Disconnect)) => {
					info!("Sent MQTT Disconnect packet to server");
					break;
				}
				| Ok(notification) => {
					debug!(notification = ?notification, "Received OTHER MQTT notification");
				}
				| Err(err) => {
					error_count = error_count.saturating_add(1);
					let delay = reconnect_delay(
						error_count,
						self.max_reconnect_delay,
					);
					warn!(
						error = %err,
						error_count,
						delay = ?delay,
						"Connection to MQTT broker lost, will attempt to \
						 reconnect..."
					);
					time::sleep(delay).await;
				}
			}
		}
		info!("MQTT event loop terminated gracefully");
	}
}

/// Rules whose pattern a broker accepts as a subscription filter.
///
/// rumqttc refuses a SUBSCRIBE carrying any malformed filter, so those
/// are left out rather than sinking the whole request.
fn subscribable_rules<'a>(
	rules: impl Iterator<Item = &'a TopicRule>,
) -> Arc<[TopicRule]> {
	rules
		.filter(|rule| {
			match TopicPattern::new(rule.mqtt_topic.as_str()).validate() {
				| Ok(()) => true,
				| Err(err) => {
					warn!(
						topic = %rule.mqtt_topic,
						error = %err,
						"Not subscribing to malformed topic pattern"
					);
					false
				}
			}
		})
		.cloned()
		.collect()
}

/// Patterns whose SUBACK return code is a failure
fn rejected_patterns<'a>(
	subscriptions: &'a [TopicRule],
	return_codes: &[SubscribeReasonCode],
) -> Vec<&'a str> {
	subscriptions
		.iter()
		.zip(return_codes)
		.filter(|(_, code)| matches!(code, SubscribeReasonCode::Failure))
		.map(|(rule, _)| rule.mqtt_topic.as_str())
		.collect()
}

/// Exponential backoff: 100ms doubling per consecutive error, capped
fn reconnect_delay(error_count: u32, max_delay: Duration) -> Duration {
	let exponent = error_count.saturating_sub(1).min(16);
	(INITIAL_RETRY_DELAY * 2_u32.pow(exponent)).min(max_delay)
}
