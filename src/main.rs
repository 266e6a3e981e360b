//! MQTT Sensor Bridge
//!
//! ```bash
//! mqtt-sensor-bridge --config /etc/mqtt-sensor-bridge/config.yaml
//! ```

use std::path::PathBuf;

use clap::Parser;
use mqtt_sensor_bridge::{
	ApiClient, BridgeConfig, Dispatcher, MqttBridge, telemetry,
};
use tracing::{error, info};

/// Forward MQTT sensor readings to an HTTP collection endpoint
#[derive(Parser, Debug)]
#[command(name = "mqtt-sensor-bridge")]
#[command(version)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.yaml")]
	config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	// Load .env first to make RUST_LOG available
	dotenv::dotenv().ok();
	let args = Args::parse();

	let config = match BridgeConfig::load(&args.config) {
		| Ok(config) => config,
		| Err(err) => {
			eprintln!("Failed to load configuration: {err}");
			std::process::exit(1);
		}
	};
	telemetry::init(&config.logging);

	info!(
		config = %args.config.display(),
		api_endpoint = %config.api.endpoint,
		mqtt_broker = %config.mqtt.broker,
		topics = config.topics.len(),
		log_level = %config.logging.level,
		"Configuration loaded successfully"
	);

	let api_client = ApiClient::new(&config.api.endpoint, config.api.timeout)
		.inspect_err(|err| error!(error = %err, "Failed to create API client"))?;
	let dispatcher = Dispatcher::new(config.topics.clone(), api_client);
	let client_config = config.mqtt.client_config().inspect_err(
		|err| error!(error = %err, "Invalid MQTT configuration"),
	)?;

	let connection = MqttBridge::connect(client_config, dispatcher)
		.await
		.inspect_err(
			|err| error!(error = %err, "Failed to connect to MQTT broker"),
		)?;

	info!("Bridge is running. Press Ctrl+C to exit.");
	shutdown_signal().await;

	info!("Shutting down bridge...");
	connection.shutdown().await?;
	info!("Bridge stopped");
	Ok(())
}

async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(err) = tokio::signal::ctrl_c().await {
			error!(error = %err, "Failed to listen for Ctrl+C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(
			tokio::signal::unix::SignalKind::terminate(),
		) {
			| Ok(mut signal) => {
				signal.recv().await;
			}
			| Err(err) => {
				error!(error = %err, "Failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}
}
