use std::path::Path;
use std::time::Duration;

use rumqttc::QoS;
use serde::{Deserialize, Deserializer};

use super::error::ConfigError;
use crate::client::BridgeClientConfig;
use crate::rules::TopicRule;

const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_CLIENT_ID: &str = "mqtt-sensor-bridge";

/// Top-level bridge configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BridgeConfig {
	/// Collection API settings
	pub api: ApiSettings,
	/// Broker connection settings
	pub mqtt: MqttSettings,
	/// Routing rules, in priority order
	#[serde(default)]
	pub topics: Vec<TopicRule>,
	/// Log output settings
	#[serde(default)]
	pub logging: LoggingSettings,
}

/// Remote collection endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSettings {
	/// URL every reading is posted to
	#[serde(default)]
	pub endpoint: String,
	/// Per-request timeout (default 10s)
	#[serde(default = "default_api_timeout", with = "crate::config::duration")]
	pub timeout: Duration,
}

/// MQTT broker connection.
#[derive(Debug, Clone, Deserialize)]
pub struct MqttSettings {
	/// Broker URL, e.g. `tcp://localhost:1883` or `mqtts://host:8883`
	#[serde(default)]
	pub broker: String,
	#[serde(default = "default_client_id")]
	pub client_id: String,
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub password: String,
	/// Subscription QoS, 0 to 2
	#[serde(default)]
	pub qos: u8,
	#[serde(default)]
	pub clean_session: bool,
}

/// Log output format. Anything other than `json` means text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

impl<'de> Deserialize<'de> for LogFormat {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let format = Option::<String>::deserialize(deserializer)?;
		Ok(match format {
			| Some(format) if format.trim().eq_ignore_ascii_case("json") => {
				LogFormat::Json
			}
			| _ => LogFormat::Text,
		})
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
	/// `trace`, `debug`, `info`, `warn`/`warning` or `error`/`fatal`
	#[serde(default = "default_log_level")]
	pub level: String,
	#[serde(default)]
	pub format: LogFormat,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			level: default_log_level(),
			format: LogFormat::default(),
		}
	}
}

fn default_api_timeout() -> Duration {
	DEFAULT_API_TIMEOUT
}

fn default_client_id() -> String {
	DEFAULT_CLIENT_ID.to_string()
}

fn default_log_level() -> String {
	"info".to_string()
}

impl BridgeConfig {
	/// Parse configuration from a YAML string.
	pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
		let mut config: BridgeConfig = serde_yaml::from_str(yaml)?;
		config.apply_defaults();
		Ok(config)
	}

	/// Parse configuration from a YAML file.
	pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let content =
			std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
				path: path.to_path_buf(),
				source,
			})?;
		Self::from_yaml(&content)
	}

	/// Parse and validate in one step.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let config = Self::from_file(path)?;
		config.validate()?;
		Ok(config)
	}

	/// Explicitly empty values fall back to the defaults too
	fn apply_defaults(&mut self) {
		if self.api.timeout.is_zero() {
			self.api.timeout = DEFAULT_API_TIMEOUT;
		}
		if self.mqtt.client_id.is_empty() {
			self.mqtt.client_id = default_client_id();
		}
		if self.logging.level.is_empty() {
			self.logging.level = default_log_level();
		}
	}

	/// Checks the settings the bridge cannot start without.
	///
	/// Topic patterns are not checked here: malformed patterns are
	/// accepted and reported when the rule index is built.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.api.endpoint.trim().is_empty() {
			return Err(ConfigError::invalid("api.endpoint is required"));
		}
		if self.mqtt.broker.trim().is_empty() {
			return Err(ConfigError::invalid("mqtt.broker is required"));
		}
		if self.topics.is_empty() {
			return Err(ConfigError::invalid(
				"at least one topic mapping is required",
			));
		}
		self.mqtt.qos()?;
		Ok(())
	}
}

impl MqttSettings {
	pub fn qos(&self) -> Result<QoS, ConfigError> {
		match self.qos {
			| 0 => Ok(QoS::AtMostOnce),
			| 1 => Ok(QoS::AtLeastOnce),
			| 2 => Ok(QoS::ExactlyOnce),
			| other => Err(ConfigError::invalid(format!(
				"mqtt.qos must be 0, 1 or 2, got {other}"
			))),
		}
	}

	/// Broker URL with the client id attached as a query parameter
	pub fn broker_url(&self) -> String {
		let separator = if self.broker.contains('?') { '&' } else { '?' };
		format!("{}{separator}client_id={}", self.broker, self.client_id)
	}

	/// Builds the rumqttc-level client configuration
	pub fn client_config(&self) -> Result<BridgeClientConfig, ConfigError> {
		let mut config = BridgeClientConfig::from_url(&self.broker_url())
			.map_err(|e| {
				ConfigError::invalid(format!(
					"mqtt.broker '{}' is not a valid broker URL: {e}",
					self.broker
				))
			})?;

		config.connection.set_clean_session(self.clean_session);
		if !self.username.is_empty() {
			config
				.connection
				.set_credentials(self.username.as_str(), self.password.as_str());
		}
		config.settings.qos = self.qos()?;
		Ok(config)
	}
}
