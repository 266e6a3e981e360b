//! Bridge configuration
//!
//! YAML configuration file with the collection API, broker connection,
//! topic rules and logging sections.

pub mod duration;
pub mod error;
pub mod settings;

pub use error::ConfigError;
pub use settings::{
	ApiSettings, BridgeConfig, LogFormat, LoggingSettings, MqttSettings,
};
