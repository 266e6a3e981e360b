use std::path::PathBuf;

use thiserror::Error;

/// Errors while loading or validating the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
	/// File could not be read
	#[error("Failed to read config file '{path}': {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	/// File is not valid YAML or does not fit the schema
	#[error("Failed to parse config file: {0}")]
	Yaml(#[from] serde_yaml::Error),

	/// A required setting is missing or out of range
	#[error("Invalid configuration: {0}")]
	Invalid(String),
}

impl ConfigError {
	pub fn invalid(details: impl Into<String>) -> Self {
		Self::Invalid(details.into())
	}
}
