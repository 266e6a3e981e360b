use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::debug;

use super::{ForwardError, Forwarder};
use crate::dispatch::SensorReading;

/// JSON body posted for each reading
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SensorDataRequest<'a> {
	sensor_id: &'a str,
	value: f64,
	timestamp: i64,
}

impl<'a> From<&'a SensorReading> for SensorDataRequest<'a> {
	fn from(reading: &'a SensorReading) -> Self {
		Self {
			sensor_id: &reading.sensor_id,
			value: reading.value,
			timestamp: reading.timestamp_millis,
		}
	}
}

/// HTTP client for the remote collection endpoint.
///
/// Every reading becomes one `POST` of
/// `{"sensorId": .., "value": .., "timestamp": ..}` to the endpoint.
/// The timeout covers the whole request; a timed-out request is an
/// ordinary failure.
#[derive(Debug, Clone)]
pub struct ApiClient {
	endpoint: String,
	client: Client,
}

impl ApiClient {
	/// Create a client for `endpoint` with a per-request timeout
	pub fn new(
		endpoint: impl Into<String>,
		timeout: Duration,
	) -> Result<Self, ForwardError> {
		let client = Client::builder()
			.timeout(timeout)
			.user_agent(concat!(
				env!("CARGO_PKG_NAME"),
				"/",
				env!("CARGO_PKG_VERSION")
			))
			.build()?;

		Ok(Self {
			endpoint: endpoint.into(),
			client,
		})
	}

	pub fn endpoint(&self) -> &str {
		&self.endpoint
	}

	/// Post one reading to the collection endpoint
	pub async fn send_sensor_data(
		&self,
		reading: &SensorReading,
	) -> Result<(), ForwardError> {
		let response = self
			.client
			.post(&self.endpoint)
			.json(&SensorDataRequest::from(reading))
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(ForwardError::Status { status, body });
		}

		debug!(
			sensor_id = %reading.sensor_id,
			status = %status,
			"Collection endpoint accepted reading"
		);
		Ok(())
	}
}

impl Forwarder for ApiClient {
	async fn send(&self, reading: &SensorReading) -> Result<(), ForwardError> {
		self.send_sensor_data(reading).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_request_body_field_names() {
		let reading = SensorReading {
			sensor_id: "kitchen-01".to_string(),
			value: 21.5,
			timestamp_millis: 1_700_000_000_000,
		};
		let body = serde_json::to_value(SensorDataRequest::from(&reading))
			.unwrap();
		assert_eq!(
			body,
			serde_json::json!({
				"sensorId": "kitchen-01",
				"value": 21.5,
				"timestamp": 1_700_000_000_000_i64,
			})
		);
	}
}
