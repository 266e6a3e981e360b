//! Outbound delivery of resolved sensor readings
//!
//! The dispatcher hands each reading to a [`Forwarder`] exactly once.
//! [`ApiClient`] is the HTTP implementation used by the bridge binary.

pub mod api_client;
/// Forwarding error types
pub mod error;

use std::future::Future;

pub use api_client::ApiClient;
pub use error::ForwardError;

use crate::dispatch::SensorReading;

/// Performs one outbound call per reading.
///
/// No batching and no retry: a failed send is reported to the caller
/// and the reading is gone.
pub trait Forwarder: Send + Sync + 'static {
	/// Delivers a single reading
	fn send(
		&self,
		reading: &SensorReading,
	) -> impl Future<Output = Result<(), ForwardError>> + Send;
}
