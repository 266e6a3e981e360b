use reqwest::StatusCode;
use thiserror::Error;

/// Errors reported by a [`Forwarder`](super::Forwarder)
#[derive(Debug, Error)]
pub enum ForwardError {
	/// Request could not be built or sent, or timed out
	#[error("Request to collection endpoint failed: {0}")]
	Transport(#[from] reqwest::Error),

	/// Collection endpoint answered with a non-success status
	#[error("Collection endpoint returned {status}: {body}")]
	Status {
		/// HTTP status returned by the endpoint
		status: StatusCode,
		/// Response body, possibly empty
		body: String,
	},

	/// Failure reported by a non-HTTP forwarder
	#[error("Forwarding failed: {0}")]
	Other(String),
}

impl ForwardError {
	/// Creates a new Other error
	pub fn other(details: impl Into<String>) -> Self {
		Self::Other(details.into())
	}

	/// `true` if the request never got an answer within the client timeout
	pub fn is_timeout(&self) -> bool {
		matches!(self, Self::Transport(err) if err.is_timeout())
	}
}
