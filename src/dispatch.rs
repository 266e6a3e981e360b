//! Message dispatch
//!
//! Decodes each inbound broker message, resolves its topic to a routing
//! rule, derives the sensor identity and hands the reading to the
//! forwarder. Every failure is logged and the message dropped.

pub mod dispatcher;
pub mod error;
pub mod payload;

pub use dispatcher::Dispatcher;
pub use error::DispatchError;
pub use payload::{SensorPayload, SensorReading};
