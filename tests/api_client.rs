//! ApiClient against a local collection endpoint

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use mqtt_sensor_bridge::{
	ApiClient, Dispatcher, ForwardError, Forwarder, SensorReading, TopicRule,
};
use serde_json::{Value, json};

type Received = Arc<Mutex<Vec<Value>>>;

#[derive(Clone)]
struct Collector {
	received: Received,
	status: StatusCode,
	delay: Duration,
}

async fn record(
	State(collector): State<Collector>,
	Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
	tokio::time::sleep(collector.delay).await;
	collector.received.lock().unwrap().push(body);
	(collector.status, "collector says hi")
}

/// Starts a collector on an ephemeral port and returns its endpoint URL
async fn spawn_collector(status: StatusCode, delay: Duration) -> (String, Received) {
	let received = Received::default();
	let app = Router::new()
		.route("/api/sensor-data", post(record))
		.with_state(Collector {
			received: Arc::clone(&received),
			status,
			delay,
		});

	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	tokio::spawn(async move {
		axum::serve(listener, app).await.unwrap();
	});

	(format!("http://{addr}/api/sensor-data"), received)
}

fn reading() -> SensorReading {
	SensorReading {
		sensor_id: "kitchen-01".to_string(),
		value: 21.5,
		timestamp_millis: 1_700_000_000_000,
	}
}

#[tokio::test]
async fn test_posts_reading_as_json() {
	let (endpoint, received) =
		spawn_collector(StatusCode::CREATED, Duration::ZERO).await;
	let client = ApiClient::new(&endpoint, Duration::from_secs(5)).unwrap();

	client.send(&reading()).await.unwrap();

	let received = received.lock().unwrap();
	assert_eq!(*received, vec![json!({
		"sensorId": "kitchen-01",
		"value": 21.5,
		"timestamp": 1_700_000_000_000_i64,
	})]);
}

#[tokio::test]
async fn test_error_status_is_reported() {
	let (endpoint, _received) =
		spawn_collector(StatusCode::INTERNAL_SERVER_ERROR, Duration::ZERO)
			.await;
	let client = ApiClient::new(&endpoint, Duration::from_secs(5)).unwrap();

	match client.send(&reading()).await {
		| Err(ForwardError::Status { status, body }) => {
			assert_eq!(status.as_u16(), 500);
			assert_eq!(body, "collector says hi");
		}
		| other => panic!("expected status error, got {other:?}"),
	}
}

#[tokio::test]
async fn test_timeout_is_a_transport_failure() {
	let (endpoint, _received) =
		spawn_collector(StatusCode::OK, Duration::from_secs(3)).await;
	let client = ApiClient::new(&endpoint, Duration::from_millis(200)).unwrap();

	let err = client.send(&reading()).await.unwrap_err();
	assert!(matches!(err, ForwardError::Transport(_)));
	assert!(err.is_timeout());
}

#[tokio::test]
async fn test_unreachable_endpoint() {
	let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
	let addr = listener.local_addr().unwrap();
	drop(listener);

	let client = ApiClient::new(
		format!("http://{addr}/api/sensor-data"),
		Duration::from_secs(2),
	)
	.unwrap();
	let err = client.send(&reading()).await.unwrap_err();
	assert!(matches!(err, ForwardError::Transport(_)));
}

#[tokio::test]
async fn test_end_to_end_dispatch() {
	let (endpoint, received) =
		spawn_collector(StatusCode::OK, Duration::ZERO).await;
	let client = ApiClient::new(&endpoint, Duration::from_secs(5)).unwrap();
	let dispatcher =
		Dispatcher::new([TopicRule::new("home/+/reading", true)], client);

	dispatcher
		.handle_message(
			"home/kitchen/reading",
			br#"{"sensorId":"kitchen-01","value":21.5,"unit":"C"}"#,
		)
		.await;
	dispatcher
		.handle_message(
			"office/reading",
			br#"{"sensorId":"office-01","value":19.0}"#,
		)
		.await;

	let received = received.lock().unwrap();
	assert_eq!(received.len(), 1);
	assert_eq!(received[0]["sensorId"], "kitchen-01");
	assert_eq!(received[0]["value"], 21.5);
	assert!(received[0]["timestamp"].as_i64().unwrap() > 0);
}
