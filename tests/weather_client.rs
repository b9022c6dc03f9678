// WeatherClient against a fake forecast API on an ephemeral port.
// The hourly series is generated around the host clock because the client
// aligns probabilities to the current hour at parse time.

use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::{Duration, Local};
use serde_json::json;

use commute_board::config::{Coordinates, WeatherConfig};
use commute_board::error::FetchError;
use commute_board::weather::{WeatherClient, WeatherSource};

async fn spawn_forecast_api(status: StatusCode, body: String) -> String {
    let app = Router::new().route(
        "/v1/bom",
        get(move || {
            let body = body.clone();
            async move { (status, body) }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve");
    });
    format!("http://{addr}/v1/bom")
}

fn home() -> Coordinates {
    Coordinates {
        latitude: -33.80007150250232,
        longitude: 151.06689458521106,
    }
}

fn client(base_url: String) -> WeatherClient {
    WeatherClient::new(WeatherConfig {
        base_url,
        ..WeatherConfig::default()
    })
    .expect("client")
}

/// A forecast body whose hourly series spans the 24 hours around now, with
/// probability 80 for the current hour onward.
fn forecast_body() -> String {
    let start = Local::now() - Duration::hours(2);
    let time: Vec<String> = (0..24)
        .map(|h| (start + Duration::hours(h)).format("%Y-%m-%dT%H:00").to_string())
        .collect();
    json!({
        "current": {
            "temperature_2m": 17.6,
            "relative_humidity_2m": 72,
            "apparent_temperature": 15.9,
            "precipitation": 0.2,
            "weather_code": 61,
            "wind_speed_10m": 13.5,
            "rain": 0.2,
            "showers": 0.0
        },
        "hourly": {
            "time": time,
            "precipitation_probability": vec![80; 24],
            "rain": vec![0.0; 24],
            "showers": vec![0.0; 24]
        },
        "daily": {
            "time": [start.format("%Y-%m-%d").to_string()],
            "rain_sum": [4.1],
            "temperature_2m_min": [8.3]
        }
    })
    .to_string()
}

#[tokio::test]
async fn fetches_and_normalizes_a_snapshot() {
    let base_url = spawn_forecast_api(StatusCode::OK, forecast_body()).await;
    let client = client(base_url);

    let snapshot = client.current(home()).await.expect("snapshot");

    assert_eq!(snapshot.temperature_c, 17.6);
    assert_eq!(snapshot.humidity_pct, 72);
    assert_eq!(snapshot.weather_code, 61);
    assert_eq!(snapshot.daily_rain_sum_mm, 4.1);
    assert!(snapshot.hourly_precip_probability.len() >= 6);
    assert!(snapshot.hourly_precip_probability.iter().all(|p| *p == 80));
}

#[tokio::test]
async fn non_success_status_is_an_upstream_error() {
    let base_url = spawn_forecast_api(StatusCode::TOO_MANY_REQUESTS, "{}".to_string()).await;
    let client = client(base_url);

    let err = client.current(home()).await.unwrap_err();
    match err {
        FetchError::UpstreamStatus(status) => {
            assert_eq!(status, StatusCode::TOO_MANY_REQUESTS)
        }
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let base_url = spawn_forecast_api(StatusCode::OK, "<html>oops</html>".to_string()).await;
    let client = client(base_url);

    let err = client.current(home()).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)), "got {err:?}");
}
