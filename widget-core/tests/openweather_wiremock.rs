//! OpenWeather provider against a mock HTTP server.

use std::{net::TcpListener, time::Duration};

use tokio_util::sync::CancellationToken;
use weather_widget_core::{
    Config, FetchError, FetchRequest, Locale,
    provider::{WeatherProvider, openweather::OpenWeatherProvider},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

fn sample_weather_response() -> serde_json::Value {
    serde_json::json!({
        "coord": { "lon": 31.2333, "lat": 30.0333 },
        "weather": [{ "id": 800, "main": "Clear", "description": "clear sky", "icon": "01d" }],
        "base": "stations",
        "main": {
            "temp": 300.15,
            "feels_like": 299,
            "temp_min": 298,
            "temp_max": 303,
            "pressure": 1012,
            "humidity": 40
        },
        "visibility": 8000,
        "wind": { "speed": 5, "deg": 340 },
        "dt": 1700020000,
        "sys": { "country": "EG", "sunrise": 1700000000, "sunset": 1700040000 },
        "timezone": 7200,
        "name": "Cairo",
        "cod": 200
    })
}

fn create_test_provider(mock_server: &MockServer, timeout: Duration) -> OpenWeatherProvider {
    OpenWeatherProvider::new("TEST_KEY".into(), mock_server.uri(), timeout)
        .expect("Failed to create provider")
}

fn request(locale: Locale) -> FetchRequest {
    FetchRequest {
        coordinates: Config::default().coordinates(),
        locale,
    }
}

async fn setup_weather_mock(mock_server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path("/weather"))
        .and(query_param("lat", "30.033333"))
        .and(query_param("lon", "31.233334"))
        .and(query_param("appid", "TEST_KEY"))
        .respond_with(response)
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_fetch_current_weather_success() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_weather_response()),
    )
    .await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(5));
    let result = provider
        .fetch(&request(Locale::En), &CancellationToken::new())
        .await;

    assert!(result.is_ok(), "Expected success, got: {result:?}");
    let snapshot = result.unwrap();
    assert_eq!(snapshot.temperature, 28);
    assert_eq!(snapshot.feels_like, 27);
    assert_eq!(snapshot.temp_max, 31);
    assert_eq!(snapshot.humidity, 40);
    assert_eq!(snapshot.pressure, 1012);
    assert_eq!(snapshot.wind_speed, "18.0");
    assert_eq!(snapshot.visibility, "8.0");
    assert_eq!(snapshot.description, "clear sky");
    assert_eq!(snapshot.icon_url, "https://openweathermap.org/img/wn/01d@2x.png");
    assert_eq!(snapshot.sunrise, "12:13 AM");
    assert_eq!(snapshot.sunset, "11:20 AM");
}

#[tokio::test]
async fn test_fetch_formats_sun_times_for_request_locale() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200).set_body_json(sample_weather_response()),
    )
    .await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(5));
    let snapshot = provider
        .fetch(&request(Locale::Ar), &CancellationToken::new())
        .await
        .unwrap();

    assert_eq!(snapshot.sunrise, "١٢:١٣ ص");
}

#[tokio::test]
async fn test_unauthorized_is_http_error() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(401)
            .set_body_json(serde_json::json!({ "cod": 401, "message": "Invalid API key" })),
    )
    .await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(5));
    let err = provider
        .fetch(&request(Locale::En), &CancellationToken::new())
        .await
        .unwrap_err();

    match err {
        FetchError::Http { status, body } => {
            assert_eq!(status.as_u16(), 401);
            assert!(body.contains("Invalid API key"));
        }
        other => panic!("Expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_server_error_is_http_error() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(&mock_server, ResponseTemplate::new(503)).await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(5));
    let err = provider
        .fetch(&request(Locale::En), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Http { .. }), "got: {err:?}");
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(serde_json::json!({ "main": { "temp": 300 } })),
    )
    .await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(5));
    let err = provider
        .fetch(&request(Locale::En), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Parse(_)), "got: {err:?}");
}

/// Base URL of a local port with nothing listening on it.
fn refused_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind a local port");
    let port = listener
        .local_addr()
        .expect("Failed to read local address")
        .port();
    drop(listener);
    format!("http://127.0.0.1:{port}")
}

#[tokio::test]
async fn test_refused_connection_is_network_error() {
    let provider =
        OpenWeatherProvider::new("TEST_KEY".into(), refused_base_url(), Duration::from_secs(2))
            .expect("Failed to create provider");
    let err = provider
        .fetch(&request(Locale::En), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_weather_response())
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    let provider = create_test_provider(&mock_server, Duration::from_millis(300));
    let err = provider
        .fetch(&request(Locale::En), &CancellationToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Network(_)), "got: {err:?}");
}

#[tokio::test]
async fn test_cancellation_interrupts_pending_request() {
    let mock_server = MockServer::start().await;
    setup_weather_mock(
        &mock_server,
        ResponseTemplate::new(200)
            .set_body_json(sample_weather_response())
            .set_delay(Duration::from_secs(10)),
    )
    .await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(30));
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let started = std::time::Instant::now();
    let err = provider
        .fetch(&request(Locale::En), &cancel)
        .await
        .unwrap_err();

    assert!(err.is_cancelled(), "got: {err:?}");
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_already_cancelled_token_skips_request() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_weather_response()))
        .expect(0)
        .mount(&mock_server)
        .await;

    let provider = create_test_provider(&mock_server, Duration::from_secs(5));
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = provider
        .fetch(&request(Locale::En), &cancel)
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
}
