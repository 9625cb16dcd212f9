//! WeatherClient tests against a mock provider
//! - status code mapping
//! - response parsing and unit conversion
//! - forecast and reverse geocoding requests

use weather_dashboard::{WeatherClient, WeatherError, weather};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> WeatherClient {
    WeatherClient::new(weather::http_client().unwrap(), server.uri(), "test-key")
}

fn paris_json() -> serde_json::Value {
    serde_json::json!({
        "name": "Paris",
        "coord": { "lat": 48.85, "lon": 2.35 },
        "weather": [{ "main": "Clouds", "description": "broken clouds" }],
        "main": { "temp": 15.4, "feels_like": 14.6, "humidity": 60 },
        "wind": { "speed": 5.0 }
    })
}

async fn respond_current(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

#[tokio::test]
async fn fetch_current_maps_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "Paris"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(paris_json()))
        .expect(1)
        .mount(&server)
        .await;

    let w = client(&server).fetch_current("Paris").await.unwrap();
    assert_eq!(w.city_name, "Paris");
    assert_eq!(w.description, "broken clouds");
    assert_eq!(w.condition_code, "Clouds");
    assert_eq!(w.humidity_pct, 60);
    assert_eq!(w.display_temperature(), 15);
    assert_eq!(w.display_feels_like(), 15);
    assert_eq!(w.display_wind_kmh(), 18);
    assert_eq!(w.coordinates.lat, 48.85);
    assert_eq!(w.coordinates.lon, 2.35);
}

#[tokio::test]
async fn city_names_are_url_encoded() {
    let server = MockServer::start().await;
    let mut body = paris_json();
    body["name"] = "São Paulo".into();
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "São Paulo, BR"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    let w = client(&server).fetch_current("São Paulo, BR").await.unwrap();
    assert_eq!(w.city_name, "São Paulo");
}

#[tokio::test]
async fn unauthorized_is_auth_error() {
    let server = MockServer::start().await;
    respond_current(&server, 401).await;
    let err = client(&server).fetch_current("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherError::Auth));
}

#[tokio::test]
async fn missing_city_is_not_found() {
    let server = MockServer::start().await;
    respond_current(&server, 404).await;
    let err = client(&server).fetch_current("Atlantis").await.unwrap_err();
    assert!(matches!(err, WeatherError::NotFound(ref c) if c == "Atlantis"));
}

#[tokio::test]
async fn other_statuses_are_upstream_errors() {
    for status in [429u16, 500, 503] {
        let server = MockServer::start().await;
        respond_current(&server, status).await;
        let err = client(&server).fetch_current("Paris").await.unwrap_err();
        assert!(
            matches!(err, WeatherError::Upstream { status: s } if s == status),
            "status {status} mapped to {err:?}"
        );
    }
}

#[tokio::test]
async fn empty_weather_array_is_parse_error() {
    let server = MockServer::start().await;
    let mut body = paris_json();
    body["weather"] = serde_json::json!([]);
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let err = client(&server).fetch_current("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn malformed_body_is_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"name\": \"Paris\"}"))
        .mount(&server)
        .await;

    let err = client(&server).fetch_current("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherError::Parse(_)));
}

#[tokio::test]
async fn unreachable_provider_is_network_error() {
    // Nothing listens on port 1.
    let client = WeatherClient::new(
        weather::http_client().unwrap(),
        "http://127.0.0.1:1",
        "test-key",
    );
    let err = client.fetch_current("Paris").await.unwrap_err();
    assert!(matches!(err, WeatherError::Network(_)));
}

#[tokio::test]
async fn fetch_forecast_reads_samples_and_offset() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "48.85"))
        .and(query_param("lon", "2.35"))
        .and(query_param("units", "metric"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "list": [
                { "dt": 1736121600, "main": { "temp": 3.2 },
                  "weather": [{ "main": "Rain", "description": "light rain" }] },
                { "dt": 1736132400, "main": { "temp": 4.0 },
                  "weather": [{ "main": "Rain", "description": "moderate rain" }] }
            ],
            "city": { "name": "Paris", "timezone": 3600 }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let raw = client(&server).fetch_forecast(48.85, 2.35).await.unwrap();
    assert_eq!(raw.list.len(), 2);
    assert_eq!(raw.list[0].main.temp, 3.2);
    assert_eq!(raw.utc_offset().local_minus_utc(), 3600);
}

#[tokio::test]
async fn forecast_errors_are_all_upstream() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client(&server).fetch_forecast(0.0, 0.0).await.unwrap_err();
    assert!(matches!(err, WeatherError::Upstream { status: 404 }));
}

#[tokio::test]
async fn reverse_geocode_returns_places() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/geo/1.0/reverse"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "Bergen", "country": "NO", "lat": 60.39, "lon": 5.32 }
        ])))
        .mount(&server)
        .await;

    let places = client(&server).reverse_geocode(60.39, 5.32).await.unwrap();
    assert_eq!(places.len(), 1);
    assert_eq!(places[0].display_name(), "Bergen, NO");
}
