//! End-to-end workflow tests: real HTTP clients against wiremock servers.

use std::sync::Arc;

use chrono::{FixedOffset, TimeZone};
use climaflow_core::{DisplayConfig, WeatherConfig};
use climaflow_weather::{
    DisplayModel, GeocodingClient, Phase, WeatherController, WeatherProvider,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn forecast_body(temperature: f64, weathercode: i32) -> serde_json::Value {
    serde_json::json!({
        "timezone": "Europe/Paris",
        "timezone_abbreviation": "CEST",
        "utc_offset_seconds": 7200,
        "current_weather": {
            "time": "2024-06-01T13:00",
            "temperature": temperature,
            "windspeed": 8.3,
            "winddirection": 240,
            "weathercode": weathercode
        },
        "hourly": {
            "time": ["2024-06-01T12:00", "2024-06-01T13:00", "2024-06-01T14:00"],
            "temperature_2m": [14.2, 15.0, 15.7],
            "weathercode": [3, 3, 61]
        },
        "daily": {
            "time": ["2024-06-01", "2024-06-02"],
            "weathercode": [3, 61],
            "temperature_2m_max": [18.4, 16.1],
            "temperature_2m_min": [11.6, 10.2]
        }
    })
}

fn controller_for(server: &MockServer) -> WeatherController {
    let config = WeatherConfig {
        geocoding_url: format!("{}/v1/search", server.uri()),
        forecast_url: format!("{}/v1/forecast", server.uri()),
        default_city: "Paris".to_string(),
        ..WeatherConfig::default()
    };
    WeatherController::new(
        Arc::new(GeocodingClient::new(&config).unwrap()),
        Arc::new(WeatherProvider::new(&config).unwrap()),
        config.default_city,
    )
}

async fn mount_paris(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Paris"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{"latitude": 48.85, "longitude": 2.35, "name": "Paris", "country": "France"}]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.85"))
        .and(query_param("longitude", "2.35"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body(15.0, 3)))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_search_paris_end_to_end() {
    let server = MockServer::start().await;
    mount_paris(&server).await;
    let controller = controller_for(&server);

    assert!(controller.search("Paris").await);

    let state = controller.state();
    assert_eq!(state.phase, Phase::Ready);
    assert_eq!(state.error, None);

    let now = FixedOffset::east_opt(7200)
        .unwrap()
        .with_ymd_and_hms(2024, 6, 1, 13, 20, 0)
        .unwrap();
    let model = DisplayModel::derive(&state, now, &DisplayConfig::default());
    let forecast = model.forecast.unwrap();

    assert_eq!(forecast.current.condition.label, "Nublado");
    assert_eq!(forecast.current.temperature_text(), "15°");
    assert_eq!(forecast.location_title, "Paris");
    assert_eq!(forecast.country, "France");
    assert_eq!(forecast.hourly.len(), 2);
    assert_eq!(forecast.hourly[0].label, "13:00");
    assert_eq!(forecast.daily[0].label, "Hoje");
    assert_eq!(forecast.daily[1].label, "domingo");
}

#[tokio::test]
async fn test_unknown_city_keeps_previous_forecast() {
    let server = MockServer::start().await;
    mount_paris(&server).await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": []
        })))
        .mount(&server)
        .await;

    let controller = controller_for(&server);
    assert!(controller.start().await);
    let before = controller.state();
    assert_eq!(before.phase, Phase::Ready);

    controller.search("Atlantis").await;

    let after = controller.state();
    assert_eq!(after.phase, Phase::Failed);
    assert_eq!(after.error.as_deref(), Some("Cidade não encontrada."));
    assert_eq!(after.data, before.data);
    assert_eq!(after.confirmed_city, "Paris");
}

#[tokio::test]
async fn test_refresh_after_upstream_outage() {
    let server = MockServer::start().await;
    mount_paris(&server).await;
    let controller = controller_for(&server);
    controller.start().await;

    server.reset().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    assert!(controller.refresh().await);

    let state = controller.state();
    assert_eq!(state.phase, Phase::Failed);
    assert_eq!(state.error.as_deref(), Some("Falha ao obter dados meteorológicos."));
    let data = state.data.unwrap();
    assert_eq!(data.snapshot.current.temperature, 15.0);
    assert_eq!(data.location.name, "Paris");
}
