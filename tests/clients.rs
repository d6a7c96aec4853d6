use weather_backdrop::{
    data::{
        forecast::ForecastClient,
        geoip::GeoLocator,
        resolver::{Resolution, WeatherResolver},
    },
    domain::weather::{Location, ThemeSelection},
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path, query_param},
};

async fn mount_forecast(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("current_weather", "true"))
        .respond_with(ResponseTemplate::new(status).set_body_raw(body.to_string(), "application/json"))
        .mount(server)
        .await;
}

fn stockholm() -> Location {
    Location {
        name: Some("Stockholm".to_string()),
        latitude: 59.3293,
        longitude: 18.0686,
    }
}

fn resolver(server: &MockServer, fixed: Option<Location>) -> WeatherResolver {
    WeatherResolver::new(
        GeoLocator::with_url(format!("{}/json/", server.uri())),
        ForecastClient::with_base_url(format!("{}/v1/forecast", server.uri())),
        fixed,
    )
}

#[tokio::test]
async fn forecast_client_sends_coordinates_and_reads_code() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "59.3293"))
        .and(query_param("longitude", "18.0686"))
        .and(query_param("current_weather", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"current_weather":{"temperature":1.5,"weathercode":61}}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let client = ForecastClient::with_base_url(format!("{}/v1/forecast", server.uri()));
    let code = client.current_code(&stockholm()).await.expect("code");
    assert_eq!(code, 61);
}

#[tokio::test]
async fn forecast_client_reports_server_errors() {
    let server = MockServer::start().await;
    mount_forecast(&server, 503, "{}").await;
    let client = ForecastClient::with_base_url(format!("{}/v1/forecast", server.uri()));
    let err = client.current_code(&stockholm()).await.expect_err("503");
    assert!(format!("{err:#}").contains("non-success"));
}

#[tokio::test]
async fn geolocator_reads_city_and_coordinates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"city":"Bergen","latitude":60.39,"longitude":5.32,"country_name":"Norway"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let location = GeoLocator::with_url(format!("{}/json/", server.uri()))
        .locate()
        .await
        .expect("location");
    assert_eq!(location.name.as_deref(), Some("Bergen"));
    assert!((location.latitude - 60.39).abs() < 1e-9);
}

#[tokio::test]
async fn geolocator_without_coordinates_yields_none() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"error":true,"reason":"RateLimited"}"#,
            "application/json",
        ))
        .mount(&server)
        .await;

    let location = GeoLocator::with_url(format!("{}/json/", server.uri()))
        .locate()
        .await;
    assert!(location.is_none());
}

#[tokio::test]
async fn resolver_classifies_snow_at_geolocated_position() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"city":"Tromso","latitude":69.65,"longitude":18.96}"#,
            "application/json",
        ))
        .mount(&server)
        .await;
    mount_forecast(&server, 200, r#"{"current_weather":{"weathercode":73}}"#).await;

    let resolution = resolver(&server, None).resolve().await;
    assert_eq!(resolution.selection, ThemeSelection::Snow);
    assert_eq!(resolution.code, Some(73));
    assert_eq!(
        resolution.location.and_then(|location| location.name),
        Some("Tromso".to_string())
    );
}

#[tokio::test]
async fn resolver_falls_back_when_geolocation_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/json/"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let resolution = resolver(&server, None).resolve().await;
    assert_eq!(resolution, Resolution::fallback(None));
    assert!(resolution.is_fallback());
}

#[tokio::test]
async fn resolver_falls_back_on_malformed_forecast() {
    let server = MockServer::start().await;
    mount_forecast(&server, 200, r#"{"current_weather":{"weathercode":"rain"}}"#).await;

    let resolution = resolver(&server, Some(stockholm())).resolve().await;
    assert_eq!(resolution.selection, ThemeSelection::FALLBACK);
    assert!(resolution.is_fallback());
    assert_eq!(resolution.location, Some(stockholm()));
}

#[tokio::test]
async fn resolver_treats_out_of_range_codes_as_default() {
    let server = MockServer::start().await;
    mount_forecast(&server, 200, r#"{"current_weather":{"weathercode":300}}"#).await;

    let resolution = resolver(&server, Some(stockholm())).resolve().await;
    assert_eq!(resolution.selection, ThemeSelection::FALLBACK);
    assert_eq!(resolution.code, Some(300));
}
