use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::{
    Config, LookupError,
    config::{DEFAULT_BASE_URL, DEFAULT_ICON_BASE_URL},
    error::GENERIC_PROVIDER_MESSAGE,
    icon::icon_url,
    model::{WeatherReading, title_case},
};

use super::WeatherProvider;

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    icon_base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_endpoints(api_key, DEFAULT_BASE_URL, DEFAULT_ICON_BASE_URL, Client::new())
    }

    pub fn with_endpoints(api_key: String, base_url: &str, icon_base_url: &str, http: Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            icon_base_url: icon_base_url.to_string(),
            http,
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key()?;
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self::with_endpoints(api_key, config.base_url(), config.icon_base_url(), http))
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
}

impl TryFrom<OwCurrentResponse> for WeatherReading {
    type Error = LookupError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::unexpected("response contained no weather entries"))?;

        Ok(WeatherReading {
            city: parsed.name,
            country: parsed.sys.country,
            temperature_c: parsed.main.temp,
            humidity_pct: parsed.main.humidity,
            condition: title_case(&weather.description),
            icon_code: weather.icon,
        })
    }
}

/// `message` from an error body, or the generic text.
fn provider_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
        .unwrap_or_else(|| GENERIC_PROVIDER_MESSAGE.to_string())
}

/// reqwest errors carry the request URL, which includes `appid`.
fn redacted(err: reqwest::Error) -> LookupError {
    LookupError::from(err.without_url())
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(&self, city: &str) -> Result<WeatherReading, LookupError> {
        let url = format!("{}/weather", self.base_url);
        tracing::debug!(%url, city, "requesting current weather");

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(redacted)?;

        let status = res.status();
        let body = res.text().await.map_err(redacted)?;
        tracing::debug!(%status, bytes = body.len(), "current weather response");

        if !status.is_success() {
            return Err(LookupError::Provider(provider_message(&body)));
        }

        let parsed: OwCurrentResponse = serde_json::from_str(&body)?;
        WeatherReading::try_from(parsed)
    }

    async fn icon_png(&self, icon_code: &str) -> Result<Vec<u8>, LookupError> {
        let url = icon_url(&self.icon_base_url, icon_code)?;
        tracing::debug!(%url, "requesting icon");

        let bytes = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(redacted)?
            .bytes()
            .await
            .map_err(redacted)?;

        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "name": "Paris",
        "sys": {"country": "FR"},
        "main": {"temp": 18, "humidity": 55},
        "weather": [{"description": "clear sky", "icon": "01d"}]
    }"#;

    #[test]
    fn parses_current_response() {
        let parsed: OwCurrentResponse = serde_json::from_str(PARIS).unwrap();
        let reading = WeatherReading::try_from(parsed).unwrap();

        assert_eq!(reading.city, "Paris");
        assert_eq!(reading.country, "FR");
        assert_eq!(reading.temperature_c, 18.0);
        assert_eq!(reading.humidity_pct, 55);
        assert_eq!(reading.condition, "Clear Sky");
        assert_eq!(reading.icon_code, "01d");
    }

    #[test]
    fn empty_weather_array_is_unexpected() {
        let body = r#"{"name":"X","sys":{"country":"Y"},"main":{"temp":1,"humidity":2},"weather":[]}"#;
        let parsed: OwCurrentResponse = serde_json::from_str(body).unwrap();

        let err = WeatherReading::try_from(parsed).unwrap_err();
        assert!(matches!(err, LookupError::Unexpected(_)));
    }

    #[test]
    fn provider_message_prefers_body() {
        assert_eq!(provider_message(r#"{"cod":"404","message":"city not found"}"#), "city not found");
        assert_eq!(provider_message(r#"{"cod":500}"#), GENERIC_PROVIDER_MESSAGE);
        assert_eq!(provider_message("<html>502</html>"), GENERIC_PROVIDER_MESSAGE);
        assert_eq!(provider_message(r#"{"message": 42}"#), GENERIC_PROVIDER_MESSAGE);
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let p = OpenWeatherProvider::with_endpoints("K".into(), "http://h/x/", "http://i", Client::new());
        assert_eq!(p.base_url, "http://h/x");
    }
}
