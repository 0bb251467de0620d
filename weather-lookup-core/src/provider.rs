use crate::{Config, LookupError, WeatherReading, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// A source of current conditions and their pictograms.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for an already validated, trimmed city name.
    async fn current_weather(&self, city: &str) -> Result<WeatherReading, LookupError>;

    /// Raw image bytes for an icon code.
    async fn icon_png(&self, icon_code: &str) -> Result<Vec<u8>, LookupError>;
}

#[async_trait]
impl<T: WeatherProvider + ?Sized> WeatherProvider for Box<T> {
    async fn current_weather(&self, city: &str) -> Result<WeatherReading, LookupError> {
        (**self).current_weather(city).await
    }

    async fn icon_png(&self, icon_code: &str) -> Result<Vec<u8>, LookupError> {
        (**self).icon_png(icon_code).await
    }
}

/// Construct the provider from config, resolving the API key.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let provider = OpenWeatherProvider::from_config(config)?;
    Ok(Box::new(provider))
}
