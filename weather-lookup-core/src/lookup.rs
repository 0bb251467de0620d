//! The lookup handler: validate, fetch, classify, then push the result into
//! whatever presentation is bound to it.

use crate::{
    LookupError, Rgb, TemperatureBand, WeatherIcon, WeatherProvider, WeatherReading,
};

pub const EMPTY_CITY_MESSAGE: &str = "Please enter a city name.";

/// Everything the handler is allowed to touch on screen.
pub trait Presentation {
    fn set_background(&mut self, color: Rgb);
    fn set_icon(&mut self, icon: WeatherIcon);
    fn set_result_text(&mut self, text: String);
    fn show_error(&mut self, error: &LookupError);
}

/// Trimmed city name, or a validation error for blank input.
pub fn validate_city(input: &str) -> Result<&str, LookupError> {
    let city = input.trim();
    if city.is_empty() {
        return Err(LookupError::Validation(EMPTY_CITY_MESSAGE.to_string()));
    }
    Ok(city)
}

#[derive(Debug)]
pub struct WeatherLookup<P> {
    provider: P,
}

impl<P: WeatherProvider> WeatherLookup<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Validate and fetch, without touching any presentation.
    pub async fn fetch_reading(&self, city_input: &str) -> Result<WeatherReading, LookupError> {
        let city = validate_city(city_input)?;
        self.provider.current_weather(city).await
    }

    pub async fn fetch_icon(&self, icon_code: &str) -> Result<WeatherIcon, LookupError> {
        let bytes = self.provider.icon_png(icon_code).await?;
        WeatherIcon::decode(&bytes)
    }

    /// Look up `city_input` and render it into `view`.
    ///
    /// Updates land in order: background, icon, text. A failure part-way
    /// leaves earlier updates in place; nothing is rolled back. The error is
    /// shown on `view` and also returned.
    pub async fn fetch_and_display(
        &self,
        city_input: &str,
        view: &mut dyn Presentation,
    ) -> Result<(), LookupError> {
        let result = self.render_into(city_input, view).await;

        if let Err(err) = &result {
            tracing::warn!(error = %err, "weather lookup failed");
            view.show_error(err);
        }

        result
    }

    async fn render_into(
        &self,
        city_input: &str,
        view: &mut dyn Presentation,
    ) -> Result<(), LookupError> {
        let reading = self.fetch_reading(city_input).await?;

        let band = TemperatureBand::classify(reading.temperature_c);
        view.set_background(band.color());

        let icon = self.fetch_icon(&reading.icon_code).await?;
        view.set_icon(icon);

        view.set_result_text(reading.display_text());

        tracing::info!(
            city = %reading.city,
            country = %reading.country,
            temperature_c = reading.temperature_c,
            %band,
            "weather lookup complete"
        );

        Ok(())
    }
}
