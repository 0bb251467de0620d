//! Core library for the `weather-lookup` tool.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider client
//! - The weather reading model, temperature bands and icon decoding
//! - The lookup handler and the presentation contract it drives
//!
//! It is used by `weather-lookup-cli`, but any front end that implements
//! [`Presentation`] can drive a [`WeatherLookup`].

pub mod band;
pub mod config;
pub mod error;
pub mod icon;
pub mod lookup;
pub mod model;
pub mod provider;

pub use band::{Rgb, TemperatureBand};
pub use config::Config;
pub use error::LookupError;
pub use icon::WeatherIcon;
pub use lookup::{Presentation, WeatherLookup, validate_city};
pub use model::WeatherReading;
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider, provider_from_config};
