//! Tabula Client - HTTP access to the REST backend
//!
//! - [`HttpBackend`] - reqwest implementation of [`tabula_core::DbBackend`]
//! - [`WeatherClient`] - location suggestions and current weather lookups
//! - [`ClientConfig`] - base URL and transport options

mod config;
mod http;
mod transport;
mod weather;

pub use config::{ClientConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use http::HttpBackend;
pub use weather::{
    CurrentConditions, DailyForecast, DailyTemperature, GeoPoint, InvalidGpsInput,
    WeatherCondition, WeatherClient, WeatherQuery, WeatherReport, FORECAST_DAYS,
};
