//! Weather lookup endpoints: location suggestions and current conditions

use serde::{Deserialize, Serialize};
use tabula_core::Result;
use thiserror::Error;

use crate::ClientConfig;
use crate::transport::Transport;

/// Number of daily entries shown as the forecast
pub const FORECAST_DAYS: usize = 5;

/// Shortest query, in characters, that is sent for suggestions
const MIN_SUGGEST_CHARS: usize = 3;

fn wants_suggestions(query: &str) -> bool {
    query.trim().chars().count() >= MIN_SUGGEST_CHARS
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid GPS: 'lat,lon' format needed.")]
pub struct InvalidGpsInput;

/// Body of `POST /weather/current`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum WeatherQuery {
    City { city: String },
    Zip { zip: String, country: String },
    Gps { lat: f64, lon: f64 },
}

impl WeatherQuery {
    /// Parse a `"lat, lon"` coordinate pair
    pub fn parse_gps(input: &str) -> std::result::Result<Self, InvalidGpsInput> {
        let mut parts = input.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(InvalidGpsInput);
        };
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or(InvalidGpsInput)
        };
        Ok(WeatherQuery::Gps {
            lat: parse(lat)?,
            lon: parse(lon)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WeatherCondition {
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    pub dt: Option<i64>,
    pub temp: Option<f64>,
    pub feels_like: Option<f64>,
    pub pressure: Option<f64>,
    pub humidity: Option<f64>,
    pub visibility: Option<f64>,
    pub wind_speed: Option<f64>,
    pub weather: Vec<WeatherCondition>,
}

impl CurrentConditions {
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|w| w.description.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DailyTemperature {
    pub day: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct DailyForecast {
    pub dt: i64,
    pub temp: DailyTemperature,
    pub humidity: Option<f64>,
    pub weather: Vec<WeatherCondition>,
}

impl DailyForecast {
    pub fn description(&self) -> Option<&str> {
        self.weather.first().map(|w| w.description.as_str())
    }
}

/// Response of `POST /weather/current`; unknown fields are ignored
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct WeatherReport {
    pub name: String,
    pub coord: GeoPoint,
    pub current: CurrentConditions,
    pub daily: Vec<DailyForecast>,
}

impl WeatherReport {
    /// The first [`FORECAST_DAYS`] daily entries
    pub fn forecast(&self) -> &[DailyForecast] {
        &self.daily[..self.daily.len().min(FORECAST_DAYS)]
    }
}

/// Client for the weather lookup endpoints
#[derive(Debug, Clone)]
pub struct WeatherClient {
    transport: Transport,
}

impl WeatherClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            transport: Transport::new(config)?,
        })
    }

    /// `GET /suggest-locations?query=`
    ///
    /// Short queries return no suggestions without contacting the backend.
    #[tracing::instrument(skip(self))]
    pub async fn suggest_locations(&self, query: &str) -> Result<Vec<String>> {
        if !wants_suggestions(query) {
            tracing::debug!("query too short for suggestions");
            return Ok(Vec::new());
        }
        let mut url = self.transport.endpoint(&["suggest-locations"])?;
        url.query_pairs_mut().append_pair("query", query);
        self.transport
            .send_json(self.transport.client().get(url))
            .await
    }

    /// `POST /weather/current`
    #[tracing::instrument(skip(self))]
    pub async fn current_weather(&self, query: &WeatherQuery) -> Result<WeatherReport> {
        let url = self.transport.endpoint(&["weather", "current"])?;
        let report: WeatherReport = self
            .transport
            .send_json(self.transport.client().post(url).json(query))
            .await?;
        tracing::info!(
            location = %report.name,
            lat = report.coord.lat,
            lon = report.coord.lon,
            "weather loaded"
        );
        Ok(report)
    }
}
