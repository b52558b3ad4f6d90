use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::{error::ProviderError, locale::Locale, model::ForecastSample};

use super::ForecastProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    locale: Locale,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String, locale: Locale) -> Self {
        Self::with_base_url(api_key, locale, DEFAULT_BASE_URL)
    }

    /// Point the client at another host, e.g. a proxy or a mock server.
    pub fn with_base_url(api_key: String, locale: Locale, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { api_key, base_url, locale, http: Client::new() }
    }

    fn forecast_url(&self) -> String {
        format!("{}/data/2.5/forecast", self.base_url)
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherProvider {
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ProviderError> {
        let url = self.forecast_url();
        info!(%url, city, lang = %self.locale, "requesting 5-day forecast");

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
                ("lang", self.locale.as_str()),
            ])
            .send()
            .await?;

        let status = res.status();
        info!(status = status.as_u16(), "forecast response received");

        let body = res.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %truncate_body(&body), "forecast request failed");
            return Err(ProviderError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| ProviderError::Decode(format!("invalid forecast JSON: {e}")))?;

        let samples = parsed
            .list
            .into_iter()
            .enumerate()
            .map(|(i, entry)| entry.into_sample(i))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(samples = samples.len(), "forecast decoded");
        Ok(samples)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl OwForecastEntry {
    fn into_sample(self, index: usize) -> Result<ForecastSample, ProviderError> {
        let timestamp = NaiveDateTime::parse_from_str(&self.dt_txt, TIMESTAMP_FORMAT).map_err(|e| {
            ProviderError::Decode(format!("entry #{index} has invalid dt_txt '{}': {e}", self.dt_txt))
        })?;

        let description = self
            .weather
            .into_iter()
            .next()
            .map(|w| w.description)
            .ok_or_else(|| ProviderError::Decode(format!("entry #{index} has no weather element")))?;

        Ok(ForecastSample {
            timestamp,
            temperature: self.main.temp,
            wind_speed: self.wind.speed,
            humidity: self.main.humidity,
            description,
        })
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}...", &body[..cut]),
        None => body.to_string(),
    }
}
