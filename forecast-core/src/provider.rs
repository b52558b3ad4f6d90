use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::ProviderError, model::ForecastSample};

pub mod openweather;

pub use openweather::OpenWeatherProvider;

/// Source of raw 3-hour forecast samples for a city.
#[async_trait]
pub trait ForecastProvider: Send + Sync + Debug {
    async fn fetch_forecast(&self, city: &str) -> Result<Vec<ForecastSample>, ProviderError>;
}
