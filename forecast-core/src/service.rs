use std::sync::Arc;

use tracing::{debug, info};

use crate::{
    aggregate::aggregate,
    chart,
    error::ForecastError,
    format::format_summary,
    locale::Locale,
    model::ForecastReply,
    provider::ForecastProvider,
};

/// Runs one forecast request end to end: fetch, aggregate, render, format.
///
/// Holds no per-request state, so a single instance can serve concurrent
/// commands behind an `Arc`.
#[derive(Debug, Clone)]
pub struct ForecastService {
    provider: Arc<dyn ForecastProvider>,
    locale: Locale,
}

impl ForecastService {
    pub fn new(provider: Arc<dyn ForecastProvider>, locale: Locale) -> Self {
        Self { provider, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub async fn forecast(&self, city: &str) -> Result<ForecastReply, ForecastError> {
        let samples = self.provider.fetch_forecast(city).await?;
        debug!(city, samples = samples.len(), "samples fetched");

        let result = aggregate(city, &samples)?;
        info!(city, days = result.days.len(), "forecast aggregated");

        let text = format_summary(&result, self.locale);

        let labels = self.locale.texts().chart;
        let png = tokio::task::spawn_blocking(move || chart::render(&result, &labels))
            .await
            .map_err(|e| ForecastError::Internal(format!("chart task did not finish: {e}")))??;

        Ok(ForecastReply { text, png })
    }
}
