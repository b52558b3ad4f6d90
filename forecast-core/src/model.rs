use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Filename used for the chart attachment.
pub const ATTACHMENT_NAME: &str = "forecast.png";

/// Display format for calendar dates (day.month.year).
pub const DATE_FORMAT: &str = "%d.%m.%Y";

/// One raw 3-hour forecast entry as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    /// Provider-local timestamp, no timezone conversion applied.
    pub timestamp: NaiveDateTime,
    pub temperature: f64,
    pub wind_speed: f64,
    pub humidity: f64,
    pub description: String,
}

/// Aggregated statistics for all samples sharing one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub mean_temperature: f64,
    pub mean_wind_speed: f64,
    pub mean_humidity: f64,
    pub dominant_description: String,
}

impl DailySummary {
    pub fn date_label(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }
}

/// Daily summaries for one city, ordered by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub city: String,
    pub days: Vec<DailySummary>,
}

/// Everything the chat layer needs to answer one command.
#[derive(Debug, Clone)]
pub struct ForecastReply {
    pub text: String,
    pub png: Vec<u8>,
}
