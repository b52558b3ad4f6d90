//! Core library for the forecast bot.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather forecast client
//! - Daily aggregation of 3-hour forecast samples
//! - Chart rendering and the text summary
//!
//! It is used by `forecast-bot`, but the pipeline has no Discord dependency
//! and can be driven from any binary.

pub mod aggregate;
pub mod chart;
pub mod config;
pub mod error;
pub mod format;
pub mod locale;
pub mod model;
pub mod provider;
pub mod service;

pub use aggregate::aggregate;
pub use config::Config;
pub use error::{AggregateError, ForecastError, ProviderError, RenderError};
pub use format::format_summary;
pub use locale::Locale;
pub use model::{ATTACHMENT_NAME, DailySummary, ForecastReply, ForecastResult, ForecastSample};
pub use provider::{ForecastProvider, OpenWeatherProvider};
pub use service::ForecastService;
