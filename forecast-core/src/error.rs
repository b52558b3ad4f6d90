use thiserror::Error;

use crate::locale::Locale;

/// Failures while talking to the weather provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Carries no request URL: it would contain the API key.
    #[error("request to weather provider failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("weather provider answered {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected forecast payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.without_url())
    }
}

/// Input that the aggregator cannot turn into daily summaries.
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("no forecast samples to aggregate")]
    EmptyInput,

    #[error("forecast sample #{index} is malformed: {reason}")]
    MalformedSample { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("nothing to plot: forecast contains no days")]
    EmptyResult,

    #[error("chart drawing failed: {0}")]
    Draw(String),

    #[error("PNG encoding failed: {0}")]
    Encode(#[from] image::ImageError),
}

/// Any failure of one `/forecast` invocation.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("forecast task failed: {0}")]
    Internal(String),
}

impl ForecastError {
    /// Message shown to the user in place of the forecast.
    pub fn user_message(&self, locale: Locale) -> &'static str {
        let texts = locale.texts();
        match self {
            ForecastError::Provider(ProviderError::Transport(_) | ProviderError::Status { .. }) => {
                texts.not_found
            }
            ForecastError::Provider(ProviderError::Decode(_))
            | ForecastError::Aggregate(_)
            | ForecastError::Render(_)
            | ForecastError::Internal(_) => texts.generic_failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_errors_report_city_not_found() {
        let err = ForecastError::from(ProviderError::Status { status: 404, body: String::new() });
        assert_eq!(err.user_message(Locale::En), "City not found or error retrieving weather data.");
    }

    #[test]
    fn other_errors_report_generic_failure() {
        let errors = [
            ForecastError::from(ProviderError::Decode("missing field `humidity`".into())),
            ForecastError::from(AggregateError::EmptyInput),
            ForecastError::from(RenderError::EmptyResult),
            ForecastError::Internal("join".into()),
        ];

        for err in errors {
            assert_eq!(
                err.user_message(Locale::De),
                "Ein Fehler ist aufgetreten. Bitte versuche es später erneut."
            );
        }
    }

    #[test]
    fn malformed_sample_names_index() {
        let err = AggregateError::MalformedSample { index: 3, reason: "humidity out of range".into() };
        assert_eq!(err.to_string(), "forecast sample #3 is malformed: humidity out of range");
    }
}
