use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Language used for provider descriptions and every user-visible string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    De,
    En,
}

impl Locale {
    /// Value of the provider's `lang` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::De => "de",
            Locale::En => "en",
        }
    }

    pub const fn all() -> &'static [Locale] {
        &[Locale::De, Locale::En]
    }

    pub fn texts(&self) -> &'static Texts {
        match self {
            Locale::De => &GERMAN,
            Locale::En => &ENGLISH,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Locale {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "de" => Ok(Locale::De),
            "en" => Ok(Locale::En),
            _ => Err(anyhow::anyhow!("Unknown language '{value}'. Supported languages: de, en.")),
        }
    }
}

/// User-facing strings for one locale.
#[derive(Debug)]
pub struct Texts {
    pub command_description: &'static str,
    pub city_option_description: &'static str,
    pub acknowledgment: &'static str,
    pub header: &'static str,
    pub avg_temperature: &'static str,
    pub weather: &'static str,
    pub avg_wind_speed: &'static str,
    pub avg_humidity: &'static str,
    pub not_found: &'static str,
    pub generic_failure: &'static str,
    pub chart: ChartLabels,
}

impl Texts {
    pub fn header_for(&self, city: &str) -> String {
        format!("{} {city}:", self.header)
    }
}

/// Axis titles and legend entries of the forecast chart.
#[derive(Debug, Clone, Copy)]
pub struct ChartLabels {
    pub x_axis: &'static str,
    pub temperature_axis: &'static str,
    pub secondary_axis: &'static str,
    pub temperature: &'static str,
    pub wind_speed: &'static str,
    pub humidity: &'static str,
}

static GERMAN: Texts = Texts {
    command_description: "Erhalte die tägliche Wettervorhersage für die nächsten 5 Tage",
    city_option_description: "Die Stadt, für die du die Wettervorhersage wissen möchtest",
    acknowledgment: "Bitte warte einen Moment, während die Wettervorhersage abgerufen wird...",
    header: "Wettervorhersage für",
    avg_temperature: "Durchschnittstemperatur",
    weather: "Wetter",
    avg_wind_speed: "Durchschnittliche Windgeschwindigkeit",
    avg_humidity: "Durchschnittliche Luftfeuchtigkeit",
    not_found: "Stadt nicht gefunden oder Fehler bei der Abfrage der Wetterdaten.",
    generic_failure: "Ein Fehler ist aufgetreten. Bitte versuche es später erneut.",
    chart: ChartLabels {
        x_axis: "Datum",
        temperature_axis: "Temperatur (°C)",
        secondary_axis: "Windgeschwindigkeit (m/s) / Luftfeuchtigkeit (%)",
        temperature: "Durchschnittstemperatur",
        wind_speed: "Durchschnittliche Windgeschwindigkeit",
        humidity: "Durchschnittliche Luftfeuchtigkeit",
    },
};

static ENGLISH: Texts = Texts {
    command_description: "Get the daily weather forecast for the next 5 days",
    city_option_description: "The city you want the forecast for",
    acknowledgment: "Please wait a moment while the forecast is being fetched...",
    header: "Weather forecast for",
    avg_temperature: "Average temperature",
    weather: "Weather",
    avg_wind_speed: "Average wind speed",
    avg_humidity: "Average humidity",
    not_found: "City not found or error retrieving weather data.",
    generic_failure: "An error occurred. Please try again later.",
    chart: ChartLabels {
        x_axis: "Date",
        temperature_axis: "Temperature (°C)",
        secondary_axis: "Wind speed (m/s) / Humidity (%)",
        temperature: "Average temperature",
        wind_speed: "Average wind speed",
        humidity: "Average humidity",
    },
};
