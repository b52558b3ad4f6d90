use std::fmt::Write;

use crate::{locale::Locale, model::ForecastResult};

/// Render a number with one decimal place.
///
/// Rounds the exact binary value, so `13.05` becomes `13.1` while an exact
/// half such as `0.25` rounds to even (`0.2`).
pub fn one_decimal(value: f64) -> String {
    format!("{value:.1}")
}

/// Chat text for a forecast: a header naming the city, then one block per day.
pub fn format_summary(result: &ForecastResult, locale: Locale) -> String {
    let texts = locale.texts();
    let mut out = texts.header_for(&result.city);
    out.push('\n');

    for day in &result.days {
        // Writing into a String cannot fail.
        let _ = write!(
            out,
            "\n**{date}**\n\
             {temp_label}: {temp}°C\n\
             {weather_label}: {description}\n\
             {wind_label}: {wind} m/s\n\
             {humidity_label}: {humidity}%\n",
            date = day.date_label(),
            temp_label = texts.avg_temperature,
            temp = one_decimal(day.mean_temperature),
            weather_label = texts.weather,
            description = day.dominant_description,
            wind_label = texts.avg_wind_speed,
            wind = one_decimal(day.mean_wind_speed),
            humidity_label = texts.avg_humidity,
            humidity = one_decimal(day.mean_humidity),
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DailySummary;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, temp: f64) -> DailySummary {
        DailySummary {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            mean_temperature: temp,
            mean_wind_speed: 3.44,
            mean_humidity: 71.26,
            dominant_description: "Leichter Regen".into(),
        }
    }

    #[test]
    fn one_decimal_rounding() {
        assert_eq!(one_decimal(13.0), "13.0");
        assert_eq!(one_decimal(13.04), "13.0");
        assert_eq!(one_decimal(13.05), "13.1");
        assert_eq!(one_decimal(13.15), "13.2");
        assert_eq!(one_decimal(0.25), "0.2");
        assert_eq!(one_decimal(-2.36), "-2.4");
    }

    #[test]
    fn german_summary_layout() {
        let result = ForecastResult { city: "Berlin".into(), days: vec![day(2024, 5, 1, 13.0)] };

        let text = format_summary(&result, Locale::De);

        assert_eq!(
            text,
            "Wettervorhersage für Berlin:\n\
             \n**01.05.2024**\n\
             Durchschnittstemperatur: 13.0°C\n\
             Wetter: Leichter Regen\n\
             Durchschnittliche Windgeschwindigkeit: 3.4 m/s\n\
             Durchschnittliche Luftfeuchtigkeit: 71.3%\n"
        );
    }

    #[test]
    fn one_block_per_day_in_order() {
        let result = ForecastResult {
            city: "Oslo".into(),
            days: vec![day(2024, 5, 1, 13.0), day(2024, 5, 2, 23.0), day(2024, 5, 3, -1.0)],
        };

        let text = format_summary(&result, Locale::En);

        assert!(text.starts_with("Weather forecast for Oslo:\n"));
        assert_eq!(text.matches("Average temperature:").count(), 3);
        let first = text.find("**01.05.2024**").unwrap();
        let second = text.find("**02.05.2024**").unwrap();
        let third = text.find("**03.05.2024**").unwrap();
        assert!(first < second && second < third);
        assert!(text.contains("Average temperature: 23.0°C"));
        assert!(text.contains("Average temperature: -1.0°C"));
    }
}
