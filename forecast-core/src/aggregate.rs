use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    error::AggregateError,
    model::{DailySummary, ForecastResult, ForecastSample},
};

/// Group samples by calendar date and compute per-day statistics.
///
/// Days come out in ascending date order whatever the input order was. The
/// dominant description is the most frequent one of the day; on equal counts
/// the description seen first wins.
pub fn aggregate(
    city: impl Into<String>,
    samples: &[ForecastSample],
) -> Result<ForecastResult, AggregateError> {
    if samples.is_empty() {
        return Err(AggregateError::EmptyInput);
    }

    let mut days: BTreeMap<NaiveDate, DayBucket<'_>> = BTreeMap::new();

    for (index, sample) in samples.iter().enumerate() {
        validate(index, sample)?;
        days.entry(sample.timestamp.date()).or_default().push(sample);
    }

    let days = days.into_iter().map(|(date, bucket)| bucket.summarize(date)).collect();

    Ok(ForecastResult { city: city.into(), days })
}

fn validate(index: usize, sample: &ForecastSample) -> Result<(), AggregateError> {
    let malformed = |reason: &str| AggregateError::MalformedSample { index, reason: reason.to_string() };

    if !sample.temperature.is_finite() {
        return Err(malformed("temperature is missing or not a number"));
    }
    if !sample.wind_speed.is_finite() {
        return Err(malformed("wind speed is missing or not a number"));
    }
    if !(0.0..=100.0).contains(&sample.humidity) {
        return Err(malformed("humidity is missing or outside 0..=100"));
    }
    if sample.description.trim().is_empty() {
        return Err(malformed("description is missing"));
    }

    Ok(())
}

#[derive(Default)]
struct DayBucket<'a> {
    temperature_sum: f64,
    wind_speed_sum: f64,
    humidity_sum: f64,
    count: usize,
    /// Distinct descriptions in first-seen order with their counts.
    descriptions: Vec<(&'a str, usize)>,
}

impl<'a> DayBucket<'a> {
    fn push(&mut self, sample: &'a ForecastSample) {
        self.temperature_sum += sample.temperature;
        self.wind_speed_sum += sample.wind_speed;
        self.humidity_sum += sample.humidity;
        self.count += 1;

        match self.descriptions.iter_mut().find(|(d, _)| *d == sample.description) {
            Some((_, n)) => *n += 1,
            None => self.descriptions.push((&sample.description, 1)),
        }
    }

    fn dominant_description(&self) -> &'a str {
        // Strictly-greater comparison keeps the earliest entry on ties.
        let mut best: Option<(&'a str, usize)> = None;
        for &(description, n) in &self.descriptions {
            if best.is_none_or(|(_, best_n)| n > best_n) {
                best = Some((description, n));
            }
        }
        best.map(|(d, _)| d).unwrap_or_default()
    }

    fn summarize(self, date: NaiveDate) -> DailySummary {
        let n = self.count as f64;
        DailySummary {
            date,
            mean_temperature: self.temperature_sum / n,
            mean_wind_speed: self.wind_speed_sum / n,
            mean_humidity: self.humidity_sum / n,
            dominant_description: self.dominant_description().to_string(),
        }
    }
}
