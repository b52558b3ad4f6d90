//! Dual-axis line chart of the daily summaries.
//!
//! Temperature sits on the left axis. Wind speed and humidity share the right
//! axis even though their units differ; the chart is meant for comparing
//! trends, not reading exact values.

use std::{ops::Range, sync::OnceLock};

use image::{ColorType, ImageEncoder, codecs::png::PngEncoder};
use plotters::{
    coord::Shift,
    prelude::*,
    style::{FontStyle, register_font},
};

use crate::{
    error::RenderError,
    locale::ChartLabels,
    model::{DailySummary, ForecastResult},
};

/// 10x6 inches at 100 DPI.
pub const WIDTH: u32 = 1000;
pub const HEIGHT: u32 = 600;

/// Text is drawn with this embedded font, so rendering never needs host fonts.
const FONT_FAMILY: &str = "sans-serif";
static FONT_BYTES: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");

const CHART_MARGIN: i32 = 20;
const X_LABEL_AREA_SIZE: i32 = 55;
const PLOT_HEIGHT: i32 = HEIGHT as i32 - 2 * CHART_MARGIN - X_LABEL_AREA_SIZE;

const TEMPERATURE_COLOR: RGBColor = RGBColor(214, 39, 40);
const WIND_COLOR: RGBColor = RGBColor(31, 119, 180);
const HUMIDITY_COLOR: RGBColor = RGBColor(44, 160, 44);
const AXIS_TEXT_COLOR: RGBColor = RGBColor(40, 40, 40);

const MARKER_SIZE: i32 = 5;
const LEGEND_MARGIN: i32 = 10;
const LEGEND_PADDING: i32 = 8;
const LEGEND_ROW_HEIGHT: i32 = 22;
const LEGEND_SWATCH_WIDTH: i32 = 28;
/// Rows of the tallest legend box (wind speed and humidity).
const LEGEND_MAX_ROWS: usize = 2;

#[derive(Debug, Clone, Copy)]
enum Marker {
    Circle,
    Square,
    Triangle,
}

#[derive(Debug, Clone, Copy)]
enum Corner {
    UpperLeft,
    UpperRight,
}

struct LegendEntry<'a> {
    label: &'a str,
    color: RGBColor,
    marker: Marker,
}

/// Draw the forecast chart and return it as PNG bytes.
pub fn render(result: &ForecastResult, labels: &ChartLabels) -> Result<Vec<u8>, RenderError> {
    if result.days.is_empty() {
        return Err(RenderError::EmptyResult);
    }

    ensure_font()?;

    let mut pixels = vec![0u8; (WIDTH * HEIGHT * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (WIDTH, HEIGHT)).into_drawing_area();
        draw(&root, &result.days, labels)?;
        root.present().map_err(draw_error)?;
    }

    encode_png(&pixels, WIDTH, HEIGHT)
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    days: &[DailySummary],
    labels: &ChartLabels,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(draw_error)?;

    let dates: Vec<String> = days.iter().map(DailySummary::date_label).collect();
    let x_range = x_range(days.len());

    let temperature_range =
        with_legend_headroom(padded_range(days.iter().map(|d| d.mean_temperature)));
    let secondary_range = with_legend_headroom(non_negative(padded_range(
        days.iter().flat_map(|d| [d.mean_wind_speed, d.mean_humidity]),
    )));

    let mut chart = ChartBuilder::on(root)
        .margin(CHART_MARGIN)
        .x_label_area_size(X_LABEL_AREA_SIZE)
        .y_label_area_size(70)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), temperature_range)
        .map_err(draw_error)?
        .set_secondary_coord(x_range, secondary_range);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(days.len() + 3)
        .x_label_formatter(&|x| tick_label(&dates, *x))
        .x_desc(labels.x_axis)
        .y_desc(labels.temperature_axis)
        .y_labels(8)
        .y_label_formatter(&|v| format!("{v:.1}"))
        .x_label_style((FONT_FAMILY, 15).into_font().color(&AXIS_TEXT_COLOR))
        .y_label_style((FONT_FAMILY, 15).into_font().color(&TEMPERATURE_COLOR))
        .axis_desc_style((FONT_FAMILY, 17).into_font().color(&AXIS_TEXT_COLOR))
        .light_line_style(ShapeStyle::from(&WHITE))
        .draw()
        .map_err(draw_error)?;

    chart
        .configure_secondary_axes()
        .y_desc(labels.secondary_axis)
        .y_labels(8)
        .y_label_formatter(&|v| format!("{v:.0}"))
        .label_style((FONT_FAMILY, 15).into_font().color(&AXIS_TEXT_COLOR))
        .axis_desc_style((FONT_FAMILY, 17).into_font().color(&AXIS_TEXT_COLOR))
        .draw()
        .map_err(draw_error)?;

    let temperatures = points(days, |d| d.mean_temperature);
    let winds = points(days, |d| d.mean_wind_speed);
    let humidities = points(days, |d| d.mean_humidity);

    chart
        .draw_series(LineSeries::new(temperatures.iter().copied(), TEMPERATURE_COLOR.stroke_width(2)))
        .map_err(draw_error)?;
    chart
        .draw_series(
            temperatures.iter().map(|&p| Circle::new(p, MARKER_SIZE, TEMPERATURE_COLOR.filled())),
        )
        .map_err(draw_error)?;

    chart
        .draw_secondary_series(LineSeries::new(winds.iter().copied(), WIND_COLOR.stroke_width(2)))
        .map_err(draw_error)?;
    chart
        .draw_secondary_series(winds.iter().map(|&p| {
            EmptyElement::at(p)
                + Rectangle::new(
                    [(-MARKER_SIZE, -MARKER_SIZE), (MARKER_SIZE, MARKER_SIZE)],
                    WIND_COLOR.filled(),
                )
        }))
        .map_err(draw_error)?;

    chart
        .draw_secondary_series(LineSeries::new(
            humidities.iter().copied(),
            HUMIDITY_COLOR.stroke_width(2),
        ))
        .map_err(draw_error)?;
    chart
        .draw_secondary_series(
            humidities
                .iter()
                .map(|&p| TriangleMarker::new(p, MARKER_SIZE + 1, HUMIDITY_COLOR.filled())),
        )
        .map_err(draw_error)?;

    // plotters keeps a single legend for all series, so each axis gets its own box.
    let plot_area = chart.plotting_area().strip_coord_spec();
    draw_legend(
        &plot_area,
        &[LegendEntry { label: labels.temperature, color: TEMPERATURE_COLOR, marker: Marker::Circle }],
        Corner::UpperLeft,
    )?;
    draw_legend(
        &plot_area,
        &[
            LegendEntry { label: labels.wind_speed, color: WIND_COLOR, marker: Marker::Square },
            LegendEntry { label: labels.humidity, color: HUMIDITY_COLOR, marker: Marker::Triangle },
        ],
        Corner::UpperRight,
    )?;

    Ok(())
}

fn draw_legend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    entries: &[LegendEntry<'_>],
    corner: Corner,
) -> Result<(), RenderError> {
    let style = TextStyle::from((FONT_FAMILY, 14).into_font());

    let mut text_width = 0;
    for entry in entries {
        let (w, _) = area.estimate_text_size(entry.label, &style).map_err(draw_error)?;
        text_width = text_width.max(w as i32);
    }

    let box_width = LEGEND_PADDING * 3 + LEGEND_SWATCH_WIDTH + text_width;
    let box_height = legend_box_height(entries.len());
    let (area_width, _) = area.dim_in_pixel();

    let x0 = match corner {
        Corner::UpperLeft => LEGEND_MARGIN,
        Corner::UpperRight => area_width as i32 - LEGEND_MARGIN - box_width,
    };
    let y0 = LEGEND_MARGIN;
    let frame = [(x0, y0), (x0 + box_width, y0 + box_height)];

    area.draw(&Rectangle::new(frame, WHITE.mix(0.85).filled())).map_err(draw_error)?;
    area.draw(&Rectangle::new(frame, BLACK.mix(0.3).stroke_width(1))).map_err(draw_error)?;

    for (row, entry) in entries.iter().enumerate() {
        let y = y0 + LEGEND_PADDING + LEGEND_ROW_HEIGHT * row as i32 + LEGEND_ROW_HEIGHT / 2;
        let swatch_start = x0 + LEGEND_PADDING;
        let swatch_mid = swatch_start + LEGEND_SWATCH_WIDTH / 2;

        area.draw(&PathElement::new(
            vec![(swatch_start, y), (swatch_start + LEGEND_SWATCH_WIDTH, y)],
            entry.color.stroke_width(2),
        ))
        .map_err(draw_error)?;

        let r = MARKER_SIZE - 1;
        match entry.marker {
            Marker::Circle => area.draw(&Circle::new((swatch_mid, y), r, entry.color.filled())),
            Marker::Square => area.draw(&Rectangle::new(
                [(swatch_mid - r, y - r), (swatch_mid + r, y + r)],
                entry.color.filled(),
            )),
            Marker::Triangle => {
                area.draw(&TriangleMarker::new((swatch_mid, y), r + 1, entry.color.filled()))
            }
        }
        .map_err(draw_error)?;

        area.draw(&Text::new(
            entry.label.to_string(),
            (swatch_start + LEGEND_SWATCH_WIDTH + LEGEND_PADDING, y - 8),
            style.clone(),
        ))
        .map_err(draw_error)?;
    }

    Ok(())
}

fn encode_png(pixels: &[u8], width: u32, height: u32) -> Result<Vec<u8>, RenderError> {
    let mut png = Vec::new();
    PngEncoder::new(&mut png).write_image(pixels, width, height, ColorType::Rgb8)?;
    Ok(png)
}

fn ensure_font() -> Result<(), RenderError> {
    static REGISTERED: OnceLock<bool> = OnceLock::new();

    let registered = *REGISTERED
        .get_or_init(|| register_font(FONT_FAMILY, FontStyle::Normal, FONT_BYTES).is_ok());
    if registered {
        Ok(())
    } else {
        Err(RenderError::Draw("embedded chart font could not be loaded".to_string()))
    }
}

fn draw_error<E: std::fmt::Display>(err: E) -> RenderError {
    RenderError::Draw(err.to_string())
}

/// Day indices with one empty slot on each side so the first and last
/// markers do not sit on the chart frame.
fn x_range(days: usize) -> Range<i32> {
    -1..days as i32
}

fn tick_label(dates: &[String], x: i32) -> String {
    usize::try_from(x).ok().and_then(|i| dates.get(i)).cloned().unwrap_or_default()
}

fn points(days: &[DailySummary], value: impl Fn(&DailySummary) -> f64) -> Vec<(i32, f64)> {
    days.iter().enumerate().map(|(i, d)| (i as i32, value(d))).collect()
}

/// Data span padded by 10 % (at least 1.0) on both ends.
fn padded_range(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }

    let padding = ((max - min) * 0.1).max(1.0);
    (min - padding)..(max + padding)
}

fn non_negative(range: Range<f64>) -> Range<f64> {
    range.start.max(0.0)..range.end
}

fn legend_box_height(rows: usize) -> i32 {
    LEGEND_PADDING * 2 + LEGEND_ROW_HEIGHT * rows as i32
}

/// Raise the top of the axis so the band under the legend boxes stays free of data.
fn with_legend_headroom(range: Range<f64>) -> Range<f64> {
    let reserved = f64::from(2 * LEGEND_MARGIN + legend_box_height(LEGEND_MAX_ROWS));
    let plot = f64::from(PLOT_HEIGHT);
    let span = range.end - range.start;
    range.start..range.end + span * reserved / (plot - reserved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::Locale;
    use chrono::NaiveDate;

    fn result_with_days(n: u32) -> ForecastResult {
        let days = (0..n)
            .map(|i| DailySummary {
                date: NaiveDate::from_ymd_opt(2024, 5, 1 + i).unwrap(),
                mean_temperature: 10.0 + i as f64,
                mean_wind_speed: 3.0,
                mean_humidity: 60.0 + i as f64,
                dominant_description: "clear sky".into(),
            })
            .collect();
        ForecastResult { city: "Berlin".into(), days }
    }

    #[test]
    fn empty_result_is_rejected() {
        let result = result_with_days(0);
        let err = render(&result, &Locale::De.texts().chart).unwrap_err();
        assert!(matches!(err, RenderError::EmptyResult));
    }

    #[test]
    fn padded_range_adds_ten_percent() {
        let range = padded_range([0.0, 20.0]);
        assert!((range.start + 2.0).abs() < 1e-9);
        assert!((range.end - 22.0).abs() < 1e-9);
    }

    #[test]
    fn padded_range_has_minimum_padding() {
        assert_eq!(padded_range([5.0]), 4.0..6.0);
        assert_eq!(padded_range(std::iter::empty()), 0.0..1.0);
    }

    #[test]
    fn secondary_range_is_clamped_at_zero() {
        assert_eq!(non_negative(padded_range([0.5, 90.0])).start, 0.0);
    }

    #[test]
    fn ticks_outside_days_are_blank() {
        let dates = vec!["01.05.2024".to_string(), "02.05.2024".to_string()];
        assert_eq!(tick_label(&dates, -1), "");
        assert_eq!(tick_label(&dates, 0), "01.05.2024");
        assert_eq!(tick_label(&dates, 1), "02.05.2024");
        assert_eq!(tick_label(&dates, 2), "");
        assert_eq!(x_range(2), -1..2);
    }

    #[test]
    fn encoded_buffer_is_png() {
        let pixels = vec![255u8; 4 * 3 * 3];
        let png = encode_png(&pixels, 4, 3).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn renders_png_for_five_days() {
        let result = result_with_days(5);
        let png = render(&result, &Locale::En.texts().chart).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory_with_format(&png, image::ImageFormat::Png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (WIDTH, HEIGHT));
    }

    #[test]
    fn renders_single_day() {
        let png = render(&result_with_days(1), &Locale::De.texts().chart).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn highest_point_stays_below_legends() {
        let data_max = 20.0;
        let range = with_legend_headroom(padded_range([10.0, data_max]));

        let px_per_unit = f64::from(PLOT_HEIGHT) / (range.end - range.start);
        let gap_above_max = (range.end - data_max) * px_per_unit;
        let legend_bottom = f64::from(LEGEND_MARGIN + legend_box_height(LEGEND_MAX_ROWS));

        assert!(gap_above_max > legend_bottom, "{gap_above_max} <= {legend_bottom}");
        assert_eq!(range.start, padded_range([10.0, data_max]).start);
    }
}
