//! Value-to-screen mappings for the heatmap.
//!
//! Every scale is rebuilt from scratch out of the dataset's extremes; none of
//! them keep state between builds.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use crate::domain::{Dataset, Month};
use crate::error::ScaleError;
use crate::layout::ChartLayout;

/// Years between labelled ticks on the time axis.
pub const YEAR_TICK_STEP: i32 = 10;

/// Tick count requested from the legend axis.
pub const LEGEND_TICK_COUNT: usize = 10;

/// The instant a year is plotted at: August 1st, midnight, without a timezone.
pub fn year_anchor(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 8, 1)?.and_hms_opt(0, 0, 0)
}

fn year_start(year: i32) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(year, 1, 1)?.and_hms_opt(0, 0, 0)
}

fn millis(instant: NaiveDateTime) -> i64 {
    instant.and_utc().timestamp_millis()
}

/// Maps `value` from `domain` onto `range`; a collapsed domain lands on the midpoint.
fn interpolate(value: f64, domain: (f64, f64), range: (f64, f64)) -> f64 {
    let t = normalize(value, domain);
    range.0 + t * (range.1 - range.0)
}

fn normalize(value: f64, domain: (f64, f64)) -> f64 {
    let span = domain.1 - domain.0;
    if span == 0.0 {
        0.5
    } else {
        (value - domain.0) / span
    }
}

/// A labelled position along an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub offset: f64,
    pub label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeScale {
    domain: (NaiveDateTime, NaiveDateTime),
    range: (f64, f64),
}

impl TimeScale {
    pub fn new(min_year: i32, max_year: i32, range: (f64, f64)) -> Result<Self, ScaleError> {
        let start = year_anchor(min_year).ok_or(ScaleError::YearOutOfRange(min_year))?;
        let end = year_anchor(max_year).ok_or(ScaleError::YearOutOfRange(max_year))?;
        Ok(Self {
            domain: (start, end),
            range,
        })
    }

    pub const fn domain(&self) -> (NaiveDateTime, NaiveDateTime) {
        self.domain
    }

    pub fn apply(&self, instant: NaiveDateTime) -> f64 {
        let domain = (
            millis(self.domain.0) as f64,
            millis(self.domain.1) as f64,
        );
        interpolate(millis(instant) as f64, domain, self.range)
    }

    /// Horizontal position of a year's anchor.
    pub fn year(&self, year: i32) -> Result<f64, ScaleError> {
        let anchor = year_anchor(year).ok_or(ScaleError::YearOutOfRange(year))?;
        Ok(self.apply(anchor))
    }

    /// January 1st of every year divisible by `step` that falls inside the domain.
    pub fn year_ticks(&self, step: i32) -> Vec<Tick> {
        let step = step.max(1);
        let (start, end) = self.domain;
        let first = start.year().div_euclid(step) * step;

        (0..)
            .map_while(|n: i32| first.checked_add(n.checked_mul(step)?))
            .filter_map(|year| Some((year, year_start(year)?)))
            .skip_while(|(_, instant)| *instant < start)
            .take_while(|(_, instant)| *instant <= end)
            .map(|(year, instant)| Tick {
                offset: self.apply(instant),
                label: format!("{year:04}"),
            })
            .collect()
    }
}

/// Twelve month names onto twelve equal bands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandScale {
    range: (f64, f64),
}

impl BandScale {
    pub const fn new(range: (f64, f64)) -> Self {
        Self { range }
    }

    pub const fn domain(&self) -> [Month; 12] {
        Month::ALL
    }

    pub fn bandwidth(&self) -> f64 {
        (self.range.1 - self.range.0) / Month::ALL.len() as f64
    }

    pub fn apply(&self, month: Month) -> f64 {
        self.range.0 + self.bandwidth() * month.index() as f64
    }

    /// Band centers, where the month axis places its labels.
    pub fn ticks(&self) -> Vec<Tick> {
        Month::ALL
            .into_iter()
            .map(|month| Tick {
                offset: self.apply(month) + self.bandwidth() / 2.0,
                label: month.label().to_string(),
            })
            .collect()
    }
}

/// An sRGB color as produced by the color ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl From<colorous::Color> for Rgb {
    fn from(color: colorous::Color) -> Self {
        Self {
            r: color.r,
            g: color.g,
            b: color.b,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Continuous red-yellow-blue ramp over a temperature domain.
///
/// The domain runs from the warmest temperature to the coldest so that warm
/// months come out red and cold months blue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SequentialColorScale {
    domain: (f64, f64),
}

impl SequentialColorScale {
    pub const fn new(domain: (f64, f64)) -> Self {
        Self { domain }
    }

    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn apply(&self, value: f64) -> Rgb {
        let t = normalize(value, self.domain);
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        colorous::RED_YELLOW_BLUE.eval_continuous(t).into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    pub const fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    pub fn apply(&self, value: f64) -> f64 {
        interpolate(value, self.domain, self.range)
    }

    /// Round values spaced 1, 2 or 5 times a power of ten, about `count` of them.
    pub fn tick_values(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count as f64)
    }

    pub fn ticks(&self, count: usize) -> Vec<Tick> {
        let decimals = tick_precision(self.domain.0, self.domain.1, count as f64);
        self.tick_values(count)
            .into_iter()
            .map(|value| Tick {
                offset: self.apply(value),
                label: format_tick(value, decimals),
            })
            .collect()
    }
}

const E10: f64 = 7.071_067_811_865_475; // sqrt(50)
const E5: f64 = 3.162_277_660_168_379_5; // sqrt(10)
const E2: f64 = std::f64::consts::SQRT_2;

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Returns `(i1, i2, increment)`; a negative increment means "divide by its magnitude".
fn tick_steps(start: f64, stop: f64, count: f64) -> (f64, f64, f64) {
    let step = (stop - start) / count.max(0.0);
    let power = step.log10().floor();
    let error = step / 10_f64.powf(power);
    let factor = if error >= E10 {
        10.0
    } else if error >= E5 {
        5.0
    } else if error >= E2 {
        2.0
    } else {
        1.0
    };

    let (i1, i2, increment) = if power < 0.0 {
        let inverse = 10_f64.powf(-power) / factor;
        let mut i1 = round_half_up(start * inverse);
        let mut i2 = round_half_up(stop * inverse);
        if i1 / inverse < start {
            i1 += 1.0;
        }
        if i2 / inverse > stop {
            i2 -= 1.0;
        }
        (i1, i2, -inverse)
    } else {
        let step = 10_f64.powf(power) * factor;
        let mut i1 = round_half_up(start / step);
        let mut i2 = round_half_up(stop / step);
        if i1 * step < start {
            i1 += 1.0;
        }
        if i2 * step > stop {
            i2 -= 1.0;
        }
        (i1, i2, step)
    };

    if i2 < i1 && (0.5..2.0).contains(&count) {
        return tick_steps(start, stop, count * 2.0);
    }
    (i1, i2, increment)
}

pub(crate) fn nice_ticks(start: f64, stop: f64, count: f64) -> Vec<f64> {
    if count.is_nan() || count <= 0.0 || !start.is_finite() || !stop.is_finite() {
        return Vec::new();
    }
    if start == stop {
        return vec![start];
    }

    let reverse = stop < start;
    let (low, high) = if reverse { (stop, start) } else { (start, stop) };
    let (i1, i2, increment) = tick_steps(low, high, count);
    if i1.is_nan() || i2.is_nan() || i2 < i1 {
        return Vec::new();
    }

    let n = (i2 - i1) as usize + 1;
    let value = |k: f64| {
        if increment < 0.0 {
            k / -increment
        } else {
            k * increment
        }
    };
    (0..n)
        .map(|i| {
            let i = i as f64;
            if reverse {
                value(i2 - i)
            } else {
                value(i1 + i)
            }
        })
        .collect()
}

/// Decimal places needed to tell neighbouring ticks apart.
fn tick_precision(start: f64, stop: f64, count: f64) -> usize {
    if count.is_nan() || count <= 0.0 || start == stop || !start.is_finite() || !stop.is_finite() {
        return 0;
    }
    let (low, high) = if stop < start { (stop, start) } else { (start, stop) };
    let (_, _, increment) = tick_steps(low, high, count);
    let step = if increment < 0.0 {
        1.0 / -increment
    } else {
        increment
    };
    let exponent = step.abs().log10().floor();
    if exponent < 0.0 {
        (-exponent) as usize
    } else {
        0
    }
}

/// Fixed-point tick label using a typographic minus sign.
fn format_tick(value: f64, decimals: usize) -> String {
    let label = format!("{value:.decimals$}");
    match label.strip_prefix('-') {
        Some(magnitude) if magnitude.chars().any(|c| c != '0' && c != '.') => {
            format!("\u{2212}{magnitude}")
        }
        Some(magnitude) => magnitude.to_string(),
        None => label,
    }
}

/// The four scales the renderer draws with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scales {
    pub x: TimeScale,
    pub y: BandScale,
    pub color: SequentialColorScale,
    pub legend: LinearScale,
    pub year_range: (i32, i32),
    pub temperature_range: (f64, f64),
}

impl Scales {
    pub fn build(dataset: &Dataset, layout: &ChartLayout) -> Result<Self, ScaleError> {
        let (min_year, max_year) = dataset.year_range().ok_or(ScaleError::EmptyDataset)?;
        let (min_temp, max_temp) = dataset
            .temperature_range()
            .ok_or(ScaleError::EmptyDataset)?;

        Ok(Self {
            x: TimeScale::new(min_year, max_year, (0.0, layout.width))?,
            y: BandScale::new((0.0, layout.plot_height())),
            color: SequentialColorScale::new((max_temp, min_temp)),
            legend: LinearScale::new((min_temp, max_temp), (0.0, layout.legend_width)),
            year_range: (min_year, max_year),
            temperature_range: (min_temp, max_temp),
        })
    }

    /// Number of distinct year columns the plot width is divided into.
    pub fn year_columns(&self) -> u32 {
        self.year_range.1.abs_diff(self.year_range.0) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TemperatureRecord;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual}, diff {diff}"
        );
    }

    fn dataset(records: &[(i32, Month, f64)]) -> Dataset {
        Dataset {
            base_temperature: 8.0,
            records: records
                .iter()
                .map(|&(year, month, variance)| TemperatureRecord::new(year, month, 8.0, variance))
                .collect(),
        }
    }

    #[test]
    fn year_anchor_is_first_of_august_at_midnight() {
        let anchor = year_anchor(1900).map(|anchor| anchor.to_string());
        assert_eq!(anchor.as_deref(), Some("1900-08-01 00:00:00"));
    }

    #[test]
    fn time_scale_maps_domain_ends_to_range_ends() -> Result<(), ScaleError> {
        let scale = TimeScale::new(1753, 2015, (0.0, 1200.0))?;
        assert_close(scale.year(1753)?, 0.0);
        assert_close(scale.year(2015)?, 1200.0);

        let middle = scale.year(1884)?;
        assert!((599.0..601.0).contains(&middle), "got {middle}");
        Ok(())
    }

    #[test]
    fn time_scale_with_single_year_uses_midpoint() -> Result<(), ScaleError> {
        let scale = TimeScale::new(2000, 2000, (0.0, 1200.0))?;
        assert_close(scale.year(2000)?, 600.0);
        assert!(scale.year_ticks(YEAR_TICK_STEP).is_empty());
        Ok(())
    }

    #[test]
    fn year_ticks_fall_on_decades_inside_domain() -> Result<(), ScaleError> {
        let scale = TimeScale::new(1753, 2015, (0.0, 1200.0))?;
        let ticks = scale.year_ticks(YEAR_TICK_STEP);

        let labels: Vec<_> = ticks.iter().map(|tick| tick.label.as_str()).collect();
        assert_eq!(labels.first(), Some(&"1760"));
        assert_eq!(labels.last(), Some(&"2010"));
        assert_eq!(labels.len(), 26);
        assert!(ticks.iter().all(|tick| (0.0..=1200.0).contains(&tick.offset)));
        Ok(())
    }

    #[test]
    fn decade_start_year_is_excluded_when_anchor_is_later() -> Result<(), ScaleError> {
        let scale = TimeScale::new(1760, 1780, (0.0, 100.0))?;
        let labels: Vec<_> = scale
            .year_ticks(YEAR_TICK_STEP)
            .into_iter()
            .map(|tick| tick.label)
            .collect();
        assert_eq!(labels, vec!["1770", "1780"]);
        Ok(())
    }

    #[test]
    fn band_scale_splits_height_into_twelve_bands() {
        let scale = BandScale::new((0.0, 590.0));
        assert_close(scale.bandwidth(), 590.0 / 12.0);
        assert_close(scale.apply(Month::January), 0.0);
        assert_close(scale.apply(Month::December), 590.0 / 12.0 * 11.0);

        let labels: Vec<_> = scale.ticks().into_iter().map(|tick| tick.label).collect();
        assert_eq!(labels[0], "January");
        assert_eq!(labels[11], "December");
    }

    #[test]
    fn color_domain_runs_from_warmest_to_coldest() -> Result<(), ScaleError> {
        let data = dataset(&[
            (1900, Month::January, -6.0),
            (1900, Month::July, 5.0),
            (1901, Month::March, 0.0),
        ]);
        let scales = Scales::build(&data, &ChartLayout::default())?;

        assert_eq!(scales.color.domain(), (13.0, 2.0));
        assert_eq!(scales.legend.domain(), (2.0, 13.0));
        Ok(())
    }

    #[test]
    fn warm_values_are_red_and_cold_values_blue() {
        let scale = SequentialColorScale::new((13.0, 2.0));
        let warm = scale.apply(13.0);
        let cold = scale.apply(2.0);

        assert!(warm.r > warm.b, "warm end should be red, got {warm}");
        assert!(cold.b > cold.r, "cold end should be blue, got {cold}");
        assert_eq!(scale.apply(40.0), warm);
        assert_eq!(scale.apply(-40.0), cold);
    }

    #[test]
    fn collapsed_color_domain_uses_ramp_midpoint() {
        let scale = SequentialColorScale::new((7.5, 7.5));
        assert_eq!(
            scale.apply(7.5),
            Rgb::from(colorous::RED_YELLOW_BLUE.eval_continuous(0.5))
        );
    }

    #[test]
    fn colors_print_as_css_rgb() {
        let color = Rgb { r: 165, g: 0, b: 38 };
        assert_eq!(color.to_string(), "rgb(165, 0, 38)");
    }

    #[test]
    fn linear_ticks_use_round_steps() {
        let scale = LinearScale::new((1.7, 13.9), (0.0, 600.0));
        let values = scale.tick_values(LEGEND_TICK_COUNT);
        assert_eq!(values, vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0]);

        let labels: Vec<_> = scale
            .ticks(LEGEND_TICK_COUNT)
            .into_iter()
            .map(|tick| tick.label)
            .collect();
        assert_eq!(labels[0], "2");
    }

    #[test]
    fn narrow_domains_get_decimal_tick_labels() {
        let scale = LinearScale::new((7.0, 8.0), (0.0, 600.0));
        let ticks = scale.ticks(LEGEND_TICK_COUNT);
        assert_eq!(ticks.len(), 11);
        assert_eq!(ticks[1].label, "7.1");
        assert_close(ticks[10].offset, 600.0);
    }

    #[test]
    fn negative_ticks_use_minus_sign() {
        let labels: Vec<_> = LinearScale::new((-2.0, 2.0), (0.0, 100.0))
            .ticks(4)
            .into_iter()
            .map(|tick| tick.label)
            .collect();
        assert_eq!(labels, vec!["\u{2212}2", "\u{2212}1", "0", "1", "2"]);
    }

    #[test]
    fn collapsed_linear_domain_has_single_tick() {
        let scale = LinearScale::new((7.5, 7.5), (0.0, 600.0));
        assert_eq!(scale.tick_values(LEGEND_TICK_COUNT), vec![7.5]);
        assert_close(scale.apply(7.5), 300.0);
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let data = dataset(&[]);
        assert_eq!(
            Scales::build(&data, &ChartLayout::default()),
            Err(ScaleError::EmptyDataset)
        );
    }

    #[test]
    fn year_columns_count_inclusive_range() -> Result<(), ScaleError> {
        let data = dataset(&[(1753, Month::January, 0.0), (2015, Month::May, 0.0)]);
        let scales = Scales::build(&data, &ChartLayout::default())?;
        assert_eq!(scales.year_columns(), 263);
        Ok(())
    }
}
