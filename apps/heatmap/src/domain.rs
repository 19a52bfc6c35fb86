use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Month {
    January,
    February,
    March,
    April,
    May,
    June,
    July,
    August,
    September,
    October,
    November,
    December,
}

impl Month {
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Zero-based month, as carried by the `data-month` cell attribute.
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        if index < Self::ALL.len() {
            Some(Self::ALL[index])
        } else {
            None
        }
    }

    /// One-based month number, as found in the source document.
    pub fn from_number(number: i64) -> Option<Self> {
        let index = usize::try_from(number.checked_sub(1)?).ok()?;
        Self::from_index(index)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

/// One month of one year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemperatureRecord {
    pub year: i32,
    pub month: Month,
    /// Absolute temperature, rounded to one decimal.
    pub temperature: f64,
    pub variance: f64,
}

impl TemperatureRecord {
    pub fn new(year: i32, month: Month, base_temperature: f64, variance: f64) -> Self {
        Self {
            year,
            month,
            temperature: round_tenth(base_temperature + variance),
            variance,
        }
    }

    pub const fn month_index(&self) -> usize {
        self.month.index()
    }

    pub const fn month_name(&self) -> &'static str {
        self.month.label()
    }
}

/// Records in source order together with the base temperature they were computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub base_temperature: f64,
    pub records: Vec<TemperatureRecord>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn year_range(&self) -> Option<(i32, i32)> {
        let mut years = self.records.iter().map(|record| record.year);
        let first = years.next()?;
        Some(years.fold((first, first), |(min, max), year| {
            (min.min(year), max.max(year))
        }))
    }

    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        min_max(self.records.iter().map(|record| record.temperature))
    }

    pub fn variance_range(&self) -> Option<(f64, f64)> {
        min_max(self.records.iter().map(|record| record.variance))
    }
}

pub(crate) fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |range, value| match range {
        None => Some((value, value)),
        Some((min, max)) => Some((f64::min(min, value), f64::max(max, value))),
    })
}

/// Rounds to one decimal, halves toward positive infinity.
pub fn round_tenth(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Shortest round-trip decimal form, without a trailing `.0` or a negative zero.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    format!("{value}")
}
