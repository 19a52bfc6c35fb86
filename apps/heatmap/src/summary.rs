use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::domain::{format_number, Dataset, TemperatureRecord};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRecord {
    pub year: i32,
    pub month: &'static str,
    pub temperature: f64,
    pub variance: f64,
}

impl From<&TemperatureRecord> for SummaryRecord {
    fn from(record: &TemperatureRecord) -> Self {
        Self {
            year: record.year,
            month: record.month_name(),
            temperature: record.temperature,
            variance: record.variance,
        }
    }
}

/// Headline numbers for a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub records: usize,
    pub first_year: i32,
    pub last_year: i32,
    pub distinct_years: usize,
    pub base_temperature: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub min_variance: f64,
    pub max_variance: f64,
    pub warmest: SummaryRecord,
    pub coldest: SummaryRecord,
}

impl DatasetSummary {
    /// `None` for a dataset without records.
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        let (first_year, last_year) = dataset.year_range()?;
        let (min_temperature, max_temperature) = dataset.temperature_range()?;
        let (min_variance, max_variance) = dataset.variance_range()?;

        // First occurrence wins on ties.
        let warmest = dataset
            .records
            .iter()
            .reduce(|best, record| if record.temperature > best.temperature { record } else { best })?;
        let coldest = dataset
            .records
            .iter()
            .reduce(|best, record| if record.temperature < best.temperature { record } else { best })?;

        let distinct_years = dataset
            .records
            .iter()
            .map(|record| record.year)
            .collect::<BTreeSet<_>>()
            .len();

        Some(Self {
            records: dataset.len(),
            first_year,
            last_year,
            distinct_years,
            base_temperature: dataset.base_temperature,
            min_temperature,
            max_temperature,
            min_variance,
            max_variance,
            warmest: warmest.into(),
            coldest: coldest.into(),
        })
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Global Temperature Stats")?;
        writeln!(f, "========================")?;
        writeln!(f, "Records: {}", self.records)?;
        writeln!(
            f,
            "Years: {} - {} ({} distinct)",
            self.first_year, self.last_year, self.distinct_years
        )?;
        writeln!(
            f,
            "Base temperature: {} \u{2103}",
            format_number(self.base_temperature)
        )?;
        writeln!(
            f,
            "Temperature range: {} \u{2103} to {} \u{2103}",
            format_number(self.min_temperature),
            format_number(self.max_temperature)
        )?;
        writeln!(
            f,
            "Variance range: {} \u{2103} to {} \u{2103}",
            format_number(self.min_variance),
            format_number(self.max_variance)
        )?;
        writeln!(
            f,
            "Warmest: {} {} ({} \u{2103})",
            self.warmest.month,
            self.warmest.year,
            format_number(self.warmest.temperature)
        )?;
        write!(
            f,
            "Coldest: {} {} ({} \u{2103})",
            self.coldest.month,
            self.coldest.year,
            format_number(self.coldest.temperature)
        )
    }
}
