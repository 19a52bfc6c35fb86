use serde::{Deserialize, Serialize};

use crate::domain::{Dataset, Month, TemperatureRecord};
use crate::error::LoadError;

/// Public location of the monthly global temperature document.
pub const DEFAULT_SOURCE_URL: &str =
    "https://raw.githubusercontent.com/freeCodeCamp/ProjectReferenceData/master/global-temperature.json";

/// Wire shape of the temperature document.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDocument {
    pub base_temperature: f64,
    pub monthly_variance: Vec<SourceVariance>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SourceVariance {
    pub year: i64,
    /// One-based month.
    pub month: i64,
    pub variance: f64,
}

pub fn parse_document(json: &str) -> Result<Dataset, LoadError> {
    let document: SourceDocument = serde_json::from_str(json)?;
    Dataset::from_document(document)
}

impl Dataset {
    pub fn from_document(document: SourceDocument) -> Result<Self, LoadError> {
        let base_temperature = document.base_temperature;
        if !base_temperature.is_finite() {
            return Err(LoadError::NonFiniteBase);
        }

        let records = document
            .monthly_variance
            .into_iter()
            .enumerate()
            .map(|(position, entry)| {
                let month = Month::from_number(entry.month).ok_or(LoadError::MonthOutOfRange {
                    position,
                    month: entry.month,
                })?;
                let year = i32::try_from(entry.year).map_err(|_| LoadError::YearOutOfRange {
                    position,
                    year: entry.year,
                })?;
                Ok(TemperatureRecord::new(
                    year,
                    month,
                    base_temperature,
                    entry.variance,
                ))
            })
            .collect::<Result<Vec<_>, LoadError>>()?;

        Ok(Self {
            base_temperature,
            records,
        })
    }
}
