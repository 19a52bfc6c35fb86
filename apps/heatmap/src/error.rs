use thiserror::Error;

/// Failures turning a source document into a [`crate::Dataset`].
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("malformed temperature document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("record {position} has month {month}, expected 1-12")]
    MonthOutOfRange { position: usize, month: i64 },

    #[error("record {position} has year {year}, which does not fit a calendar year")]
    YearOutOfRange { position: usize, year: i64 },

    #[error("base temperature is not a finite number")]
    NonFiniteBase,
}

/// Failures deriving scales from a dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScaleError {
    #[error("dataset contains no monthly records")]
    EmptyDataset,

    #[error("year {0} cannot be placed on the time axis")]
    YearOutOfRange(i32),
}

/// Anything that keeps a document from becoming a chart.
#[derive(Debug, Error)]
pub enum HeatmapError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Scale(#[from] ScaleError),
}
