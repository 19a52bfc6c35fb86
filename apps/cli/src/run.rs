use color_eyre::eyre::{eyre, Result};
use temperature_heatmap::{ChartLayout, Dataset, DatasetSummary, HeatmapView};
use tracing::info;

use crate::config::AppConfig;
use crate::fetch::load_dataset;

/// What a single invocation should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Export,
    Summary,
    SummaryJson,
}

impl Mode {
    pub const fn from_flags(summary: bool, json: bool) -> Self {
        match (summary, json) {
            (false, false) => Self::Export,
            (true, false) => Self::Summary,
            (_, true) => Self::SummaryJson,
        }
    }
}

pub async fn run(config: &AppConfig, mode: Mode) -> Result<()> {
    let dataset = load_dataset(&config.source, config.timeout).await?;

    match mode {
        Mode::Export => export(config, &dataset).await,
        Mode::Summary => {
            println!("{}", summarize(&dataset)?);
            Ok(())
        }
        Mode::SummaryJson => {
            let json = serde_json::to_string_pretty(&summarize(&dataset)?)?;
            println!("{json}");
            Ok(())
        }
    }
}

fn summarize(dataset: &Dataset) -> Result<DatasetSummary> {
    DatasetSummary::from_dataset(dataset)
        .ok_or_else(|| eyre!("Temperature document contains no monthly records"))
}

/// Renders the dataset and writes it to the configured output.
pub async fn export(config: &AppConfig, dataset: &Dataset) -> Result<()> {
    let view = HeatmapView::from_dataset(dataset, ChartLayout::default())?;
    let markup = config.format.render(&view);

    if let Some(parent) = config.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(&config.output, markup).await?;

    info!(
        path = %config.output.display(),
        format = config.format.as_str(),
        cells = view.cells.len(),
        "heatmap written"
    );
    Ok(())
}
