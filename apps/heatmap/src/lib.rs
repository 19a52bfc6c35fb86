// Shared by the CLI exporter and the web component
pub mod domain;
pub mod error;
pub mod export;
pub mod layout;
pub mod loader;
pub mod render;
pub mod scales;
pub mod scene;
pub mod state;
pub mod summary;
pub mod tooltip;

pub use domain::{Dataset, Month, TemperatureRecord};
pub use error::{HeatmapError, LoadError, ScaleError};
pub use export::ExportFormat;
pub use layout::ChartLayout;
pub use loader::{parse_document, SourceDocument, SourceVariance, DEFAULT_SOURCE_URL};
pub use render::HeatmapView;
pub use scales::Scales;
pub use state::{LivenessToken, LoadState, ViewLifetime};
pub use summary::DatasetSummary;
