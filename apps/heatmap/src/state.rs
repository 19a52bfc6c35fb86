use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use crate::domain::Dataset;
use crate::error::HeatmapError;
use crate::layout::ChartLayout;
use crate::loader::SourceDocument;
use crate::render::HeatmapView;

/// Where the one-shot load currently stands.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    Loading,
    Ready(Box<HeatmapView>),
    Failed(String),
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loading => write!(f, "Loading"),
            Self::Ready(view) => write!(f, "Ready({} cells)", view.cells.len()),
            Self::Failed(message) => write!(f, "Failed({message})"),
        }
    }
}

impl LoadState {
    pub fn from_result(result: Result<HeatmapView, HeatmapError>) -> Self {
        match result {
            Ok(view) => Self::Ready(Box::new(view)),
            Err(error) => Self::Failed(error.to_string()),
        }
    }

    pub fn from_dataset(dataset: &Dataset, layout: ChartLayout) -> Self {
        Self::from_result(HeatmapView::from_dataset(dataset, layout).map_err(HeatmapError::from))
    }

    /// Validates a decoded document and renders it in one step.
    pub fn from_document(document: SourceDocument, layout: ChartLayout) -> Self {
        match Dataset::from_document(document) {
            Ok(dataset) => Self::from_dataset(&dataset, layout),
            Err(error) => Self::from_result(Err(error.into())),
        }
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Single line shown in place of the chart while it is not ready.
    pub fn status_message(&self) -> Option<String> {
        match self {
            Self::Loading => Some("Loading temperature data...".to_string()),
            Self::Ready(_) => None,
            Self::Failed(message) => Some(format!("Could not load temperature data: {message}")),
        }
    }
}

/// Owned by a mounted view; the view is considered gone once this is closed or dropped.
#[derive(Debug)]
pub struct ViewLifetime {
    alive: Rc<Cell<bool>>,
}

/// Handed to the pending load so it can tell whether its view still exists.
#[derive(Debug, Clone)]
pub struct LivenessToken {
    alive: Rc<Cell<bool>>,
}

impl ViewLifetime {
    pub fn new() -> Self {
        Self {
            alive: Rc::new(Cell::new(true)),
        }
    }

    pub fn token(&self) -> LivenessToken {
        LivenessToken {
            alive: Rc::clone(&self.alive),
        }
    }

    pub fn close(&self) {
        self.alive.set(false);
    }
}

impl Default for ViewLifetime {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ViewLifetime {
    fn drop(&mut self) {
        self.alive.set(false);
    }
}

impl LivenessToken {
    pub fn is_alive(&self) -> bool {
        self.alive.get()
    }

    /// Runs `apply` only while the view is still mounted.
    pub fn run_if_alive<T>(&self, apply: impl FnOnce() -> T) -> Option<T> {
        self.is_alive().then(apply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(json: &str) -> SourceDocument {
        match serde_json::from_str(json) {
            Ok(document) => document,
            Err(error) => panic!("test document should decode: {error}"),
        }
    }

    const SINGLE: &str =
        r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 2000, "month": 1, "variance": -0.5}]}"#;

    #[test]
    fn valid_document_becomes_ready() {
        let state = LoadState::from_document(document(SINGLE), ChartLayout::default());
        assert!(state.is_ready());
        assert_eq!(state.to_string(), "Ready(1 cells)");
        assert_eq!(state.status_message(), None);
    }

    #[test]
    fn empty_document_fails_with_message() {
        let state = LoadState::from_document(
            document(r#"{"baseTemperature": 8.0, "monthlyVariance": []}"#),
            ChartLayout::default(),
        );
        assert_eq!(
            state,
            LoadState::Failed("dataset contains no monthly records".to_string())
        );
        assert_eq!(
            state.status_message().as_deref(),
            Some("Could not load temperature data: dataset contains no monthly records")
        );
    }

    #[test]
    fn invalid_month_fails_before_rendering() {
        let state = LoadState::from_document(
            document(r#"{"baseTemperature": 8.0, "monthlyVariance": [{"year": 2000, "month": 0, "variance": 0.0}]}"#),
            ChartLayout::default(),
        );
        assert_eq!(
            state,
            LoadState::Failed("record 0 has month 0, expected 1-12".to_string())
        );
        assert!(!state.is_ready());
    }

    #[test]
    fn loading_has_placeholder_message() {
        assert_eq!(
            LoadState::Loading.status_message().as_deref(),
            Some("Loading temperature data...")
        );
    }

    #[test]
    fn dropped_lifetime_invalidates_tokens() {
        let lifetime = ViewLifetime::new();
        let token = lifetime.token();
        assert!(token.is_alive());
        assert_eq!(token.run_if_alive(|| 42), Some(42));

        drop(lifetime);
        assert!(!token.is_alive());
        assert_eq!(token.run_if_alive(|| 42), None);
    }

    #[test]
    fn closed_lifetime_invalidates_tokens() {
        let lifetime = ViewLifetime::new();
        let token = lifetime.token();
        lifetime.close();
        assert!(!token.clone().is_alive());
    }
}
