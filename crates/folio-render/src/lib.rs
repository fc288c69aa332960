#![forbid(unsafe_code)]

//! Diagram layout and SVG synthesis for folio (headless).
//!
//! Layout is deterministic: node boxes come from label metrics, positions come straight from the
//! flow template, and the viewport is the padded bounding box. Rendered SVG is an owned
//! [`folio_core::dom::Element`] tree so palette changes can be applied in place.

pub mod chart;
pub mod diagram;
pub mod flow;
pub mod model;
mod svg;
pub mod text;
pub mod theme;

pub use chart::{ChartRegistry, ChartStyle};
pub use diagram::{Diagram, Inspector};
pub use flow::layout_flow;
pub use model::{Bounds, FlowLayout, LayoutEdge, LayoutNode, LayoutPoint, ViewBox};
pub use theme::Palette;

use crate::text::{ColumnMeasurer, TextMeasurer};
use folio_core::FolioConfig;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown chart: {id}")]
    UnknownChart { id: String },
    #[error("layout JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

pub const DEFAULT_PADDING: f64 = 80.0;

#[derive(Clone)]
pub struct LayoutOptions {
    /// Space added on every side of the node bounding box.
    pub padding: f64,
    pub text_measurer: Arc<dyn TextMeasurer + Send + Sync>,
}

impl std::fmt::Debug for LayoutOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutOptions")
            .field("padding", &self.padding)
            .finish_non_exhaustive()
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            padding: DEFAULT_PADDING,
            text_measurer: Arc::new(ColumnMeasurer::default()),
        }
    }
}

impl LayoutOptions {
    pub fn from_config(config: &FolioConfig) -> Self {
        Self {
            padding: config.f64_or("diagram.padding", DEFAULT_PADDING).max(0.0),
            ..Self::default()
        }
    }
}

/// Pretty JSON for a computed layout (debugging and CLI output).
pub fn layout_json(layout: &FlowLayout) -> Result<String> {
    Ok(serde_json::to_string_pretty(layout)?)
}
