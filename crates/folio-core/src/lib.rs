#![forbid(unsafe_code)]

//! Whitepaper markdown to interactive document tree (headless).
//!
//! This crate owns the structural passes and the state machines behind the interactive page:
//! - markup rendering with custom heading/link/code rules
//! - collapsible sections with persisted state
//! - diagram payload detection against static flow templates
//! - calculator widgets with their formulas
//! - reveal and parallax controllers
//!
//! SVG synthesis lives in `folio-render`; the page runtime that wires everything to a host
//! lives in `folio`.

pub mod config;
pub mod detect;
pub mod dom;
pub mod editorial;
pub mod error;
pub mod flow;
pub mod geom;
pub mod markup;
pub mod motion;
pub mod sections;
pub mod store;
pub mod widgets;

pub use config::FolioConfig;
pub use detect::{Detector, DetectorRegistry, Signature};
pub use dom::{Element, Node};
pub use error::{Error, Result};
pub use flow::{FlowEdge, FlowNode, FlowSpec, Tone};
pub use markup::MarkupRenderer;
pub use sections::{Outline, Section};
pub use store::{Aspect, MemoryStorage, Motion, PersistedState, Storage, StorageKeys, Theme, ThemeMotionStore};
pub use widgets::{ChartData, ChartKind, ControlInput, Widget, WidgetKind};

#[cfg(test)]
mod tests;
