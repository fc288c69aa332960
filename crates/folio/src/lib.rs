#![forbid(unsafe_code)]

//! `folio` turns a whitepaper written in Markdown into an interactive document.
//!
//! The structural passes live in `folio-core` (re-exported here) and the SVG synthesis in
//! `folio-render` (see [`render`]). This crate adds the [`Page`] runtime that boots the pipeline
//! against a [`Host`] and then reacts to [`Command`]s, plus a standalone HTML [`shell`].

pub use folio_core::*;

pub mod command;
pub mod host;
pub mod page;
pub mod shell;

pub use command::{Command, ControlValue, Effect, resolve_click};
pub use host::{Clipboard, ClipboardError, DeniedClipboard, HeadlessViewport, Host, MemoryClipboard, Viewport};
pub use page::{Page, PageError, sanitize_dom_id};

pub mod render {
    pub use folio_render::chart::render_chart;
    pub use folio_render::text::{ColumnMeasurer, TextMeasurer};
    pub use folio_render::{
        ChartRegistry, ChartStyle, Diagram, FlowLayout, Inspector, LayoutOptions, Palette,
        layout_flow, layout_json,
    };
}

#[cfg(test)]
mod tests;
