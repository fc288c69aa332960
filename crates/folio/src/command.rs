//! Host events in, host instructions out.

use folio_core::dom::{Element, Node};
use folio_core::motion::RevealKey;
use folio_core::{ControlInput, Motion, Theme};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ControlValue {
    Number(f64),
    Text(String),
}

impl ControlValue {
    pub fn as_input(&self) -> ControlInput<'_> {
        match self {
            ControlValue::Number(v) => ControlInput::Number(*v),
            ControlValue::Text(s) => ControlInput::Text(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Command {
    ToggleTheme,
    ToggleMotion,
    ToggleSection { id: String },
    /// Click on a heading's `#` link.
    CopyHeadingLink { slug: String },
    CopyCode { key: usize },
    /// Puts a copy button's label back after the confirmation delay.
    ResetCopyLabel { key: usize },
    /// Roadmap phase button.
    JumpTo { anchor: String },
    /// Fragment navigation, including the deep link present at boot.
    Navigate { fragment: String },
    /// `node: None` is a click on empty canvas.
    SelectNode { diagram: String, node: Option<String> },
    SetControl {
        widget: String,
        control: String,
        value: ControlValue,
    },
    PointerMove { x: f64, y: f64 },
    PointerLeave,
    Scroll {
        top: f64,
        scroll_height: f64,
        client_height: f64,
    },
    /// One animation frame requested earlier with [`Effect::RequestFrame`].
    Frame,
    Intersect { key: RevealKey, ratio: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Effect {
    SetTheme(Theme),
    SetMotion(Motion),
    /// Toggles the document-level `reveal-ready` class.
    RevealReady(bool),
    ScrollIntoView { target: String, smooth: bool },
    /// `history.replaceState` style update; no navigation.
    ReplaceFragment { fragment: String },
    /// Dispatch `command` after `delay_ms`.
    Defer { delay_ms: u64, command: Command },
    ResizeChart { id: String },
    RequestFrame,
    Observe {
        keys: Vec<RevealKey>,
        threshold: f64,
        root_margin: String,
    },
    Unobserve { key: RevealKey },
    /// Drop every pending reveal observation.
    Disconnect,
    Progress { percent: f64 },
}

fn attr<'a>(el: &'a Element, name: &str) -> Option<&'a str> {
    el.attr(name).filter(|v| !v.is_empty())
}

/// Maps a click to a command. `chain` runs from the clicked element up to the root.
pub fn resolve_click(chain: &[&Element]) -> Option<Command> {
    for (depth, el) in chain.iter().enumerate() {
        if el.has_class("collapse-btn") {
            return attr(el, "data-collapse").map(|id| Command::ToggleSection { id: id.to_string() });
        }
        if el.tag == "a" && el.has_class("heading-link") {
            let slug = attr(el, "href")?.trim_start_matches('#');
            return (!slug.is_empty()).then(|| Command::CopyHeadingLink {
                slug: slug.to_string(),
            });
        }
        if el.has_class("copy-btn") {
            let key = attr(el, "data-copy")?.parse().ok()?;
            return Some(Command::CopyCode { key });
        }
        if el.has_class("phase-btn") {
            return attr(el, "data-jump").map(|a| Command::JumpTo { anchor: a.to_string() });
        }
        match attr(el, "data-toggle") {
            Some("theme") => return Some(Command::ToggleTheme),
            Some("motion") => return Some(Command::ToggleMotion),
            _ => {}
        }
        if let Some(node) = attr(el, "data-node") {
            let diagram = chain[depth..].iter().find_map(|a| attr(a, "data-diagram"))?;
            return Some(Command::SelectNode {
                diagram: diagram.to_string(),
                node: Some(node.to_string()),
            });
        }
        if el.tag == "svg" && el.has_class("flow-svg") {
            let diagram = chain[depth..].iter().find_map(|a| attr(a, "data-diagram"))?;
            return Some(Command::SelectNode {
                diagram: diagram.to_string(),
                node: None,
            });
        }
    }
    None
}

/// Ancestor chain of the first element matching `pred`, target first.
pub fn chain_to<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool) -> Option<Vec<&'a Element>> {
    for el in nodes.iter().filter_map(Node::as_element) {
        if let Some(mut chain) = chain_in(el, pred) {
            chain.reverse();
            return Some(chain);
        }
    }
    None
}

fn chain_in<'a>(el: &'a Element, pred: &dyn Fn(&Element) -> bool) -> Option<Vec<&'a Element>> {
    if pred(el) {
        return Some(vec![el]);
    }
    for child in el.child_elements() {
        if let Some(mut chain) = chain_in(child, pred) {
            chain.insert(0, el);
            return Some(chain);
        }
    }
    None
}
