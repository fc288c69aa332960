//! Interactive node-and-edge diagrams: SVG synthesis, single selection, inspector panel and
//! palette restyling of an already rendered tree.

use crate::flow::{LINE_HEIGHT, layout_flow};
use crate::model::FlowLayout;
use crate::svg::{fmt, svg_root, text_el};
use crate::theme::{Palette, rgba};
use crate::LayoutOptions;
use folio_core::dom::{Element, Node};
use folio_core::FlowSpec;
use serde::Serialize;

pub const DIAGRAM_CLASS: &str = "flow3d";
pub const NODE_CLASS: &str = "flow-node";
pub const EDGE_CLASS: &str = "flow-edge";
pub const SELECTED_CLASS: &str = "is-selected";
pub const ACTIVE_EDGE_CLASS: &str = "is-active";
const INSPECTOR_CLASS: &str = "flow3d-inspector";
const NODE_RADIUS: f64 = 18.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inspector {
    pub title: String,
    pub body: String,
    pub links: Vec<String>,
}

impl Inspector {
    fn placeholder() -> Self {
        Self {
            title: "Inspect a node".to_string(),
            body: "Click any node to see details.".to_string(),
            links: Vec::new(),
        }
    }

    pub fn to_children(&self) -> Vec<Node> {
        let mut out: Vec<Node> = vec![
            Element::new("div")
                .with_class("flow3d-inspector-title")
                .with_text(self.title.as_str())
                .into(),
            Element::new("div")
                .with_class("flow3d-inspector-body")
                .with_text(self.body.as_str())
                .into(),
        ];
        if !self.links.is_empty() {
            let mut links = Element::new("div").with_class("flow3d-inspector-links");
            for l in &self.links {
                links.push(Element::new("span").with_text(l.as_str()));
            }
            out.push(links.into());
        }
        out
    }
}

/// One live diagram. `key` is unique per page and scopes the arrow marker id.
#[derive(Debug, Clone)]
pub struct Diagram {
    key: String,
    spec: FlowSpec,
    layout: FlowLayout,
    selected: Option<String>,
}

impl Diagram {
    pub fn new(key: impl Into<String>, spec: FlowSpec, options: &LayoutOptions) -> Self {
        let layout = layout_flow(&spec, options);
        Self {
            key: key.into(),
            spec,
            layout,
            selected: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn spec(&self) -> &FlowSpec {
        &self.spec
    }

    pub fn layout(&self) -> &FlowLayout {
        &self.layout
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Selects a node, or clears with `None`. An id the flow does not define clears too.
    /// Returns whether the selection changed.
    pub fn select(&mut self, node: Option<&str>) -> bool {
        let next = node.filter(|id| self.spec.node(id).is_some()).map(str::to_string);
        if next == self.selected {
            return false;
        }
        self.selected = next;
        true
    }

    pub fn inspector(&self) -> Inspector {
        let Some(node) = self.selected.as_deref().and_then(|id| self.spec.node(id)) else {
            return Inspector::placeholder();
        };
        Inspector {
            title: node.flat_label(),
            body: node.desc.clone(),
            links: self
                .spec
                .neighbors(&node.id)
                .iter()
                .map(|n| n.describe())
                .collect(),
        }
    }

    fn marker_id(&self) -> String {
        format!("arrow-{}", self.key)
    }

    fn svg(&self) -> Element {
        let mut svg = svg_root("flow-svg", &self.layout.view_box.to_attr())
            .with_attr("role", "img")
            .with_attr("aria-label", self.spec.title.as_str());

        let marker = Element::new("marker")
            .with_attr("id", self.marker_id())
            .with_attr("viewBox", "0 0 12 12")
            .with_attr("refX", "10")
            .with_attr("refY", "6")
            .with_attr("markerWidth", "10")
            .with_attr("markerHeight", "10")
            .with_attr("orient", "auto-start-reverse")
            .with_child(
                Element::new("path")
                    .with_attr("d", "M0,0 L12,6 L0,12 Z")
                    .with_attr("fill", "currentColor"),
            );
        svg.push(Element::new("defs").with_child(marker));

        let marker_ref = format!("url(#{})", self.marker_id());
        let mut edges = Element::new("g").with_class("flow-edges");
        for e in &self.layout.edges {
            edges.push(
                Element::new("path")
                    .with_class(EDGE_CLASS)
                    .with_attr(
                        "d",
                        format!(
                            "M {} {} L {} {}",
                            fmt(e.start.x),
                            fmt(e.start.y),
                            fmt(e.end.x),
                            fmt(e.end.y)
                        ),
                    )
                    .with_attr("fill", "none")
                    .with_attr("stroke", "currentColor")
                    .with_attr("marker-end", marker_ref.as_str())
                    .with_attr("data-from", e.from.as_str())
                    .with_attr("data-to", e.to.as_str()),
            );
            if let Some(label) = e.label.as_deref() {
                edges.push(
                    text_el("flow-edge-label", e.label_at.x, e.label_at.y, label)
                        .with_attr("text-anchor", "middle"),
                );
            }
        }
        svg.push(edges);

        // Back to front by z; nearer nodes read stronger.
        let mut order: Vec<&crate::model::LayoutNode> = self.layout.nodes.iter().collect();
        order.sort_by(|a, b| a.z.total_cmp(&b.z));
        let (z_min, z_max) = order
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), n| (lo.min(n.z), hi.max(n.z)));
        let span = z_max - z_min;

        let mut nodes = Element::new("g").with_class("flow-nodes");
        for n in order {
            let t = if span > 0.0 { (n.z - z_min) / span } else { 1.0 };
            let b = n.bounds();
            let mut label = Element::new("text")
                .with_class("flow-node-label")
                .with_attr("x", fmt(n.x))
                .with_attr("y", fmt(n.y))
                .with_attr("text-anchor", "middle")
                .with_attr("dominant-baseline", "middle");
            let start_y = n.y - (n.lines.len().saturating_sub(1) as f64) * LINE_HEIGHT / 2.0;
            for (i, line) in n.lines.iter().enumerate() {
                label.push(
                    Element::new("tspan")
                        .with_attr("x", fmt(n.x))
                        .with_attr("y", fmt(start_y + i as f64 * LINE_HEIGHT))
                        .with_text(line.as_str()),
                );
            }
            nodes.push(
                Element::new("g")
                    .with_class(NODE_CLASS)
                    .with_attr("data-node", n.id.as_str())
                    .with_attr("data-tone", n.tone.as_str())
                    .with_attr("opacity", fmt(((0.72 + 0.28 * t) * 100.0).round() / 100.0))
                    .with_child(
                        Element::new("rect")
                            .with_attr("x", fmt(b.min_x))
                            .with_attr("y", fmt(b.min_y))
                            .with_attr("width", fmt(n.width))
                            .with_attr("height", fmt(n.height))
                            .with_attr("rx", fmt(NODE_RADIUS))
                            .with_attr("ry", fmt(NODE_RADIUS)),
                    )
                    .with_child(label),
            );
        }
        svg.push(nodes);
        svg
    }

    /// The full diagram block, painted with `palette`.
    pub fn to_element(&self, palette: &Palette) -> Element {
        let head = Element::new("div").with_class("flow3d-head").with_child(
            Element::new("div")
                .with_class("flow3d-headtext")
                .with_child(
                    Element::new("div")
                        .with_class("flow3d-title")
                        .with_text(self.spec.title.as_str()),
                )
                .with_child(
                    Element::new("div")
                        .with_class("flow3d-hint")
                        .with_text(self.spec.hint.as_str()),
                ),
        );
        let mut root = Element::new("section")
            .with_class(DIAGRAM_CLASS)
            .with_attr("data-flow", self.spec.id.as_str())
            .with_attr("data-diagram", self.key.as_str())
            .with_child(head)
            .with_child(Element::new("div").with_class("flow-stage").with_child(self.svg()))
            .with_child(
                Element::new("div")
                    .with_class(INSPECTOR_CLASS)
                    .with_attr("aria-live", "polite")
                    .with_children(self.inspector().to_children()),
            );
        self.restyle(&mut root, palette);
        root
    }

    /// Repaints colors and selection emphasis on a tree produced by [`Diagram::to_element`].
    /// Geometry is left untouched.
    pub fn restyle(&self, root: &mut Element, palette: &Palette) {
        let selected = self.selected.as_deref();
        let dark = palette.is_dark();
        root.walk_mut(&mut |el| {
            if el.tag == "svg" && el.has_class("flow-svg") {
                el.set_attr("color", palette.muted.as_str());
                return;
            }
            if el.has_class(EDGE_CLASS) {
                let active = selected.is_some_and(|id| {
                    el.attr("data-from") == Some(id) || el.attr("data-to") == Some(id)
                });
                el.toggle_class(ACTIVE_EDGE_CLASS, active);
                return;
            }
            if !el.has_class(NODE_CLASS) {
                return;
            }
            let Some(id) = el.attr("data-node").map(str::to_string) else {
                return;
            };
            let tone = self
                .spec
                .node(&id)
                .map(|n| palette.tone(n.tone).to_string())
                .unwrap_or_else(|| palette.tone(folio_core::Tone::Teal).to_string());
            let active = selected == Some(id.as_str());
            let fill_a = match (dark, active) {
                (true, true) => 0.22,
                (true, false) => 0.16,
                (false, true) => 0.30,
                (false, false) => 0.22,
            };
            el.toggle_class(SELECTED_CLASS, active);
            for child in el.child_elements_mut() {
                match child.tag.as_str() {
                    "rect" => {
                        child.set_attr("fill", rgba(&tone, fill_a));
                        let stroke = if active {
                            rgba(&tone, 0.95)
                        } else {
                            palette.faint.clone()
                        };
                        child.set_attr("stroke", stroke);
                        child.set_attr("stroke-width", if active { "2.4" } else { "1.2" });
                    }
                    "text" => child.set_attr("fill", palette.ink.as_str()),
                    _ => {}
                }
            }
        });
    }

    /// Rewrites the inspector panel inside a rendered diagram for the current selection.
    pub fn refresh_inspector(&self, root: &mut Element) {
        if let Some(panel) = root.find_mut(&|e| e.has_class(INSPECTOR_CLASS)) {
            panel.children = self.inspector().to_children();
        }
    }
}
