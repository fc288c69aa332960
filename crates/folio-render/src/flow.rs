//! Deterministic layout for flow templates.
//!
//! Positions are taken from the template as node centers; sizes come from the label metrics.
//! Edge endpoints sit where the center-to-center segment crosses each node box.

use crate::LayoutOptions;
use crate::model::{Bounds, FlowLayout, LayoutEdge, LayoutNode, LayoutPoint, ViewBox};
use folio_core::FlowSpec;
use folio_core::geom::{point, rect_boundary_point};

pub const NODE_BASE_WIDTH: f64 = 72.0;
pub const NODE_MIN_WIDTH: f64 = 150.0;
pub const NODE_MAX_WIDTH: f64 = 340.0;
pub const NODE_BASE_HEIGHT: f64 = 56.0;
pub const LINE_HEIGHT: f64 = 18.0;
pub const EDGE_LABEL_LIFT: f64 = 6.0;

fn finite_or_zero(v: f64, what: &str, id: &str) -> f64 {
    if v.is_finite() {
        v
    } else {
        tracing::warn!(node = id, what, "non-finite coordinate replaced with 0");
        0.0
    }
}

pub fn layout_flow(spec: &FlowSpec, options: &LayoutOptions) -> FlowLayout {
    let nodes: Vec<LayoutNode> = spec
        .nodes
        .iter()
        .map(|n| {
            let lines: Vec<String> = n.lines().map(str::to_string).collect();
            let metrics = options.text_measurer.measure(&n.label);
            let width = (NODE_BASE_WIDTH + metrics.width).clamp(NODE_MIN_WIDTH, NODE_MAX_WIDTH);
            let height = NODE_BASE_HEIGHT + LINE_HEIGHT * metrics.line_count.max(1) as f64;
            LayoutNode {
                id: n.id.clone(),
                lines,
                tone: n.tone,
                x: finite_or_zero(n.x, "x", &n.id),
                y: finite_or_zero(n.y, "y", &n.id),
                z: if n.z.is_finite() { n.z } else { 0.0 },
                width,
                height,
            }
        })
        .collect();

    let mut edges = Vec::with_capacity(spec.edges.len());
    for e in &spec.edges {
        let (Some(a), Some(b)) = (
            nodes.iter().find(|n| n.id == e.from),
            nodes.iter().find(|n| n.id == e.to),
        ) else {
            tracing::warn!(spec = %spec.id, from = %e.from, to = %e.to, "edge references unknown node");
            continue;
        };
        let ca = point(a.x, a.y);
        let cb = point(b.x, b.y);
        let start = rect_boundary_point(ca, a.width / 2.0, a.height / 2.0, cb);
        let end = rect_boundary_point(cb, b.width / 2.0, b.height / 2.0, ca);
        edges.push(LayoutEdge {
            from: e.from.clone(),
            to: e.to.clone(),
            label: e.label.clone(),
            start: LayoutPoint { x: start.x, y: start.y },
            end: LayoutPoint { x: end.x, y: end.y },
            label_at: LayoutPoint {
                x: (start.x + end.x) / 2.0,
                y: (start.y + end.y) / 2.0 - EDGE_LABEL_LIFT,
            },
        });
    }

    let bounds = Bounds::from_points(nodes.iter().flat_map(|n| {
        let b = n.bounds();
        [(b.min_x, b.min_y), (b.max_x, b.max_y)]
    }));
    let view_box = match bounds {
        Some(b) => {
            let pad = options.padding;
            ViewBox {
                min_x: b.min_x - pad,
                min_y: b.min_y - pad,
                width: (b.width() + pad * 2.0).max(1.0),
                height: (b.height() + pad * 2.0).max(1.0),
            }
        }
        None => ViewBox::FALLBACK,
    };

    FlowLayout {
        spec_id: spec.id.clone(),
        nodes,
        edges,
        view_box,
    }
}
