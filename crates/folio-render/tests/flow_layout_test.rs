use folio_core::{DetectorRegistry, FlowEdge, FlowNode, FlowSpec, Tone};
use folio_render::{LayoutOptions, layout_flow, layout_json};

fn builtin(id: &str) -> FlowSpec {
    DetectorRegistry::builtin()
        .detectors()
        .iter()
        .find(|d| d.id() == id)
        .map(|d| d.spec.clone())
        .expect("builtin spec")
}

fn node(id: &str, label: &str, x: f64, y: f64) -> FlowNode {
    FlowNode {
        id: id.to_string(),
        label: label.to_string(),
        tone: Tone::Teal,
        desc: String::new(),
        x,
        y,
        z: 0.0,
    }
}

#[test]
fn every_builtin_layout_fits_its_view_box() {
    for detector in DetectorRegistry::builtin().detectors() {
        let layout = layout_flow(&detector.spec, &LayoutOptions::default());
        assert_eq!(layout.nodes.len(), detector.spec.nodes.len());
        for n in &layout.nodes {
            assert!(
                layout.view_box.contains(&n.bounds()),
                "{} node {} escapes the view box",
                detector.id(),
                n.id
            );
        }
    }
}

#[test]
fn edge_endpoints_sit_on_node_boundaries() {
    for detector in DetectorRegistry::builtin().detectors() {
        let layout = layout_flow(&detector.spec, &LayoutOptions::default());
        for e in &layout.edges {
            for (id, p) in [(&e.from, e.start), (&e.to, e.end)] {
                let n = layout.node(id).expect("edge node");
                let dx = (p.x - n.x).abs();
                let dy = (p.y - n.y).abs();
                let hw = n.width / 2.0;
                let hh = n.height / 2.0;
                assert!(dx <= hw + 1e-6 && dy <= hh + 1e-6, "{id} endpoint outside box");
                assert!(
                    (dx - hw).abs() < 1e-6 || (dy - hh).abs() < 1e-6,
                    "{id} endpoint not on the boundary"
                );
            }
            let mid_y = (e.start.y + e.end.y) / 2.0;
            assert!((e.label_at.y - (mid_y - 6.0)).abs() < 1e-9);
        }
    }
}

#[test]
fn node_boxes_follow_label_metrics() {
    let layout = layout_flow(&builtin("solution"), &LayoutOptions::default());

    let readers = layout.node("readers").unwrap();
    assert_eq!(readers.width, 150.0);
    assert_eq!(readers.height, 74.0);

    let publishers = layout.node("publishers").unwrap();
    assert_eq!(publishers.lines, ["Publishers", "(Human or AI)"]);
    assert_eq!(publishers.height, 92.0);
    assert!((publishers.width - (72.0 + 8.3 * 13.0)).abs() < 1e-9);

    let wide = FlowSpec {
        id: "wide".into(),
        title: "Wide".into(),
        hint: String::new(),
        nodes: vec![node("a", &"x".repeat(80), 0.0, 0.0)],
        edges: vec![],
    };
    assert_eq!(layout_flow(&wide, &LayoutOptions::default()).nodes[0].width, 340.0);
}

#[test]
fn view_box_pads_the_node_bounds() {
    let spec = FlowSpec {
        id: "pair".into(),
        title: "Pair".into(),
        hint: String::new(),
        nodes: vec![node("a", "A", 0.0, 0.0), node("b", "B", 400.0, 0.0)],
        edges: vec![FlowEdge {
            from: "a".into(),
            to: "b".into(),
            label: None,
        }],
    };
    let layout = layout_flow(&spec, &LayoutOptions::default());
    assert_eq!(layout.view_box.to_attr(), "-155 -117 710 234");

    let e = &layout.edges[0];
    assert_eq!((e.start.x, e.start.y), (75.0, 0.0));
    assert_eq!((e.end.x, e.end.y), (325.0, 0.0));

    let tight = LayoutOptions {
        padding: 0.0,
        ..LayoutOptions::default()
    };
    assert_eq!(layout_flow(&spec, &tight).view_box.to_attr(), "-75 -37 550 74");
}

#[test]
fn empty_spec_uses_the_fallback_view_box() {
    let spec = FlowSpec {
        id: "empty".into(),
        title: "Empty".into(),
        hint: String::new(),
        nodes: vec![],
        edges: vec![],
    };
    let layout = layout_flow(&spec, &LayoutOptions::default());
    assert_eq!(layout.view_box.to_attr(), "0 0 1000 600");
    assert!(layout.edges.is_empty());
}

#[test]
fn edges_to_unknown_nodes_are_dropped() {
    let spec = FlowSpec {
        id: "dangling".into(),
        title: "Dangling".into(),
        hint: String::new(),
        nodes: vec![node("a", "A", 0.0, 0.0)],
        edges: vec![FlowEdge {
            from: "a".into(),
            to: "ghost".into(),
            label: Some("lost".into()),
        }],
    };
    assert!(layout_flow(&spec, &LayoutOptions::default()).edges.is_empty());
}

#[test]
fn layout_serializes_to_json() {
    let layout = layout_flow(&builtin("flywheel"), &LayoutOptions::default());
    let json = layout_json(&layout).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["spec_id"], "flywheel");
    assert_eq!(value["nodes"].as_array().map(Vec::len), Some(9));
}
