use crate::detect::{DetectorRegistry, Signature};
use crate::flow::{Direction, FlowSpec};

const PAYLOADS: [(&str, &str); 6] = [
    ("solution", "   Publishers (Human or AI)\n        |\n   Validators (Staked)\n"),
    (
        "architecture",
        "+-------------------+\n| CONSUMPTION LAYER |\n+-------------------+\n|      BASE L2      |\n",
    ),
    ("claimVerification", "Article Published\n   |\nCLAIM VERIFICATION\n"),
    ("revenue", "Users pay $EVA for access\n   |\n Treasury\n"),
    ("flywheel", "\n  More users -> more demand -> ...\n(the cycle repeats)\n"),
    ("publisherFlow", "Register (ERC-8004) -> Publish -> Reputation Updates"),
];

#[test]
fn each_builtin_payload_maps_to_exactly_one_spec() {
    let registry = DetectorRegistry::builtin();
    for (expected, payload) in PAYLOADS {
        let hits: Vec<&str> = registry
            .detectors()
            .iter()
            .filter(|d| d.signature.matches(payload.trim()))
            .map(|d| d.id())
            .collect();
        assert_eq!(hits, [expected], "payload for {expected}");
        assert_eq!(registry.detect(payload).map(|s| s.id.as_str()), Some(expected));
    }
}

#[test]
fn unrelated_text_is_not_a_diagram() {
    let registry = DetectorRegistry::builtin();
    for text in [
        "",
        "   \n  ",
        "┌────┐\n│ box │\n└────┘",
        "fn main() { println!(\"BASE L2\"); }",
        "CONSUMPTION LAYER only",
        "Some More users text; the cycle repeats",
        "Treasury without the payer line",
    ] {
        assert!(registry.detect(text).is_none(), "{text:?}");
    }
}

#[test]
fn earlier_detectors_win() {
    let registry = DetectorRegistry::builtin();
    let both = "Publishers (Human or AI)\nCONSUMPTION LAYER\nBASE L2";
    assert_eq!(registry.detect(both).unwrap().id, "solution");
}

#[test]
fn new_diagrams_register_as_data() {
    let mut registry = DetectorRegistry::new();
    let spec = FlowSpec {
        id: "custom".into(),
        title: "Custom".into(),
        hint: String::new(),
        nodes: Vec::new(),
        edges: Vec::new(),
    };
    registry.add_spec(
        Signature::All(vec![
            Signature::StartsWith("Ledger"),
            Signature::contains_all(&["mint", "burn"]),
        ]),
        spec,
    );
    assert_eq!(registry.detect("Ledger\nmint -> burn").unwrap().id, "custom");
    assert!(registry.detect("mint -> burn\nLedger").is_none());
    assert!(registry.detect("Ledger\nmint").is_none());
}

#[test]
fn builtin_edges_reference_known_nodes() {
    for detector in DetectorRegistry::builtin().detectors() {
        let spec = &detector.spec;
        assert!(!spec.nodes.is_empty(), "{}", spec.id);
        for edge in &spec.edges {
            assert!(spec.node(&edge.from).is_some(), "{}: {}", spec.id, edge.from);
            assert!(spec.node(&edge.to).is_some(), "{}: {}", spec.id, edge.to);
        }
    }
}

#[test]
fn flywheel_is_a_closed_ring() {
    let registry = DetectorRegistry::builtin();
    let spec = registry.detect(PAYLOADS[4].1).unwrap();
    assert_eq!(spec.nodes.len(), 9);
    assert_eq!(spec.edges.len(), 9);
    assert_eq!(spec.edges.last().unwrap().to, spec.nodes[0].id);
    for node in &spec.nodes {
        let r = (node.x * node.x + node.y * node.y).sqrt();
        assert!((r - 310.0).abs() < 1e-9);
    }
    // First step sits at the top of the ring.
    assert!(spec.nodes[0].x.abs() < 1e-9);
    assert!((spec.nodes[0].y + 310.0).abs() < 1e-9);
}

#[test]
fn neighbors_list_outgoing_before_incoming() {
    let registry = DetectorRegistry::builtin();
    let spec = registry.detect(PAYLOADS[0].1).unwrap();
    let neighbors = spec.neighbors("validators");
    let described: Vec<String> = neighbors.iter().map(|n| n.describe()).collect();
    assert_eq!(described, ["→ Readers", "← Publishers (Human or AI)"]);
    assert_eq!(neighbors[0].direction, Direction::Outgoing);
    assert_eq!(spec.node("validators").unwrap().flat_label(), "Validators (Staked)");
}
