use crate::command::{Command, chain_to, resolve_click};
use crate::dom::{Element, Node};
use crate::page::sanitize_dom_id;

fn diagram_tree() -> Vec<Node> {
    let svg = Element::new("svg")
        .with_class("flow-svg")
        .with_child(
            Element::new("g")
                .with_class("flow-node")
                .with_attr("data-node", "readers")
                .with_child(Element::new("rect"))
                .with_child(Element::new("text").with_child(Element::new("tspan").with_text("Readers"))),
        );
    vec![
        Element::new("section")
            .with_class("flow3d")
            .with_attr("data-diagram", "solution-0")
            .with_child(Element::new("div").with_class("flow-stage").with_child(svg))
            .with_child(Element::new("div").with_class("flow3d-inspector"))
            .into(),
    ]
}

#[test]
fn click_inside_a_node_selects_it() {
    let nodes = diagram_tree();
    let chain = chain_to(&nodes, &|e| e.tag == "tspan").unwrap();
    assert_eq!(chain[0].tag, "tspan");
    assert_eq!(chain.last().unwrap().tag, "section");
    assert_eq!(
        resolve_click(&chain),
        Some(Command::SelectNode {
            diagram: "solution-0".into(),
            node: Some("readers".into()),
        })
    );
}

#[test]
fn click_on_empty_canvas_clears_and_panel_clicks_do_nothing() {
    let nodes = diagram_tree();
    let chain = chain_to(&nodes, &|e| e.tag == "svg").unwrap();
    assert_eq!(
        resolve_click(&chain),
        Some(Command::SelectNode {
            diagram: "solution-0".into(),
            node: None,
        })
    );
    let chain = chain_to(&nodes, &|e| e.has_class("flow3d-inspector")).unwrap();
    assert_eq!(resolve_click(&chain), None);
}

#[test]
fn buttons_and_links_map_to_their_commands() {
    let collapse = Element::new("button")
        .with_class("collapse-btn")
        .with_attr("data-collapse", "6-tokenomics");
    assert_eq!(
        resolve_click(&[&collapse]),
        Some(Command::ToggleSection { id: "6-tokenomics".into() })
    );

    let link = Element::new("a")
        .with_class("heading-link")
        .with_attr("href", "#voting-power");
    assert_eq!(
        resolve_click(&[&link]),
        Some(Command::CopyHeadingLink { slug: "voting-power".into() })
    );

    let copy = Element::new("button").with_class("copy-btn").with_attr("data-copy", "3");
    assert_eq!(resolve_click(&[&copy]), Some(Command::CopyCode { key: 3 }));

    let bad_copy = Element::new("button").with_class("copy-btn").with_attr("data-copy", "x");
    assert_eq!(resolve_click(&[&bad_copy]), None);

    let phase = Element::new("button")
        .with_class("phase-btn")
        .with_attr("data-jump", "phase-1-foundation");
    assert_eq!(
        resolve_click(&[&phase]),
        Some(Command::JumpTo { anchor: "phase-1-foundation".into() })
    );

    let theme = Element::new("button").with_attr("data-toggle", "theme");
    let motion = Element::new("button").with_attr("data-toggle", "motion");
    assert_eq!(resolve_click(&[&theme]), Some(Command::ToggleTheme));
    assert_eq!(resolve_click(&[&motion]), Some(Command::ToggleMotion));
}

#[test]
fn glyph_text_inside_a_button_resolves_to_the_button() {
    let inner = Element::new("span").with_text("[-]");
    let button = Element::new("button")
        .with_class("collapse-btn")
        .with_attr("data-collapse", "alpha");
    let heading = Element::new("h2").with_attr("id", "alpha");
    assert_eq!(
        resolve_click(&[&inner, &button, &heading]),
        Some(Command::ToggleSection { id: "alpha".into() })
    );
    assert_eq!(resolve_click(&[&heading]), None);
}

#[test]
fn dom_ids_are_sanitized() {
    assert_eq!(sanitize_dom_id("solution-0"), "solution-0");
    assert_eq!(sanitize_dom_id("claimVerification-2"), "claimVerification-2");
    assert_eq!(sanitize_dom_id("  9 lives!  "), "f-9-lives");
    assert_eq!(sanitize_dom_id("a///b"), "a-b");
    assert_eq!(sanitize_dom_id(""), "f-untitled");
    assert_eq!(sanitize_dom_id("---"), "f-untitled");
}
