use super::{find, render};
use crate::dom::{self, Element, Node};
use crate::editorial::{
    add_copy_buttons, apply_lanes, build_hero, reading_progress, transform_key_lists, wrap_tables,
};
use crate::sections;

#[test]
fn hero_lifts_title_tagline_and_version() {
    let mut nodes = render("# EVA\n\n## Trust *for* news\n\nVersion 2.1\n\n---\n\n## Intro\n\ntext\n");
    assert!(build_hero(&mut nodes));

    let hero = nodes[0].as_element().unwrap();
    assert_eq!(hero.tag, "header");
    assert!(hero.has_class("hero") && hero.has_class("lane-full"));
    let part = |class: &str| hero.find(&|e| e.has_class(class)).unwrap().text_content();
    assert_eq!(part("hero-kicker"), "EVA");
    assert_eq!(part("hero-title"), "Trust for news");
    assert_eq!(part("hero-meta"), "Version 2.1");

    let rest: Vec<&str> = nodes[1..]
        .iter()
        .filter_map(Node::as_element)
        .map(|e| e.tag.as_str())
        .collect();
    assert_eq!(rest, ["hr", "h2", "p"]);
    assert!(!build_hero(&mut nodes));
}

#[test]
fn version_line_after_rule_is_not_meta() {
    let mut nodes = render("# T\n\n## Tag\n\n---\n\nVersion later\n");
    assert!(build_hero(&mut nodes));
    assert!(dom::find_in(&nodes, &|e| e.has_class("hero-meta")).is_none());
    assert!(nodes.last().unwrap().is_tag("p"));
}

#[test]
fn hero_needs_title_and_tagline() {
    let mut nodes = render("# Only a title\n\ntext\n");
    assert!(!build_hero(&mut nodes));
    assert!(nodes[0].is_tag("h1"));
}

#[test]
fn key_lists_become_toned_cards() {
    let mut nodes = render(
        "Key innovations:\n\n- one\n- two\n\nCore principles:\n\n1. first\n\n**Key innovations:**\n\n1. ordered\n",
    );
    assert_eq!(transform_key_lists(&mut nodes), 2);

    let grids = dom::find_all_in(&nodes, &|e| e.has_class("block-grid"));
    assert_eq!(grids.len(), 2);
    let tones: Vec<Vec<&str>> = grids
        .iter()
        .map(|g| {
            g.child_elements()
                .filter_map(|c| c.classes().find(|c| c.starts_with("tone-")))
                .collect()
        })
        .collect();
    assert_eq!(tones, [vec!["tone-mint", "tone-lime"], vec!["tone-mint"]]);
    assert_eq!(grids[0].text_content(), "onetwo");

    let kickers = dom::find_all_in(&nodes, &|e| e.has_class("block-kicker"));
    assert_eq!(kickers.len(), 2);
    assert_eq!(dom::find_all_in(&nodes, &|e| e.tag == "ol").len(), 1);
}

#[test]
fn tables_are_wrapped_once() {
    let mut nodes = render("| a |\n|---|\n| 1 |\n");
    nodes.push(
        Element::new("div")
            .with_child(Element::new("table").with_class("lane-full"))
            .into(),
    );
    assert_eq!(wrap_tables(&mut nodes), 2);
    assert_eq!(wrap_tables(&mut nodes), 0);

    let wraps = dom::find_all_in(&nodes, &|e| e.has_class("table-wrap"));
    assert!(wraps[0].has_class("lane-wide"));
    assert!(wraps[1].has_class("lane-full") && !wraps[1].has_class("lane-wide"));
    assert!(!wraps[1].child_elements().next().unwrap().has_class("lane-full"));
}

#[test]
fn copy_buttons_capture_code_text() {
    let mut nodes = render("```\nline one\n\n```\n\n```rust\nlet x = 1;\n```\n");
    let texts = add_copy_buttons(&mut nodes);
    assert_eq!(texts, ["line one", "let x = 1;"]);

    let button = find(&nodes, &|e| e.has_class("copy-btn") && e.attr("data-copy") == Some("1"));
    assert_eq!(button.text_content(), "Copy");
    let pre = find(&nodes, &|e| e.tag == "pre" && e.attr("data-copy") == Some("0"));
    assert!(pre.child_elements().any(|c| c.has_class("copy-btn")));

    assert!(add_copy_buttons(&mut nodes).is_empty());
}

#[test]
fn lanes_follow_block_kind() {
    let mut nodes = render("---\n\n## S\n\ntext\n\n### Sub\n\n---\n\n| a |\n|---|\n| 1 |\n");
    sections::organize(&mut nodes);
    wrap_tables(&mut nodes);
    apply_lanes(&mut nodes);

    assert!(nodes[0].as_element().unwrap().has_class("lane-full"));
    let section = sections::section(&nodes, "s").unwrap();
    assert!(section.child_elements().next().unwrap().has_class("lane-narrow"));
    let lanes: Vec<(&str, &str)> = sections::body_of(section)
        .unwrap()
        .child_elements()
        .map(|e| {
            let lane = e.classes().find(|c| c.starts_with("lane-")).unwrap_or("");
            (e.tag.as_str(), lane)
        })
        .collect();
    assert_eq!(
        lanes,
        [
            ("p", "lane-narrow"),
            ("h3", "lane-narrow"),
            ("hr", "lane-full"),
            ("div", "lane-wide"),
        ]
    );
}

#[test]
fn reading_progress_is_clamped() {
    assert_eq!(reading_progress(50.0, 1100.0, 100.0), 5.0);
    assert_eq!(reading_progress(5000.0, 1100.0, 100.0), 100.0);
    assert_eq!(reading_progress(-10.0, 1100.0, 100.0), 0.0);
    assert_eq!(reading_progress(10.0, 100.0, 100.0), 0.0);
}
