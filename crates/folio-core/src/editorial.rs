//! Presentation passes around the structural core: hero header, key-list cards, table wrappers,
//! code copy affordances and layout lanes.

use crate::dom::{self, Element, Node};
use crate::markup::HEADING_LABEL_CLASS;
use crate::motion::reveal::HERO_CLASS;
use crate::sections::{BODY_CLASS, SECTION_CLASS};
use regex::Regex;
use std::sync::LazyLock;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bversion\b").expect("version pattern"));

pub const LANE_NARROW: &str = "lane-narrow";
pub const LANE_WIDE: &str = "lane-wide";
pub const LANE_FULL: &str = "lane-full";
const LANES: [&str; 3] = [LANE_NARROW, LANE_WIDE, LANE_FULL];

pub const TABLE_WRAP_CLASS: &str = "table-wrap";
pub const BLOCK_GRID_CLASS: &str = "block-grid";
pub const COPY_BUTTON_CLASS: &str = "copy-btn";

const BLOCK_TONES: [&str; 6] = ["mint", "lime", "coral", "sky", "peri", "lav"];

fn set_lane(el: &mut Element, lane: &str) {
    for c in LANES {
        el.remove_class(c);
    }
    el.add_class(lane);
}

fn heading_inner(heading: &Element) -> Vec<Node> {
    match heading.find(&|e| e.has_class(HEADING_LABEL_CLASS)) {
        Some(label) => label.children.clone(),
        None => heading.children.clone(),
    }
}

fn element_at(nodes: &[Node], idx: usize) -> Option<&Element> {
    nodes.get(idx).and_then(Node::as_element)
}

/// Lifts the title (`h1`), the tagline (next `h2`) and an optional version line into a
/// `header.hero` at the top. Returns whether a hero was built.
pub fn build_hero(nodes: &mut Vec<Node>) -> bool {
    if nodes
        .iter()
        .filter_map(Node::as_element)
        .any(|el| el.has_class(HERO_CLASS))
    {
        return false;
    }
    let Some(h1_idx) = nodes.iter().position(|n| n.is_tag("h1")) else {
        return false;
    };
    let Some(h2_idx) = (h1_idx + 1..nodes.len()).find(|&i| nodes[i].is_tag("h2")) else {
        return false;
    };

    let mut version_idx = None;
    for i in h2_idx + 1..nodes.len() {
        let Some(el) = element_at(nodes, i) else {
            continue;
        };
        if el.tag == "p" && VERSION_RE.is_match(&el.text_content()) {
            version_idx = Some(i);
            break;
        }
        if el.tag == "hr" || el.tag == "h2" {
            break;
        }
    }

    let kicker = element_at(nodes, h1_idx).map(heading_inner).unwrap_or_default();
    let title = element_at(nodes, h2_idx).map(heading_inner).unwrap_or_default();
    let meta = version_idx
        .and_then(|i| element_at(nodes, i))
        .map(|p| p.children.clone())
        .unwrap_or_default();

    let mut hero = Element::new("header")
        .with_class(HERO_CLASS)
        .with_class(LANE_FULL)
        .with_child(Element::new("div").with_class("hero-kicker").with_children(kicker))
        .with_child(Element::new("h1").with_class("hero-title").with_children(title));
    if meta.iter().any(|n| !n.is_blank_text()) {
        hero.push(Element::new("div").with_class("hero-meta").with_children(meta));
    }

    let mut removed = vec![h1_idx, h2_idx];
    removed.extend(version_idx);
    removed.sort_unstable();
    for idx in removed.into_iter().rev() {
        nodes.remove(idx);
    }
    nodes.insert(0, hero.into());
    tracing::debug!("built hero header");
    true
}

/// Turns `Key innovations:` + `ul` and `Core principles:` + `ol` into toned card grids.
pub fn transform_key_lists(nodes: &mut Vec<Node>) -> usize {
    let targets = [("key innovations:", "ul"), ("core principles:", "ol")];
    let mut converted = 0;
    for (label, list_tag) in targets {
        let is_kicker = |el: &Element| el.tag == "p" && el.text_content().trim().to_lowercase() == label;
        let Some((siblings, idx)) = dom::locate_mut(nodes, &is_kicker) else {
            continue;
        };
        let Some(list_idx) = (idx + 1..siblings.len()).find(|&i| !siblings[i].is_blank_text()) else {
            continue;
        };
        if !siblings[list_idx].is_tag(list_tag) {
            continue;
        }

        if let Some(p) = siblings[idx].as_element_mut() {
            p.add_class("block-kicker");
        }
        let items: Vec<Element> = match siblings.remove(list_idx) {
            Node::Element(list) => list
                .children
                .into_iter()
                .filter_map(|n| match n {
                    Node::Element(li) if li.tag == "li" => Some(li),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };
        let mut grid = Element::new("div").with_class(BLOCK_GRID_CLASS).with_class(LANE_WIDE);
        for (i, li) in items.into_iter().enumerate() {
            let tone = BLOCK_TONES[i % BLOCK_TONES.len()];
            grid.push(
                Element::new("div")
                    .with_class("block")
                    .with_class(&format!("tone-{tone}"))
                    .with_children(li.children),
            );
        }
        siblings.insert(list_idx, grid.into());
        converted += 1;
    }
    converted
}

/// Wraps each table not already wrapped in `div.table-wrap`, moving lane classes onto the wrapper.
pub fn wrap_tables(nodes: &mut Vec<Node>) -> usize {
    let mut wrapped = 0;
    wrap_tables_in(nodes, false, &mut wrapped);
    wrapped
}

fn wrap_tables_in(nodes: &mut Vec<Node>, inside_wrap: bool, wrapped: &mut usize) {
    for node in nodes.iter_mut() {
        let Node::Element(el) = node else {
            continue;
        };
        if el.tag == "table" {
            if inside_wrap {
                continue;
            }
            let mut table = std::mem::take(el);
            let mut wrap = Element::new("div").with_class(TABLE_WRAP_CLASS);
            for lane in LANES {
                if table.has_class(lane) {
                    table.remove_class(lane);
                    wrap.add_class(lane);
                }
            }
            if !LANES.iter().any(|l| wrap.has_class(l)) {
                wrap.add_class(LANE_WIDE);
            }
            wrap.push(table);
            *el = wrap;
            *wrapped += 1;
            continue;
        }
        let is_wrap = el.has_class(TABLE_WRAP_CLASS);
        wrap_tables_in(&mut el.children, inside_wrap || is_wrap, wrapped);
    }
}

/// Marks every `pre` with a copy key and appends its copy button. Returns the code text per key.
pub fn add_copy_buttons(nodes: &mut [Node]) -> Vec<String> {
    let mut texts = Vec::new();
    dom::walk_in_mut(nodes, &mut |el| {
        if el.tag != "pre" || el.attr("data-copy").is_some() {
            return;
        }
        let key = texts.len().to_string();
        let code = match el.find(&|e| e.tag == "code") {
            Some(code) => code.text_content(),
            None => el.text_content(),
        };
        texts.push(code.trim_end().to_string());
        el.set_attr("data-copy", key.as_str());
        el.push(
            Element::new("button")
                .with_class(COPY_BUTTON_CLASS)
                .with_attr("type", "button")
                .with_attr("data-copy", key)
                .with_text("Copy"),
        );
    });
    texts
}

/// Assigns layout lanes: full width for the hero and root rules, narrow for prose, wide for
/// diagrams, widgets, card grids and tables.
pub fn apply_lanes(nodes: &mut [Node]) {
    for el in nodes.iter_mut().filter_map(Node::as_element_mut) {
        if el.has_class(HERO_CLASS) || el.tag == "hr" {
            set_lane(el, LANE_FULL);
            continue;
        }
        if !el.has_class(SECTION_CLASS) {
            continue;
        }
        for child in el.child_elements_mut() {
            if child.tag == "h2" {
                set_lane(child, LANE_NARROW);
            } else if child.has_class(BODY_CLASS) {
                for block in child.child_elements_mut() {
                    let lane = if ["flow3d", "widget-grid", BLOCK_GRID_CLASS, TABLE_WRAP_CLASS]
                        .iter()
                        .any(|c| block.has_class(c))
                        || block.tag == "table"
                    {
                        Some(LANE_WIDE)
                    } else if block.tag == "hr" {
                        Some(LANE_FULL)
                    } else if ["h3", "p", "ul", "ol", "pre"].contains(&block.tag.as_str()) {
                        Some(LANE_NARROW)
                    } else {
                        None
                    };
                    if let Some(lane) = lane {
                        set_lane(block, lane);
                    }
                }
            }
        }
    }
}

/// Scroll progress in percent, clamped to `[0, 100]`; zero when nothing can scroll.
pub fn reading_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f64 {
    let range = scroll_height - client_height;
    if range <= 0.0 || !scroll_top.is_finite() {
        return 0.0;
    }
    (scroll_top / range * 100.0).clamp(0.0, 100.0)
}
