//! Groups every root-level `h2` with its following content into a collapsible section.

use crate::dom::{Element, Node};
use crate::markup::{COLLAPSE_BUTTON_CLASS, GLYPH_COLLAPSED, GLYPH_EXPANDED, heading_label};
use crate::store::ThemeMotionStore;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::collections::BTreeSet;

pub const SECTION_CLASS: &str = "paper-section";
pub const BODY_CLASS: &str = "section-body";
pub const COLLAPSED_CLASS: &str = "collapsed";

fn is_section(el: &Element) -> bool {
    el.tag == "section" && el.has_class(SECTION_CLASS)
}

fn is_body(el: &Element) -> bool {
    el.tag == "div" && el.has_class(BODY_CLASS)
}

/// Wraps sections in place. Running it again on its own output changes nothing.
pub fn organize(nodes: &mut Vec<Node>) {
    let input = std::mem::take(nodes);
    let mut out = Vec::with_capacity(input.len());
    let mut open: Option<(Element, Element)> = None;
    let mut wrapped = 0usize;

    let mut iter = input.into_iter().peekable();
    while let Some(node) = iter.next() {
        match node {
            Node::Element(el) if is_section(&el) => {
                flush(&mut out, open.take(), &mut wrapped);
                out.push(el.into());
            }
            Node::Element(el) if el.tag == "h2" => {
                flush(&mut out, open.take(), &mut wrapped);
                let body_follows = matches!(iter.peek(), Some(Node::Element(next)) if is_body(next));
                let body = match iter.next_if(|_| body_follows) {
                    Some(Node::Element(body)) => body,
                    _ => Element::new("div").with_class(BODY_CLASS),
                };
                open = Some((el, body));
            }
            other => match open.as_mut() {
                Some((_, body)) => body.push(other),
                None => out.push(other),
            },
        }
    }
    flush(&mut out, open.take(), &mut wrapped);
    tracing::debug!(sections = wrapped, "organized sections");
    *nodes = out;
}

fn flush(out: &mut Vec<Node>, open: Option<(Element, Element)>, wrapped: &mut usize) {
    let Some((heading, body)) = open else {
        return;
    };
    let id = heading.attr("id").unwrap_or_default().to_string();
    let section = Element::new("section")
        .with_class(SECTION_CLASS)
        .with_attr("data-section", id)
        .with_child(heading)
        .with_child(body);
    out.push(section.into());
    *wrapped += 1;
}

pub fn section_mut<'a>(nodes: &'a mut [Node], id: &str) -> Option<&'a mut Element> {
    nodes
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .find(|el| is_section(el) && el.attr("data-section") == Some(id))
}

pub fn section<'a>(nodes: &'a [Node], id: &str) -> Option<&'a Element> {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .find(|el| is_section(el) && el.attr("data-section") == Some(id))
}

/// Section body, if the element is a section wrapper.
pub fn body_of(section: &Element) -> Option<&Element> {
    section.child_elements().find(|el| is_body(el))
}

pub fn body_of_mut(section: &mut Element) -> Option<&mut Element> {
    section.child_elements_mut().find(|el| is_body(el))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: String,
    pub heading_level: u8,
    pub title: String,
    pub collapsed: bool,
    /// Ids of the headings inside the body, in document order.
    pub anchors: Vec<String>,
}

/// Section index built once after the structural passes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Outline {
    sections: Vec<Section>,
    #[serde(skip)]
    owners: FxHashMap<String, usize>,
}

impl Outline {
    pub fn build(nodes: &[Node]) -> Self {
        let mut outline = Self::default();
        for el in nodes.iter().filter_map(Node::as_element).filter(|el| is_section(el)) {
            let Some(id) = el.attr("data-section") else {
                continue;
            };
            let heading = el.child_elements().find(|c| c.heading_level().is_some());
            let (heading_level, title) = match heading {
                Some(h) => (h.heading_level().unwrap_or(2), heading_label(h).trim().to_string()),
                None => (2, String::new()),
            };
            let body = body_of(el);
            let anchors: Vec<String> = body
                .map(|b| {
                    b.find_all(&|e| e.heading_level().is_some() && e.attr("id").is_some())
                        .into_iter()
                        .filter_map(|h| h.attr("id").map(str::to_string))
                        .collect()
                })
                .unwrap_or_default();
            let collapsed = body.is_some_and(|b| b.has_class(COLLAPSED_CLASS));

            let idx = outline.sections.len();
            outline.owners.insert(id.to_string(), idx);
            for anchor in &anchors {
                outline.owners.entry(anchor.clone()).or_insert(idx);
            }
            outline.sections.push(Section {
                id: id.to_string(),
                heading_level,
                title,
                collapsed,
                anchors,
            });
        }
        outline
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Section that is, or contains, the given heading anchor.
    pub fn owner_of(&self, anchor: &str) -> Option<&Section> {
        self.owners.get(anchor).map(|&idx| &self.sections[idx])
    }

    pub fn is_collapsed(&self, id: &str) -> bool {
        self.get(id).is_some_and(|s| s.collapsed)
    }

    fn set_collapsed(&mut self, id: &str, collapsed: bool) {
        if let Some(section) = self.sections.iter_mut().find(|s| s.id == id) {
            section.collapsed = collapsed;
        }
    }
}

fn render_collapsed(nodes: &mut [Node], id: &str, collapsed: bool) -> bool {
    let Some(section) = section_mut(nodes, id) else {
        return false;
    };
    if let Some(body) = body_of_mut(section) {
        body.toggle_class(COLLAPSED_CLASS, collapsed);
    }
    if let Some(button) = section.find_mut(&|e| e.has_class(COLLAPSE_BUTTON_CLASS)) {
        button.set_text(if collapsed {
            GLYPH_COLLAPSED
        } else {
            GLYPH_EXPANDED
        });
        button.set_attr("aria-expanded", (!collapsed).to_string());
    }
    true
}

/// Collapses every known section named in `ids`; unknown ids are skipped.
/// Returns how many sections were collapsed.
pub fn apply_collapsed(nodes: &mut [Node], outline: &mut Outline, ids: &BTreeSet<String>) -> usize {
    let mut applied = 0;
    for id in ids {
        if outline.get(id).is_none() {
            tracing::debug!(section = %id, "ignoring persisted collapse for unknown section");
            continue;
        }
        if render_collapsed(nodes, id, true) {
            outline.set_collapsed(id, true);
            applied += 1;
        }
    }
    applied
}

/// Flips a section and records the new state. Returns the new collapsed flag, or an error
/// for an unknown section.
pub fn toggle(
    nodes: &mut [Node],
    outline: &mut Outline,
    store: &mut ThemeMotionStore,
    id: &str,
) -> crate::Result<bool> {
    let Some(current) = outline.get(id).map(|s| s.collapsed) else {
        return Err(crate::Error::UnknownSection { id: id.to_string() });
    };
    let next = !current;
    render_collapsed(nodes, id, next);
    outline.set_collapsed(id, next);
    store.set_collapsed(id, next);
    Ok(next)
}

/// Opens the section owning `anchor` if it is collapsed. Returns the id of the section that
/// was opened.
pub fn expand_for_heading(
    nodes: &mut [Node],
    outline: &mut Outline,
    store: &mut ThemeMotionStore,
    anchor: &str,
) -> Option<String> {
    let owner = outline.owner_of(anchor)?;
    if !owner.collapsed {
        return None;
    }
    let id = owner.id.clone();
    render_collapsed(nodes, &id, false);
    outline.set_collapsed(&id, false);
    store.set_collapsed(&id, false);
    Some(id)
}
