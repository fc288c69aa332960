//! Owned element tree that every pipeline pass reads and rewrites.
//!
//! The tree is deliberately small: elements with ordered attributes, text, and two opaque leaf
//! kinds for markup that is already serialized (inline HTML from the source document and
//! highlighted code).

use indexmap::IndexMap;

pub type Predicate<'a> = &'a dyn Fn(&Element) -> bool;

const VOID_ELEMENTS: &[&str] = &[
    "area", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Markup passed through verbatim.
    Raw(String),
    /// Highlighted code: `source` is what text queries see, `html` is what gets serialized.
    Highlighted { source: String, html: String },
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|el| el.tag == tag)
    }

    /// True for text nodes made only of whitespace.
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Node::Text(t) if t.trim().is_empty())
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Node::Text(t) => out.push_str(t),
            Node::Raw(_) => {}
            Node::Highlighted { source, .. } => out.push_str(source),
        }
    }
}

impl From<Element> for Node {
    fn from(value: Element) -> Self {
        Node::Element(value)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: IndexMap<String, String>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attrs.insert(name.to_string(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attrs.shift_remove(name)
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        match self.attrs.get_mut("class") {
            Some(existing) if !existing.trim().is_empty() => {
                existing.push(' ');
                existing.push_str(class);
            }
            _ => self.set_attr("class", class),
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let kept: Vec<&str> = self.classes().filter(|c| *c != class).collect();
        let joined = kept.join(" ");
        if joined.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", joined);
        }
    }

    pub fn toggle_class(&mut self, class: &str, on: bool) {
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
    }

    pub fn push(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Replaces all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// `Some(n)` for `h1`..`h6`.
    pub fn heading_level(&self) -> Option<u8> {
        let rest = self.tag.strip_prefix('h')?;
        match rest.parse::<u8>() {
            Ok(n @ 1..=6) => Some(n),
            _ => None,
        }
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Depth-first search including `self`.
    pub fn find(&self, pred: Predicate<'_>) -> Option<&Element> {
        if pred(self) {
            return Some(self);
        }
        find_in(&self.children, pred)
    }

    pub fn find_mut(&mut self, pred: Predicate<'_>) -> Option<&mut Element> {
        if pred(self) {
            return Some(self);
        }
        find_in_mut(&mut self.children, pred)
    }

    pub fn find_all(&self, pred: Predicate<'_>) -> Vec<&Element> {
        let mut out = Vec::new();
        collect_matches(self, pred, &mut out);
        out
    }

    /// Visits `self` and every descendant element in document order.
    pub fn walk_mut(&mut self, f: &mut dyn FnMut(&mut Element)) {
        f(self);
        walk_in_mut(&mut self.children, f);
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_element(&mut out, self);
        out
    }
}

fn collect_matches<'a>(el: &'a Element, pred: Predicate<'_>, out: &mut Vec<&'a Element>) {
    if pred(el) {
        out.push(el);
    }
    for child in el.child_elements() {
        collect_matches(child, pred, out);
    }
}

pub fn find_in<'a>(nodes: &'a [Node], pred: Predicate<'_>) -> Option<&'a Element> {
    nodes
        .iter()
        .filter_map(Node::as_element)
        .find_map(|el| el.find(pred))
}

pub fn find_in_mut<'a>(nodes: &'a mut [Node], pred: Predicate<'_>) -> Option<&'a mut Element> {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            if let Some(found) = el.find_mut(pred) {
                return Some(found);
            }
        }
    }
    None
}

pub fn find_all_in<'a>(nodes: &'a [Node], pred: Predicate<'_>) -> Vec<&'a Element> {
    let mut out = Vec::new();
    for el in nodes.iter().filter_map(Node::as_element) {
        collect_matches(el, pred, &mut out);
    }
    out
}

pub fn walk_in_mut(nodes: &mut [Node], f: &mut dyn FnMut(&mut Element)) {
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            el.walk_mut(f);
        }
    }
}

pub fn locate<'a>(nodes: &'a [Node], pred: Predicate<'_>) -> Option<(&'a [Node], usize)> {
    if let Some(idx) = nodes
        .iter()
        .position(|n| n.as_element().is_some_and(|el| pred(el)))
    {
        return Some((nodes, idx));
    }
    nodes
        .iter()
        .filter_map(Node::as_element)
        .find_map(|el| locate(&el.children, pred))
}

/// Locates the first element matching `pred` and returns its sibling list plus its index there,
/// so callers can insert next to it.
pub fn locate_mut<'a>(
    nodes: &'a mut Vec<Node>,
    pred: Predicate<'_>,
) -> Option<(&'a mut Vec<Node>, usize)> {
    if let Some(idx) = nodes
        .iter()
        .position(|n| n.as_element().is_some_and(|el| pred(el)))
    {
        return Some((nodes, idx));
    }
    for node in nodes.iter_mut() {
        if let Node::Element(el) = node {
            if let Some(found) = locate_mut(&mut el.children, pred) {
                return Some(found);
            }
        }
    }
    None
}

pub fn to_html(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(&mut out, node);
    }
    out
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Element(el) => write_element(out, el),
        Node::Text(t) => out.push_str(&htmlize::escape_text(t.as_str())),
        Node::Raw(html) => out.push_str(html),
        Node::Highlighted { html, .. } => out.push_str(html),
    }
}

fn write_element(out: &mut String, el: &Element) {
    out.push('<');
    out.push_str(&el.tag);
    for (name, value) in &el.attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&htmlize::escape_attribute(value.as_str()));
        out.push('"');
    }
    out.push('>');
    if VOID_ELEMENTS.contains(&el.tag.as_str()) {
        return;
    }
    for child in &el.children {
        write_node(out, child);
    }
    out.push_str("</");
    out.push_str(&el.tag);
    out.push('>');
}
