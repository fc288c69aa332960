//! One-shot first-appearance gating.

use crate::config::FolioConfig;
use crate::dom::{Element, Node, walk_in_mut};
use crate::editorial::TABLE_WRAP_CLASS;
use crate::sections::{BODY_CLASS, SECTION_CLASS};

pub const REVEAL_ATTR: &str = "data-reveal";
pub const VISIBLE_CLASS: &str = "is-in";
pub const HERO_CLASS: &str = "hero";

const BLOCK_CLASSES: &[&str] = &[
    "flow3d",
    "widget-grid",
    "widget",
    "block-grid",
    "block",
    TABLE_WRAP_CLASS,
];
/// Tables are wrapped before targets are collected, so they reveal through their wrapper.
const BODY_TAGS: &[&str] = &["h3", "p", "ul", "ol", "pre"];

pub type RevealKey = usize;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// Elements whose top is above `fold × viewport height` at boot show immediately.
    pub fold: f64,
    pub threshold: f64,
    /// Bottom root margin as a fraction of the viewport (negative shrinks it).
    pub root_margin_bottom: f64,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            fold: 0.9,
            threshold: 0.12,
            root_margin_bottom: -0.12,
        }
    }
}

impl RevealOptions {
    pub fn from_config(config: &FolioConfig) -> Self {
        let d = Self::default();
        Self {
            fold: config.f64_or("reveal.fold", d.fold),
            threshold: config.f64_or("reveal.threshold", d.threshold),
            root_margin_bottom: config.f64_or("reveal.rootMarginBottom", d.root_margin_bottom),
        }
    }

    /// CSS margin string for an intersection observer.
    pub fn root_margin(&self) -> String {
        format!("0px 0px {}% 0px", (self.root_margin_bottom * 100.0).round())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parent {
    Root,
    Hero,
    Section,
    Body,
    Other,
}

/// Tags every reveal target with a `data-reveal` key and returns how many exist.
pub fn collect_targets(nodes: &mut [Node]) -> usize {
    let mut next = 0;
    for el in nodes.iter_mut().filter_map(Node::as_element_mut) {
        mark(el, Parent::Root, &mut next);
    }
    next
}

fn mark(el: &mut Element, parent: Parent, next: &mut usize) {
    let selected = match parent {
        Parent::Hero => true,
        Parent::Section => el.tag == "h2",
        Parent::Body => BODY_TAGS.contains(&el.tag.as_str()),
        Parent::Root | Parent::Other => false,
    } || BLOCK_CLASSES.iter().any(|c| el.has_class(c));

    if selected {
        match el.attr(REVEAL_ATTR).and_then(|k| k.parse::<usize>().ok()) {
            Some(existing) => *next = (*next).max(existing + 1),
            None => {
                el.set_attr(REVEAL_ATTR, next.to_string());
                *next += 1;
            }
        }
    }

    let child_parent = if el.has_class(HERO_CLASS) {
        Parent::Hero
    } else if el.has_class(SECTION_CLASS) {
        Parent::Section
    } else if el.has_class(BODY_CLASS) {
        Parent::Body
    } else {
        Parent::Other
    };
    for child in el.child_elements_mut() {
        mark(child, child_parent, next);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Pending,
    Observed,
    Visible,
}

#[derive(Debug, Clone)]
pub struct RevealController {
    options: RevealOptions,
    states: Vec<RevealState>,
}

impl RevealController {
    pub fn new(count: usize, options: RevealOptions) -> Self {
        Self {
            options,
            states: vec![RevealState::Pending; count],
        }
    }

    pub fn options(&self) -> &RevealOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, key: RevealKey) -> Option<RevealState> {
        self.states.get(key).copied()
    }

    pub fn is_visible(&self, key: RevealKey) -> bool {
        self.state(key) == Some(RevealState::Visible)
    }

    pub fn all_visible(&self) -> bool {
        self.states.iter().all(|s| *s == RevealState::Visible)
    }

    /// Keys still waiting on an intersection report.
    pub fn observed(&self) -> Vec<RevealKey> {
        self.keys_in(RevealState::Observed)
    }

    fn keys_in(&self, state: RevealState) -> Vec<RevealKey> {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, s)| **s == state)
            .map(|(k, _)| k)
            .collect()
    }

    /// Re-evaluates every target that is not yet visible. Without animation everything shows
    /// at once; otherwise targets above the fold show and the rest become observed. A target
    /// with no known position is observed. Returns the keys that became visible.
    pub fn sync(
        &mut self,
        animate: bool,
        viewport_height: f64,
        top_of: &dyn Fn(RevealKey) -> Option<f64>,
    ) -> Vec<RevealKey> {
        let fold = viewport_height * self.options.fold;
        let mut shown = Vec::new();
        for (key, state) in self.states.iter_mut().enumerate() {
            if *state == RevealState::Visible {
                continue;
            }
            let show = !animate || top_of(key).is_some_and(|top| top < fold);
            if show {
                *state = RevealState::Visible;
                shown.push(key);
            } else {
                *state = RevealState::Observed;
            }
        }
        shown
    }

    /// An intersection report. Reveals an observed target once its ratio reaches the
    /// threshold; it is then no longer observed.
    pub fn intersect(&mut self, key: RevealKey, ratio: f64) -> bool {
        match self.states.get_mut(key) {
            Some(state) if *state == RevealState::Observed && ratio >= self.options.threshold => {
                *state = RevealState::Visible;
                true
            }
            _ => false,
        }
    }
}

/// Adds the visible class to every revealed target.
pub fn apply_visibility(nodes: &mut [Node], controller: &RevealController) {
    walk_in_mut(nodes, &mut |el| {
        let key = el.attr(REVEAL_ATTR).and_then(|k| k.parse::<usize>().ok());
        if let Some(key) = key {
            if controller.is_visible(key) {
                el.add_class(VISIBLE_CLASS);
            }
        }
    });
}
