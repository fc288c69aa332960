use super::{find, render};
use crate::dom::Node;
use crate::sections::{self, Outline};
use crate::store::{MemoryStorage, Storage, StorageKeys, ThemeMotionStore};
use crate::Error;
use std::collections::BTreeSet;

const DOC: &str = "Preamble.\n\n## Alpha\n\nFirst.\n\n### Alpha Detail\n\nMore.\n\n## Beta\n\nSecond.\n";

fn organized() -> Vec<Node> {
    let mut nodes = render(DOC);
    sections::organize(&mut nodes);
    nodes
}

fn ids(list: &[&str]) -> BTreeSet<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn organize_wraps_each_level_two_heading() {
    let nodes = organized();
    assert_eq!(nodes.len(), 3);
    assert!(nodes[0].is_tag("p"));

    let alpha = sections::section(&nodes, "alpha").unwrap();
    assert_eq!(alpha.tag, "section");
    let body = sections::body_of(alpha).unwrap();
    let tags: Vec<&str> = body.child_elements().map(|e| e.tag.as_str()).collect();
    assert_eq!(tags, ["p", "h3", "p"]);

    let beta = sections::section(&nodes, "beta").unwrap();
    assert_eq!(sections::body_of(beta).unwrap().text_content(), "Second.");
}

#[test]
fn organize_is_idempotent() {
    let once = organized();
    let mut twice = once.clone();
    sections::organize(&mut twice);
    assert_eq!(once, twice);
}

#[test]
fn heading_without_content_still_gets_a_body() {
    let mut nodes = render("## Empty\n\n## Next\n\ntext\n");
    sections::organize(&mut nodes);
    let empty = sections::section(&nodes, "empty").unwrap();
    assert!(sections::body_of(empty).unwrap().children.is_empty());
}

#[test]
fn outline_records_anchor_owners() {
    let nodes = organized();
    let outline = Outline::build(&nodes);
    assert_eq!(outline.len(), 2);
    assert_eq!(outline.get("alpha").unwrap().title, "Alpha");
    assert_eq!(outline.get("alpha").unwrap().anchors, ["alpha-detail"]);
    assert_eq!(outline.owner_of("alpha-detail").unwrap().id, "alpha");
    assert_eq!(outline.owner_of("beta").unwrap().id, "beta");
    assert!(outline.owner_of("preamble").is_none());
}

#[test]
fn apply_collapsed_ignores_unknown_ids() {
    let mut nodes = organized();
    let mut outline = Outline::build(&nodes);
    let applied = sections::apply_collapsed(&mut nodes, &mut outline, &ids(&["beta", "gamma"]));
    assert_eq!(applied, 1);
    assert!(outline.is_collapsed("beta"));
    assert!(!outline.is_collapsed("alpha"));

    let beta = sections::section(&nodes, "beta").unwrap();
    assert!(sections::body_of(beta).unwrap().has_class("collapsed"));
    let button = beta.find(&|e| e.has_class("collapse-btn")).unwrap();
    assert_eq!(button.text_content(), "[+]");
    assert_eq!(button.attr("aria-expanded"), Some("false"));
}

#[test]
fn toggle_updates_markup_and_storage() {
    let mut nodes = organized();
    let mut outline = Outline::build(&nodes);
    let mut store = ThemeMotionStore::in_memory();

    assert!(sections::toggle(&mut nodes, &mut outline, &mut store, "alpha").unwrap());
    assert!(store.is_collapsed("alpha"));
    assert_eq!(
        store.storage().get("collapsed-section-ids").as_deref(),
        Some(r#"["alpha"]"#)
    );
    let button = find(&nodes, &|e| e.attr("data-collapse") == Some("alpha"));
    assert_eq!(button.attr("aria-expanded"), Some("false"));

    assert!(!sections::toggle(&mut nodes, &mut outline, &mut store, "alpha").unwrap());
    assert!(!store.is_collapsed("alpha"));
    assert_eq!(store.storage().get("collapsed-section-ids").as_deref(), Some("[]"));
}

#[test]
fn toggle_rejects_unknown_section() {
    let mut nodes = organized();
    let mut outline = Outline::build(&nodes);
    let mut store = ThemeMotionStore::in_memory();
    let err = sections::toggle(&mut nodes, &mut outline, &mut store, "missing").unwrap_err();
    assert!(matches!(err, Error::UnknownSection { ref id } if id == "missing"));
}

#[test]
fn collapse_state_survives_reload() {
    let mut nodes = organized();
    let mut outline = Outline::build(&nodes);
    let mut store = ThemeMotionStore::in_memory();
    sections::toggle(&mut nodes, &mut outline, &mut store, "beta").unwrap();

    let saved = store.storage().get("collapsed-section-ids").unwrap();
    let reloaded = ThemeMotionStore::load(
        Box::new(MemoryStorage::new().with("collapsed-section-ids", &saved)),
        StorageKeys::default(),
        false,
    );

    let mut fresh = organized();
    let mut fresh_outline = Outline::build(&fresh);
    sections::apply_collapsed(&mut fresh, &mut fresh_outline, reloaded.collapsed_ids());
    assert_eq!(fresh, nodes);
}

#[test]
fn expand_for_heading_opens_owner_only_when_collapsed() {
    let mut nodes = organized();
    let mut outline = Outline::build(&nodes);
    let mut store = ThemeMotionStore::in_memory();

    assert_eq!(
        sections::expand_for_heading(&mut nodes, &mut outline, &mut store, "alpha-detail"),
        None
    );

    sections::toggle(&mut nodes, &mut outline, &mut store, "alpha").unwrap();
    assert_eq!(
        sections::expand_for_heading(&mut nodes, &mut outline, &mut store, "alpha-detail").as_deref(),
        Some("alpha")
    );
    assert!(!outline.is_collapsed("alpha"));
    assert!(!store.is_collapsed("alpha"));
    assert_eq!(
        sections::expand_for_heading(&mut nodes, &mut outline, &mut store, "nowhere"),
        None
    );
}
