use super::{by_id, find, render};
use crate::dom::{self, Node};
use crate::markup::{Slugger, heading_label, is_external_href, slugify};

#[test]
fn slugify_follows_github_rules() {
    assert_eq!(slugify("Hello, World!"), "hello-world");
    assert_eq!(slugify("Layer 1: Economic Cost"), "layer-1-economic-cost");
    assert_eq!(slugify("10. Roadmap"), "10-roadmap");
    assert_eq!(slugify("  snake_case and-dash  "), "snake_case-and-dash");
    assert_eq!(slugify("Ünïcode Título"), "ünïcode-título");
}

#[test]
fn slugger_suffixes_collisions() {
    let mut slugger = Slugger::new();
    assert_eq!(slugger.slug("Overview"), "overview");
    assert_eq!(slugger.slug("Overview"), "overview-1");
    assert_eq!(slugger.slug("Overview"), "overview-2");
    assert_eq!(slugger.slug("overview-1"), "overview-1-1");
    assert_eq!(slugger.slug("!!!"), "section");
    assert_eq!(slugger.slug("???"), "section-1");

    assert_eq!(Slugger::new().slug("Overview"), "overview");
}

#[test]
fn slugs_are_deterministic_per_document() {
    let md = "## Intro\n\n## Intro\n\n### Intro\n";
    let a = render(md);
    let b = render(md);
    assert_eq!(a, b);
    let ids: Vec<&str> = a
        .iter()
        .filter_map(Node::as_element)
        .filter_map(|e| e.attr("id"))
        .collect();
    assert_eq!(ids, ["intro", "intro-1", "intro-2"]);
}

#[test]
fn level_two_heading_gets_toggle_and_anchor() {
    let nodes = render("## Hello World\n");
    let h2 = by_id(&nodes, "hello-world");
    assert_eq!(h2.tag, "h2");

    let button = find(&nodes, &|e| e.has_class("collapse-btn"));
    assert_eq!(button.attr("data-collapse"), Some("hello-world"));
    assert_eq!(button.attr("aria-expanded"), Some("true"));
    assert_eq!(button.text_content(), "[-]");

    let link = find(&nodes, &|e| e.has_class("heading-link"));
    assert_eq!(link.attr("href"), Some("#hello-world"));
    assert_eq!(heading_label(h2), "Hello World");
}

#[test]
fn level_three_heading_has_anchor_but_no_toggle() {
    let nodes = render("### Sub Topic\n");
    let h3 = by_id(&nodes, "sub-topic");
    assert!(h3.find(&|e| e.has_class("collapse-btn")).is_none());
    assert!(h3.find(&|e| e.has_class("heading-row")).is_some());
    let link = h3.find(&|e| e.has_class("heading-link")).unwrap();
    assert_eq!(link.attr("href"), Some("#sub-topic"));
}

#[test]
fn level_one_heading_gets_a_row_without_controls() {
    let nodes = render("# Paper *Title*\n");
    let h1 = by_id(&nodes, "paper-title");
    assert!(h1.find(&|e| e.has_class("heading-row")).is_some());
    assert!(h1.find(&|e| e.has_class("collapse-btn")).is_none());
    assert!(h1.find(&|e| e.has_class("heading-link")).is_none());
    assert_eq!(heading_label(h1), "Paper Title");
}

#[test]
fn deeper_headings_render_unadorned() {
    let nodes = render("#### Fine *print*\n");
    let h4 = by_id(&nodes, "fine-print");
    assert!(h4.find(&|e| e.has_class("heading-row")).is_none());
    assert_eq!(h4.text_content(), "Fine print");
    assert!(h4.child_elements().any(|e| e.tag == "em"));
}

#[test]
fn external_links_open_in_new_tab() {
    let nodes = render(
        "[docs](https://example.com/a \"Docs\") and [local](#intro) and [rel](./b.md)\n",
    );
    let ext = find(&nodes, &|e| e.attr("href") == Some("https://example.com/a"));
    assert!(ext.has_class("reverse"));
    assert_eq!(ext.attr("target"), Some("_blank"));
    assert_eq!(ext.attr("rel"), Some("noopener noreferrer"));
    assert_eq!(ext.attr("title"), Some("Docs"));

    for href in ["#intro", "./b.md"] {
        let a = find(&nodes, &|e| e.attr("href") == Some(href));
        assert_eq!(a.attr("target"), None);
        assert!(!a.has_class("reverse"));
    }

    assert!(is_external_href("HTTP://EXAMPLE.COM"));
    assert!(!is_external_href("mailto:x@example.com"));
}

#[test]
fn recognized_language_is_highlighted() {
    let nodes = render("```rust\nfn main() {}\n```\n");
    let code = find(&nodes, &|e| e.tag == "code");
    assert!(code.has_class("hljs"));
    assert!(code.has_class("language-rust"));
    assert!(matches!(code.children.first(), Some(Node::Highlighted { .. })));
    assert_eq!(code.text_content(), "fn main() {}\n");
    assert!(code.to_html().contains("hl-"));
}

#[test]
fn unknown_language_and_plain_blocks_stay_literal() {
    let nodes = render("```nosuchlang\n<b>x</b>\n```\n\n```\n+--+\n|  |\n```\n");
    let codes: Vec<_> = dom::find_all_in(&nodes, &|e| e.tag == "code");
    assert_eq!(codes.len(), 2);
    assert!(!codes[0].has_class("hljs"));
    assert!(codes[0].to_html().contains("&lt;b&gt;x&lt;/b&gt;"));
    assert_eq!(codes[1].text_content(), "+--+\n|  |\n");
}

#[test]
fn tables_and_tasks_render() {
    let nodes = render("| a | b |\n|:-|-:|\n| 1 | 2 |\n\n- [x] done\n- [ ] todo\n");
    let table = find(&nodes, &|e| e.tag == "table");
    assert!(table.find(&|e| e.tag == "thead").is_some());
    let td = table.find(&|e| e.tag == "td").unwrap();
    assert_eq!(td.attr("style"), Some("text-align: left"));
    let boxes = dom::find_all_in(&nodes, &|e| e.attr("type") == Some("checkbox"));
    assert_eq!(boxes.len(), 2);
    assert!(boxes[0].attr("checked").is_some());
    assert!(boxes[1].attr("checked").is_none());
}
