//! Markdown → [`Node`] tree with the document's heading, link and code rules.

pub mod highlight;
pub mod slug;

use crate::dom::{Element, Node};
use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

pub use highlight::Highlighter;
pub use slug::{Slugger, slugify};

pub const COLLAPSE_BUTTON_CLASS: &str = "collapse-btn";
pub const HEADING_ROW_CLASS: &str = "heading-row";
pub const HEADING_LABEL_CLASS: &str = "heading-label";
pub const HEADING_LINK_CLASS: &str = "heading-link";
pub const GLYPH_EXPANDED: &str = "[-]";
pub const GLYPH_COLLAPSED: &str = "[+]";

/// Renders the source document. Holds the highlighter so grammars load once per process.
#[derive(Debug)]
pub struct MarkupRenderer {
    highlighter: Highlighter,
    options: Options,
}

impl Default for MarkupRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkupRenderer {
    pub fn new() -> Self {
        Self {
            highlighter: Highlighter::new(),
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS,
        }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    pub fn render(&self, markdown: &str) -> Vec<Node> {
        let mut builder = TreeBuilder::new(&self.highlighter);
        for event in Parser::new_ext(markdown, self.options) {
            builder.event(event);
        }
        let nodes = builder.finish();
        tracing::debug!(blocks = nodes.len(), "rendered markup");
        nodes
    }
}

/// Whether `href` is an absolute `http(s)` URL.
pub fn is_external_href(href: &str) -> bool {
    let href = href.trim_start();
    href.get(..7)
        .is_some_and(|p| p.eq_ignore_ascii_case("http://"))
        || href
            .get(..8)
            .is_some_and(|p| p.eq_ignore_ascii_case("https://"))
}

/// Visible heading text, ignoring the collapse glyph and the anchor link.
pub fn heading_label(heading: &Element) -> String {
    match heading.find(&|e| e.has_class(HEADING_LABEL_CLASS)) {
        Some(label) => label.text_content(),
        None => heading.text_content(),
    }
}

#[derive(Debug)]
enum FrameKind {
    Plain,
    Heading(u8),
    Image { src: String, title: String },
    Code(Option<String>),
    /// Children are spliced into the parent.
    Transparent,
    Discard,
}

#[derive(Debug)]
struct Frame {
    el: Element,
    kind: FrameKind,
}

struct TreeBuilder<'h> {
    highlighter: &'h Highlighter,
    slugger: Slugger,
    root: Vec<Node>,
    stack: Vec<Frame>,
    alignments: Vec<Alignment>,
    in_table_head: bool,
    cell_index: usize,
}

impl<'h> TreeBuilder<'h> {
    fn new(highlighter: &'h Highlighter) -> Self {
        Self {
            highlighter,
            slugger: Slugger::new(),
            root: Vec::new(),
            stack: Vec::new(),
            alignments: Vec::new(),
            in_table_head: false,
            cell_index: 0,
        }
    }

    fn finish(mut self) -> Vec<Node> {
        // Unbalanced input cannot come out of pulldown-cmark, but never drop content.
        while !self.stack.is_empty() {
            self.close();
        }
        self.root
    }

    fn push_node(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(frame) => frame.el.children.push(node),
            None => self.root.push(node),
        }
    }

    fn open(&mut self, el: Element) {
        self.stack.push(Frame {
            el,
            kind: FrameKind::Plain,
        });
    }

    fn open_kind(&mut self, kind: FrameKind) {
        self.stack.push(Frame {
            el: Element::new("span"),
            kind,
        });
    }

    fn top_tag(&self) -> Option<&str> {
        self.stack.last().map(|f| f.el.tag.as_str())
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(end) => self.end(end),
            Event::Text(text) => self.push_node(Node::Text(text.into_string())),
            Event::Code(code) => {
                self.push_node(Element::new("code").with_text(code.into_string()).into())
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                self.push_node(Node::Raw(html.into_string()))
            }
            Event::SoftBreak => self.push_node(Node::text("\n")),
            Event::HardBreak => self.push_node(Element::new("br").into()),
            Event::Rule => self.push_node(Element::new("hr").into()),
            Event::TaskListMarker(done) => {
                let mut input = Element::new("input")
                    .with_attr("type", "checkbox")
                    .with_attr("disabled", "");
                if done {
                    input.set_attr("checked", "");
                }
                self.push_node(input.into());
            }
            Event::FootnoteReference(name) => {
                let name = name.into_string();
                let link = Element::new("a")
                    .with_attr("href", format!("#fn-{name}"))
                    .with_text(name);
                self.push_node(
                    Element::new("sup")
                        .with_class("footnote-reference")
                        .with_child(link)
                        .into(),
                );
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading { level, .. } => {
                let level = level as u8;
                self.stack.push(Frame {
                    el: Element::new(format!("h{level}")),
                    kind: FrameKind::Heading(level),
                });
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .filter(|l| !l.is_empty())
                        .map(str::to_string),
                    CodeBlockKind::Indented => None,
                };
                self.open_kind(FrameKind::Code(lang));
            }
            Tag::List(Some(start)) => {
                let mut ol = Element::new("ol");
                if start != 1 {
                    ol.set_attr("start", start.to_string());
                }
                self.open(ol);
            }
            Tag::List(None) => self.open(Element::new("ul")),
            Tag::Item => self.open(Element::new("li")),
            Tag::FootnoteDefinition(name) => self.open(
                Element::new("div")
                    .with_class("footnote-definition")
                    .with_attr("id", format!("fn-{name}")),
            ),
            Tag::Table(alignments) => {
                self.alignments = alignments;
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                if self.top_tag() != Some("tbody") {
                    self.open(Element::new("tbody"));
                }
                self.cell_index = 0;
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.in_table_head { "th" } else { "td" });
                match self.alignments.get(self.cell_index) {
                    Some(Alignment::Left) => cell.set_attr("style", "text-align: left"),
                    Some(Alignment::Center) => cell.set_attr("style", "text-align: center"),
                    Some(Alignment::Right) => cell.set_attr("style", "text-align: right"),
                    _ => {}
                }
                self.cell_index += 1;
                self.open(cell);
            }
            Tag::Emphasis => self.open(Element::new("em")),
            Tag::Strong => self.open(Element::new("strong")),
            Tag::Strikethrough => self.open(Element::new("del")),
            Tag::Link {
                dest_url, title, ..
            } => self.open(link_element(&dest_url, &title)),
            Tag::Image {
                dest_url, title, ..
            } => self.open_kind(FrameKind::Image {
                src: dest_url.into_string(),
                title: title.into_string(),
            }),
            Tag::MetadataBlock(_) => self.open_kind(FrameKind::Discard),
            _ => self.open_kind(FrameKind::Transparent),
        }
    }

    fn end(&mut self, end: TagEnd) {
        match end {
            TagEnd::TableHead => {
                self.close(); // tr
                self.close(); // thead
                self.in_table_head = false;
            }
            TagEnd::Table => {
                if self.top_tag() == Some("tbody") {
                    self.close();
                }
                self.close();
                self.alignments.clear();
            }
            _ => self.close(),
        }
    }

    fn close(&mut self) {
        let Some(Frame { el, kind }) = self.stack.pop() else {
            return;
        };
        match kind {
            FrameKind::Plain => self.push_node(el.into()),
            FrameKind::Heading(level) => {
                let heading = self.finish_heading(level, el.children);
                self.push_node(heading.into());
            }
            FrameKind::Image { src, title } => {
                let mut img = Element::new("img")
                    .with_attr("src", src)
                    .with_attr("alt", el.text_content());
                if !title.is_empty() {
                    img.set_attr("title", title);
                }
                self.push_node(img.into());
            }
            FrameKind::Code(lang) => {
                let pre = self.finish_code(lang, el.text_content());
                self.push_node(pre.into());
            }
            FrameKind::Transparent => {
                for child in el.children {
                    self.push_node(child);
                }
            }
            FrameKind::Discard => {}
        }
    }

    fn finish_heading(&mut self, level: u8, inner: Vec<Node>) -> Element {
        let text: String = inner.iter().map(Node::text_content).collect();
        let slug = self.slugger.slug(&text);
        let mut heading = Element::new(format!("h{level}")).with_attr("id", slug.as_str());

        if level > 3 {
            heading.children = inner;
            return heading;
        }

        let mut row = Element::new("span").with_class(HEADING_ROW_CLASS);
        if level == 2 {
            row.push(
                Element::new("button")
                    .with_class(COLLAPSE_BUTTON_CLASS)
                    .with_attr("type", "button")
                    .with_attr("data-collapse", slug.as_str())
                    .with_attr("aria-expanded", "true")
                    .with_attr("aria-label", "Toggle section")
                    .with_text(GLYPH_EXPANDED),
            );
        }
        row.push(
            Element::new("span")
                .with_class(HEADING_LABEL_CLASS)
                .with_children(inner),
        );
        if level > 1 {
            row.push(
                Element::new("a")
                    .with_class(HEADING_LINK_CLASS)
                    .with_attr("href", format!("#{slug}"))
                    .with_attr("aria-label", "Copy link to section")
                    .with_text("#"),
            );
        }
        heading.push(row);
        heading
    }

    fn finish_code(&self, lang: Option<String>, text: String) -> Element {
        let mut code = Element::new("code");
        let highlighted = lang
            .as_deref()
            .and_then(|l| self.highlighter.highlight(l, &text));
        match (lang, highlighted) {
            (Some(lang), Some(html)) => {
                code.add_class("hljs");
                code.add_class(&format!("language-{lang}"));
                code.push(Node::Highlighted { source: text, html });
            }
            (lang, _) => {
                if let Some(lang) = lang {
                    code.add_class(&format!("language-{lang}"));
                }
                code.push(Node::Text(text));
            }
        }
        Element::new("pre").with_child(code)
    }
}

fn link_element(href: &str, title: &str) -> Element {
    let external = is_external_href(href);
    let mut a = Element::new("a");
    if external {
        a.add_class("reverse");
    }
    a.set_attr("href", href);
    if !title.is_empty() {
        a.set_attr("title", title.replace('\n', " "));
    }
    if external {
        a.set_attr("rel", "noopener noreferrer");
        a.set_attr("target", "_blank");
    }
    a
}
