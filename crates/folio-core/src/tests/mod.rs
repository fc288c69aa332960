use crate::dom::{self, Element, Node};
use crate::markup::MarkupRenderer;

mod config;
mod detect;
mod editorial;
mod markup;
mod motion;
mod sections;

fn render(markdown: &str) -> Vec<Node> {
    MarkupRenderer::new().render(markdown)
}

fn find<'a>(nodes: &'a [Node], pred: &dyn Fn(&Element) -> bool) -> &'a Element {
    dom::find_in(nodes, pred).expect("element not found")
}

fn by_id<'a>(nodes: &'a [Node], id: &str) -> &'a Element {
    find(nodes, &|e| e.attr("id") == Some(id))
}
