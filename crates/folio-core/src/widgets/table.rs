use crate::dom::{Element, Node};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Trimmed cell text of a rendered `table`: header cells from `thead`, rows from `tbody`.
pub fn parse_table(table: &Element) -> ParsedTable {
    let headers = table
        .find(&|e| e.tag == "thead")
        .map(|thead| {
            thead
                .find_all(&|e| e.tag == "th")
                .into_iter()
                .map(|th| th.text_content().trim().to_string())
                .collect()
        })
        .unwrap_or_default();

    let rows = table
        .find(&|e| e.tag == "tbody")
        .map(|tbody| {
            tbody
                .child_elements()
                .filter(|tr| tr.tag == "tr")
                .map(|tr| {
                    tr.child_elements()
                        .filter(|c| c.tag == "td" || c.tag == "th")
                        .map(|c| c.text_content().trim().to_string())
                        .collect()
                })
                .collect()
        })
        .unwrap_or_default();

    ParsedTable { headers, rows }
}

/// First `table` among the siblings after `index`, stopping at the next `h2`/`h3`.
pub fn next_table(siblings: &[Node], index: usize) -> Option<&Element> {
    for el in siblings.iter().skip(index + 1).filter_map(Node::as_element) {
        if el.tag == "table" {
            return Some(el);
        }
        if matches!(el.heading_level(), Some(2 | 3)) {
            break;
        }
    }
    None
}
