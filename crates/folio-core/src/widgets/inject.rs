use super::formula::LockSchedule;
use super::table::{next_table, parse_table};
use super::{GRID_CLASS, MetricRow, Phase, Widget};
use crate::dom::{self, Element, Node};
use crate::markup::heading_label;
use crate::sections;
use regex::Regex;
use std::sync::LazyLock;

static PHASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^phase\s+\d+:").expect("phase pattern"));

fn normalized_label(el: &Element) -> String {
    heading_label(el).trim().to_lowercase()
}

fn heading_where(tag: &'static str, test: impl Fn(&str) -> bool) -> impl Fn(&Element) -> bool {
    move |el: &Element| el.tag == tag && test(&normalized_label(el))
}

fn grid(widgets: &[Widget]) -> Element {
    Element::new("div")
        .with_class(GRID_CLASS)
        .with_children(widgets.iter().map(|w| w.to_element(None).into()))
}

/// Inserts a grid of `widgets` right after the first element matching `anchor`.
fn insert_after(nodes: &mut Vec<Node>, anchor: &dyn Fn(&Element) -> bool, widgets: Vec<Widget>, out: &mut Vec<Widget>) {
    let Some((siblings, idx)) = dom::locate_mut(nodes, anchor) else {
        return;
    };
    siblings.insert(idx + 1, grid(&widgets).into());
    out.extend(widgets);
}

/// Lock schedule from the table following the multipliers heading, or the default.
fn lock_schedule(nodes: &[Node]) -> LockSchedule {
    let anchor = heading_where("h3", |t| t == "lock duration multipliers");
    match dom::locate(nodes, &anchor).and_then(|(siblings, idx)| next_table(siblings, idx)) {
        Some(table) => LockSchedule::from_rows(&parse_table(table).rows),
        None => LockSchedule::default(),
    }
}

fn metric_rows(nodes: &[Node]) -> Option<(Vec<MetricRow>, [String; 2])> {
    let anchor = heading_where("h3", |t| t == "success metrics");
    let (siblings, idx) = dom::locate(nodes, &anchor)?;
    let parsed = parse_table(next_table(siblings, idx)?);
    let rows = parsed
        .rows
        .into_iter()
        .filter_map(|row| {
            let mut cells = row.into_iter();
            let metric = cells.next().filter(|c| !c.is_empty())?;
            let earlier = cells.next().filter(|c| !c.is_empty())?;
            let later = cells.next().filter(|c| !c.is_empty())?;
            Some(MetricRow {
                metric,
                earlier,
                later,
            })
        })
        .collect();
    let column = |i: usize, fallback: &str| {
        parsed
            .headers
            .get(i)
            .filter(|h| !h.is_empty())
            .cloned()
            .unwrap_or_else(|| fallback.to_string())
    };
    Some((rows, [column(1, "Month 6"), column(2, "Month 12")]))
}

fn roadmap(nodes: &mut [Node]) -> Option<Widget> {
    let section = nodes
        .iter_mut()
        .filter_map(Node::as_element_mut)
        .filter(|el| el.has_class(sections::SECTION_CLASS))
        .find(|el| {
            el.child_elements()
                .find(|c| c.tag == "h2")
                .is_some_and(|h| normalized_label(h).starts_with("10. roadmap"))
        })?;
    let body = sections::body_of_mut(section)?;
    let phases: Vec<Phase> = body
        .find_all(&|e| e.tag == "h3")
        .into_iter()
        .filter_map(|h| {
            let label = heading_label(h).trim().to_string();
            if !PHASE_RE.is_match(&label) {
                return None;
            }
            Some(Phase {
                anchor: h.attr("id")?.to_string(),
                label,
            })
        })
        .collect();
    let widget = Widget::roadmap_timeline(phases)?;
    body.children
        .insert(0, grid(std::slice::from_ref(&widget)).into());
    Some(widget)
}

/// Finds each anchor heading and inserts its widget grid. Anchors that are missing, or whose
/// table is missing, are skipped. Returns the injected widgets in document pass order.
pub fn inject_widgets(nodes: &mut Vec<Node>) -> Vec<Widget> {
    let mut out = Vec::new();

    insert_after(
        nodes,
        &heading_where("h3", |t| t.starts_with("layer 1: economic cost")),
        vec![Widget::feedback_weight(), Widget::sybil_comparator()],
        &mut out,
    );

    insert_after(
        nodes,
        &heading_where("h3", |t| t == "revenue distribution"),
        vec![Widget::revenue_split()],
        &mut out,
    );

    let schedule = lock_schedule(nodes);
    insert_after(
        nodes,
        &heading_where("h3", |t| t == "lock duration multipliers"),
        vec![Widget::lock_multiplier(schedule.clone())],
        &mut out,
    );
    insert_after(
        nodes,
        &heading_where("h3", |t| t == "voting power"),
        vec![Widget::voting_power(schedule)],
        &mut out,
    );

    if let Some(widget) = roadmap(nodes) {
        out.push(widget);
    }

    if let Some(widget) =
        metric_rows(nodes).and_then(|(rows, columns)| Widget::success_metrics(rows, columns))
    {
        insert_after(
            nodes,
            &heading_where("h3", |t| t == "success metrics"),
            vec![widget],
            &mut out,
        );
    }

    tracing::debug!(widgets = out.len(), "injected widgets");
    out
}
